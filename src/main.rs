//! feedloop — a terminal RSS aggregator.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ WorkerMsg  ┌──────────┐  mutate  ┌──────────┐ on_change ┌──────────┐
//! │ poll.rs  │ ─────────► │  app.rs  │ ───────► │ store.rs │ ────────► │ view.rs  │
//! │ (worker) │  (channel) │ (flows)  │          │ (state)  │           │(dispatch)│
//! └──────────┘            └──────────┘          └──────────┘           └──────────┘
//!       ▲                      ▲                                            │
//!       │ Command::Subscribe   │ handle_key_event()                  draw() ▼
//!       └──────────────────────┤                                      ┌──────────┐
//!                         ┌──────────┐                                │  ui.rs   │
//!                         │ input.rs │                                │ (render) │
//!                         └──────────┘                                └──────────┘
//! ```
//!
//! * **`store`** — the single source of truth; every mutation notifies the
//!   registered observer with a structural-path change.
//! * **`view`** — the state-change dispatcher: maps each change to the
//!   minimal update of its screen-region models.
//! * **`ui`** — pure rendering: reads the view's models and draws widgets.
//! * **`app`** — the flows: submission (validate → load), worker-message
//!   application, post actions.
//! * **`poll`** — background worker: subscription fetches and the
//!   self-pacing update loop.
//! * **`feed`**, **`fetch`**, **`validate`**, **`i18n`**, **`error`** — the
//!   collaborators: data model + parser, proxied HTTP, URL validation,
//!   localization, and the error taxonomy.
//! * **`main`** — wires everything together: logging, terminal setup, seed
//!   URLs from the command line, and the event loop.

mod app;
mod error;
mod feed;
mod fetch;
mod i18n;
mod input;
mod logging;
mod poll;
mod store;
mod ui;
mod validate;
mod view;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use i18n::{Lang, Translator};
use store::Store;
use view::TuiView;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.  This prevents the common TUI bug where a panic leaves the
/// terminal in a broken state.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.  Internal-consistency violations are allowed to panic, so
/// without this the report would land on a broken screen.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    logging::init()?;
    install_panic_hook();

    // -- language ------------------------------------------------------------
    let lang = std::env::var("FEEDLOOP_LANG")
        .ok()
        .and_then(|code| Lang::from_code(&code))
        .unwrap_or_default();

    // -- background worker ---------------------------------------------------
    let (commands, messages) = poll::spawn()?;

    // -- application state + view --------------------------------------------
    let store = Store::new(TuiView::new(Translator::new(lang)));
    let mut app = App::new(store, commands);

    // Feed URLs given on the command line are subscribed at startup.
    app.seed(std::env::args().skip(1));

    tracing::info!(?lang, "feedloop started");

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any messages from the worker.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Apply worker results (subscriptions and poll batches)
        while let Ok(msg) = messages.try_recv() {
            app.apply_worker_msg(msg);
        }

        // 2. Render
        guard.terminal.draw(|f| ui::draw(app.view_mut(), f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key)?;
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
