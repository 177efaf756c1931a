//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  The form input and the post
//! list share the keyboard, so dispatch is by focus: the URL field consumes
//! printable characters, the list gets the navigation keys.  An open modal
//! captures everything until it is closed.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::error::Result;
use crate::view::Focus;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.  The `Result` carries only
/// internal-consistency errors, which the caller treats as fatal.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if app.view().modal.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
            app.close_modal();
        }
        return Ok(());
    }

    match app.view().focus {
        Focus::Input => match key.code {
            KeyCode::Enter => app.submit(),
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Esc => app.quit = true,
            KeyCode::Char(c) => app.type_char(c),
            _ => {}
        },
        Focus::Posts => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::Down | KeyCode::Char('j') => app.view_mut().select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.view_mut().select_previous(),
            KeyCode::Home | KeyCode::Char('g') => app.view_mut().select_first(),
            KeyCode::End | KeyCode::Char('G') => app.view_mut().select_last(),
            KeyCode::Enter | KeyCode::Char('o') => app.open_selected()?,
            _ => {}
        },
    }

    Ok(())
}
