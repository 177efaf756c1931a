//! The background worker: subscriptions and the update loop.
//!
//! Runs on a dedicated thread that owns a tokio current-thread runtime.  It
//! multiplexes two duties with `select!`: servicing subscription commands
//! from the UI, and the repeating poll cycle that re-fetches every
//! subscribed feed.  Results flow back to the UI thread over an [`mpsc`]
//! channel that the main loop drains on every tick.
//!
//! ## Scheduling discipline
//!
//! The loop is self-pacing: one cycle's fetches all run concurrently, but
//! the next sleep is armed only after every fetch has settled, so cycles
//! never overlap.  An empty feed list still re-arms the timer (idle polling)
//! so a feed added later is picked up without a restart.  Per-feed failures
//! are reported individually and never delay the other feeds' results, end
//! the cycle early, or terminate the loop — the loop has no terminal state
//! short of process teardown.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

use crate::error::{Error, Result};
use crate::feed::{parse_document, Feed, Post};
use crate::fetch::FetchClient;

/// Fixed delay between poll cycles.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Requests from the UI thread to the worker.
#[derive(Debug)]
pub enum Command {
    /// Subscribe to this URL.  The sender has already validated it.
    Subscribe(String),
}

/// Messages sent from the worker to the UI thread.
#[derive(Debug)]
pub enum WorkerMsg {
    /// A submission's fetch+parse succeeded.
    FeedLoaded {
        url: String,
        feed: Feed,
        posts: Vec<Post>,
    },
    /// A submission's fetch or parse failed.
    LoadFailed { url: String, error: Error },
    /// One feed's poll fetch produced a batch.  The batch may repeat known
    /// posts; the store de-duplicates at merge time.
    Posts { url: String, posts: Vec<Post> },
    /// One feed's poll fetch failed.  Background-only, never user-facing.
    PollFailed { url: String, error: Error },
}

/// Spawn the background worker thread.
///
/// Returns the command sender for subscriptions and the receiver the main
/// loop should drain on every tick.  The thread runs until the process
/// exits: dropping either channel end shuts it down.
pub fn spawn() -> Result<(UnboundedSender<Command>, mpsc::Receiver<WorkerMsg>)> {
    // Build the client up front so a broken TLS/config surfaces at startup.
    let client = FetchClient::new()?;
    let (cmd_tx, cmd_rx) = unbounded_channel();
    let (msg_tx, msg_rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!(error = %e, "failed to build worker runtime");
                return;
            }
        };
        runtime.block_on(run(client, cmd_rx, msg_tx));
    });

    Ok((cmd_tx, msg_rx))
}

async fn run(
    client: FetchClient,
    mut commands: UnboundedReceiver<Command>,
    out: mpsc::Sender<WorkerMsg>,
) {
    // URLs confirmed by a successful subscription fetch; the poll snapshot.
    let mut urls: Vec<String> = Vec::new();

    loop {
        tokio::select! {
            cmd = commands.recv() => {
                match cmd {
                    Some(Command::Subscribe(url)) => {
                        let msg = match load_feed(&client, &url).await {
                            Ok((feed, posts)) => {
                                // Concurrent subscriptions of one URL must not
                                // make the poll snapshot fetch it twice a cycle.
                                if !urls.contains(&url) {
                                    urls.push(url.clone());
                                }
                                WorkerMsg::FeedLoaded { url, feed, posts }
                            }
                            Err(error) => WorkerMsg::LoadFailed { url, error },
                        };
                        if out.send(msg).is_err() {
                            return; // UI thread has exited
                        }
                    }
                    None => return, // UI dropped the command channel
                }
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {
                run_cycle(&client, &urls, &out).await;
                // The sleep is re-created on the next iteration regardless of
                // how the cycle went: the timer always re-arms.
            }
        }
    }
}

/// One poll cycle: fetch every subscribed feed concurrently, report each
/// outcome independently, and return only once all fetches have settled.
async fn run_cycle(client: &FetchClient, urls: &[String], out: &mpsc::Sender<WorkerMsg>) {
    if urls.is_empty() {
        return; // idle cycle; the caller re-arms the timer anyway
    }

    tracing::debug!(feeds = urls.len(), "poll cycle started");

    let mut tasks = JoinSet::new();
    for url in urls {
        let client = client.clone();
        let url = url.clone();
        let out = out.clone();
        tasks.spawn(async move {
            let msg = match load_feed(&client, &url).await {
                Ok((_feed, posts)) => WorkerMsg::Posts { url, posts },
                Err(error) => WorkerMsg::PollFailed { url, error },
            };
            // A closed channel means the UI is gone; the loop notices on the
            // next subscribe attempt, so just drop the message here.
            let _ = out.send(msg);
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "poll task panicked");
        }
    }

    tracing::debug!("poll cycle settled");
}

async fn load_feed(client: &FetchClient, url: &str) -> Result<(Feed, Vec<Post>)> {
    let document = client.fetch_document(url).await?;
    parse_document(&document, url)
}
