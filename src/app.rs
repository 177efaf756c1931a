//! Application flows.
//!
//! [`App`] ties the store, the view and the background worker together: the
//! submission flow (validate → loading → worker command), application of
//! worker messages (both subscription results and poll batches), and the
//! modal/read-mark actions.  Collaborator failures are translated into state
//! here, at the flow boundary; only internal-consistency errors propagate
//! out, and those are allowed to abort the program.

use tokio::sync::mpsc::UnboundedSender;

use crate::error::Result;
use crate::poll::{Command, WorkerMsg};
use crate::store::Store;
use crate::validate;
use crate::view::{Focus, TuiView};

pub struct App {
    pub store: Store<TuiView>,
    commands: UnboundedSender<Command>,
    /// URLs sent to the worker whose subscription has not settled yet.
    /// Counted as existing by validation, so a URL cannot be subscribed
    /// twice while its first fetch is still in flight.
    pending: Vec<String>,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl App {
    pub fn new(store: Store<TuiView>, commands: UnboundedSender<Command>) -> Self {
        Self {
            store,
            commands,
            pending: Vec::new(),
            quit: false,
        }
    }

    /// Subscribed URLs plus the ones still in flight; the duplicate-check
    /// set for validation.
    fn known_urls(&self) -> Vec<String> {
        let mut urls = self.store.state().feed_urls();
        urls.extend(self.pending.iter().cloned());
        urls
    }

    pub fn view(&self) -> &TuiView {
        self.store.observer()
    }

    pub fn view_mut(&mut self) -> &mut TuiView {
        self.store.observer_mut()
    }

    // -- form editing --------------------------------------------------------

    /// Append a character to the URL input.  Any edit clears stale errors
    /// and relaxes the loading state back to waiting.
    pub fn type_char(&mut self, c: char) {
        if !self.view().form_enabled {
            return;
        }
        self.view_mut().input.push(c);
        self.store.reset_form();
    }

    pub fn backspace(&mut self) {
        if !self.view().form_enabled {
            return;
        }
        self.view_mut().input.pop();
        self.store.reset_form();
    }

    pub fn toggle_focus(&mut self) {
        let view = self.view_mut();
        view.focus = match view.focus {
            Focus::Input => Focus::Posts,
            Focus::Posts => Focus::Input,
        };
    }

    // -- submission flow -----------------------------------------------------

    /// Submit the URL in the input field.
    ///
    /// Validation failures stay in the form; on success the flow moves to
    /// `Loading` and the worker takes over.  Only one submission may be in
    /// flight at a time, so a submit while loading is a no-op (the form is
    /// disabled anyway).
    pub fn submit(&mut self) {
        if self.store.is_loading() {
            return;
        }

        let url = self.view().input.trim().to_string();
        if let Err(error) = validate::validate(&url, &self.known_urls()) {
            self.store.set_form_error(error.to_string());
            return;
        }

        self.store.begin_loading();
        self.pending.push(url.clone());
        if self.commands.send(Command::Subscribe(url)).is_err() {
            tracing::error!("worker is gone; cannot subscribe");
            self.pending.pop();
            self.store
                .fail_loading("feedback.errors.network_error");
        }
    }

    /// Subscribe a set of URLs given at startup, skipping invalid ones and
    /// duplicates among them.  Bypasses the form, so it does not hold the
    /// one-submission-in-flight slot.
    pub fn seed(&mut self, urls: impl IntoIterator<Item = String>) {
        for url in urls {
            match validate::validate(&url, &self.known_urls()) {
                Ok(()) => {
                    self.pending.push(url.clone());
                    if self.commands.send(Command::Subscribe(url)).is_err() {
                        tracing::error!("worker is gone; dropping remaining seed URLs");
                        return;
                    }
                }
                Err(error) => {
                    tracing::warn!(%url, error = %error, "skipping seed URL");
                }
            }
        }
    }

    // -- worker messages -----------------------------------------------------

    /// Apply one message from the worker to the state.  Both writers (the
    /// submission flow and the update loop) land here, and the store's
    /// merge is order-independent, so the nondeterministic settle order of
    /// concurrent poll fetches cannot corrupt the collections.
    pub fn apply_worker_msg(&mut self, msg: WorkerMsg) {
        match msg {
            WorkerMsg::FeedLoaded { url, feed, posts } => {
                tracing::info!(%url, posts = posts.len(), "feed subscribed");
                self.pending.retain(|pending| pending != &url);
                self.store.complete_feed_load(feed, posts);
            }
            WorkerMsg::LoadFailed { url, error } => {
                tracing::warn!(%url, error = ?error, "subscription failed");
                self.pending.retain(|pending| pending != &url);
                self.store.fail_loading(error.message_key());
            }
            WorkerMsg::Posts { url, posts } => {
                let merged = self.store.merge_posts(posts);
                if merged > 0 {
                    tracing::debug!(%url, merged, "new posts merged");
                }
            }
            WorkerMsg::PollFailed { url, error } => {
                // Covered by the next cycle; logged, never shown in the UI.
                tracing::warn!(%url, error = ?error, "poll fetch failed");
            }
        }
    }

    // -- post actions --------------------------------------------------------

    /// Open the selected post: mark it read and show the detail overlay.
    /// An unresolvable id is an internal-consistency error and propagates.
    pub fn open_selected(&mut self) -> Result<()> {
        let Some(id) = self.view().selected_post_id() else {
            return Ok(());
        };
        self.store.mark_read(&id)?;
        self.store.open_modal(&id)?;
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.store.close_modal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::feed::{Feed, Post};
    use crate::i18n::{Lang, Translator};
    use crate::store::LoadStatus;
    use crate::view::FeedbackTone;
    use chrono::{TimeZone, Utc};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn make_app() -> (App, UnboundedReceiver<Command>) {
        let (tx, rx) = unbounded_channel();
        let store = Store::new(TuiView::new(Translator::new(Lang::En)));
        (App::new(store, tx), rx)
    }

    fn make_feed(url: &str) -> Feed {
        Feed {
            title: "Example".to_string(),
            description: "news".to_string(),
            url: url.to_string(),
        }
    }

    fn make_post(id: &str, day: u32) -> Post {
        Post {
            id: id.to_string(),
            feed_url: "https://example.com/rss.xml".to_string(),
            title: format!("Post {id}"),
            description: String::new(),
            link: String::new(),
            published: Some(Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()),
        }
    }

    fn type_url(app: &mut App, url: &str) {
        for c in url.chars() {
            app.type_char(c);
        }
    }

    // -- submission ----------------------------------------------------------

    #[test]
    fn malformed_url_is_rejected_without_state_change() {
        let (mut app, mut rx) = make_app();
        type_url(&mut app, "not-a-url");
        app.submit();

        assert!(!app.store.state().form.is_valid);
        assert!(app.store.state().feeds.is_empty());
        assert!(app.store.state().posts.is_empty());
        assert_eq!(app.store.state().loading.status, LoadStatus::Waiting);
        assert!(rx.try_recv().is_err(), "no fetch was issued");
    }

    #[test]
    fn valid_url_moves_to_loading_and_issues_a_subscribe() {
        let (mut app, mut rx) = make_app();
        type_url(&mut app, "https://example.com/rss.xml");
        app.submit();

        assert_eq!(app.store.state().loading.status, LoadStatus::Loading);
        assert!(!app.view().form_enabled);
        match rx.try_recv() {
            Ok(Command::Subscribe(url)) => assert_eq!(url, "https://example.com/rss.xml"),
            other => panic!("expected a subscribe command, got {other:?}"),
        }
    }

    #[test]
    fn submit_while_loading_is_ignored() {
        let (mut app, mut rx) = make_app();
        type_url(&mut app, "https://example.com/rss.xml");
        app.submit();
        let _ = rx.try_recv();

        app.submit();
        assert!(rx.try_recv().is_err(), "second submission not issued");
    }

    #[test]
    fn duplicate_url_is_rejected_after_the_feed_exists() {
        let (mut app, _rx) = make_app();
        type_url(&mut app, "https://example.com/rss.xml");
        app.submit();
        app.apply_worker_msg(WorkerMsg::FeedLoaded {
            url: "https://example.com/rss.xml".to_string(),
            feed: make_feed("https://example.com/rss.xml"),
            posts: vec![],
        });

        type_url(&mut app, "https://example.com/rss.xml");
        app.submit();

        assert!(!app.store.state().form.is_valid);
        assert_eq!(
            app.store.state().form.error.as_deref(),
            Some("feedback.errors.existing_rss")
        );
        assert_eq!(app.store.state().feeds.len(), 1);
    }

    #[test]
    fn successful_load_round_trips_into_the_rendered_regions() {
        let (mut app, _rx) = make_app();
        type_url(&mut app, "https://example.com/rss.xml");
        app.submit();
        app.apply_worker_msg(WorkerMsg::FeedLoaded {
            url: "https://example.com/rss.xml".to_string(),
            feed: make_feed("https://example.com/rss.xml"),
            posts: vec![make_post("a", 1), make_post("b", 2)],
        });

        assert_eq!(app.store.state().feeds[0].url, "https://example.com/rss.xml");
        assert_eq!(app.view().feed_rows[0].title, "Example");
        let ids: Vec<&str> = app.view().post_rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"], "newest first");
        assert!(app.view().input.is_empty(), "input cleared");
        assert_eq!(app.store.state().loading.status, LoadStatus::Waiting);
    }

    #[test]
    fn invalid_feed_document_fails_the_submission_and_reenables_the_form() {
        let (mut app, _rx) = make_app();
        type_url(&mut app, "https://example.com/page.html");
        app.submit();
        app.apply_worker_msg(WorkerMsg::LoadFailed {
            url: "https://example.com/page.html".to_string(),
            error: Error::InvalidFormat("unexpected root".into()),
        });

        assert_eq!(app.store.state().loading.status, LoadStatus::Failed);
        assert!(app.store.state().feeds.is_empty(), "no feed added");
        assert!(app.view().form_enabled);
        assert_eq!(app.view().input, "https://example.com/page.html", "URL kept");
        assert_eq!(
            app.view().feedback,
            Some((
                "The resource does not contain a valid RSS".to_string(),
                FeedbackTone::Danger
            ))
        );
    }

    #[test]
    fn network_failure_surfaces_the_connectivity_message() {
        let (mut app, _rx) = make_app();
        type_url(&mut app, "https://example.com/rss.xml");
        app.submit();
        app.apply_worker_msg(WorkerMsg::LoadFailed {
            url: "https://example.com/rss.xml".to_string(),
            error: Error::Timeout,
        });

        assert_eq!(
            app.store.state().loading.error.as_deref(),
            Some("feedback.errors.request_timed_out")
        );
    }

    #[test]
    fn typing_after_a_failure_clears_the_error() {
        let (mut app, _rx) = make_app();
        type_url(&mut app, "https://example.com/rss.xml");
        app.submit();
        app.apply_worker_msg(WorkerMsg::LoadFailed {
            url: "https://example.com/rss.xml".to_string(),
            error: Error::Network("refused".into()),
        });

        app.type_char('x');

        assert_eq!(app.store.state().loading.status, LoadStatus::Waiting);
        assert_eq!(app.store.state().loading.error, None);
        assert_eq!(app.view().feedback, None);
    }

    // -- poll cycle outcomes -------------------------------------------------

    fn subscribe_two_feeds(app: &mut App) {
        for url in ["https://a.com/rss", "https://b.com/rss"] {
            type_url(app, url);
            app.submit();
            app.apply_worker_msg(WorkerMsg::FeedLoaded {
                url: url.to_string(),
                feed: make_feed(url),
                posts: vec![],
            });
        }
    }

    #[test]
    fn partial_cycle_failure_still_merges_the_healthy_feeds_posts() {
        let (mut app, _rx) = make_app();
        subscribe_two_feeds(&mut app);

        app.apply_worker_msg(WorkerMsg::PollFailed {
            url: "https://a.com/rss".to_string(),
            error: Error::Network("refused".into()),
        });
        app.apply_worker_msg(WorkerMsg::Posts {
            url: "https://b.com/rss".to_string(),
            posts: vec![make_post("b1", 1), make_post("b2", 2)],
        });

        assert_eq!(app.store.state().posts.len(), 2);
        // Background failures never reach the form.
        assert_eq!(app.store.state().loading.status, LoadStatus::Waiting);
        assert_eq!(app.view().feedback, None);
    }

    #[test]
    fn cycle_outcome_application_is_order_independent() {
        for flip in [false, true] {
            let (mut app, _rx) = make_app();
            subscribe_two_feeds(&mut app);

            let failure = WorkerMsg::PollFailed {
                url: "https://a.com/rss".to_string(),
                error: Error::Timeout,
            };
            let batch = WorkerMsg::Posts {
                url: "https://b.com/rss".to_string(),
                posts: vec![make_post("b1", 1), make_post("b2", 2)],
            };

            if flip {
                app.apply_worker_msg(batch);
                app.apply_worker_msg(failure);
            } else {
                app.apply_worker_msg(failure);
                app.apply_worker_msg(batch);
            }

            assert_eq!(app.store.state().posts.len(), 2);
        }
    }

    #[test]
    fn repeated_poll_batches_do_not_accumulate_duplicates() {
        let (mut app, _rx) = make_app();
        subscribe_two_feeds(&mut app);

        let batch = vec![make_post("b1", 1), make_post("b2", 2)];
        app.apply_worker_msg(WorkerMsg::Posts {
            url: "https://b.com/rss".to_string(),
            posts: batch.clone(),
        });
        app.apply_worker_msg(WorkerMsg::Posts {
            url: "https://b.com/rss".to_string(),
            posts: batch,
        });

        assert_eq!(app.store.state().posts.len(), 2);
    }

    // -- seeding -------------------------------------------------------------

    #[test]
    fn seed_skips_invalid_and_duplicate_urls() {
        let (mut app, mut rx) = make_app();
        app.seed(vec![
            "https://a.com/rss".to_string(),
            "not-a-url".to_string(),
            "https://a.com/rss".to_string(),
            "https://b.com/rss".to_string(),
        ]);

        let mut issued = Vec::new();
        while let Ok(Command::Subscribe(url)) = rx.try_recv() {
            issued.push(url);
        }
        assert_eq!(issued, vec!["https://a.com/rss", "https://b.com/rss"]);
    }

    #[test]
    fn submitting_a_url_whose_seed_is_still_in_flight_is_rejected() {
        let (mut app, mut rx) = make_app();
        app.seed(vec!["https://a.com/rss".to_string()]);

        type_url(&mut app, "https://a.com/rss");
        app.submit();

        assert!(!app.store.state().form.is_valid);
        assert_eq!(
            app.store.state().form.error.as_deref(),
            Some("feedback.errors.existing_rss")
        );
        let mut issued = 0;
        while rx.try_recv().is_ok() {
            issued += 1;
        }
        assert_eq!(issued, 1, "only the seed's subscribe was issued");
    }

    #[test]
    fn duplicate_subscription_results_collapse_to_one_feed() {
        let (mut app, _rx) = make_app();
        app.seed(vec!["https://a.com/rss".to_string()]);
        for _ in 0..2 {
            app.apply_worker_msg(WorkerMsg::FeedLoaded {
                url: "https://a.com/rss".to_string(),
                feed: make_feed("https://a.com/rss"),
                posts: vec![make_post("a", 1)],
            });
        }

        assert_eq!(app.store.state().feeds.len(), 1, "duplicate feed inserted");
        assert_eq!(app.store.state().posts.len(), 1);
        assert_eq!(app.view().feed_rows.len(), 1);
    }

    #[test]
    fn failed_seed_frees_the_url_for_resubmission() {
        let (mut app, mut rx) = make_app();
        app.seed(vec!["https://a.com/rss".to_string()]);
        let _ = rx.try_recv();
        app.apply_worker_msg(WorkerMsg::LoadFailed {
            url: "https://a.com/rss".to_string(),
            error: Error::Timeout,
        });

        type_url(&mut app, "https://a.com/rss");
        app.submit();

        assert!(matches!(rx.try_recv(), Ok(Command::Subscribe(_))));
    }

    // -- post actions --------------------------------------------------------

    #[test]
    fn opening_a_post_marks_it_read_and_fills_the_modal() {
        let (mut app, _rx) = make_app();
        subscribe_two_feeds(&mut app);
        app.apply_worker_msg(WorkerMsg::Posts {
            url: "https://b.com/rss".to_string(),
            posts: vec![make_post("b1", 1)],
        });

        app.view_mut().select_first();
        app.open_selected().unwrap();

        assert!(app.store.state().is_read("b1"));
        assert!(app.view().post_rows[0].read);
        assert_eq!(app.view().modal.as_ref().unwrap().title, "Post b1");

        app.close_modal();
        assert!(app.view().modal.is_none());
        // The post itself is untouched.
        let post = app.store.state().post_by_id("b1").unwrap();
        assert_eq!(post.title, "Post b1");
    }

    #[test]
    fn open_with_no_selection_is_a_noop() {
        let (mut app, _rx) = make_app();
        app.open_selected().unwrap();
        assert!(app.view().modal.is_none());
    }

    #[test]
    fn typing_while_loading_is_ignored() {
        let (mut app, _rx) = make_app();
        type_url(&mut app, "https://example.com/rss.xml");
        app.submit();

        app.type_char('x');
        assert_eq!(app.view().input, "https://example.com/rss.xml");
    }
}
