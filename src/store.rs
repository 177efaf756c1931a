//! Application state and the publish/subscribe change API.
//!
//! [`Store`] is the single source of truth for a session.  Every mutation
//! goes through a named method that applies the write and synchronously
//! notifies the registered [`Observer`] with a [`Change`] identifying the
//! structural path plus the previous and new values where they matter for
//! diffing.  Batch writes (merging a fetched post batch) fire one
//! collection-level notification, not one per element.
//!
//! The store performs no side effects of its own; rendering and IO live
//! entirely in the observer and the worker.  Both the submission flow and
//! the update loop converge on these methods, so the observer never needs to
//! know which writer caused a change.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::feed::{Feed, Post};

/// Status of the feed-loading process; drives form enable/disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Idle; form enabled, nothing pending.
    #[default]
    Waiting,
    /// A submission is in flight; form disabled.
    Loading,
    /// Terminal success; relaxed back to `Waiting` immediately after.
    Loaded,
    /// Terminal failure; form re-enabled with the entered URL kept.
    Failed,
}

/// Transient form validity, rewritten on every input/submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub is_valid: bool,
    /// Localization key of the last validation failure.
    pub error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }
}

/// Loading status plus the last fetch/parse error key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadingProcess {
    pub status: LoadStatus,
    pub error: Option<String>,
}

/// All mutable session data.
#[derive(Debug, Default)]
pub struct AppState {
    /// Subscribed feeds, in subscription order.
    pub feeds: Vec<Feed>,
    /// All known posts, in insertion order (the view sorts for display).
    pub posts: Vec<Post>,
    /// Ids already in `posts`; the de-duplication index for merging.
    seen: HashSet<String>,
    /// Ids of posts the user has opened.  Grows monotonically.
    pub read: HashSet<String>,
    pub form: FormState,
    pub loading: LoadingProcess,
    /// Post id selected for the detail view, if any.
    pub modal: Option<String>,
}

impl AppState {
    pub fn post_by_id(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn feed_urls(&self) -> Vec<String> {
        self.feeds.iter().map(|f| f.url.clone()).collect()
    }

    pub fn is_read(&self, id: &str) -> bool {
        self.read.contains(id)
    }
}

/// One state mutation, identified by structural path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The feed collection changed (collection-level).
    Feeds,
    /// The post collection changed (collection-level).
    Posts,
    /// A single post was marked read.
    ReadMark { id: String },
    Form { prev: FormState, next: FormState },
    LoadingStatus { prev: LoadStatus, next: LoadStatus },
    LoadingError { prev: Option<String>, next: Option<String> },
    Modal { prev: Option<String>, next: Option<String> },
}

impl Change {
    /// Structural path name, for logging.
    pub fn path(&self) -> &'static str {
        match self {
            Change::Feeds => "feeds",
            Change::Posts => "posts",
            Change::ReadMark { .. } => "readMarks",
            Change::Form { .. } => "form",
            Change::LoadingStatus { .. } => "loading.status",
            Change::LoadingError { .. } => "loading.error",
            Change::Modal { .. } => "modal",
        }
    }
}

/// Receiver of state-change notifications.  The view implements this; tests
/// register recording observers through the same seam.
pub trait Observer {
    /// Called synchronously after each mutation, with the state already in
    /// its new shape.
    fn on_change(&mut self, state: &AppState, change: &Change);
}

/// The observable state container.
pub struct Store<O: Observer> {
    state: AppState,
    observer: O,
}

impl<O: Observer> Store<O> {
    pub fn new(observer: O) -> Self {
        Self {
            state: AppState::default(),
            observer,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading.status == LoadStatus::Loading
    }

    fn emit(&mut self, change: Change) {
        tracing::trace!(path = change.path(), "state change");
        self.observer.on_change(&self.state, &change);
    }

    fn set_status(&mut self, next: LoadStatus) {
        if self.state.loading.status != next {
            let prev = std::mem::replace(&mut self.state.loading.status, next);
            self.emit(Change::LoadingStatus { prev, next });
        }
    }

    fn set_loading_error(&mut self, next: Option<String>) {
        if self.state.loading.error != next {
            let prev = std::mem::replace(&mut self.state.loading.error, next.clone());
            self.emit(Change::LoadingError { prev, next });
        }
    }

    fn set_form(&mut self, next: FormState) {
        if self.state.form != next {
            let prev = std::mem::replace(&mut self.state.form, next.clone());
            self.emit(Change::Form { prev, next });
        }
    }

    /// Input-field edit: clear stale errors and relax to `Waiting`.
    pub fn reset_form(&mut self) {
        self.set_loading_error(None);
        self.set_status(LoadStatus::Waiting);
        self.set_form(FormState::default());
    }

    /// Record a validation failure; the flow stays in `filling`.
    pub fn set_form_error(&mut self, key: impl Into<String>) {
        self.set_form(FormState {
            is_valid: false,
            error: Some(key.into()),
        });
    }

    /// Validation passed; a submission is now in flight.
    pub fn begin_loading(&mut self) {
        self.set_form(FormState::default());
        self.set_loading_error(None);
        self.set_status(LoadStatus::Loading);
    }

    /// Success path for a submission: append the feed, merge its posts, fire
    /// the terminal `Loaded` transition, then relax to `Waiting` so the
    /// success banner does not pin the form state.
    ///
    /// Ordering is part of the contract: `Feeds`, then `Posts`, then the
    /// status transitions — the view must render lists before it reacts to
    /// the final status.
    ///
    /// Feed URLs are unique in the collection.  Two concurrent subscriptions
    /// of the same URL (a startup seed racing a form submit) can both reach
    /// here; the second result keeps the existing entry and only merges its
    /// posts, which is a no-op by id.
    pub fn complete_feed_load(&mut self, feed: Feed, posts: Vec<Post>) {
        if self.state.feeds.iter().any(|f| f.url == feed.url) {
            tracing::warn!(url = %feed.url, "feed already subscribed; keeping the existing entry");
        } else {
            self.state.feeds.push(feed);
            self.emit(Change::Feeds);
        }
        self.merge_posts(posts);
        self.set_status(LoadStatus::Loaded);
        self.set_status(LoadStatus::Waiting);
    }

    /// Failure path for a submission.
    pub fn fail_loading(&mut self, key: impl Into<String>) {
        self.set_loading_error(Some(key.into()));
        self.set_status(LoadStatus::Failed);
    }

    /// Merge a fetched batch into the collection.  A post is new iff its id
    /// is absent from the whole current collection, cross-feed, at merge
    /// time — so the operation is idempotent and commutative with respect to
    /// arrival order.  Returns the number of posts inserted; fires a single
    /// `Posts` notification, and none at all when nothing was new.
    pub fn merge_posts(&mut self, incoming: Vec<Post>) -> usize {
        let mut inserted = 0;
        for post in incoming {
            if self.state.seen.insert(post.id.clone()) {
                self.state.posts.push(post);
                inserted += 1;
            }
        }
        if inserted > 0 {
            self.emit(Change::Posts);
        }
        inserted
    }

    /// Record that the user opened a post.  Marking an unknown id is a
    /// state-consistency bug, not a user error.
    pub fn mark_read(&mut self, id: &str) -> Result<()> {
        if self.state.post_by_id(id).is_none() {
            return Err(Error::Internal(format!(
                "read mark references unknown post id {id}"
            )));
        }
        if self.state.read.insert(id.to_string()) {
            self.emit(Change::ReadMark { id: id.to_string() });
        }
        Ok(())
    }

    /// Select a post for the detail view.
    pub fn open_modal(&mut self, id: &str) -> Result<()> {
        if self.state.post_by_id(id).is_none() {
            return Err(Error::Internal(format!(
                "modal selection references unknown post id {id}"
            )));
        }
        let next = Some(id.to_string());
        if self.state.modal != next {
            let prev = std::mem::replace(&mut self.state.modal, next.clone());
            self.emit(Change::Modal { prev, next });
        }
        Ok(())
    }

    pub fn close_modal(&mut self) {
        if self.state.modal.is_some() {
            let prev = self.state.modal.take();
            self.emit(Change::Modal { prev, next: None });
        }
    }
}
