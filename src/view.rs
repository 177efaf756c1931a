//! The state-change dispatcher.
//!
//! [`TuiView`] subscribes once to the store and maps each notified path to
//! the minimal update of its screen-region models; [`crate::ui`] then draws
//! those models each tick.  The view owns the pieces the original page kept
//! in the DOM — the URL input buffer, the feedback line, the rebuilt list
//! regions, the modal content — all handed to it at construction, never
//! reached through globals.  Because it only sees [`Change`] values, it is
//! agnostic to whether the submission flow or the update loop caused a
//! mutation.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

use crate::i18n::Translator;
use crate::store::{AppState, Change, FormState, LoadStatus, Observer};

/// Visual register of the inline feedback line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    Success,
    Danger,
}

/// Which region receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Posts,
}

/// One line of the feed region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// One line of the post region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
    pub id: String,
    pub title: String,
    pub published: Option<DateTime<Utc>>,
    pub read: bool,
}

/// Content of the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub body: String,
    pub link: String,
}

pub struct TuiView {
    translator: Translator,
    /// The URL input buffer (the form's text field).
    pub input: String,
    /// Whether the submission controls accept input.
    pub form_enabled: bool,
    /// Invalid-input visual state on the URL field.
    pub input_invalid: bool,
    /// Inline feedback text, already localized.
    pub feedback: Option<(String, FeedbackTone)>,
    /// Feed region, newest subscription first.
    pub feed_rows: Vec<FeedRow>,
    /// Post region, newest post first, undated last.
    pub post_rows: Vec<PostRow>,
    pub list_state: ListState,
    pub modal: Option<ModalContent>,
    pub focus: Focus,
}

impl TuiView {
    pub fn new(translator: Translator) -> Self {
        Self {
            translator,
            input: String::new(),
            form_enabled: true,
            input_invalid: false,
            feedback: None,
            feed_rows: Vec::new(),
            post_rows: Vec::new(),
            list_state: ListState::default(),
            modal: None,
            focus: Focus::Input,
        }
    }

    /// Localized label for a UI region.
    pub fn label<'a>(&self, key: &'a str) -> &'a str {
        self.translator.t(key)
    }

    // -- region updates ------------------------------------------------------

    fn rebuild_feeds(&mut self, state: &AppState) {
        self.feed_rows = state
            .feeds
            .iter()
            .rev()
            .map(|feed| FeedRow {
                title: feed.title.clone(),
                description: feed.description.clone(),
                url: feed.url.clone(),
            })
            .collect();
    }

    /// Rebuild the post region, re-anchoring the selection by post id so the
    /// scroll position survives the rebuild.
    fn rebuild_posts(&mut self, state: &AppState) {
        let selected_id = self
            .list_state
            .selected()
            .and_then(|i| self.post_rows.get(i))
            .map(|row| row.id.clone());

        let mut posts: Vec<_> = state.posts.iter().collect();
        posts.sort(); // stable: insertion order breaks ties

        self.post_rows = posts
            .iter()
            .map(|post| PostRow {
                id: post.id.clone(),
                title: post.title.clone(),
                published: post.published,
                read: state.is_read(&post.id),
            })
            .collect();

        if let Some(id) = selected_id {
            let index = self.post_rows.iter().position(|row| row.id == id);
            self.list_state.select(index);
        }
    }

    /// Restyle the one affected title; no list rebuild.
    fn restyle_read(&mut self, id: &str) {
        match self.post_rows.iter_mut().find(|row| row.id == id) {
            Some(row) => row.read = true,
            None => {
                // The store validated the id against the post collection, so
                // a miss here means the rows have drifted from state.
                tracing::error!(id, "read mark for a post absent from the rendered list");
                debug_assert!(false, "read mark for unrendered post id {id}");
            }
        }
    }

    fn render_form(&mut self, form: &FormState) {
        self.input_invalid = !form.is_valid;
        match &form.error {
            Some(key) => {
                self.feedback = Some((self.translator.t(key).to_string(), FeedbackTone::Danger));
            }
            None => {
                if let Some((_, FeedbackTone::Danger)) = self.feedback {
                    self.feedback = None;
                }
            }
        }
    }

    fn render_loading_error(&mut self, error: &Option<String>) {
        match error {
            Some(key) => {
                self.feedback = Some((self.translator.t(key).to_string(), FeedbackTone::Danger));
            }
            None => {
                if let Some((_, FeedbackTone::Danger)) = self.feedback {
                    self.feedback = None;
                }
            }
        }
    }

    fn render_status(&mut self, prev: LoadStatus, next: LoadStatus) {
        match next {
            LoadStatus::Loading => {
                self.form_enabled = false;
            }
            LoadStatus::Loaded => {
                self.form_enabled = true;
                self.feedback = Some((
                    self.translator.t("feedback.rss_loaded").to_string(),
                    FeedbackTone::Success,
                ));
                // Clearing the field and refocusing belong to the submission
                // flow only.  A background load (a startup seed) also lands
                // on `Loaded`, but arrives from `Waiting` and must not touch
                // what the user is typing.
                if prev == LoadStatus::Loading {
                    self.input.clear();
                    self.input_invalid = false;
                    self.focus = Focus::Input;
                }
            }
            LoadStatus::Failed => {
                self.form_enabled = true;
                if prev == LoadStatus::Loading {
                    self.focus = Focus::Input; // refocus, keep the entered URL
                }
            }
            LoadStatus::Waiting => {
                // Relaxation after `Loaded` (the banner stays) or an input
                // edit; either way the form is usable again.
                self.form_enabled = true;
            }
        }
    }

    fn render_modal(&mut self, state: &AppState, selection: &Option<String>) {
        self.modal = selection.as_ref().map(|id| {
            let post = state.post_by_id(id).unwrap_or_else(|| {
                // The store checks ids before selecting, so reaching this
                // means the state itself is corrupt.  Fail loudly.
                panic!("modal selection references unknown post id {id}")
            });
            ModalContent {
                title: post.title.clone(),
                body: post.description.clone(),
                link: post.link.clone(),
            }
        });
    }

    // -- post-list navigation ------------------------------------------------

    pub fn select_next(&mut self) {
        if self.post_rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.post_rows.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.post_rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.post_rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.post_rows.is_empty() {
            self.list_state.select(Some(self.post_rows.len() - 1));
        }
    }

    /// Id of the currently selected post row, if any.
    pub fn selected_post_id(&self) -> Option<String> {
        self.list_state
            .selected()
            .and_then(|i| self.post_rows.get(i))
            .map(|row| row.id.clone())
    }
}

impl Observer for TuiView {
    fn on_change(&mut self, state: &AppState, change: &Change) {
        // Exhaustive over every structural path: adding a path without view
        // logic is a compile error, not a silently dropped render.
        match change {
            Change::Feeds => self.rebuild_feeds(state),
            Change::Posts => self.rebuild_posts(state),
            Change::ReadMark { id } => self.restyle_read(id),
            Change::Form { next, .. } => self.render_form(next),
            Change::LoadingStatus { prev, next } => self.render_status(*prev, *next),
            Change::LoadingError { next, .. } => self.render_loading_error(next),
            Change::Modal { next, .. } => self.render_modal(state, next),
        }
    }
}
