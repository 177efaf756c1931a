//! The feed/post data model.
//!
//! `Feed` is a subscribed RSS source; `Post` is one article belonging to it.
//! Both are immutable after creation: a feed is created once on a successful
//! subscription and never removed within a session, and posts are created in
//! batches when a feed is fetched.  The parser that produces them lives in
//! [`parser`].

mod parser;

pub use parser::parse_document;

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A subscribed RSS source.
///
/// `url` is the unique identifier across the feed collection; uniqueness is
/// enforced by the validator before a subscription is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub description: String,
    /// The URL the user submitted, attached on creation.
    pub url: String,
}

/// A single article from a feed.
///
/// ## Identity
///
/// `id` must be stable across repeated fetches of the same feed, or
/// de-duplication in the update loop falls apart: the RSS `<guid>` where the
/// source provides one, the `<link>` otherwise, and a content hash as a last
/// resort.  Never a locally generated counter.
///
/// ## Sorting
///
/// `Post` implements [`Ord`] for **reverse-chronological** ordering: newer
/// posts sort before older ones, and posts without a date sort last.  The
/// stable sort in the view preserves insertion order as the tiebreak.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Post {
    /// Unique identifier used for de-duplication.
    pub id: String,
    /// URL of the feed this post was fetched for.
    pub feed_url: String,
    pub title: String,
    pub description: String,
    pub link: String,
    /// Publication timestamp; `None` means the source did not provide one.
    pub published: Option<DateTime<Utc>>,
}

impl Ord for Post {
    fn cmp(&self, other: &Self) -> Ordering {
        // `other` first so that `Some(newer) > Some(older)` gives us newest-first.
        // `None` is less than `Some(_)` in the standard library, so undated
        // posts naturally sink to the bottom.
        other.published.cmp(&self.published)
    }
}

impl PartialOrd for Post {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Shorthand constructor for tests.
    pub fn make_post(id: &str, title: &str, published: Option<DateTime<Utc>>) -> Post {
        Post {
            id: id.to_string(),
            feed_url: "https://example.com/rss.xml".to_string(),
            title: title.to_string(),
            description: String::new(),
            link: String::new(),
            published,
        }
    }

    #[test]
    fn sort_reverse_chronological() {
        let old = make_post("1", "Old", Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let new = make_post("2", "New", Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));

        let mut posts = vec![old.clone(), new.clone()];
        posts.sort();

        assert_eq!(posts[0], new, "newest first");
        assert_eq!(posts[1], old);
    }

    #[test]
    fn undated_posts_sort_last() {
        let dated = make_post("1", "Dated", Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        let undated = make_post("2", "Undated", None);

        let mut posts = vec![undated.clone(), dated.clone()];
        posts.sort();

        assert_eq!(posts[0], dated);
        assert_eq!(posts[1], undated);
    }

    #[test]
    fn stable_sort_keeps_insertion_order_for_equal_keys() {
        let a = make_post("a", "A", None);
        let b = make_post("b", "B", None);
        let c = make_post("c", "C", None);

        let mut posts = vec![a.clone(), b.clone(), c.clone()];
        posts.sort();

        assert_eq!(posts, vec![a, b, c]);
    }
}
