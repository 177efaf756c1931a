//! Raw XML → `(Feed, Vec<Post>)`.
//!
//! A pure function over document text: no IO, no state.  Rejects anything
//! that is not a well-formed document with an `<rss>` root.  An `<rss>`
//! document with zero `<item>` elements parses to an empty post list, not an
//! error.

use chrono::{DateTime, Utc};
use rss::Channel;
use sha2::{Digest, Sha256};

use crate::error::Error;
use crate::feed::{Feed, Post};

/// Parse a fetched document into the feed header and its posts.
///
/// `feed_url` is the subscription URL; it is attached to the feed and every
/// post so items stay attributable to the feed they were fetched for.
pub fn parse_document(text: &str, feed_url: &str) -> Result<(Feed, Vec<Post>), Error> {
    let channel =
        Channel::read_from(text.as_bytes()).map_err(|e| Error::InvalidFormat(e.to_string()))?;

    let feed = Feed {
        title: channel.title().to_string(),
        description: channel.description().to_string(),
        url: feed_url.to_string(),
    };

    let posts = channel
        .items()
        .iter()
        .map(|item| {
            let title = item.title().unwrap_or_default().to_string();
            let description = item.description().unwrap_or_default().to_string();
            let link = item.link().unwrap_or_default().to_string();
            let id = post_id(item, &title, &description);
            let published = item
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|dt| dt.with_timezone(&Utc));

            Post {
                id,
                feed_url: feed_url.to_string(),
                title,
                description,
                link,
                published,
            }
        })
        .collect();

    Ok((feed, posts))
}

/// Stable identifier for an item: `<guid>`, else `<link>`, else a hash of
/// the content.  A locally generated counter would get a fresh value on
/// every poll and defeat de-duplication.
fn post_id(item: &rss::Item, title: &str, description: &str) -> String {
    item.guid()
        .map(|g| g.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| item.link().map(String::from).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| content_hash(title, description))
}

fn content_hash(title: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"\n");
    hasher.update(description.as_bytes());
    format!("{:x}", hasher.finalize())
}
