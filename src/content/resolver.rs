//! Page data resolvers: the single-post and post-list lookups

use std::fmt;

use super::client::ContentClient;
use super::post::Post;
use super::query::PostQuery;
use crate::error::ContentError;

/// Which post list a page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Newest posts first, at most this many
    Recent(usize),
    /// Every post
    All,
}

impl Listing {
    pub fn query(self) -> PostQuery {
        match self {
            Listing::Recent(limit) => PostQuery::recent(limit),
            Listing::All => PostQuery::all(),
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Recent(limit) => write!(f, "{} most recent", limit),
            Listing::All => f.write_str("all"),
        }
    }
}

/// Look up one post by slug
///
/// `Ok(None)` means not found. An absent or blank slug is not found without
/// a request being made; any other slug is matched exactly as given.
pub async fn fetch_post(
    client: &ContentClient,
    slug: Option<&str>,
) -> Result<Option<Post>, ContentError> {
    let Some(slug) = slug.filter(|s| !s.trim().is_empty()) else {
        tracing::debug!("No slug given, skipping post lookup");
        return Ok(None);
    };

    let post = client.posts(&PostQuery::by_slug(slug)).await?.into_iter().next();
    if post.is_none() {
        tracing::debug!("No post with slug {:?}", slug);
    }

    Ok(post)
}

/// Fetch a post list; no matches is an empty list
pub async fn fetch_listing(
    client: &ContentClient,
    listing: Listing,
) -> Result<Vec<Post>, ContentError> {
    let posts = client.posts(&listing.query()).await?;
    tracing::debug!("Fetched {} posts ({})", posts.len(), listing);
    Ok(posts)
}
