//! Post model as returned by the content host

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de::{lenient_list, null_as_default};
use super::image::ImageRef;
use super::portable_text::Block;

/// A blog post, a read-only projection of a `post` document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Document id
    #[serde(rename = "_id", default)]
    pub id: String,

    /// Creation time, used for newest-first ordering
    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Post title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// URL-safe identifier
    #[serde(default)]
    pub slug: Option<Slug>,

    /// Cover image
    #[serde(rename = "mainImage", default)]
    pub main_image: Option<ImageRef>,

    /// Rich-text body, blocks of the wrong shape dropped
    #[serde(default, deserialize_with = "lenient_list")]
    pub body: Vec<Block>,

    /// Publication date
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// The slug, if the document has a non-empty one
    pub fn slug(&self) -> Option<&str> {
        self.slug
            .as_ref()
            .map(|s| s.current.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Slug object (`{ "_type": "slug", "current": "hello-world" }`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slug {
    #[serde(default)]
    pub current: String,
}
