//! GROQ queries for posts
//!
//! Every page issues some variant of `*[_type == "post" ...]`; this module
//! builds the filter expression and applies the same ordering and slicing
//! to decoded results.

use std::fmt;

use super::post::Post;

/// Which posts a query selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    AllPosts,
    BySlug(String),
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// `order(_createdAt desc)`
    NewestFirst,
}

/// A parameterized post query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub filter: Filter,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl PostQuery {
    /// Every post, in whatever order the host returns them
    pub fn all() -> Self {
        Self {
            filter: Filter::AllPosts,
            order: None,
            limit: None,
        }
    }

    /// The `limit` most recently created posts
    pub fn recent(limit: usize) -> Self {
        Self {
            filter: Filter::AllPosts,
            order: Some(Order::NewestFirst),
            limit: Some(limit),
        }
    }

    /// Posts whose slug equals `slug`
    pub fn by_slug(slug: &str) -> Self {
        Self {
            filter: Filter::BySlug(slug.to_string()),
            order: None,
            limit: None,
        }
    }

    /// The GROQ expression sent to the host
    pub fn to_groq(&self) -> String {
        let mut groq = match &self.filter {
            Filter::AllPosts => r#"*[_type == "post"]"#.to_string(),
            Filter::BySlug(slug) => format!(
                r#"*[_type == "post" && slug.current == "{}"]"#,
                escape_string(slug)
            ),
        };

        if let Some(Order::NewestFirst) = self.order {
            groq.push_str(" | order(_createdAt desc)");
        }

        if let Some(limit) = self.limit {
            // `...` is the exclusive range
            groq.push_str(&format!("[0...{}]", limit));
        }

        groq
    }

    /// Apply this query's ordering and limit to decoded posts
    pub fn shape(&self, mut posts: Vec<Post>) -> Vec<Post> {
        if let Some(Order::NewestFirst) = self.order {
            // Stable, posts without a creation time go last
            posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        if let Some(limit) = self.limit {
            posts.truncate(limit);
        }

        posts
    }
}

impl fmt::Display for PostQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_groq())
    }
}

/// Escape a value for use inside a double-quoted GROQ string
fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}
