//! List posts from the content host

use anyhow::Result;

use crate::content::{resolver, Listing, Post};
use crate::helpers::date_xml;
use crate::Blog;

/// List posts of the given kind: `recent` or `all`
pub async fn run(blog: &Blog, kind: &str) -> Result<()> {
    let listing = match kind {
        "recent" | "home" => Listing::Recent(blog.config.home_limit),
        "all" | "post" | "posts" => Listing::All,
        _ => {
            anyhow::bail!("Unknown type: {}. Available: recent, all", kind);
        }
    };

    let posts = resolver::fetch_listing(&blog.client, listing).await?;
    print!("{}", format_listing(blog, listing, &posts));
    Ok(())
}

fn format_listing(blog: &Blog, listing: Listing, posts: &[Post]) -> String {
    let mut out = format!("Posts, {} ({}):\n", listing, posts.len());
    for post in posts {
        let date = post
            .published_at
            .map(|d| date_xml(&d.with_timezone(&blog.timezone)))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {} - {} [{}]\n",
            date,
            post.title,
            post.slug().unwrap_or("no slug")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::blog;
    use serde_json::json;

    #[test]
    fn test_format_listing() {
        let blog = blog("http://127.0.0.1:9");
        let posts: Vec<Post> = serde_json::from_value(json!([
            {"_id": "a", "title": "Uno", "slug": {"current": "uno"}, "publishedAt": "2024-01-15T15:00:00Z"},
            {"_id": "b", "title": "Dos"}
        ]))
        .unwrap();

        let out = format_listing(&blog, Listing::All, &posts);
        assert_eq!(
            out,
            "Posts, all (2):\n  2024-01-15T12:00:00.000-03:00 - Uno [uno]\n  - - Dos [no slug]\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_kind() {
        let blog = blog("http://127.0.0.1:9");
        assert!(run(&blog, "tags").await.is_err());
    }
}
