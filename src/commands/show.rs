//! Print one post as plain text

use anyhow::Result;

use crate::content::{plain_text, resolver, Post};
use crate::helpers::{long_date, post_path};
use crate::Blog;

/// Fetch the post with `slug` and print it
pub async fn run(blog: &Blog, slug: &str) -> Result<()> {
    match resolver::fetch_post(&blog.client, Some(slug)).await? {
        Some(post) => println!("{}", format_post(blog, &post)),
        None => anyhow::bail!("No post with slug {:?}", slug),
    }
    Ok(())
}

fn format_post(blog: &Blog, post: &Post) -> String {
    let mut out = format!("{}\n", post.title);

    if let Some(date) = post.published_at {
        out.push_str(&long_date(&date.with_timezone(&blog.timezone), &blog.date_names));
        out.push('\n');
    }
    if let Some(slug) = post.slug() {
        out.push_str(&post_path(&blog.config, slug));
        out.push('\n');
    }

    let body = plain_text(&post.body);
    if !body.is_empty() {
        out.push('\n');
        out.push_str(&body);
    }
    out
}
