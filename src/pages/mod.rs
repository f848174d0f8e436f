//! Page rendering: resolves page data and fills the templates
//!
//! List pages never fail because of the content host; they log and show
//! their empty state. The detail page tells "not found" and "unavailable"
//! apart so the server can answer 404 or 502.

use anyhow::Result;
use chrono::{Datelike, Utc};
use std::collections::HashMap;
use tera::Context;

use crate::content::{plain_text, resolver, Fit, Listing, Post, PortableTextRenderer};
use crate::helpers::{
    asset_url, date_xml, html_escape, long_date, post_path, squash_whitespace, truncate, url_for,
};
use crate::templates::{ErrorData, PostCard, PostView, SiteData};
use crate::Blog;

/// Card image box, cropped to fit
pub const CARD_WIDTH: u32 = 310;
pub const CARD_HEIGHT: u32 = 290;
pub const IMAGE_QUALITY: u8 = 100;

/// Longest meta description of a post page
pub const EXCERPT_CHARS: usize = 160;

/// Outcome of rendering a post detail page
#[derive(Debug)]
pub enum PostPage {
    Found(String),
    NotFound,
    /// The content host could not be reached or answered garbage
    Unavailable,
}

/// Home page with the most recent posts
pub async fn home(blog: &Blog) -> Result<String> {
    let posts = load_listing(blog, Listing::Recent(blog.config.home_limit)).await;
    render_home(blog, &posts)
}

/// Listing page with every post
pub async fn listing(blog: &Blog) -> Result<String> {
    let posts = load_listing(blog, Listing::All).await;
    render_listing(blog, &posts)
}

/// Detail page of the post with `slug`
pub async fn post(blog: &Blog, slug: Option<&str>) -> Result<PostPage> {
    match resolver::fetch_post(&blog.client, slug).await {
        Ok(Some(post)) => Ok(PostPage::Found(render_post(blog, &post)?)),
        Ok(None) => Ok(PostPage::NotFound),
        Err(e) => {
            tracing::error!("Failed to fetch post {:?}: {}", slug, e);
            Ok(PostPage::Unavailable)
        }
    }
}

async fn load_listing(blog: &Blog, listing: Listing) -> Vec<Post> {
    match resolver::fetch_listing(&blog.client, listing).await {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("Failed to fetch {} posts: {}", listing, e);
            Vec::new()
        }
    }
}

pub fn render_home(blog: &Blog, posts: &[Post]) -> Result<String> {
    let mut context = base_context(blog);
    let cards: Vec<PostCard> = posts.iter().map(|post| card(blog, post)).collect();
    context.insert("posts", &cards);
    blog.templates.render("home.html", &context)
}

pub fn render_listing(blog: &Blog, posts: &[Post]) -> Result<String> {
    let mut context = base_context(blog);
    let cards: Vec<PostCard> = posts.iter().map(|post| card(blog, post)).collect();
    context.insert("posts", &cards);
    blog.templates.render("posts.html", &context)
}

pub fn render_post(blog: &Blog, post: &Post) -> Result<String> {
    let mut context = base_context(blog);
    context.insert("post", &view(blog, post));
    blog.templates.render("post.html", &context)
}

pub fn render_not_found(blog: &Blog) -> Result<String> {
    render_error(blog, "errors.not_found_title", "errors.not_found")
}

pub fn render_unavailable(blog: &Blog) -> Result<String> {
    render_error(blog, "errors.unavailable_title", "errors.unavailable")
}

fn render_error(blog: &Blog, title_key: &str, message_key: &str) -> Result<String> {
    let mut context = base_context(blog);
    let error = ErrorData {
        title: html_escape(&blog.i18n.get(title_key)),
        message: html_escape(&blog.i18n.get(message_key)),
    };
    context.insert("error", &error);
    blog.templates.render("error.html", &context)
}

fn card(blog: &Blog, post: &Post) -> PostCard {
    let image_url = post.main_image.as_ref().and_then(|image| {
        blog.images
            .image(image)
            .width(CARD_WIDTH)
            .height(CARD_HEIGHT)
            .quality(IMAGE_QUALITY)
            .fit(Fit::Crop)
            .url()
    });
    let (published, published_iso) = published(blog, post).unzip();

    PostCard {
        title: html_escape(&title(blog, post)),
        href: post.slug().map(|slug| post_path(&blog.config, slug)),
        image_url: image_url.as_deref().map(html_escape),
        image_alt: html_escape(&image_alt(blog, post)),
        published,
        published_iso,
    }
}

fn view(blog: &Blog, post: &Post) -> PostView {
    let image_url = post
        .main_image
        .as_ref()
        .and_then(|image| blog.images.image(image).quality(IMAGE_QUALITY).url());
    let (published, published_iso) = published(blog, post).unzip();
    let excerpt = truncate(&squash_whitespace(&plain_text(&post.body)), EXCERPT_CHARS, None);

    PostView {
        title: html_escape(&title(blog, post)),
        image_url: image_url.as_deref().map(html_escape),
        image_alt: html_escape(&image_alt(blog, post)),
        body_html: PortableTextRenderer::new(&blog.images).render(&post.body),
        excerpt: html_escape(&excerpt),
        published,
        published_iso,
    }
}

fn title(blog: &Blog, post: &Post) -> String {
    if post.title.trim().is_empty() {
        blog.i18n.get("post.untitled")
    } else {
        post.title.clone()
    }
}

fn image_alt(blog: &Blog, post: &Post) -> String {
    post.main_image
        .as_ref()
        .and_then(|image| image.alt.clone())
        .filter(|alt| !alt.trim().is_empty())
        .unwrap_or_else(|| blog.i18n.format("post.image_alt", &title(blog, post)))
}

/// Long and machine-readable publication date in the blog's time zone
fn published(blog: &Blog, post: &Post) -> Option<(String, String)> {
    let local = post.published_at?.with_timezone(&blog.timezone);
    Some((
        html_escape(&long_date(&local, &blog.date_names)),
        date_xml(&local),
    ))
}

/// Context shared by every page: `site` and the `t` string table
fn base_context(blog: &Blog) -> Context {
    let config = &blog.config;
    let site = SiteData {
        title: html_escape(&config.title),
        subtitle: html_escape(&config.subtitle),
        description: html_escape(&config.description),
        author: html_escape(&config.author),
        lang: html_escape(blog.i18n.language()),
        home_url: url_for(config, "/"),
        posts_url: url_for(config, "posts"),
        avatar_url: config
            .avatar
            .as_deref()
            .map(|path| html_escape(&asset_url(config, path))),
        favicon_url: config
            .favicon
            .as_deref()
            .map(|path| html_escape(&asset_url(config, path))),
        year: Utc::now().with_timezone(&blog.timezone).year(),
    };

    let strings: HashMap<String, String> = blog
        .i18n
        .get_all_translations()
        .into_iter()
        .map(|(key, value)| (key, html_escape(&value)))
        .collect();

    let mut context = Context::new();
    context.insert("site", &site);
    context.insert("t", &strings);
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::blog;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample(slug: &str) -> Post {
        serde_json::from_value(json!({
            "_id": format!("id-{}", slug),
            "_createdAt": "2024-01-10T10:00:00Z",
            "title": "Hola <mundo>",
            "slug": {"current": slug},
            "mainImage": {"asset": {"_ref": "image-abc123-800x600-jpg"}},
            "body": [{
                "_type": "block",
                "style": "normal",
                "children": [{"_type": "span", "text": "Primer párrafo.", "marks": ["strong"]}],
                "markDefs": []
            }],
            "publishedAt": "2024-01-15T15:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_home_shows_message() {
        let blog = blog("http://127.0.0.1:9");
        let html = render_home(&blog, &[]).unwrap();
        assert!(html.contains("No se cargaron los posts :/"));
        assert!(!html.contains(r#"<article class="post-card""#));
        assert!(html.contains(r#"href="/posts""#));
        assert!(html.contains("Todos los posts"));
    }

    #[test]
    fn test_empty_listing_shows_message() {
        let blog = blog("http://127.0.0.1:9");
        let html = render_listing(&blog, &[]).unwrap();
        assert!(html.contains("Todavía no hay posts."));
        assert!(!html.contains(r#"<article class="post-card""#));
    }

    #[test]
    fn test_card_contents() {
        let blog = blog("http://127.0.0.1:9");
        let html = render_home(&blog, &[sample("hola")]).unwrap();

        assert_eq!(html.matches(r#"<article class="post-card">"#).count(), 1);
        assert!(html.contains("Hola &lt;mundo&gt;"));
        assert!(html.contains(r#"href="/posts/hola""#));
        assert!(html.contains("Ver post"));
        assert!(html.contains(
            "https://cdn.sanity.io/images/abc123/production/abc123-800x600.jpg?w=310&amp;h=290&amp;q=100&amp;fit=crop"
        ));
        assert!(html.contains("lunes, 15 de enero de 2024"));
    }

    #[test]
    fn test_unresolvable_image_is_omitted() {
        let blog = blog("http://127.0.0.1:9");
        let mut post = sample("hola");
        post.main_image = Some(Default::default());
        let html = render_home(&blog, &[post]).unwrap();
        assert!(html.contains("post-card"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_card_without_slug_has_no_link() {
        let blog = blog("http://127.0.0.1:9");
        let mut post = sample("hola");
        post.slug = None;
        let html = render_listing(&blog, &[post]).unwrap();
        assert!(!html.contains("Ver post"));
    }

    #[test]
    fn test_post_page() {
        let blog = blog("http://127.0.0.1:9");
        let html = render_post(&blog, &sample("hola")).unwrap();

        assert!(html.contains("<title>Hola &lt;mundo&gt; - Blog</title>"));
        assert!(html.contains("<p><strong>Primer párrafo.</strong></p>"));
        assert!(html.contains(r#"content="Primer párrafo.""#));
        assert!(html.contains(
            "https://cdn.sanity.io/images/abc123/production/abc123-800x600.jpg?q=100"
        ));
        assert!(html.contains(r#"alt="Imagen de Hola &lt;mundo&gt;""#));
        assert!(html.contains("Volver"));
    }

    #[test]
    fn test_excerpt_is_truncated() {
        let blog = blog("http://127.0.0.1:9");
        let mut post = sample("largo");
        post.body = serde_json::from_value(json!([{
            "_type": "block",
            "children": [{"_type": "span", "text": "palabra ".repeat(60)}]
        }]))
        .unwrap();
        let view = view(&blog, &post);
        assert!(view.excerpt.chars().count() <= EXCERPT_CHARS);
        assert!(view.excerpt.ends_with("..."));
    }

    #[test]
    fn test_error_pages() {
        let blog = blog("http://127.0.0.1:9");
        let not_found = render_not_found(&blog).unwrap();
        let unavailable = render_unavailable(&blog).unwrap();
        assert_ne!(not_found, unavailable);
        assert!(not_found.contains(&html_escape(&blog.i18n.get("errors.not_found"))));
        assert!(unavailable.contains(&html_escape(&blog.i18n.get("errors.unavailable"))));
    }

    #[tokio::test]
    async fn test_home_with_unreachable_host_is_empty_state() {
        let blog = blog("http://127.0.0.1:9");
        let html = home(&blog).await.unwrap();
        assert!(html.contains("No se cargaron los posts :/"));
    }

    #[tokio::test]
    async fn test_post_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param(
                "query",
                r#"*[_type == "post" && slug.current == "nope"]"#,
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param(
                "query",
                r#"*[_type == "post" && slug.current == "broken"]"#,
            ))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let blog = blog(&server.uri());
        assert!(matches!(
            post(&blog, Some("nope")).await.unwrap(),
            PostPage::NotFound
        ));
        assert!(matches!(
            post(&blog, Some("broken")).await.unwrap(),
            PostPage::Unavailable
        ));
        assert!(matches!(post(&blog, None).await.unwrap(), PostPage::NotFound));
    }
}
