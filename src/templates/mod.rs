//! Built-in page templates using the Tera template engine
//!
//! All templates are embedded in the binary and compiled once at startup.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // View models carry pre-escaped HTML, so Tera must not escape again
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("home.html", include_str!("blog/home.html")),
            ("posts.html", include_str!("blog/posts.html")),
            ("post.html", include_str!("blog/post.html")),
            ("error.html", include_str!("blog/error.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("blog/partials/footer.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("blog/partials/post_card.html"),
            ),
            ("partials/style.css", include_str!("blog/partials/style.css")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context. Text fields are HTML-escaped.

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub lang: String,
    pub home_url: String,
    pub posts_url: String,
    pub avatar_url: Option<String>,
    pub favicon_url: Option<String>,
    pub year: i32,
}

/// A post in the home or listing grid
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub title: String,
    pub href: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub published: Option<String>,
    pub published_iso: Option<String>,
}

/// A post on its detail page
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub image_url: Option<String>,
    pub image_alt: String,
    /// Rendered body, already HTML
    pub body_html: String,
    pub excerpt: String,
    pub published: Option<String>,
    pub published_iso: Option<String>,
}

/// Content of the not-found and unavailable pages
#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    pub title: String,
    pub message: String,
}
