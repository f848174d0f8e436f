//! Portable Text: the block tree post bodies are stored as
//!
//! Text blocks become paragraphs, headings and quotes; consecutive list
//! items are grouped into (possibly nested) `<ul>`/`<ol>` elements. Spans
//! carry decorator marks (`strong`, `em`, ...) or keys into the block's
//! `markDefs` for annotations such as links.

use serde::{Deserialize, Serialize};

use super::de::{lenient_list, null_as_default};
use super::image::{ImageRef, ImageUrlBuilder};
use crate::helpers::{html_escape, image_tag, is_safe_href};

/// A top-level body block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "block")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Image(ImageRef),
    /// Custom block types this renderer does not know about
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextBlock {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(rename = "listItem", default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub children: Vec<Child>,
    #[serde(rename = "markDefs", default, deserialize_with = "lenient_list")]
    pub mark_defs: Vec<MarkDef>,
}

/// Inline child of a text block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum Child {
    #[serde(rename = "span")]
    Span(Span),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Span {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub marks: Vec<String>,
}

/// Annotation referenced from span marks by key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkDef {
    #[serde(rename = "_key", default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(rename = "_type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub blank: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    fn from_item(item: &str) -> Self {
        match item {
            "number" => ListKind::Number,
            _ => ListKind::Bullet,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Number => "ol",
        }
    }
}

/// Renders block trees to HTML
pub struct PortableTextRenderer<'a> {
    images: &'a ImageUrlBuilder,
}

impl<'a> PortableTextRenderer<'a> {
    pub fn new(images: &'a ImageUrlBuilder) -> Self {
        Self { images }
    }

    /// Render a whole body
    pub fn render(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        // Open lists, innermost last; each has an unclosed <li>
        let mut lists: Vec<(ListKind, u32)> = Vec::new();

        for block in blocks {
            match block {
                Block::Text(text) if text.list_item.is_some() => {
                    let kind = ListKind::from_item(text.list_item.as_deref().unwrap_or_default());
                    let level = text.level.unwrap_or(1).max(1);
                    open_list_item(&mut out, &mut lists, kind, level);
                    out.push_str(&render_inline(text));
                }
                Block::Text(text) => {
                    close_lists(&mut out, &mut lists, 0);
                    out.push_str(&render_text_block(text));
                }
                Block::Image(image) => {
                    close_lists(&mut out, &mut lists, 0);
                    if let Some(html) = self.render_image(image) {
                        out.push_str(&html);
                    }
                }
                Block::Unknown => {
                    tracing::debug!("Skipping unknown block type");
                }
            }
        }

        close_lists(&mut out, &mut lists, 0);
        out
    }

    fn render_image(&self, image: &ImageRef) -> Option<String> {
        let src = self.images.image(image).url()?;
        let alt = image.alt.as_deref().unwrap_or("");
        Some(format!("<figure>{}</figure>", image_tag(&src, alt, None)))
    }
}

/// Plain text of a body, one paragraph per text block
pub fn plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Text(text) => Some(
                text.children
                    .iter()
                    .filter_map(|child| match child {
                        Child::Span(span) => Some(span.text.as_str()),
                        Child::Unknown => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Close lists deeper than `level`, the last item of each included
fn close_lists(out: &mut String, lists: &mut Vec<(ListKind, u32)>, level: u32) {
    while let Some(&(kind, open_level)) = lists.last() {
        if open_level <= level {
            break;
        }
        out.push_str("</li></");
        out.push_str(kind.tag());
        out.push('>');
        lists.pop();
    }
}

fn open_list_item(out: &mut String, lists: &mut Vec<(ListKind, u32)>, kind: ListKind, level: u32) {
    close_lists(out, lists, level);

    match lists.last() {
        Some(&(open_kind, open_level)) if open_level == level && open_kind == kind => {
            out.push_str("</li>");
        }
        Some(&(_, open_level)) if open_level == level => {
            // Same depth, other list type
            close_lists(out, lists, level - 1);
            start_list(out, lists, kind, level);
        }
        // Deeper than anything open, nests inside the current <li>
        _ => start_list(out, lists, kind, level),
    }

    out.push_str("<li>");
}

fn start_list(out: &mut String, lists: &mut Vec<(ListKind, u32)>, kind: ListKind, level: u32) {
    out.push('<');
    out.push_str(kind.tag());
    out.push('>');
    lists.push((kind, level));
}

fn render_text_block(block: &TextBlock) -> String {
    let tag = match block.style.as_deref().unwrap_or("normal") {
        style @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote") => style,
        _ => "p",
    };
    format!("<{tag}>{}</{tag}>", render_inline(block))
}

fn render_inline(block: &TextBlock) -> String {
    let mut out = String::new();

    for child in &block.children {
        let Child::Span(span) = child else {
            continue;
        };

        let mut open = String::new();
        let mut close = Vec::new();
        for mark in &span.marks {
            if let Some((start, end)) = mark_tags(mark, &block.mark_defs) {
                open.push_str(&start);
                close.push(end);
            }
        }

        out.push_str(&open);
        out.push_str(&html_escape(&span.text).replace('\n', "<br/>"));
        for end in close.iter().rev() {
            out.push_str(end);
        }
    }

    out
}

/// Opening and closing tags for a mark, `None` for marks without markup
fn mark_tags(mark: &str, defs: &[MarkDef]) -> Option<(String, String)> {
    let simple = |tag: &str| Some((format!("<{}>", tag), format!("</{}>", tag)));

    match mark {
        "strong" => simple("strong"),
        "em" => simple("em"),
        "code" => simple("code"),
        "underline" => simple("u"),
        "strike-through" => simple("s"),
        key => {
            let def = defs.iter().find(|d| d.key == key)?;
            match def.kind.as_str() {
                "link" => {
                    let href = def.href.as_deref().filter(|h| is_safe_href(h))?;
                    let target = if def.blank.unwrap_or(false) {
                        r#" target="_blank" rel="noopener""#
                    } else {
                        ""
                    };
                    Some((
                        format!(r#"<a href="{}"{}>"#, html_escape(href.trim()), target),
                        "</a>".to_string(),
                    ))
                }
                other => {
                    tracing::debug!("Ignoring annotation of type {}", other);
                    None
                }
            }
        }
    }
}
