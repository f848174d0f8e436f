//! Content module - the content host client, post model and body rendering

mod client;
mod de;
mod image;
mod portable_text;
mod post;
mod query;
pub mod resolver;

pub use client::{ContentClient, QueryResponse};
pub use image::{AssetId, AssetRef, Fit, ImageRef, ImageUrl, ImageUrlBuilder};
pub use portable_text::{plain_text, Block, Child, MarkDef, PortableTextRenderer, Span, TextBlock};
pub use post::{Post, Slug};
pub use query::{Filter, Order, PostQuery};
pub use resolver::Listing;
