//! Image references and the CDN URL builder

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ContentConfig;

lazy_static! {
    /// `image-<id>-<width>x<height>-<format>`
    static ref ASSET_REF_RE: Regex =
        Regex::new(r"^image-([A-Za-z0-9]+)-(\d+)x(\d+)-([a-z0-9]+)$").unwrap();
}

/// An image field (`mainImage`, or an image block in a body)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Reference to an uploaded asset, or the asset itself when projected
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssetRef {
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Parts of an asset reference id
#[derive(Debug, Clone, PartialEq)]
pub struct AssetId {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl AssetId {
    /// Parse `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`
    pub fn parse(reference: &str) -> Option<Self> {
        let caps = ASSET_REF_RE.captures(reference)?;
        Some(Self {
            id: caps[1].to_string(),
            width: caps[2].parse().ok()?,
            height: caps[3].parse().ok()?,
            format: caps[4].to_string(),
        })
    }
}

/// How the image is fitted into the requested box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Clip,
    Crop,
    Fill,
    Max,
    Min,
    Scale,
}

impl Fit {
    fn as_str(self) -> &'static str {
        match self {
            Fit::Clip => "clip",
            Fit::Crop => "crop",
            Fit::Fill => "fill",
            Fit::Max => "max",
            Fit::Min => "min",
            Fit::Scale => "scale",
        }
    }
}

/// Builds CDN URLs for image references of one project and dataset
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base: String,
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: &str, dataset: &str) -> Self {
        Self {
            base: ContentConfig::default().image_cdn,
            project_id: project_id.to_string(),
            dataset: dataset.to_string(),
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(&config.project_id, &config.dataset).with_base(&config.image_cdn)
    }

    /// Use another CDN origin
    pub fn with_base(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }

    /// Start a URL for `source`
    pub fn image<'a>(&'a self, source: &'a ImageRef) -> ImageUrl<'a> {
        ImageUrl {
            builder: self,
            source,
            width: None,
            height: None,
            quality: None,
            fit: None,
        }
    }
}

/// A URL being parameterized; `url()` finishes it
#[derive(Debug, Clone)]
pub struct ImageUrl<'a> {
    builder: &'a ImageUrlBuilder,
    source: &'a ImageRef,
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<u8>,
    fit: Option<Fit>,
}

impl ImageUrl<'_> {
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Quality from 0 to 100
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality.min(100));
        self
    }

    pub fn fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        self
    }

    /// The finished URL, or `None` if the reference can not be resolved
    pub fn url(&self) -> Option<String> {
        let asset = self.source.asset.as_ref()?;

        let base = match asset.reference.as_deref().and_then(AssetId::parse) {
            Some(parsed) => format!(
                "{}/images/{}/{}/{}-{}x{}.{}",
                self.builder.base,
                self.builder.project_id,
                self.builder.dataset,
                parsed.id,
                parsed.width,
                parsed.height,
                parsed.format
            ),
            None => {
                let url = asset.url.as_deref()?;
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return None;
                }
                url.to_string()
            }
        };

        let mut params = Vec::new();
        if let Some(w) = self.width {
            params.push(format!("w={}", w));
        }
        if let Some(h) = self.height {
            params.push(format!("h={}", h));
        }
        if let Some(q) = self.quality {
            params.push(format!("q={}", q));
        }
        if let Some(fit) = self.fit {
            params.push(format!("fit={}", fit.as_str()));
        }

        if params.is_empty() {
            return Some(base);
        }

        let separator = if base.contains('?') { '&' } else { '?' };
        Some(format!("{}{}{}", base, separator, params.join("&")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(r: &str) -> ImageRef {
        ImageRef {
            asset: Some(AssetRef {
                reference: Some(r.to_string()),
                url: None,
            }),
            alt: None,
        }
    }

    #[test]
    fn test_parse_asset_id() {
        let parsed = AssetId::parse("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg").unwrap();
        assert_eq!(parsed.id, "Tb9Ew8CXIwaY6R1kjMvI0uRR");
        assert_eq!(parsed.width, 2000);
        assert_eq!(parsed.height, 3000);
        assert_eq!(parsed.format, "jpg");

        assert!(AssetId::parse("file-abc-pdf").is_none());
        assert!(AssetId::parse("image-abc-jpg").is_none());
    }

    #[test]
    fn test_plain_url() {
        let builder = ImageUrlBuilder::new("abc123", "production");
        let image = reference("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg");
        assert_eq!(
            builder.image(&image).url().unwrap(),
            "https://cdn.sanity.io/images/abc123/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg"
        );
    }

    #[test]
    fn test_sized_url() {
        let builder = ImageUrlBuilder::new("abc123", "production");
        let image = reference("image-abc-800x600-png");
        let url = builder
            .image(&image)
            .width(310)
            .height(290)
            .quality(100)
            .fit(Fit::Crop)
            .url()
            .unwrap();
        assert_eq!(
            url,
            "https://cdn.sanity.io/images/abc123/production/abc-800x600.png?w=310&h=290&q=100&fit=crop"
        );
    }

    #[test]
    fn test_quality_is_clamped() {
        let builder = ImageUrlBuilder::new("p", "d");
        let image = reference("image-abc-1x1-png");
        assert!(builder
            .image(&image)
            .quality(250)
            .url()
            .unwrap()
            .ends_with("?q=100"));
    }

    #[test]
    fn test_projected_asset_url() {
        let builder = ImageUrlBuilder::new("p", "d");
        let image = ImageRef {
            asset: Some(AssetRef {
                reference: None,
                url: Some("https://cdn.example.com/a.jpg?v=2".to_string()),
            }),
            alt: None,
        };
        assert_eq!(
            builder.image(&image).width(10).url().unwrap(),
            "https://cdn.example.com/a.jpg?v=2&w=10"
        );
    }

    #[test]
    fn test_unresolvable_reference() {
        let builder = ImageUrlBuilder::new("p", "d");
        assert!(builder.image(&ImageRef::default()).url().is_none());
        assert!(builder.image(&reference("not-an-image")).url().is_none());

        let script = ImageRef {
            asset: Some(AssetRef {
                reference: None,
                url: Some("javascript:alert(1)".to_string()),
            }),
            alt: None,
        };
        assert!(builder.image(&script).url().is_none());
    }

    #[test]
    fn test_custom_base() {
        let config = ContentConfig {
            project_id: "p".to_string(),
            image_cdn: "http://localhost:9999/".to_string(),
            ..ContentConfig::default()
        };
        let builder = ImageUrlBuilder::from_config(&config);
        let image = reference("image-abc-1x1-png");
        assert_eq!(
            builder.image(&image).url().unwrap(),
            "http://localhost:9999/images/p/production/abc-1x1.png"
        );
    }
}
