//! sanity-blog: A server-rendered blog backed by a hosted content API
//!
//! Posts live in a Sanity dataset and are fetched with GROQ queries on every
//! request; pages are rendered with Tera templates embedded in the binary.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod i18n;
pub mod pages;
pub mod server;
pub mod templates;

use anyhow::Result;
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

use crate::content::{ContentClient, ImageUrlBuilder};
use crate::helpers::DateNames;
use crate::i18n::I18n;
use crate::templates::TemplateRenderer;

/// The blog application, built once at startup and shared by every request
pub struct Blog {
    /// Site configuration, environment overrides applied
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Client for the content host
    pub client: ContentClient,
    pub images: ImageUrlBuilder,
    pub templates: TemplateRenderer,
    pub i18n: I18n,
    /// Zone publication dates are shown in
    pub timezone: Tz,
    pub date_names: DateNames,
}

impl Blog {
    /// Create a blog from `_config.yml` in a directory and the environment
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        Self::from_config(config, base_dir)
    }

    /// Create a blog from a finished configuration
    pub fn from_config(config: config::SiteConfig, base_dir: PathBuf) -> Result<Self> {
        config.validate()?;

        let timezone = config.tz()?;
        let client = ContentClient::new(&config.content)?;
        let images = ImageUrlBuilder::from_config(&config.content);
        let templates = TemplateRenderer::new()?;

        let mut i18n = I18n::builtin(&config.language)?;
        if let Some(dir) = &config.languages_dir {
            i18n.load_languages(base_dir.join(dir))?;
        }
        let date_names = i18n.date_names();

        Ok(Self {
            config,
            base_dir,
            client,
            images,
            templates,
            i18n,
            timezone,
            date_names,
        })
    }

    /// Directory served under `/public`
    pub fn public_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.server.public_dir)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::{ContentConfig, SiteConfig};

    /// Default settings with the content host at `api_url`
    pub fn config(api_url: &str) -> SiteConfig {
        SiteConfig {
            content: ContentConfig {
                project_id: "abc123".to_string(),
                api_url: Some(api_url.to_string()),
                timeout_secs: 2,
                ..ContentConfig::default()
            },
            ..SiteConfig::default()
        }
    }

    /// A blog with default settings talking to `api_url`
    pub fn blog(api_url: &str) -> Blog {
        Blog::from_config(config(api_url), std::env::temp_dir()).unwrap()
    }
}
