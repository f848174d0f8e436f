//! Site configuration (_config.yml)

use anyhow::Result;
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variables holding the content project id, most specific first
const PROJECT_ID_VARS: [&str; 2] = ["SANITY_PROJECT_ID", "NEXT_PUBLIC_PROJECT_ID"];

/// Environment variables holding the dataset name, most specific first
const DATASET_VARS: [&str; 2] = ["SANITY_DATASET", "NEXT_PUBLIC_SANITY_DATASET"];

lazy_static! {
    static ref PROJECT_ID_RE: Regex = Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*$").unwrap();
    static ref DATASET_RE: Regex = Regex::new(r"^[a-z0-9][a-z0-9_-]{0,63}$").unwrap();
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,
    /// Header picture, a path under the public directory or an absolute URL
    pub avatar: Option<String>,
    pub favicon: Option<String>,

    // URL
    pub root: String,

    // Home page
    pub home_limit: usize,

    /// Directory with language files overriding the built-in strings
    pub languages_dir: Option<PathBuf>,

    pub content: ContentConfig,
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            subtitle: "Posts más recientes.".to_string(),
            description: "Blog".to_string(),
            author: String::new(),
            language: "es-ar".to_string(),
            timezone: "America/Argentina/Buenos_Aires".to_string(),
            avatar: None,
            favicon: None,

            root: "/".to_string(),

            home_limit: 3,

            languages_dir: None,

            content: ContentConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        if let Some(project_id) = first_set(&PROJECT_ID_VARS) {
            tracing::debug!("Content project id taken from environment");
            self.content.project_id = project_id;
        }

        if let Some(dataset) = first_set(&DATASET_VARS) {
            tracing::debug!("Dataset taken from environment: {}", dataset);
            self.content.dataset = dataset;
        }
    }

    /// Check the values that end up in hostnames and URL paths
    pub fn validate(&self) -> Result<(), ConfigError> {
        let project_id = &self.content.project_id;
        if project_id.is_empty() {
            return Err(ConfigError::MissingProjectId);
        }
        if !PROJECT_ID_RE.is_match(project_id) {
            return Err(ConfigError::InvalidProjectId(project_id.clone()));
        }

        if !DATASET_RE.is_match(&self.content.dataset) {
            return Err(ConfigError::InvalidDataset(self.content.dataset.clone()));
        }

        self.tz()?;
        Ok(())
    }

    /// Time zone used to display publication dates
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }
}

/// Content host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub project_id: String,
    pub dataset: String,
    /// Query API version, `1` or a dated version like `2021-10-21`
    pub api_version: String,
    /// Query the cached API edge instead of the live API
    pub use_cdn: bool,
    /// Replaces the `https://<project>.api.sanity.io` origin when set
    pub api_url: Option<String>,
    pub image_cdn: String,
    pub timeout_secs: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "1".to_string(),
            use_cdn: false,
            api_url: None,
            image_cdn: "https://cdn.sanity.io".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ContentConfig {
    /// Scheme and host queries are sent to
    pub fn origin(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = if self.use_cdn { "apicdn" } else { "api" };
                format!("https://{}.{}.sanity.io", self.project_id, host)
            }
        }
    }

    /// Version segment of the query path, e.g. `v1`
    pub fn version_segment(&self) -> String {
        format!("v{}", self.api_version.trim_start_matches('v'))
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    /// Static files served under /public, relative to the base directory
    pub public_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
            public_dir: "public".to_string(),
        }
    }
}
