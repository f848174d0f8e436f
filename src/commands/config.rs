//! Print the effective configuration

use anyhow::Result;

use crate::Blog;

/// Print the configuration as YAML, environment overrides applied
pub fn run(blog: &Blog) -> Result<()> {
    print!("{}", serde_yaml::to_string(&blog.config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::SiteConfig;
    use crate::test_support::blog;

    #[test]
    fn test_printed_config_loads_back() {
        let blog = blog("http://127.0.0.1:9");
        let yaml = serde_yaml::to_string(&blog.config).unwrap();
        let loaded: SiteConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded.content.project_id, "abc123");
        assert_eq!(loaded.content.api_url, blog.config.content.api_url);
    }
}
