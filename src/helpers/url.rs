//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/posts") // -> "/blog/posts"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Path of a post detail page
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("posts/{}", encode_uri_component(slug)))
}

/// Resolve a path under the public directory, leaving absolute URLs alone
pub fn asset_url(config: &SiteConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        path.to_string()
    } else {
        url_for(config, &format!("public/{}", path.trim_start_matches('/')))
    }
}

/// Percent-encode a string the way `encodeURIComponent` does
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Whether a link target from content can be put in an `href`
pub fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    if href.starts_with('/') || href.starts_with('#') || href.starts_with('?') {
        return true;
    }

    match href.split_once(':') {
        Some((scheme, _)) => {
            let scheme = scheme.to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto" | "tel")
        }
        // No scheme means a relative link
        None => !href.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            root: "/blog/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/posts"), "/blog/posts");
        assert_eq!(url_for(&config, ""), "/blog/");
        assert_eq!(url_for(&SiteConfig::default(), ""), "/");
    }

    #[test]
    fn test_post_path() {
        let config = SiteConfig::default();
        assert_eq!(post_path(&config, "hello-world"), "/posts/hello-world");
        assert_eq!(post_path(&config, "a b/c"), "/posts/a%20b%2Fc");
    }

    #[test]
    fn test_asset_url() {
        let config = test_config();
        assert_eq!(asset_url(&config, "me.jpg"), "/blog/public/me.jpg");
        assert_eq!(
            asset_url(&config, "https://example.com/me.jpg"),
            "https://example.com/me.jpg"
        );
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(
            encode_uri_component(r#"*[_type == "post"]"#),
            "*%5B_type%20%3D%3D%20%22post%22%5D"
        );
        assert_eq!(
            encode_uri_component("order(_createdAt desc)[0...3]"),
            "order(_createdAt%20desc)%5B0...3%5D"
        );
        assert_eq!(encode_uri_component("año"), "a%C3%B1o");
    }

    #[test]
    fn test_is_safe_href() {
        assert!(is_safe_href("https://example.com"));
        assert!(is_safe_href("/posts/hello"));
        assert!(is_safe_href("mailto:me@example.com"));
        assert!(is_safe_href("other-post"));
        assert!(!is_safe_href("javascript:alert(1)"));
        assert!(!is_safe_href(" JavaScript:alert(1)"));
        assert!(!is_safe_href("data:text/html,hi"));
        assert!(!is_safe_href(""));
    }
}
