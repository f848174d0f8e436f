//! HTML helper functions

/// Generate an image tag, escaping both attributes
///
/// # Examples
/// ```ignore
/// image_tag("https://cdn.sanity.io/images/p/d/a-1x1.png", "Photo", None)
/// ```
pub fn image_tag(src: &str, alt: &str, size: Option<(u32, u32)>) -> String {
    let size_attrs = size
        .map(|(w, h)| format!(r#" width="{}" height="{}""#, w, h))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy">"#,
        html_escape(src),
        html_escape(alt),
        size_attrs
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Collapse runs of whitespace into single spaces
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.len()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_image_tag() {
        let tag = image_tag("https://cdn/x.jpg?w=1&h=2", "A \"quoted\" alt", Some((10, 20)));
        assert_eq!(
            tag,
            r#"<img src="https://cdn/x.jpg?w=1&amp;h=2" alt="A &quot;quoted&quot; alt" width="10" height="20" loading="lazy">"#
        );
        assert!(!image_tag("x.jpg", "", None).contains("width"));
    }

    #[test]
    fn test_squash_whitespace() {
        assert_eq!(squash_whitespace("  a\n\n b\tc "), "a b c");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
    }
}
