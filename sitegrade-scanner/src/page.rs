use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// At most this many internal links are retained per page.
pub const INTERNAL_LINK_CAP: usize = 100;
/// At most this many external links are retained per page.
pub const EXTERNAL_LINK_CAP: usize = 50;
/// At most this many images are retained per page.
pub const IMAGE_CAP: usize = 100;
/// Anchor text is truncated to this many characters.
pub const ANCHOR_TEXT_CAP: usize = 100;
/// The stored text snippet is truncated to this many characters.
/// Word counting happens before truncation.
pub const TEXT_CONTENT_CAP: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub anchor_text: String,
    pub rel: Vec<String>,
    pub nofollow: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    /// True when the alt attribute is present at all, even empty.
    pub has_alt: bool,
    pub loading: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub src: String,
    pub is_async: bool,
    pub defer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stylesheet {
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSummary {
    pub action: String,
    pub method: String,
    pub has_csrf_field: bool,
}

/// Everything the analyzers need to know about one fetched page.
/// Built once per audit and shared read-only between analyzers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Final URL after following redirects.
    pub url: String,
    pub status_code: u16,
    pub response_time_ms: u64,
    pub content_length: u64,
    /// Response headers with lowercased names. Use [`PageSnapshot::header`].
    pub headers: HashMap<String, String>,
    /// Every URL that answered with a redirect, in order.
    pub redirect_chain: Vec<String>,

    pub title: Option<String>,
    pub meta_description: Option<String>,
    /// Resolved to an absolute URL against the final page URL.
    pub canonical: Option<String>,
    pub robots_meta: Option<String>,
    pub has_viewport_meta: bool,
    /// og:* properties without the prefix; the last occurrence wins.
    pub open_graph: HashMap<String, String>,

    /// Keys "h1" through "h6", always present even when empty.
    pub headings: HashMap<String, Vec<String>>,
    pub internal_links: Vec<Link>,
    pub external_links: Vec<Link>,
    pub images: Vec<Image>,

    pub word_count: usize,
    pub text_content: String,

    pub scripts: Vec<Script>,
    pub stylesheets: Vec<Stylesheet>,
    pub has_structured_data: bool,
    pub schema_types: Vec<String>,
    pub language: Option<String>,
    pub forms: Vec<FormSummary>,

    // Rendering signals. A plain fetch cannot measure these, so they stay
    // at their defaults unless an external renderer fills them in.
    pub small_touch_targets: u32,
    pub small_text_count: u32,
    pub horizontal_scroll: bool,
}

impl PageSnapshot {
    pub fn new(url: String) -> Self {
        let mut headings = HashMap::new();
        for level in 1..=6 {
            headings.insert(format!("h{level}"), Vec::new());
        }

        Self {
            url,
            status_code: 0,
            response_time_ms: 0,
            content_length: 0,
            headers: HashMap::new(),
            redirect_chain: Vec::new(),
            title: None,
            meta_description: None,
            canonical: None,
            robots_meta: None,
            has_viewport_meta: false,
            open_graph: HashMap::new(),
            headings,
            internal_links: Vec::new(),
            external_links: Vec::new(),
            images: Vec::new(),
            word_count: 0,
            text_content: String::new(),
            scripts: Vec::new(),
            stylesheets: Vec::new(),
            has_structured_data: false,
            schema_types: Vec::new(),
            language: None,
            forms: Vec::new(),
            small_touch_targets: 0,
            small_text_count: 0,
            horizontal_scroll: false,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headings_at(&self, level: &str) -> &[String] {
        self.headings.get(level).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut page = PageSnapshot::new("https://example.com/".to_string());
        page.headers
            .insert("content-type".to_string(), "text/html".to_string());

        assert_eq!(page.header("Content-Type"), Some("text/html"));
        assert_eq!(page.header("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(page.header("x-frame-options"), None);
    }

    #[test]
    fn new_snapshot_has_all_heading_levels() {
        let page = PageSnapshot::new("https://example.com/".to_string());
        for level in ["h1", "h2", "h3", "h4", "h5", "h6"] {
            assert!(page.headings.contains_key(level));
            assert!(page.headings_at(level).is_empty());
        }
    }
}
