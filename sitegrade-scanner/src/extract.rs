// HTML extraction: turns a fetched document into a PageSnapshot.
// Extraction never fails; malformed fragments contribute nothing.

use crate::page::{
    ANCHOR_TEXT_CAP, EXTERNAL_LINK_CAP, FormSummary, IMAGE_CAP, INTERNAL_LINK_CAP, Image, Link,
    PageSnapshot, Script, Stylesheet, TEXT_CONTENT_CAP,
};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

// Subtrees excluded from visible-text flattening.
const TEXT_EXCLUDED_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Extract all document-derived fields from `html`. Transport fields
/// (status, headers, timing) are left for the fetcher to fill in.
pub fn extract(html: &str, base: &Url) -> PageSnapshot {
    let document = Html::parse_document(html);
    let mut page = PageSnapshot::new(base.to_string());

    page.title = title(&document);
    page.meta_description = meta_content(&document, "description");
    page.robots_meta = meta_content(&document, "robots");
    page.has_viewport_meta = has_meta(&document, "viewport");
    page.canonical = canonical(&document, base);
    page.open_graph = open_graph(&document);
    page.headings = headings(&document);

    let (internal, external) = links(&document, base);
    page.internal_links = internal;
    page.external_links = external;
    page.images = images(&document, base);

    let text = visible_text(&document);
    page.word_count = text.split_whitespace().count();
    page.text_content = text.chars().take(TEXT_CONTENT_CAP).collect();

    page.scripts = scripts(&document);
    page.stylesheets = stylesheets(&document);

    let (has_structured_data, schema_types) = structured_data(&document);
    page.has_structured_data = has_structured_data;
    page.schema_types = schema_types;

    page.language = language(&document);
    page.forms = forms(&document);

    page
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").unwrap();
    document.select(&selector).next().map(element_text)
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{name}"]"#)).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
}

fn has_meta(document: &Html, name: &str) -> bool {
    let selector = Selector::parse(&format!(r#"meta[name="{name}"]"#)).unwrap();
    document.select(&selector).next().is_some()
}

fn canonical(document: &Html, base: &Url) -> Option<String> {
    let selector = Selector::parse(r#"link[rel="canonical"]"#).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| base.join(href.trim()).ok())
        .map(|url| url.to_string())
}

fn open_graph(document: &Html) -> std::collections::HashMap<String, String> {
    let selector = Selector::parse("meta[property]").unwrap();
    let mut properties = std::collections::HashMap::new();

    for element in document.select(&selector) {
        if let Some(property) = element.value().attr("property")
            && let Some(name) = property.strip_prefix("og:")
            && !name.is_empty()
            && let Some(content) = element.value().attr("content")
            && !content.is_empty()
        {
            // Later occurrences overwrite earlier ones
            properties.insert(name.to_string(), content.to_string());
        }
    }

    properties
}

fn headings(document: &Html) -> std::collections::HashMap<String, Vec<String>> {
    let mut headings = std::collections::HashMap::new();

    for level in 1..=6 {
        let tag = format!("h{level}");
        let selector = Selector::parse(&tag).unwrap();
        let texts: Vec<String> = document.select(&selector).map(element_text).collect();
        headings.insert(tag, texts);
    }

    headings
}

fn links(document: &Html, base: &Url) -> (Vec<Link>, Vec<Link>) {
    let selector = Selector::parse("a[href]").unwrap();
    let base_host = base.host_str().unwrap_or("");
    let mut internal = Vec::new();
    let mut external = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            continue;
        };

        let rel: Vec<String> = element
            .value()
            .attr("rel")
            .map(|rel| rel.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let anchor_text: String = element_text(element).chars().take(ANCHOR_TEXT_CAP).collect();

        // Links without a host (mailto: and friends) count as internal.
        match resolved.host_str() {
            Some(host) if host != base_host => {
                let nofollow = rel.iter().any(|r| r == "nofollow");
                external.push(Link {
                    url: resolved.to_string(),
                    anchor_text,
                    rel,
                    nofollow,
                });
            }
            _ => {
                internal.push(Link {
                    url: resolved.to_string(),
                    anchor_text,
                    rel,
                    nofollow: false,
                });
            }
        }
    }

    internal.truncate(INTERNAL_LINK_CAP);
    external.truncate(EXTERNAL_LINK_CAP);
    (internal, external)
}

fn images(document: &Html, base: &Url) -> Vec<Image> {
    let selector = Selector::parse("img").unwrap();
    let mut images = Vec::new();

    for element in document.select(&selector) {
        let Some(src) = element.value().attr("src").filter(|src| !src.is_empty()) else {
            continue;
        };
        let resolved = base
            .join(src)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| src.to_string());

        images.push(Image {
            src: resolved,
            alt: element.value().attr("alt").unwrap_or("").to_string(),
            has_alt: element.value().attr("alt").is_some(),
            loading: element.value().attr("loading").map(str::to_string),
            width: element.value().attr("width").map(str::to_string),
            height: element.value().attr("height").map(str::to_string),
        });
    }

    images.truncate(IMAGE_CAP);
    images
}

fn visible_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    collapse_whitespace(&raw)
}

fn collect_text(element: ElementRef, out: &mut String) {
    if TEXT_EXCLUDED_TAGS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        }
    }
}

fn scripts(document: &Html) -> Vec<Script> {
    let selector = Selector::parse("script[src]").unwrap();
    document
        .select(&selector)
        .filter_map(|element| {
            element.value().attr("src").map(|src| Script {
                src: src.to_string(),
                is_async: element.value().attr("async").is_some(),
                defer: element.value().attr("defer").is_some(),
            })
        })
        .collect()
}

fn stylesheets(document: &Html) -> Vec<Stylesheet> {
    let selector = Selector::parse(r#"link[rel="stylesheet"]"#).unwrap();
    document
        .select(&selector)
        .filter_map(|element| {
            element.value().attr("href").map(|href| Stylesheet {
                href: href.to_string(),
            })
        })
        .collect()
}

fn structured_data(document: &Html) -> (bool, Vec<String>) {
    let jsonld_selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    let mut schema_types = Vec::new();
    let mut has_jsonld = false;

    for element in document.select(&jsonld_selector) {
        has_jsonld = true;
        let body: String = element.text().collect();
        // Invalid JSON-LD contributes no types and is not an error
        let Ok(value) = serde_json::from_str::<Value>(&body) else {
            continue;
        };
        match value {
            Value::Object(object) => {
                if let Some(schema_type) = object.get("@type").and_then(Value::as_str) {
                    schema_types.push(schema_type.to_string());
                }
            }
            Value::Array(items) => {
                for item in items {
                    if let Some(schema_type) = item.get("@type").and_then(Value::as_str) {
                        schema_types.push(schema_type.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    let itemscope_selector = Selector::parse("[itemscope]").unwrap();
    let has_microdata = document.select(&itemscope_selector).next().is_some();

    let itemtype_selector = Selector::parse("[itemtype]").unwrap();
    for element in document.select(&itemtype_selector) {
        if let Some(itemtype) = element.value().attr("itemtype") {
            schema_types.push(itemtype.to_string());
        }
    }

    (has_jsonld || has_microdata, schema_types)
}

fn language(document: &Html) -> Option<String> {
    let selector = Selector::parse("html").unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("lang"))
        .map(str::to_string)
}

fn forms(document: &Html) -> Vec<FormSummary> {
    let form_selector = Selector::parse("form").unwrap();
    let input_selector = Selector::parse("input[name]").unwrap();
    let mut forms = Vec::new();

    for form in document.select(&form_selector) {
        let has_csrf_field = form.select(&input_selector).any(|input| {
            input.value().attr("name").is_some_and(|name| {
                let name = name.to_ascii_lowercase();
                name.contains("csrf") || name.contains("token")
            })
        });

        forms.push(FormSummary {
            action: form.value().attr("action").unwrap_or("").to_string(),
            method: form.value().attr("method").unwrap_or("get").to_string(),
            has_csrf_field,
        });
    }

    forms
}
