// On-page SEO analyzer: content and markup quality for a single page.

use crate::keywords;
use crate::report::{CheckOutcome, Finding, FindingKind, Impact, Report, Scorecard};
use serde_json::{Map, json};
use sitegrade_scanner::page::{Image, Link, PageSnapshot};

pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;
pub const META_DESCRIPTION_MIN_CHARS: usize = 70;
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;
pub const MIN_WORD_COUNT: usize = 300;

pub fn analyze(page: &PageSnapshot) -> Report {
    let mut card = Scorecard::new();

    card.record("title", check_title(page.title.as_deref()));
    card.record(
        "metaDescription",
        check_meta_description(page.meta_description.as_deref()),
    );
    card.record("h1", check_h1(page));
    card.record("headingHierarchy", check_heading_hierarchy(page));
    card.record("imageAlt", check_image_alt(&page.images));
    card.record("contentLength", check_content_length(page.word_count));
    card.record("internalLinks", check_internal_links(&page.internal_links));
    card.record("openGraph", check_open_graph(page));

    let images_without_alt = page.images.iter().filter(|image| !image.has_alt).count();
    let top_keywords = keywords::top_keywords(&page.text_content, 10);

    let mut data = Map::new();
    data.insert("title".to_string(), json!(page.title));
    data.insert(
        "titleLength".to_string(),
        json!(page.title.as_deref().map(|t| t.chars().count()).unwrap_or(0)),
    );
    data.insert(
        "metaDescription".to_string(),
        json!(page.meta_description),
    );
    data.insert(
        "metaDescriptionLength".to_string(),
        json!(
            page.meta_description
                .as_deref()
                .map(|d| d.chars().count())
                .unwrap_or(0)
        ),
    );
    data.insert("wordCount".to_string(), json!(page.word_count));
    data.insert("h1Count".to_string(), json!(page.headings_at("h1").len()));
    data.insert("imagesWithoutAlt".to_string(), json!(images_without_alt));
    data.insert(
        "internalLinkCount".to_string(),
        json!(page.internal_links.len()),
    );
    data.insert(
        "externalLinkCount".to_string(),
        json!(page.external_links.len()),
    );
    data.insert("topKeywords".to_string(), json!(top_keywords));

    card.finish(data)
}

pub fn check_title(title: Option<&str>) -> CheckOutcome {
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "missing_title",
                "Missing title tag",
                Impact::High,
            )
            .with_recommendation("Add a descriptive title tag (50-60 characters)"),
            20,
        );
    };

    let length = title.chars().count();
    if length < TITLE_MIN_CHARS {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "title_too_short",
                format!("Title is too short ({length} characters)"),
                Impact::Medium,
            )
            .with_recommendation("Title should be 50-60 characters for optimal display"),
            5,
        );
    }
    if length > TITLE_MAX_CHARS {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "title_too_long",
                format!("Title is too long ({length} characters)"),
                Impact::Low,
            )
            .with_recommendation("Title may be truncated in search results. Keep it under 60 characters"),
            3,
        );
    }

    CheckOutcome::pass()
}

pub fn check_meta_description(description: Option<&str>) -> CheckOutcome {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "missing_meta_description",
                "Missing meta description",
                Impact::High,
            )
            .with_recommendation("Add a compelling meta description (150-160 characters)"),
            15,
        );
    };

    let length = description.chars().count();
    if length < META_DESCRIPTION_MIN_CHARS {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "meta_description_too_short",
                format!("Meta description is too short ({length} characters)"),
                Impact::Medium,
            )
            .with_recommendation("Meta description should be 150-160 characters"),
            5,
        );
    }
    if length > META_DESCRIPTION_MAX_CHARS {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "meta_description_too_long",
                format!("Meta description is too long ({length} characters)"),
                Impact::Low,
            )
            .with_recommendation("Meta description may be truncated. Keep it under 160 characters"),
            3,
        );
    }

    CheckOutcome::pass()
}

pub fn check_h1(page: &PageSnapshot) -> CheckOutcome {
    let h1_count = page.headings_at("h1").len();
    if h1_count == 0 {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "missing_h1",
                "Missing H1 heading",
                Impact::High,
            )
            .with_recommendation("Add exactly one H1 heading containing your primary keyword"),
            15,
        );
    }
    if h1_count > 1 {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "multiple_h1",
                format!("Multiple H1 headings found ({h1_count})"),
                Impact::Medium,
            )
            .with_recommendation("Use exactly one H1 per page"),
            5,
        );
    }

    CheckOutcome::pass()
}

pub fn check_heading_hierarchy(page: &PageSnapshot) -> CheckOutcome {
    let has_h1 = !page.headings_at("h1").is_empty();
    let has_lower = !page.headings_at("h2").is_empty() || !page.headings_at("h3").is_empty();

    if !has_h1 && has_lower {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "broken_heading_hierarchy",
                "Heading hierarchy is broken (H2/H3 without H1)",
                Impact::Medium,
            )
            .with_recommendation("Structure headings hierarchically, starting with H1"),
            5,
        );
    }

    CheckOutcome::pass()
}

pub fn check_image_alt(images: &[Image]) -> CheckOutcome {
    if images.is_empty() {
        return CheckOutcome::pass();
    }

    let missing = images.iter().filter(|image| !image.has_alt).count();
    if missing == 0 {
        return CheckOutcome::pass();
    }

    let percentage = (missing as f64 / images.len() as f64) * 100.0;
    if percentage > 50.0 {
        CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "many_images_missing_alt",
                format!("{missing} images missing alt text ({percentage:.0}%)"),
                Impact::High,
            )
            .with_recommendation("Add descriptive alt text to all meaningful images"),
            15,
        )
    } else {
        CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "images_missing_alt",
                format!("{missing} images missing alt text"),
                Impact::Medium,
            )
            .with_recommendation("Add descriptive alt text to all meaningful images"),
            5,
        )
    }
}

pub fn check_content_length(word_count: usize) -> CheckOutcome {
    if word_count < MIN_WORD_COUNT {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "thin_content",
                format!("Content is thin ({word_count} words)"),
                Impact::Medium,
            )
            .with_recommendation("Aim for at least 300 words of substantive content"),
            10,
        );
    }

    CheckOutcome::pass()
}

pub fn check_internal_links(internal_links: &[Link]) -> CheckOutcome {
    if internal_links.len() < 2 {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "few_internal_links",
                "Page has few internal links",
                Impact::Medium,
            )
            .with_recommendation("Add internal links to related content"),
            5,
        );
    }

    CheckOutcome::pass()
}

pub fn check_open_graph(page: &PageSnapshot) -> CheckOutcome {
    let required = ["title", "description", "image"];
    let missing: Vec<&str> = required
        .iter()
        .filter(|name| !page.open_graph.contains_key(**name))
        .copied()
        .collect();

    if !missing.is_empty() {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Recommendation,
                "missing_og_tags",
                format!("Missing Open Graph tags: {}", missing.join(", ")),
                Impact::Low,
            )
            .with_recommendation("Add Open Graph tags for better social media sharing"),
            3,
        );
    }

    CheckOutcome::pass()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_boundaries() {
        // 29 chars: too short. 30 and 60: fine. 61: too long.
        let outcome = check_title(Some(&"x".repeat(29)));
        assert_eq!(outcome.findings[0].code, "title_too_short");

        assert!(check_title(Some(&"x".repeat(30))).passed);
        assert!(check_title(Some(&"x".repeat(60))).passed);

        let outcome = check_title(Some(&"x".repeat(61)));
        assert_eq!(outcome.findings[0].code, "title_too_long");
    }

    #[test]
    fn empty_title_is_missing() {
        let outcome = check_title(Some(""));
        assert_eq!(outcome.findings[0].code, "missing_title");
        assert_eq!(outcome.deduction, 20);
    }

    #[test]
    fn meta_description_boundaries() {
        let outcome = check_meta_description(None);
        assert_eq!(outcome.findings[0].code, "missing_meta_description");
        assert_eq!(outcome.deduction, 15);

        let outcome = check_meta_description(Some(&"x".repeat(69)));
        assert_eq!(outcome.findings[0].code, "meta_description_too_short");

        assert!(check_meta_description(Some(&"x".repeat(70))).passed);
        assert!(check_meta_description(Some(&"x".repeat(160))).passed);

        let outcome = check_meta_description(Some(&"x".repeat(161)));
        assert_eq!(outcome.findings[0].code, "meta_description_too_long");
    }

    #[test]
    fn multiple_h1_warns() {
        let mut page = PageSnapshot::new("https://example.com/".to_string());
        page.headings
            .insert("h1".to_string(), vec!["One".to_string(), "Two".to_string()]);

        let outcome = check_h1(&page);
        assert!(!outcome.passed);
        assert_eq!(outcome.findings[0].code, "multiple_h1");
        assert!(outcome.findings[0].message.contains('2'));
    }

    #[test]
    fn h2_without_h1_breaks_hierarchy() {
        let mut page = PageSnapshot::new("https://example.com/".to_string());
        page.headings
            .insert("h2".to_string(), vec!["Sub".to_string()]);

        let outcome = check_heading_hierarchy(&page);
        assert_eq!(outcome.findings[0].code, "broken_heading_hierarchy");

        page.headings
            .insert("h1".to_string(), vec!["Main".to_string()]);
        assert!(check_heading_hierarchy(&page).passed);
    }

    fn image(has_alt: bool) -> Image {
        Image {
            src: "https://example.com/i.png".to_string(),
            alt: if has_alt { "alt".to_string() } else { String::new() },
            has_alt,
            loading: None,
            width: None,
            height: None,
        }
    }

    #[test]
    fn image_alt_severity_depends_on_ratio() {
        // No images at all passes
        assert!(check_image_alt(&[]).passed);

        // 1 of 4 missing: warning, -5
        let images = vec![image(true), image(true), image(true), image(false)];
        let outcome = check_image_alt(&images);
        assert_eq!(outcome.findings[0].code, "images_missing_alt");
        assert_eq!(outcome.deduction, 5);

        // 3 of 4 missing: error, -15
        let images = vec![image(true), image(false), image(false), image(false)];
        let outcome = check_image_alt(&images);
        assert_eq!(outcome.findings[0].code, "many_images_missing_alt");
        assert_eq!(outcome.deduction, 15);
        assert!(outcome.findings[0].message.contains("75%"));
    }

    #[test]
    fn thin_content_threshold() {
        let outcome = check_content_length(299);
        assert_eq!(outcome.findings[0].code, "thin_content");
        assert_eq!(outcome.deduction, 10);

        assert!(check_content_length(300).passed);
    }

    #[test]
    fn open_graph_lists_missing_tags() {
        let mut page = PageSnapshot::new("https://example.com/".to_string());
        page.open_graph
            .insert("title".to_string(), "T".to_string());

        let outcome = check_open_graph(&page);
        assert_eq!(outcome.findings[0].code, "missing_og_tags");
        assert!(outcome.findings[0].message.contains("description, image"));

        page.open_graph
            .insert("description".to_string(), "D".to_string());
        page.open_graph
            .insert("image".to_string(), "I".to_string());
        assert!(check_open_graph(&page).passed);
    }

    #[test]
    fn analyze_reports_data_map() {
        let mut page = PageSnapshot::new("https://example.com/".to_string());
        page.title = Some("A reasonably long page title for testing".to_string());
        page.text_content = "rust audit engine rust".to_string();
        page.word_count = 4;

        let report = analyze(&page);
        assert_eq!(report.data["titleLength"], 40);
        assert_eq!(report.data["wordCount"], 4);
        assert_eq!(report.data["topKeywords"][0]["word"], "rust");
        assert!(report.score <= 100);
    }
}
