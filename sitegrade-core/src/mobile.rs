// Mobile-friendliness analyzer. Derived entirely from the snapshot; the
// performance report is part of its inputs but carries no extra signal
// beyond what the provider already scored.

use crate::report::{CheckOutcome, Finding, FindingKind, Impact, Report, Scorecard};
use serde_json::Map;
use sitegrade_scanner::page::PageSnapshot;

pub const TOUCH_TARGET_DEDUCTION_CAP: u32 = 15;

pub fn analyze(page: &PageSnapshot, _performance: &Report) -> Report {
    let mut card = Scorecard::new();

    card.record("viewportMeta", check_viewport(page));
    card.record("touchTargets", check_touch_targets(page));
    card.record("readableText", check_readable_text(page));
    card.record("noHorizontalScroll", check_horizontal_scroll(page));

    card.finish(Map::new())
}

pub fn check_viewport(page: &PageSnapshot) -> CheckOutcome {
    if !page.has_viewport_meta {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "missing_viewport_meta",
                "Missing viewport meta tag",
                Impact::High,
            )
            .with_recommendation(
                "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
            ),
            20,
        );
    }

    CheckOutcome::pass()
}

pub fn check_touch_targets(page: &PageSnapshot) -> CheckOutcome {
    let small = page.small_touch_targets;
    if small > 0 {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "small_touch_targets",
                format!("{small} touch targets are too small"),
                Impact::Medium,
            )
            .with_recommendation("Make tap targets at least 48x48 pixels"),
            (small * 2).min(TOUCH_TARGET_DEDUCTION_CAP),
        );
    }

    CheckOutcome::pass()
}

pub fn check_readable_text(page: &PageSnapshot) -> CheckOutcome {
    if page.small_text_count > 5 {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "small_text",
                "Text too small to read on mobile",
                Impact::Medium,
            )
            .with_recommendation("Use a base font size of at least 16px"),
            10,
        );
    }

    CheckOutcome::pass()
}

pub fn check_horizontal_scroll(page: &PageSnapshot) -> CheckOutcome {
    if page.horizontal_scroll {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "horizontal_scroll",
                "Content wider than screen",
                Impact::High,
            )
            .with_recommendation("Avoid fixed-width elements wider than the viewport"),
            15,
        );
    }

    CheckOutcome::pass()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use serde_json::Map;
    use std::collections::BTreeMap;

    fn perf_report() -> Report {
        Report {
            score: 80,
            findings: Vec::new(),
            checks: BTreeMap::new(),
            data: Map::new(),
        }
    }

    fn page_with_viewport() -> PageSnapshot {
        let mut page = PageSnapshot::new("https://example.com/".to_string());
        page.has_viewport_meta = true;
        page
    }

    #[test]
    fn missing_viewport_is_the_big_deduction() {
        let page = PageSnapshot::new("https://example.com/".to_string());
        let report = analyze(&page, &perf_report());

        assert_eq!(report.score, 80);
        assert_eq!(report.findings[0].code, "missing_viewport_meta");
        assert_eq!(report.checks.get("viewportMeta"), Some(&Some(false)));
    }

    #[test]
    fn clean_page_scores_hundred() {
        let report = analyze(&page_with_viewport(), &perf_report());
        assert_eq!(report.score, 100);
        assert!(report.findings.is_empty());
        assert_eq!(report.checks.len(), 4);
    }

    #[test]
    fn touch_target_deduction_is_capped() {
        let mut page = page_with_viewport();
        page.small_touch_targets = 3;
        let outcome = check_touch_targets(&page);
        assert_eq!(outcome.deduction, 6);

        page.small_touch_targets = 40;
        let outcome = check_touch_targets(&page);
        assert_eq!(outcome.deduction, TOUCH_TARGET_DEDUCTION_CAP);
    }

    #[test]
    fn small_text_threshold_is_strict() {
        let mut page = page_with_viewport();
        page.small_text_count = 5;
        assert!(check_readable_text(&page).passed);

        page.small_text_count = 6;
        let outcome = check_readable_text(&page);
        assert!(!outcome.passed);
        assert_eq!(outcome.deduction, 10);
    }

    #[test]
    fn horizontal_scroll_is_an_error() {
        let mut page = page_with_viewport();
        page.horizontal_scroll = true;

        let report = analyze(&page, &perf_report());
        assert_eq!(report.score, 85);
        assert_eq!(report.findings[0].code, "horizontal_scroll");
    }
}
