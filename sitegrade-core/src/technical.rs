// Technical SEO analyzer: crawlability, indexability and markup health.

use crate::probe::HttpProbe;
use crate::report::{CheckOutcome, Finding, FindingKind, Impact, Report, Scorecard};
use serde_json::{Map, json};
use sitegrade_scanner::page::PageSnapshot;
use tracing::warn;
use url::Url;

/// Run every technical check against the snapshot. `url` is the URL the
/// audit was requested for, before redirects.
pub async fn analyze(url: &Url, page: &PageSnapshot, probe: &HttpProbe) -> Report {
    let mut card = Scorecard::new();

    card.record("canonical", check_canonical(url, page));
    card.record("robotsMeta", check_robots_meta(page));
    card.record("robotsTxt", check_robots_txt(url, probe).await);
    card.record("sitemap", check_sitemap(url, probe).await);
    card.record("https", check_https(url));
    card.record("redirectChain", check_redirect_chain(page));
    card.record("statusCode", check_status_code(page));
    card.record("language", check_language(page));
    card.record("structuredData", check_structured_data(page));

    let mut data = Map::new();
    data.insert("canonical".to_string(), json!(page.canonical));
    data.insert("robotsMeta".to_string(), json!(page.robots_meta));
    data.insert(
        "redirectCount".to_string(),
        json!(page.redirect_chain.len()),
    );
    data.insert("statusCode".to_string(), json!(page.status_code));
    data.insert("schemaTypes".to_string(), json!(page.schema_types));

    card.finish(data)
}

pub fn check_canonical(url: &Url, page: &PageSnapshot) -> CheckOutcome {
    let Some(canonical) = page.canonical.as_deref().filter(|c| !c.is_empty()) else {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "missing_canonical",
                "Missing canonical tag",
                Impact::High,
            )
            .with_recommendation("Add a canonical tag to specify the preferred URL for this page"),
            15,
        );
    };

    // Path-only comparison so query strings and fragments don't trip it
    let canonical_path = Url::parse(canonical)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    if canonical_path != url.path() {
        return CheckOutcome::note(
            Finding::new(
                FindingKind::Warning,
                "canonical_mismatch",
                format!("Canonical URL ({canonical}) differs from current URL"),
                Impact::Low,
            )
            .with_recommendation("Verify this is intentional"),
        );
    }

    CheckOutcome::pass()
}

pub fn check_robots_meta(page: &PageSnapshot) -> CheckOutcome {
    if page
        .robots_meta
        .as_deref()
        .is_some_and(|robots| robots.to_lowercase().contains("noindex"))
    {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "noindex",
                "Page is set to noindex",
                Impact::High,
            )
            .with_recommendation("Remove noindex if you want this page to appear in search results"),
            5,
        );
    }

    CheckOutcome::pass()
}

pub async fn check_robots_txt(url: &Url, probe: &HttpProbe) -> CheckOutcome {
    let origin = url.origin().ascii_serialization();
    match probe.get(&format!("{origin}/robots.txt")).await {
        Ok(response) if response.status == 200 => CheckOutcome::pass(),
        Ok(_) => CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "missing_robots_txt",
                "robots.txt not found",
                Impact::Medium,
            )
            .with_recommendation("Add a robots.txt file to control crawler access"),
            5,
        ),
        Err(err) => {
            warn!("robots.txt probe failed for {}: {}", origin, err);
            CheckOutcome::fail(
                Finding::new(
                    FindingKind::Warning,
                    "robots_txt_error",
                    "Could not access robots.txt",
                    Impact::Low,
                ),
                3,
            )
        }
    }
}

pub async fn check_sitemap(url: &Url, probe: &HttpProbe) -> CheckOutcome {
    let origin = url.origin().ascii_serialization();
    let candidates = [
        format!("{origin}/sitemap.xml"),
        format!("{origin}/sitemap_index.xml"),
    ];

    let mut all_errored = true;
    for candidate in &candidates {
        match probe.get(candidate).await {
            Ok(response) => {
                all_errored = false;
                if response.status == 200
                    && response
                        .content_type
                        .as_deref()
                        .is_some_and(|ct| ct.contains("xml"))
                {
                    return CheckOutcome::pass();
                }
            }
            Err(err) => {
                warn!("Sitemap probe failed for {}: {}", candidate, err);
            }
        }
    }

    if all_errored {
        CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "sitemap_check_failed",
                "Sitemap check failed",
                Impact::Low,
            ),
            3,
        )
    } else {
        CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "missing_sitemap",
                "XML sitemap not found",
                Impact::Medium,
            )
            .with_recommendation("Add an XML sitemap to help search engines discover your pages"),
            5,
        )
    }
}

pub fn check_https(url: &Url) -> CheckOutcome {
    if url.scheme() != "https" {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "no_https",
                "Site is not using HTTPS",
                Impact::High,
            )
            .with_recommendation("Migrate to HTTPS for security and SEO benefits"),
            20,
        );
    }

    CheckOutcome::pass()
}

pub fn check_redirect_chain(page: &PageSnapshot) -> CheckOutcome {
    let redirects = page.redirect_chain.len();
    if redirects > 2 {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "redirect_chain",
                format!("Redirect chain detected ({redirects} redirects)"),
                Impact::Medium,
            )
            .with_recommendation("Reduce redirect hops; link directly to the final URL"),
            10,
        );
    }

    CheckOutcome::pass()
}

pub fn check_status_code(page: &PageSnapshot) -> CheckOutcome {
    if page.status_code >= 400 {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "error_status",
                format!("Page returned status code {}", page.status_code),
                Impact::High,
            ),
            30,
        );
    }

    CheckOutcome::pass()
}

pub fn check_language(page: &PageSnapshot) -> CheckOutcome {
    if page.language.as_deref().filter(|l| !l.is_empty()).is_none() {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Warning,
                "missing_lang",
                "Missing lang attribute on <html> element",
                Impact::Low,
            )
            .with_recommendation("Add a lang attribute to help search engines and screen readers"),
            3,
        );
    }

    CheckOutcome::pass()
}

pub fn check_structured_data(page: &PageSnapshot) -> CheckOutcome {
    if !page.has_structured_data {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Recommendation,
                "no_structured_data",
                "No structured data (Schema.org) found",
                Impact::Medium,
            )
            .with_recommendation("Add JSON-LD structured data for rich search results"),
            5,
        );
    }

    CheckOutcome::pass()
}
