// Security analyzer: transport, response headers, mixed content and
// exposed sensitive files.

use crate::probe::HttpProbe;
use crate::report::{CheckOutcome, Finding, FindingKind, Impact, Report, Scorecard};
use serde_json::{Map, json};
use sitegrade_scanner::page::PageSnapshot;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Headers surfaced in the report data map when present.
const SECURITY_HEADERS: [&str; 7] = [
    "strict-transport-security",
    "content-security-policy",
    "x-content-type-options",
    "x-frame-options",
    "x-xss-protection",
    "referrer-policy",
    "permissions-policy",
];

/// Well-known paths that must never answer 200.
pub const SENSITIVE_PATHS: [&str; 6] = [
    "/.env",
    "/.git/config",
    "/wp-config.php.bak",
    "/phpinfo.php",
    "/.htaccess",
    "/server-status",
];

const SENSITIVE_PATH_TIMEOUT: Duration = Duration::from_secs(5);

/// Run every security check. `url` is the URL the audit was requested
/// for; mixed-content detection uses the final URL from the snapshot.
pub async fn analyze(url: &Url, page: &PageSnapshot, probe: &HttpProbe) -> Report {
    let mut card = Scorecard::new();

    card.record("https", check_https(url));
    card.record("securityHeaders", check_security_headers(page));
    card.record("noMixedContent", check_mixed_content(page));
    card.record("noSensitivePaths", check_sensitive_paths(url, probe).await);

    let mut data = Map::new();
    data.insert("https".to_string(), json!(url.scheme() == "https"));
    data.insert(
        "securityHeaders".to_string(),
        json!(present_security_headers(page)),
    );

    card.finish(data)
}

fn present_security_headers(page: &PageSnapshot) -> Vec<String> {
    SECURITY_HEADERS
        .iter()
        .filter(|header| page.header(header).is_some())
        .map(|header| header.to_string())
        .collect()
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
            .with_recommendation("Migrate to HTTPS immediately. It's a ranking factor."),
            25,
        );
    }

    CheckOutcome::pass()
}

/// Missing headers accumulate: one finding and one deduction each,
/// folded into a single check.
pub fn check_security_headers(page: &PageSnapshot) -> CheckOutcome {
    let mut findings = Vec::new();
    let mut deduction = 0;

    if page.header("x-content-type-options").is_none() {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                "missing_x_content_type",
                "Missing X-Content-Type-Options header",
                Impact::Low,
            )
            .with_recommendation("Add 'X-Content-Type-Options: nosniff' header"),
        );
        deduction += 2;
    }

    // CSP frame-ancestors covers the same attack, so only flag when
    // neither header is present
    if page.header("x-frame-options").is_none()
        && page.header("content-security-policy").is_none()
    {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                "missing_x_frame_options",
                "Missing X-Frame-Options header (clickjacking risk)",
                Impact::Medium,
            )
            .with_recommendation("Add 'X-Frame-Options: DENY' or a CSP frame-ancestors directive"),
        );
        deduction += 3;
    }

    if page.header("strict-transport-security").is_none() {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                "missing_hsts",
                "Missing Strict-Transport-Security header",
                Impact::Medium,
            )
            .with_recommendation("Add an HSTS header to enforce HTTPS"),
        );
        deduction += 5;
    }

    if page.header("content-security-policy").is_none() {
        findings.push(
            Finding::new(
                FindingKind::Recommendation,
                "missing_csp",
                "Missing Content-Security-Policy header",
                Impact::Medium,
            )
            .with_recommendation("Add a Content-Security-Policy header to mitigate XSS"),
        );
        deduction += 3;
    }

    if findings.is_empty() {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail_all(findings, deduction)
    }
}

pub fn check_mixed_content(page: &PageSnapshot) -> CheckOutcome {
    // Only meaningful when the page itself is served over HTTPS
    if !page.url.starts_with("https://") {
        return CheckOutcome::pass();
    }

    let http_images = page
        .images
        .iter()
        .filter(|image| image.src.starts_with("http://"))
        .count();
    let http_scripts = page
        .scripts
        .iter()
        .filter(|script| script.src.starts_with("http://"))
        .count();
    let http_stylesheets = page
        .stylesheets
        .iter()
        .filter(|stylesheet| stylesheet.href.starts_with("http://"))
        .count();

    let total = http_images + http_scripts + http_stylesheets;
    if total > 0 {
        return CheckOutcome::fail(
            Finding::new(
                FindingKind::Error,
                "mixed_content",
                format!("Mixed content detected ({total} HTTP resources on HTTPS page)"),
                Impact::High,
            )
            .with_recommendation("Update all resources to use HTTPS"),
            15,
        );
    }

    CheckOutcome::pass()
}

pub async fn check_sensitive_paths(url: &Url, probe: &HttpProbe) -> CheckOutcome {
    let origin = url.origin().ascii_serialization();
    let mut findings = Vec::new();
    let mut deduction = 0;

    for path in SENSITIVE_PATHS {
        match probe
            .get_with_timeout(&format!("{origin}{path}"), SENSITIVE_PATH_TIMEOUT)
            .await
        {
            Ok(response) if response.status == 200 => {
                findings.push(
                    Finding::new(
                        FindingKind::Error,
                        "exposed_sensitive_file",
                        format!("Sensitive file exposed: {path}"),
                        Impact::High,
                    )
                    .with_recommendation("Block access to this file immediately"),
                );
                deduction += 10;
            }
            Ok(_) => {}
            Err(err) => {
                // Unreachable paths are the good case here
                debug!("Sensitive path probe failed for {}{}: {}", origin, path, err);
            }
        }
    }

    if findings.is_empty() {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail_all(findings, deduction)
    }
}
