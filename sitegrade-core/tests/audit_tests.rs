// End-to-end audit tests against a mock site.

use sitegrade_core::audit::{AuditError, Auditor};
use sitegrade_core::performance::PageSpeedClient;
use sitegrade_scanner::error::FetchError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A page that passes every on-page and mobile check.
fn healthy_html(origin: &str) -> String {
    let words = "quality content about practical website auditing ".repeat(60);
    format!(
        r#"<html lang="en">
<head>
<title>A well optimized page title for testing audits</title>
<meta name="description" content="{desc}">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta property="og:title" content="Page">
<meta property="og:description" content="Description">
<meta property="og:image" content="{origin}/social.png">
<link rel="canonical" href="{origin}/">
<script type="application/ld+json">{{"@type": "WebPage"}}</script>
</head>
<body>
<h1>The only heading one</h1>
<p>{words}</p>
<img src="{origin}/hero.png" alt="A hero image">
<a href="/about">About</a>
<a href="/contact">Contact</a>
</body>
</html>"#,
        desc = "An informative meta description that lands comfortably inside the length window.",
        origin = origin,
        words = words,
    )
}

async fn mount_healthy_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .insert_header("X-Content-Type-Options", "nosniff")
                .insert_header("X-Frame-Options", "DENY")
                .insert_header("Strict-Transport-Security", "max-age=63072000")
                .insert_header("Content-Security-Policy", "default-src 'self'")
                .set_body_string(healthy_html(&server.uri())),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\n"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        // wiremock derives Content-Type from the body mime; insert_header
        // is ignored for it, so set the type via set_body_raw.
        .respond_with(ResponseTemplate::new(200).set_body_raw("<urlset></urlset>", "application/xml"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_audit_of_a_healthy_mock_site() {
    let server = MockServer::start().await;
    mount_healthy_site(&server).await;

    let auditor = Auditor::new();
    let result = auditor
        .analyze(&format!("{}/", server.uri()))
        .await
        .unwrap();

    // The mock only speaks HTTP: technical loses 20, security loses 25.
    // Everything else passes; performance degrades to 50 with no API key.
    assert_eq!(result.technical.score, 80);
    assert_eq!(result.on_page.score, 100);
    assert_eq!(result.performance.score, 50);
    assert_eq!(result.security.score, 75);
    assert_eq!(result.mobile.score, 100);

    // 0.25*80 + 0.25*100 + 0.25*50 + 0.10*75 + 0.15*100 = 80
    assert_eq!(result.overall_score, 80);

    assert_eq!(result.performance.findings[0].code, "pagespeed_unavailable");
    assert!(result.performance.checks.values().all(|c| c.is_none()));
}

#[tokio::test]
async fn audit_uses_metrics_provider_when_configured() {
    let server = MockServer::start().await;
    mount_healthy_site(&server).await;

    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "lighthouseResult": {
                "categories": { "performance": { "score": 0.9 } },
                "audits": {
                    "largest-contentful-paint": { "numericValue": 1500.0, "displayValue": "1.5 s" },
                    "cumulative-layout-shift": { "numericValue": 0.02, "displayValue": "0.02" },
                    "first-contentful-paint": { "numericValue": 1000.0, "displayValue": "1.0 s" },
                    "uses-optimized-images": { "score": 1.0 },
                    "total-byte-weight": { "numericValue": 900_000.0 },
                    "offscreen-images": { "score": 1.0 }
                }
            }
        })))
        .mount(&server)
        .await;

    let metrics =
        PageSpeedClient::with_endpoint(&format!("{}/pagespeed", server.uri()), "test-key");
    let auditor = Auditor::new().with_metrics(metrics);
    let result = auditor
        .analyze(&format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.performance.score, 90);
    assert!(result.performance.findings.is_empty());
    // 0.25*80 + 0.25*100 + 0.25*90 + 0.10*75 + 0.15*100 = 90
    assert_eq!(result.overall_score, 90);
}

#[tokio::test]
async fn failed_metrics_provider_degrades_not_aborts() {
    let server = MockServer::start().await;
    mount_healthy_site(&server).await;

    Mock::given(method("GET"))
        .and(path("/pagespeed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let metrics =
        PageSpeedClient::with_endpoint(&format!("{}/pagespeed", server.uri()), "test-key");
    let auditor = Auditor::new().with_metrics(metrics);
    let result = auditor
        .analyze(&format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.performance.score, 50);
    assert_eq!(result.performance.findings[0].code, "pagespeed_unavailable");
}

#[tokio::test]
async fn fetch_failure_is_fatal() {
    let auditor = Auditor::new();
    let err = auditor.analyze("http://127.0.0.1:1/").await.unwrap_err();

    assert!(matches!(err, AuditError::Fetch(_)));
}

#[tokio::test]
async fn invalid_url_is_a_fetch_error() {
    let auditor = Auditor::new();
    let err = auditor.analyze("not a url").await.unwrap_err();

    assert!(matches!(
        err,
        AuditError::Fetch(FetchError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn audit_result_serializes_camel_case() {
    let server = MockServer::start().await;
    mount_healthy_site(&server).await;

    let auditor = Auditor::new();
    let result = auditor
        .analyze(&format!("{}/", server.uri()))
        .await
        .unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert!(value.get("onPage").is_some());
    assert!(value.get("overallScore").is_some());
    assert!(value.get("on_page").is_none());
    assert_eq!(value["url"], format!("{}/", server.uri()));
}
