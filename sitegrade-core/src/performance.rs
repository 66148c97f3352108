// Performance analyzer backed by a PageSpeed-compatible metrics API.
//
// This analyzer does not use the deduction scorecard: the provider's
// normalized performance score, times 100, IS the score. Findings
// mirror failing provider audits without deducting anything further.

use crate::probe::ProbeError;
use crate::report::{Finding, FindingKind, Impact, Report};
use reqwest::Client;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

pub const PAGESPEED_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

pub const LCP_THRESHOLD_MS: f64 = 2500.0;
pub const CLS_THRESHOLD: f64 = 0.1;
pub const FCP_THRESHOLD_MS: f64 = 1800.0;
pub const BYTE_WEIGHT_THRESHOLD: f64 = 2_000_000.0;

const CHECK_NAMES: [&str; 6] = [
    "lcp",
    "cls",
    "fcp",
    "imageOptimization",
    "bundleSize",
    "lazyLoading",
];

/// Client for a PageSpeed Insights compatible endpoint. The endpoint is
/// configurable so tests can point it at a local mock.
pub struct PageSpeedClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PageSpeedClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(PAGESPEED_ENDPOINT, api_key)
    }

    pub fn with_endpoint(endpoint: &str, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.into(),
        }
    }

    pub async fn run(&self, url: &str) -> Result<Value, ProbeError> {
        debug!("Requesting PageSpeed analysis for {}", url);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("url", url),
                ("key", self.api_key.as_str()),
                ("strategy", "mobile"),
                ("category", "performance"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Analyze `url` through the metrics provider. With no provider, or on
/// any provider failure, degrade to the neutral fallback report.
pub async fn analyze(url: &str, provider: Option<&PageSpeedClient>) -> Report {
    let Some(provider) = provider else {
        return unavailable_report();
    };

    match provider.run(url).await {
        Ok(payload) => report_from_payload(&payload),
        Err(err) => {
            warn!("PageSpeed request failed for {}: {}", url, err);
            unavailable_report()
        }
    }
}

/// Neutral report when no metrics are available: score 50, every check
/// unevaluated, exactly one informational finding.
fn unavailable_report() -> Report {
    let mut checks = BTreeMap::new();
    for name in CHECK_NAMES {
        checks.insert(name.to_string(), None);
    }

    let mut data = Map::new();
    data.insert("performanceScore".to_string(), Value::Null);
    data.insert(
        "note".to_string(),
        json!("Detailed metrics require a PageSpeed API key"),
    );

    Report {
        score: 50,
        findings: vec![
            Finding::new(
                FindingKind::Info,
                "pagespeed_unavailable",
                "PageSpeed Insights API not available",
                Impact::Low,
            )
            .with_recommendation("Configure PAGESPEED_API_KEY for detailed performance analysis"),
        ],
        checks,
        data,
    }
}

/// Build a report from a Lighthouse payload. Missing fields degrade to
/// neutral values rather than failing.
pub fn report_from_payload(payload: &Value) -> Report {
    let lighthouse = &payload["lighthouseResult"];
    let audits = &lighthouse["audits"];

    let score = (lighthouse["categories"]["performance"]["score"]
        .as_f64()
        .unwrap_or(0.0)
        * 100.0)
        .round() as u32;

    let mut findings = Vec::new();
    let mut checks = BTreeMap::new();

    let lcp = &audits["largest-contentful-paint"];
    let lcp_slow = lcp["numericValue"].as_f64().is_some_and(|v| v > LCP_THRESHOLD_MS);
    if lcp_slow {
        findings.push(
            Finding::new(
                FindingKind::Error,
                "slow_lcp",
                format!(
                    "Largest Contentful Paint is slow ({})",
                    lcp["displayValue"].as_str().unwrap_or("unknown")
                ),
                Impact::High,
            )
            .with_recommendation("Optimize images, remove render-blocking resources"),
        );
    }
    checks.insert("lcp".to_string(), Some(!lcp_slow));

    let cls = &audits["cumulative-layout-shift"];
    let cls_high = cls["numericValue"].as_f64().is_some_and(|v| v > CLS_THRESHOLD);
    if cls_high {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                "high_cls",
                format!(
                    "High layout shift ({})",
                    cls["displayValue"].as_str().unwrap_or("unknown")
                ),
                Impact::Medium,
            )
            .with_recommendation("Specify image dimensions, avoid dynamic content insertion"),
        );
    }
    checks.insert("cls".to_string(), Some(!cls_high));

    let fcp = &audits["first-contentful-paint"];
    let fcp_slow = fcp["numericValue"].as_f64().is_some_and(|v| v > FCP_THRESHOLD_MS);
    if fcp_slow {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                "slow_fcp",
                format!(
                    "First Contentful Paint is slow ({})",
                    fcp["displayValue"].as_str().unwrap_or("unknown")
                ),
                Impact::Medium,
            )
            .with_recommendation("Reduce server response time, optimize critical rendering path"),
        );
    }
    checks.insert("fcp".to_string(), Some(!fcp_slow));

    let image_score = audits["uses-optimized-images"]["score"]
        .as_f64()
        .unwrap_or(1.0);
    let images_unoptimized = image_score < 0.9;
    if images_unoptimized {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                "unoptimized_images",
                "Images are not optimized",
                Impact::Medium,
            )
            .with_recommendation("Compress images and use modern formats (WebP)"),
        );
    }
    checks.insert("imageOptimization".to_string(), Some(!images_unoptimized));

    let byte_weight = audits["total-byte-weight"]["numericValue"]
        .as_f64()
        .unwrap_or(0.0);
    let bundle_large = byte_weight > BYTE_WEIGHT_THRESHOLD;
    if bundle_large {
        findings.push(
            Finding::new(
                FindingKind::Warning,
                "large_bundle",
                "Page size is too large",
                Impact::Medium,
            )
            .with_recommendation("Reduce JavaScript bundle size, compress assets"),
        );
    }
    checks.insert("bundleSize".to_string(), Some(!bundle_large));

    let lazy_loading = audits["offscreen-images"]["score"]
        .as_f64()
        .unwrap_or(0.0)
        >= 0.9;
    checks.insert("lazyLoading".to_string(), Some(lazy_loading));

    let mut data = Map::new();
    data.insert("performanceScore".to_string(), json!(score));
    data.insert("lcp".to_string(), lcp["displayValue"].clone());
    data.insert("lcpMs".to_string(), lcp["numericValue"].clone());
    data.insert("fcp".to_string(), fcp["displayValue"].clone());
    data.insert("fcpMs".to_string(), fcp["numericValue"].clone());
    data.insert("cls".to_string(), cls["displayValue"].clone());
    data.insert("clsValue".to_string(), cls["numericValue"].clone());
    let ttfb = &audits["server-response-time"];
    data.insert("ttfb".to_string(), ttfb["displayValue"].clone());
    data.insert("ttfbMs".to_string(), ttfb["numericValue"].clone());

    Report {
        score: score.min(100),
        findings,
        checks,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_provider_degrades_to_neutral_report() {
        let report = analyze("https://example.com/", None).await;

        assert_eq!(report.score, 50);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].code, "pagespeed_unavailable");
        assert_eq!(report.findings[0].kind, FindingKind::Info);
        assert_eq!(report.checks.len(), 6);
        assert!(report.checks.values().all(|check| check.is_none()));
        assert_eq!(report.data["performanceScore"], Value::Null);
    }

    #[test]
    fn payload_score_is_scaled_and_rounded() {
        let payload = json!({
            "lighthouseResult": {
                "categories": { "performance": { "score": 0.925 } },
                "audits": {}
            }
        });

        let report = report_from_payload(&payload);
        assert_eq!(report.score, 93);
        // No numeric values means no threshold findings
        assert!(report.findings.is_empty());
    }

    #[test]
    fn slow_metrics_produce_findings_without_deductions() {
        let payload = json!({
            "lighthouseResult": {
                "categories": { "performance": { "score": 0.4 } },
                "audits": {
                    "largest-contentful-paint": { "numericValue": 4100.0, "displayValue": "4.1 s" },
                    "cumulative-layout-shift": { "numericValue": 0.34, "displayValue": "0.34" },
                    "first-contentful-paint": { "numericValue": 2300.0, "displayValue": "2.3 s" },
                    "uses-optimized-images": { "score": 0.5 },
                    "total-byte-weight": { "numericValue": 3_500_000.0 },
                    "offscreen-images": { "score": 1.0 }
                }
            }
        });

        let report = report_from_payload(&payload);
        assert_eq!(report.score, 40);

        let codes: Vec<&str> = report.findings.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(
            codes,
            ["slow_lcp", "high_cls", "slow_fcp", "unoptimized_images", "large_bundle"]
        );
        assert_eq!(report.checks.get("lcp"), Some(&Some(false)));
        assert_eq!(report.checks.get("lazyLoading"), Some(&Some(true)));
        assert!(report.findings[0].message.contains("4.1 s"));
    }

    #[test]
    fn fast_metrics_pass_all_checks() {
        let payload = json!({
            "lighthouseResult": {
                "categories": { "performance": { "score": 0.98 } },
                "audits": {
                    "largest-contentful-paint": { "numericValue": 1200.0, "displayValue": "1.2 s" },
                    "cumulative-layout-shift": { "numericValue": 0.01, "displayValue": "0.01" },
                    "first-contentful-paint": { "numericValue": 900.0, "displayValue": "0.9 s" },
                    "uses-optimized-images": { "score": 1.0 },
                    "total-byte-weight": { "numericValue": 450_000.0 },
                    "offscreen-images": { "score": 1.0 }
                }
            }
        });

        let report = report_from_payload(&payload);
        assert_eq!(report.score, 98);
        assert!(report.findings.is_empty());
        assert!(report.checks.values().all(|check| *check == Some(true)));
    }
}
