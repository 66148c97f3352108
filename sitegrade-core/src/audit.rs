// Audit orchestration: one fetch, four analyzers, one aggregate score.

use crate::performance::PageSpeedClient;
use crate::probe::HttpProbe;
use crate::report::Report;
use crate::{mobile, onpage, performance, score, security, technical};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use sitegrade_scanner::error::FetchError;
use sitegrade_scanner::fetcher::PageFetcher;
use sitegrade_scanner::page::PageSnapshot;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Error, Debug)]
pub enum AuditError {
    /// The page itself could not be fetched; nothing was analyzed.
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] FetchError),

    /// The fetch succeeded but an analyzer blew up. Callers should treat
    /// this as an internal fault, not a property of the target site.
    #[error("Audit failed after fetch: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub url: String,
    pub technical: Report,
    pub on_page: Report,
    pub performance: Report,
    pub security: Report,
    pub mobile: Report,
    pub overall_score: u32,
}

/// Bundles the fetcher, the probe client and the optional metrics
/// provider behind a single `analyze` entry point.
pub struct Auditor {
    fetcher: PageFetcher,
    probe: HttpProbe,
    metrics: Option<PageSpeedClient>,
}

impl Auditor {
    pub fn new() -> Self {
        Self {
            fetcher: PageFetcher::new(),
            probe: HttpProbe::new(),
            metrics: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: PageFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_metrics(mut self, metrics: PageSpeedClient) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Audit a single page. The fetch is fatal on failure; everything
    /// after it degrades per-check instead of failing the audit.
    pub async fn analyze(&self, url: &str) -> Result<AuditResult, AuditError> {
        let requested = Url::parse(url)
            .map_err(|e| AuditError::Fetch(FetchError::InvalidUrl(format!("{url}: {e}"))))?;

        info!("Starting audit of {}", url);
        let page = self.fetcher.fetch(url).await?;

        // Analyzer panics must not take the caller down with them
        let result = AssertUnwindSafe(self.run_analyzers(&requested, url, &page))
            .catch_unwind()
            .await
            .map_err(|panic| AuditError::Internal(panic_message(panic)))?;

        info!(
            "Audit of {} complete: overall score {}",
            url, result.overall_score
        );
        Ok(result)
    }

    async fn run_analyzers(&self, requested: &Url, url: &str, page: &PageSnapshot) -> AuditResult {
        let (technical, on_page, performance, security) = tokio::join!(
            technical::analyze(requested, page, &self.probe),
            async { onpage::analyze(page) },
            performance::analyze(url, self.metrics.as_ref()),
            security::analyze(requested, page, &self.probe),
        );

        let mobile = mobile::analyze(page, &performance);
        let overall_score = score::overall_score(
            technical.score,
            on_page.score,
            performance.score,
            security.score,
            mobile.score,
        );

        AuditResult {
            url: url.to_string(),
            technical,
            on_page,
            performance,
            security,
            mobile,
            overall_score,
        }
    }
}

impl Default for Auditor {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "analyzer panicked".to_string()
    }
}
