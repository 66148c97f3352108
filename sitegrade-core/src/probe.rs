use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!(
    "SitegradeBot/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/trapdoorsec/sitegrade)"
);

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Probe request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Probe returned status {0}")]
    Status(u16),
}

#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub content_type: Option<String>,
}

/// Redirect-disabled client for ancillary endpoint probes (robots.txt,
/// sitemaps, sensitive paths). A failed probe degrades the check that
/// issued it; it never aborts the audit.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    pub async fn get(&self, url: &str) -> Result<ProbeResponse, ProbeError> {
        debug!("Probing {}", url);
        let response = self.client.get(url).send().await?;

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            content_type: response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok())
                .map(String::from),
        })
    }

    /// Probe with a per-request timeout tighter than the client default.
    pub async fn get_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        debug!("Probing {} (timeout {:?})", url, timeout);
        let response = self.client.get(url).timeout(timeout).send().await?;

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            content_type: response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok())
                .map(String::from),
        })
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}
