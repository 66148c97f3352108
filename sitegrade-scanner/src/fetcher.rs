use crate::error::{FetchError, Result};
use crate::extract;
use crate::page::PageSnapshot;
use reqwest::Client;
use reqwest::header::LOCATION;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!(
    "SitegradeBot/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/trapdoorsec/sitegrade)"
);
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
const MAX_REDIRECTS: usize = 10;

/// Fetches a single page and extracts a [`PageSnapshot`] from it.
///
/// Redirects are followed by hand so the full chain ends up in the
/// snapshot; reqwest's built-in policy swallows the intermediate hops.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Self {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch `url`, following up to 10 redirects, and extract the page.
    /// Any transport failure aborts the fetch; extraction itself never fails.
    pub async fn fetch(&self, url: &str) -> Result<PageSnapshot> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let start = Instant::now();
        let mut current = parsed;
        let mut redirect_chain: Vec<String> = Vec::new();

        let response = loop {
            debug!("Fetching {}", current);
            let response = self
                .client
                .get(current.clone())
                .header("Accept", ACCEPT)
                .header("Accept-Language", ACCEPT_LANGUAGE)
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(current.as_str(), e))?;

            if response.status().is_redirection()
                && let Some(location) = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
            {
                if redirect_chain.len() >= MAX_REDIRECTS {
                    return Err(FetchError::TooManyRedirects {
                        url: url.to_string(),
                        limit: MAX_REDIRECTS,
                    });
                }
                let next = current
                    .join(location)
                    .map_err(|e| FetchError::InvalidUrl(format!("{location}: {e}")))?;
                debug!("Redirect {} -> {}", current, next);
                redirect_chain.push(current.to_string());
                current = next;
                continue;
            }

            break response;
        };

        let final_url = response.url().clone();
        let status_code = response.status().as_u16();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                // reqwest header names are already lowercase
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(final_url.as_str(), e))?;
        let response_time = start.elapsed();

        let html = String::from_utf8_lossy(&body);
        let mut page = extract::extract(&html, &final_url);
        page.status_code = status_code;
        page.response_time_ms = response_time.as_millis() as u64;
        page.content_length = body.len() as u64;
        page.headers = headers;
        page.redirect_chain = redirect_chain;

        debug!(
            "Fetched {} ({} bytes, status {}, {} redirects)",
            page.url,
            page.content_length,
            page.status_code,
            page.redirect_chain.len()
        );

        Ok(page)
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}
