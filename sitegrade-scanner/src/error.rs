use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out fetching {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP request failed for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects fetching {url} (limit {limit})")]
    TooManyRedirects { url: String, limit: usize },
}

impl FetchError {
    /// Classify a transport failure so callers can tell timeouts from
    /// connection refusals without digging into reqwest internals.
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if source.is_connect() {
            FetchError::Connect {
                url: url.to_string(),
                source,
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                source,
            }
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Timeout { url }
            | FetchError::Connect { url, .. }
            | FetchError::Http { url, .. }
            | FetchError::TooManyRedirects { url, .. } => Some(url),
            FetchError::InvalidUrl(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
