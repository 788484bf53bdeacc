use std::future::Future;
use std::time::Duration;

use reqwest::{header, Client};
use tracing::debug;

use super::{CacheError, CachedResponse};

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Live network access for asset paths.
pub trait Network: Send + Sync {
    /// Fetch a path. Resolves for any HTTP status; only transport failures
    /// are errors.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<CachedResponse, CacheError>> + Send;
}

/// HTTP access to the deployed asset bundle.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpNetwork {
    client: Client,
    base_url: String,
}

impl HttpNetwork {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an asset path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Network for HttpNetwork {
    async fn fetch(&self, path: &str) -> Result<CachedResponse, CacheError> {
        let url = self.url_for(path);
        let response = self.client.get(&url).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        debug!(url = %url, status, bytes = body.len(), "Fetched from network");
        Ok(CachedResponse::new(status, content_type, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let network = HttpNetwork::new(
            "http://localhost:4173/hospitalia-finance-tracker/",
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
        .unwrap();
        assert_eq!(
            network.url_for("/index.html"),
            "http://localhost:4173/hospitalia-finance-tracker/index.html"
        );
        assert_eq!(
            network.url_for("icon-192.png"),
            "http://localhost:4173/hospitalia-finance-tracker/icon-192.png"
        );
    }
}
