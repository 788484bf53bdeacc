use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::{CacheError, CacheStorage, CachedResponse, Network};

/// Prefix shared by every version of the asset cache.
pub const DEFAULT_CACHE_PREFIX: &str = "finance-tracker-cache";

/// Current cache version. Bumping it is what evicts old caches on the
/// next activation.
pub const DEFAULT_CACHE_VERSION: &str = "v1";

/// Assets fetched on install.
pub const DEFAULT_ASSETS: [&str; 7] = [
    "/index.html",
    "/manifest.json",
    "/static/js/bundle.js",
    "/static/js/main.chunk.js",
    "/static/js/0.chunk.js",
    "/icon-192.png",
    "/icon-512.png",
];

/// Versioned store name, `<prefix>-<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheVersion {
    pub prefix: String,
    pub version: String,
}

impl CacheVersion {
    pub fn new(prefix: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            version: version.into(),
        }
    }

    pub fn store_name(&self) -> String {
        format!("{}-{}", self.prefix, self.version)
    }
}

impl Default for CacheVersion {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_VERSION)
    }
}

/// Result of the install step. Install never errors; a failure is
/// reported here and activation may still proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Every asset was committed
    Cached(usize),
    /// Nothing was committed
    Failed(String),
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
    /// Placeholder served after the network failed
    Offline,
}

impl ResponseSource {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseSource::Cache => "cache",
            ResponseSource::Network => "network",
            ResponseSource::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellResponse {
    pub response: CachedResponse,
    pub source: ResponseSource,
}

/// Offline cache shell: install, fetch and activate over one current
/// cache version.
///
/// Fetches may run concurrently with each other and with install or
/// activate; nothing orders them, so a fetch during activation can see a
/// store that is about to be deleted.
pub struct CacheShell<S, N> {
    store_name: String,
    assets: Vec<String>,
    storage: S,
    network: N,
}

impl<S: CacheStorage, N: Network> CacheShell<S, N> {
    pub fn new(version: &CacheVersion, assets: Vec<String>, storage: S, network: N) -> Self {
        Self {
            store_name: version.store_name(),
            assets,
            storage,
            network,
        }
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Fetch every asset and commit them as one set under the current
    /// store. Any failed or non-2xx fetch commits nothing.
    pub async fn install(&self) -> InstallOutcome {
        match self.try_install().await {
            Ok(count) => {
                info!(store = %self.store_name, assets = count, "Assets cached successfully");
                InstallOutcome::Cached(count)
            }
            Err(e) => {
                error!(store = %self.store_name, error = %e, "Cache install failed");
                InstallOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_install(&self) -> Result<usize, CacheError> {
        self.storage.open(&self.store_name).await?;

        let fetches = self.assets.iter().map(|path| async move {
            let response = self.network.fetch(path).await?;
            if !response.is_ok() {
                return Err(CacheError::BadStatus {
                    path: path.clone(),
                    status: response.status,
                });
            }
            Ok((path.clone(), response))
        });
        let entries = try_join_all(fetches).await?;

        let count = entries.len();
        self.storage.put_all(&self.store_name, entries).await?;
        Ok(count)
    }

    /// Serve a request: any cached copy wins, then the network, then the
    /// 503 placeholder. Never fails.
    pub async fn fetch(&self, path: &str) -> ShellResponse {
        match self.storage.match_any(path).await {
            Ok(Some(response)) => {
                return ShellResponse {
                    response,
                    source: ResponseSource::Cache,
                };
            }
            Ok(None) => {}
            Err(e) => {
                warn!(path, error = %e, "Cache lookup failed, trying network");
            }
        }

        match self.network.fetch(path).await {
            Ok(response) => ShellResponse {
                response,
                source: ResponseSource::Network,
            },
            Err(e) => {
                error!(path, error = %e, "Fetch failed, offline mode active");
                ShellResponse {
                    response: CachedResponse::offline(),
                    source: ResponseSource::Offline,
                }
            }
        }
    }

    /// Delete every store except the current one. Returns the deleted names.
    pub async fn activate(&self) -> Result<Vec<String>, CacheError> {
        let stale: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|name| name != &self.store_name)
            .collect();

        let deletions = stale.iter().map(|name| async move {
            info!(store = %name, "Deleting old cache");
            self.storage.delete(name).await.map(|_| name.clone())
        });
        let deleted = try_join_all(deletions).await?;

        info!(store = %self.store_name, deleted = deleted.len(), "Cache shell activated");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::cache::MemoryCacheStorage;

    /// Network stand-in serving a fixed set of paths.
    #[derive(Default)]
    struct FakeNetwork {
        responses: HashMap<String, CachedResponse>,
        offline: bool,
        calls: AtomicUsize,
    }

    impl FakeNetwork {
        fn serving(paths: &[&str]) -> Self {
            let responses = paths
                .iter()
                .map(|p| (p.to_string(), CachedResponse::new(200, None, format!("body of {}", p))))
                .collect();
            Self {
                responses,
                ..Self::default()
            }
        }

        fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Network for FakeNetwork {
        async fn fetch(&self, path: &str) -> Result<CachedResponse, CacheError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(CacheError::Unreachable(path.to_string()));
            }
            Ok(self
                .responses
                .get(path)
                .cloned()
                .unwrap_or_else(|| CachedResponse::new(404, None, "not found")))
        }
    }

    fn assets() -> Vec<String> {
        DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect()
    }

    fn shell(network: FakeNetwork) -> CacheShell<MemoryCacheStorage, FakeNetwork> {
        CacheShell::new(
            &CacheVersion::default(),
            assets(),
            MemoryCacheStorage::new(),
            network,
        )
    }

    #[test]
    fn test_store_name() {
        assert_eq!(CacheVersion::default().store_name(), "finance-tracker-cache-v1");
        assert_eq!(CacheVersion::new("app", "v7").store_name(), "app-v7");
    }

    #[tokio::test]
    async fn test_install_caches_all_assets() {
        let shell = shell(FakeNetwork::serving(&DEFAULT_ASSETS));
        assert_eq!(shell.install().await, InstallOutcome::Cached(7));
        assert_eq!(shell.storage().len("finance-tracker-cache-v1").await, Some(7));
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        // One asset missing upstream (404)
        let shell = shell(FakeNetwork::serving(&DEFAULT_ASSETS[..6]));
        assert!(matches!(shell.install().await, InstallOutcome::Failed(_)));

        // The store was opened but nothing committed
        assert_eq!(shell.storage().len("finance-tracker-cache-v1").await, Some(0));
        assert_eq!(
            shell.storage().match_any("/index.html").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_install_offline_then_activate() {
        let shell = shell(FakeNetwork::offline());
        shell.storage().open("finance-tracker-cache-v0").await.unwrap();

        assert!(matches!(shell.install().await, InstallOutcome::Failed(_)));
        assert_eq!(shell.activate().await.unwrap(), vec!["finance-tracker-cache-v0"]);
        assert_eq!(
            shell.storage().keys().await.unwrap(),
            vec!["finance-tracker-cache-v1"]
        );
    }

    #[tokio::test]
    async fn test_fetch_prefers_cache() {
        let shell = shell(FakeNetwork::serving(&DEFAULT_ASSETS));
        shell.install().await;
        let calls_after_install = shell.network.calls();

        let served = shell.fetch("/index.html").await;
        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.response.text(), "body of /index.html");
        assert_eq!(shell.network.calls(), calls_after_install);
    }

    #[tokio::test]
    async fn test_fetch_uses_network_on_miss() {
        let shell = shell(FakeNetwork::serving(&["/extra.css"]));
        let served = shell.fetch("/extra.css").await;
        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(served.response.status, 200);

        // Network responses are not written back
        assert_eq!(shell.storage().match_any("/extra.css").await.unwrap(), None);

        // Non-2xx network responses are passed through as-is
        let served = shell.fetch("/nope").await;
        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(served.response.status, 404);
    }

    #[tokio::test]
    async fn test_fetch_offline_returns_503() {
        let shell = shell(FakeNetwork::offline());
        let served = shell.fetch("/unknown").await;
        assert_eq!(served.source, ResponseSource::Offline);
        assert_eq!(served.response.status, 503);
        assert_eq!(served.response.text(), "Offline content unavailable");
        assert_eq!(shell.network.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_serves_stale_store_until_deleted() {
        let shell = shell(FakeNetwork::offline());
        shell
            .storage()
            .put_all(
                "finance-tracker-cache-v0",
                vec![("/index.html".to_string(), CachedResponse::new(200, None, "old"))],
            )
            .await
            .unwrap();

        assert_eq!(shell.fetch("/index.html").await.source, ResponseSource::Cache);
        shell.activate().await.unwrap();
        assert_eq!(shell.fetch("/index.html").await.source, ResponseSource::Offline);
    }

    #[tokio::test]
    async fn test_activate_keeps_only_current() {
        let shell = shell(FakeNetwork::offline());
        shell.storage().open("finance-tracker-cache-v1").await.unwrap();
        shell.storage().open("finance-tracker-cache-v0").await.unwrap();

        let deleted = shell.activate().await.unwrap();
        assert_eq!(deleted, vec!["finance-tracker-cache-v0"]);
        assert_eq!(
            shell.storage().keys().await.unwrap(),
            vec!["finance-tracker-cache-v1"]
        );

        // Nothing left to evict
        assert!(shell.activate().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_fetches() {
        let shell = shell(FakeNetwork::serving(&DEFAULT_ASSETS));
        shell.install().await;

        let paths = ["/index.html", "/manifest.json", "/missing.js"];
        let served = futures::future::join_all(paths.iter().map(|p| shell.fetch(p))).await;
        assert_eq!(served[0].source, ResponseSource::Cache);
        assert_eq!(served[1].source, ResponseSource::Cache);
        assert_eq!(served[2].source, ResponseSource::Network);
    }
}
