//! Offline cache shell for the application's static assets.
//!
//! Three lifecycle events drive it:
//! - install: fetch the fixed asset list and commit it as one set under the
//!   current versioned store
//! - fetch: serve from any store first, then the network, then a fixed 503
//!   placeholder
//! - activate: delete every store whose name is not the current version
//!
//! Storage and network are collaborators behind the [`CacheStorage`] and
//! [`Network`] traits. Stores live on disk in production
//! ([`DiskCacheStorage`]), in memory for tests and embedding.

pub mod disk;
pub mod error;
pub mod network;
pub mod response;
pub mod shell;
pub mod storage;

pub use disk::DiskCacheStorage;
pub use error::CacheError;
pub use network::{HttpNetwork, Network, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use response::{CachedResponse, OFFLINE_BODY, OFFLINE_STATUS};
pub use shell::{
    CacheShell, CacheVersion, InstallOutcome, ResponseSource, ShellResponse, DEFAULT_ASSETS,
    DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_VERSION,
};
pub use storage::{CacheStorage, MemoryCacheStorage};
