use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CacheError, CacheStorage, CachedResponse};

/// Prefix of the scratch directories used while committing a batch.
const STAGING_PREFIX: &str = ".staging-";

/// Subdirectory of a staging directory holding entries replaced by a commit.
const BACKUP_DIR: &str = "replaced";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    cached_at: DateTime<Utc>,
    response: CachedResponse,
}

/// Cache stores on disk: one directory per store, one JSON file per entry.
pub struct DiskCacheStorage {
    root: PathBuf,
}

impl DiskCacheStorage {
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_path(&self, name: &str) -> Result<PathBuf, CacheError> {
        validate_store_name(name)?;
        Ok(self.root.join(name))
    }

    fn entry_file(key: &str) -> String {
        let hex: String = key.bytes().map(|b| format!("{:02x}", b)).collect();
        format!("{}.json", hex)
    }

    fn staging_path(&self, name: &str) -> PathBuf {
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        self.root.join(format!(
            "{}{}-{}-{}",
            STAGING_PREFIX,
            name,
            std::process::id(),
            stamp
        ))
    }

    fn write_staged(
        staging: &Path,
        entries: &[(String, CachedResponse)],
    ) -> Result<Vec<(PathBuf, String)>, CacheError> {
        std::fs::create_dir_all(staging)?;
        let cached_at = Utc::now();
        let mut files = Vec::with_capacity(entries.len());

        for (key, response) in entries {
            let entry = StoredEntry {
                key: key.clone(),
                cached_at,
                response: response.clone(),
            };
            let file = Self::entry_file(key);
            let path = staging.join(&file);
            std::fs::write(&path, serde_json::to_vec(&entry)?)?;
            // A repeated key overwrote its staged file; the last one wins
            if !files.iter().any(|(_, f)| f == &file) {
                files.push((path, file));
            }
        }

        Ok(files)
    }

    /// Move staged files into the store. On the first failed rename every
    /// file already moved is taken back out and any entry it replaced is
    /// restored.
    fn commit(
        staging: &Path,
        store: &Path,
        files: &[(PathBuf, String)],
    ) -> Result<(), CacheError> {
        let backups = staging.join(BACKUP_DIR);
        std::fs::create_dir_all(&backups)?;
        let mut committed: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(files.len());

        for (staged, file) in files {
            let dest = store.join(file);
            match Self::commit_one(staged, &dest, &backups.join(file)) {
                Ok(backup) => committed.push((dest, backup)),
                Err(e) => {
                    Self::roll_back(&committed);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Rename one staged file into place, moving an existing entry aside
    /// first. Returns where the replaced entry went.
    fn commit_one(staged: &Path, dest: &Path, backup: &Path) -> Result<Option<PathBuf>, CacheError> {
        let replaced = if dest.is_file() {
            std::fs::rename(dest, backup)?;
            Some(backup.to_path_buf())
        } else {
            None
        };

        if let Err(e) = std::fs::rename(staged, dest) {
            if let Some(ref backup) = replaced {
                restore(backup, dest);
            }
            return Err(e.into());
        }
        Ok(replaced)
    }

    fn roll_back(committed: &[(PathBuf, Option<PathBuf>)]) {
        for (dest, backup) in committed.iter().rev() {
            if let Err(e) = std::fs::remove_file(dest) {
                warn!(path = %dest.display(), error = %e, "Failed to roll back cache entry");
                continue;
            }
            if let Some(backup) = backup {
                restore(backup, dest);
            }
        }
    }

    fn read_entry(path: &Path) -> Result<StoredEntry, CacheError> {
        let contents = std::fs::read(path)?;
        Ok(serde_json::from_slice(&contents)?)
    }
}

impl CacheStorage for DiskCacheStorage {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        let path = self.store_path(name)?;
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    async fn put_all(
        &self,
        name: &str,
        entries: Vec<(String, CachedResponse)>,
    ) -> Result<(), CacheError> {
        let store = self.store_path(name)?;
        let staging = self.staging_path(name);

        // Everything is written aside first; a failure leaves the store as it was
        let result = Self::write_staged(&staging, &entries).and_then(|files| {
            std::fs::create_dir_all(&store)?;
            Self::commit(&staging, &store, &files)
        });
        remove_staging(&staging);
        result?;

        debug!(store = name, entries = entries.len(), "Committed cache entries");
        Ok(())
    }

    async fn match_any(&self, key: &str) -> Result<Option<CachedResponse>, CacheError> {
        let file = Self::entry_file(key);
        for name in self.keys().await? {
            let path = self.root.join(&name).join(&file);
            if !path.exists() {
                continue;
            }
            match Self::read_entry(&path) {
                Ok(entry) if entry.key == key => return Ok(Some(entry.response)),
                Ok(_) => {}
                Err(e) => {
                    warn!(store = %name, key, error = %e, "Skipping unreadable cache entry");
                }
            }
        }
        Ok(None)
    }

    /// Store directories in name order.
    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if validate_store_name(&name).is_ok() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let path = self.store_path(name)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(path)?;
        Ok(true)
    }
}

fn restore(backup: &Path, dest: &Path) {
    if let Err(e) = std::fs::rename(backup, dest) {
        warn!(path = %dest.display(), error = %e, "Failed to restore replaced cache entry");
    }
}

fn remove_staging(staging: &Path) {
    if let Err(e) = std::fs::remove_dir_all(staging) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %staging.display(), error = %e, "Failed to remove staging directory");
        }
    }
}

/// Store names become directory names: no separators, no leading dot.
fn validate_store_name(name: &str) -> Result<(), CacheError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && name != "..";
    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidStoreName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scratch root removed on drop, even when an assertion fails.
    struct TempRoot(PathBuf);

    impl TempRoot {
        fn new(tag: &str) -> Self {
            Self(std::env::temp_dir().join(format!(
                "hospitalia-cache-{}-{}-{}",
                tag,
                std::process::id(),
                Utc::now().timestamp_nanos_opt().unwrap_or_default()
            )))
        }

        fn storage(&self) -> DiskCacheStorage {
            DiskCacheStorage::new(self.0.clone()).unwrap()
        }

        fn entries(&self) -> Vec<String> {
            let mut names: Vec<String> = std::fs::read_dir(&self.0)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
    }

    impl Drop for TempRoot {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn ok(body: &str) -> CachedResponse {
        CachedResponse::new(200, None, body)
    }

    #[tokio::test]
    async fn test_disk_roundtrip() {
        let root = TempRoot::new("roundtrip");
        let storage = root.storage();
        let response = CachedResponse::new(200, Some("text/html".to_string()), "<html></html>");

        storage
            .put_all(
                "finance-tracker-cache-v1",
                vec![("/index.html".to_string(), response.clone())],
            )
            .await
            .unwrap();

        assert_eq!(
            storage.match_any("/index.html").await.unwrap(),
            Some(response)
        );
        assert_eq!(storage.match_any("/manifest.json").await.unwrap(), None);
        assert_eq!(
            storage.keys().await.unwrap(),
            vec!["finance-tracker-cache-v1"]
        );
    }

    #[tokio::test]
    async fn test_disk_delete_and_open() {
        let root = TempRoot::new("delete");
        let storage = root.storage();

        storage.open("finance-tracker-cache-v0").await.unwrap();
        storage.open("finance-tracker-cache-v1").await.unwrap();
        assert_eq!(storage.keys().await.unwrap().len(), 2);

        assert!(storage.delete("finance-tracker-cache-v0").await.unwrap());
        assert!(!storage.delete("finance-tracker-cache-v0").await.unwrap());
        assert_eq!(
            storage.keys().await.unwrap(),
            vec!["finance-tracker-cache-v1"]
        );
    }

    #[tokio::test]
    async fn test_invalid_store_names() {
        let root = TempRoot::new("names");
        let storage = root.storage();

        for name in ["", "..", ".hidden", "a/b", "a\\b"] {
            assert!(matches!(
                storage.open(name).await,
                Err(CacheError::InvalidStoreName(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_put_all_failure_commits_nothing() {
        let root = TempRoot::new("rollback");
        let storage = root.storage();
        let store = "finance-tracker-cache-v1";

        // A directory squatting on the entry file for /b makes its rename fail
        let blocked = root.0.join(store).join(DiskCacheStorage::entry_file("/b"));
        std::fs::create_dir_all(&blocked).unwrap();

        let result = storage
            .put_all(
                store,
                vec![("/a".to_string(), ok("a")), ("/b".to_string(), ok("b"))],
            )
            .await;

        assert!(result.is_err());
        assert_eq!(storage.match_any("/a").await.unwrap(), None);
        // No staging directories left behind
        assert_eq!(root.entries(), vec![store]);
    }

    #[tokio::test]
    async fn test_put_all_failure_restores_replaced_entries() {
        let root = TempRoot::new("restore");
        let storage = root.storage();
        let store = "finance-tracker-cache-v1";

        storage
            .put_all(store, vec![("/a".to_string(), ok("old"))])
            .await
            .unwrap();

        let blocked = root.0.join(store).join(DiskCacheStorage::entry_file("/b"));
        std::fs::create_dir_all(&blocked).unwrap();

        let result = storage
            .put_all(
                store,
                vec![("/a".to_string(), ok("new")), ("/b".to_string(), ok("b"))],
            )
            .await;

        assert!(result.is_err());
        assert_eq!(storage.match_any("/a").await.unwrap(), Some(ok("old")));
        assert_eq!(root.entries(), vec![store]);
    }

    #[tokio::test]
    async fn test_put_all_repeated_key_keeps_last() {
        let root = TempRoot::new("repeat");
        let storage = root.storage();

        storage
            .put_all(
                "finance-tracker-cache-v1",
                vec![("/a".to_string(), ok("first")), ("/a".to_string(), ok("second"))],
            )
            .await
            .unwrap();

        assert_eq!(storage.match_any("/a").await.unwrap(), Some(ok("second")));
    }

    #[tokio::test]
    async fn test_match_follows_name_order() {
        let root = TempRoot::new("order");
        let storage = root.storage();

        storage
            .put_all("cache-v2", vec![("/a".to_string(), ok("v2"))])
            .await
            .unwrap();
        storage
            .put_all("cache-v10", vec![("/a".to_string(), ok("v10"))])
            .await
            .unwrap();

        assert_eq!(storage.keys().await.unwrap(), vec!["cache-v10", "cache-v2"]);
        assert_eq!(storage.match_any("/a").await.unwrap(), Some(ok("v10")));
    }
}
