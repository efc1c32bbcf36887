// ── JSON file ownership ledger ──
//
// The whole ledger is one JSON document. Every operation re-reads the file
// under an async mutex, so several short-lived processes see each other's
// writes; writes go to a sibling temp file first and are renamed into place.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::{OwnershipStore, StoreError};
use crate::model::NetworkRecord;

const LEDGER_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    version: u32,
    #[serde(default)]
    networks: BTreeMap<String, NetworkRecord>,
}

/// A ledger persisted as a JSON file. A missing file is an empty ledger.
#[derive(Debug)]
pub struct FileOwnershipStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileOwnershipStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn load(&self) -> Result<LedgerFile, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(LedgerFile {
                    version: LEDGER_VERSION,
                    networks: BTreeMap::new(),
                });
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let ledger: LedgerFile =
            serde_json::from_slice(&raw).map_err(|e| StoreError::Corrupt {
                message: format!("{}: {e}", self.path.display()),
            })?;
        if ledger.version > LEDGER_VERSION {
            return Err(StoreError::Corrupt {
                message: format!(
                    "{}: unsupported ledger version {}",
                    self.path.display(),
                    ledger.version
                ),
            });
        }
        Ok(ledger)
    }

    async fn save(&self, ledger: &LedgerFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let body = serde_json::to_vec_pretty(ledger).map_err(|e| StoreError::Corrupt {
            message: format!("cannot encode ledger: {e}"),
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), rows = ledger.networks.len(), "ledger saved");
        Ok(())
    }
}

#[async_trait]
impl OwnershipStore for FileOwnershipStore {
    async fn get_network(&self, id: &str) -> Result<Option<NetworkRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.networks.remove(id))
    }

    async fn networks_by_owner(&self, owner_id: &str) -> Result<Vec<NetworkRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let ledger = self.load().await?;
        Ok(ledger
            .networks
            .into_values()
            .filter(|r| r.owner_id == owner_id)
            .collect())
    }

    async fn all_networks(&self) -> Result<Vec<NetworkRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.networks.into_values().collect())
    }

    async fn create_network(&self, record: NetworkRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.load().await?;
        if ledger.networks.contains_key(&record.id) {
            return Err(StoreError::Conflict { id: record.id });
        }
        ledger.networks.insert(record.id.clone(), record);
        self.save(&ledger).await
    }

    async fn update_network(&self, record: NetworkRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.load().await?;
        match ledger.networks.get_mut(&record.id) {
            Some(existing) => *existing = record,
            None => return Err(StoreError::NotFound { id: record.id }),
        }
        self.save(&ledger).await
    }

    async fn delete_network(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.load().await?;
        if ledger.networks.remove(id).is_none() {
            return Ok(());
        }
        self.save(&ledger).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(id: &str, owner: &str) -> NetworkRecord {
        NetworkRecord::new(id, owner, format!("net-{id}"), "desc")
    }

    #[tokio::test]
    async fn missing_file_is_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileOwnershipStore::new(dir.path().join("ledger.json"));

        assert!(store.all_networks().await.unwrap().is_empty());
        assert!(store.get_network("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        let store = FileOwnershipStore::new(&path);
        store.create_network(record("a", "alice")).await.unwrap();
        store.create_network(record("b", "")).await.unwrap();
        drop(store);

        let reopened = FileOwnershipStore::new(&path);
        let a = reopened.get_network("a").await.unwrap().unwrap();
        assert_eq!(a.owner_id, "alice");
        assert_eq!(a.description, "desc");
        assert_eq!(reopened.networks_by_owner("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn conflict_and_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileOwnershipStore::new(dir.path().join("ledger.json"));
        store.create_network(record("a", "alice")).await.unwrap();

        assert!(matches!(
            store.create_network(record("a", "bob")).await,
            Err(StoreError::Conflict { .. })
        ));
        assert!(matches!(
            store.update_network(record("z", "bob")).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_and_delete_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileOwnershipStore::new(dir.path().join("ledger.json"));
        store.create_network(record("a", "")).await.unwrap();

        let mut claimed = store.get_network("a").await.unwrap().unwrap();
        claimed.owner_id = "carol".into();
        store.update_network(claimed).await.unwrap();
        assert_eq!(
            store.get_network("a").await.unwrap().unwrap().owner_id,
            "carol"
        );

        store.delete_network("a").await.unwrap();
        store.delete_network("a").await.unwrap();
        assert!(store.all_networks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn garbage_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileOwnershipStore::new(&path);
        assert!(matches!(
            store.all_networks().await,
            Err(StoreError::Corrupt { .. })
        ));
    }
}
