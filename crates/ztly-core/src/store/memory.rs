// ── In-memory ownership ledger ──
//
// Concurrent storage with O(1) lookups by network ID. Uniqueness of IDs
// is enforced through the `DashMap` entry API, so two racing inserts of
// the same ID cannot both succeed.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{OwnershipStore, StoreError};
use crate::model::NetworkRecord;

/// A [`DashMap`]-backed ledger. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryOwnershipStore {
    by_id: DashMap<String, NetworkRecord>,
}

impl MemoryOwnershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing rows (later duplicates replace earlier ones).
    pub fn with_records(records: impl IntoIterator<Item = NetworkRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.by_id.insert(record.id.clone(), record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn sorted(&self, keep: impl Fn(&NetworkRecord) -> bool) -> Vec<NetworkRecord> {
        let mut rows: Vec<NetworkRecord> = self
            .by_id
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows
    }
}

#[async_trait]
impl OwnershipStore for MemoryOwnershipStore {
    async fn get_network(&self, id: &str) -> Result<Option<NetworkRecord>, StoreError> {
        Ok(self.by_id.get(id).map(|r| r.value().clone()))
    }

    async fn networks_by_owner(&self, owner_id: &str) -> Result<Vec<NetworkRecord>, StoreError> {
        Ok(self.sorted(|r| r.owner_id == owner_id))
    }

    async fn all_networks(&self) -> Result<Vec<NetworkRecord>, StoreError> {
        Ok(self.sorted(|_| true))
    }

    async fn create_network(&self, record: NetworkRecord) -> Result<(), StoreError> {
        match self.by_id.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict { id: record.id }),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn update_network(&self, record: NetworkRecord) -> Result<(), StoreError> {
        match self.by_id.get_mut(&record.id) {
            Some(mut existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StoreError::NotFound { id: record.id }),
        }
    }

    async fn delete_network(&self, id: &str) -> Result<(), StoreError> {
        self.by_id.remove(id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(id: &str, owner: &str) -> NetworkRecord {
        NetworkRecord::new(id, owner, format!("net-{id}"), "")
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let store = MemoryOwnershipStore::new();
        store.create_network(record("a", "alice")).await.unwrap();

        let result = store.create_network(record("a", "bob")).await;

        assert!(matches!(result, Err(StoreError::Conflict { ref id }) if id == "a"));
        assert_eq!(store.get_network("a").await.unwrap().unwrap().owner_id, "alice");
    }

    #[tokio::test]
    async fn update_requires_existing_row() {
        let store = MemoryOwnershipStore::new();
        let result = store.update_network(record("a", "alice")).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn owner_filter_is_sorted_and_exact() {
        let store = MemoryOwnershipStore::with_records([
            record("c", "alice"),
            record("a", "alice"),
            record("b", "bob"),
            record("d", ""),
        ]);

        let ids: Vec<String> = store
            .networks_by_owner("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(store.all_networks().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryOwnershipStore::with_records([record("a", "alice")]);
        store.delete_network("a").await.unwrap();
        store.delete_network("a").await.unwrap();
        assert!(store.is_empty());
    }
}
