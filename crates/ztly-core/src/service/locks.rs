// ── Per-network lock table ──
//
// Serializes check-then-act sequences on one network ID inside this
// process. Distinct IDs never contend. Processes sharing a ledger file
// are not covered.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct NetworkLocks {
    table: DashMap<String, Arc<Mutex<()>>>,
}

impl NetworkLocks {
    /// Wait for exclusive access to `id`. Released when the guard drops,
    /// which also prunes the table entry once nobody else wants it.
    pub(crate) async fn acquire(&self, id: &str) -> NetworkLock<'_> {
        // Clone the Arc out so no shard lock is held across the await.
        let lock = Arc::clone(self.table.entry(id.to_owned()).or_default().value());
        let guard = lock.lock_owned().await;
        NetworkLock {
            locks: self,
            id: id.to_owned(),
            guard: Some(guard),
        }
    }

    /// Drop the entry for `id` if nobody holds or awaits it.
    fn release_idle(&self, id: &str) {
        self.table.remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }
}

/// Exclusive hold on one network ID.
#[derive(Debug)]
pub(crate) struct NetworkLock<'a> {
    locks: &'a NetworkLocks,
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for NetworkLock<'_> {
    fn drop(&mut self) {
        // The mutex guard keeps its own Arc; release it before pruning.
        drop(self.guard.take());
        self.locks.release_idle(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_id_is_exclusive() {
        let locks = NetworkLocks::default();
        let guard = locks.acquire("a").await;

        let blocked = tokio::time::timeout(Duration::from_millis(20), locks.acquire("a")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(20), locks.acquire("a")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn distinct_ids_do_not_contend() {
        let locks = NetworkLocks::default();
        let _a = locks.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(20), locks.acquire("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn entries_are_pruned_when_released() {
        let locks = NetworkLocks::default();
        let guard = locks.acquire("a").await;
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn waiting_task_keeps_the_entry() {
        let locks = Arc::new(NetworkLocks::default());
        let guard = locks.acquire("a").await;

        let waiter = tokio::spawn({
            let locks = Arc::clone(&locks);
            async move {
                let _held = locks.acquire("a").await;
                locks.len()
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);

        assert_eq!(waiter.await.unwrap(), 1);
        assert_eq!(locks.len(), 0);
    }
}
