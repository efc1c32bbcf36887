// ── Network reconciliation service ──
//
// Every operation authorizes the requester against the ownership ledger,
// executes against the controller, then brings the ledger in line with the
// outcome. Creates are compensated with a remote delete when the ledger
// write fails; updates and deletes treat the ledger write as best effort.

mod audit;
mod import;
mod locks;
mod members;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::client::ControllerClient;
use crate::error::CoreError;
use crate::model::{
    ControllerStatus, NetworkRecord, NetworkUpdate, NewNetwork, OwnedNetwork, RemoteNetwork,
};
use crate::registry::ClientRegistry;
use crate::store::OwnershipStore;

use self::locks::NetworkLocks;

const CONTROLLER_CLIENT: &str = "controller client";

/// Authorized, ledger-consistent access to controller networks.
///
/// Cheaply cloneable via `Arc<ServiceInner>`; clones share the ledger and
/// the per-network lock table.
#[derive(Clone)]
pub struct NetworkService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    client: Option<Arc<dyn ControllerClient>>,
    store: Arc<dyn OwnershipStore>,
    locks: NetworkLocks,
}

impl NetworkService {
    /// Build a service over an explicit controller client.
    pub fn new(client: Arc<dyn ControllerClient>, store: Arc<dyn OwnershipStore>) -> Self {
        Self::with_client(Some(client), store)
    }

    /// Build a service using `explicit` if given, otherwise whatever the
    /// registry currently holds. With neither, controller operations fail
    /// with [`CoreError::NotInitialized`].
    pub fn from_registry(
        registry: &ClientRegistry,
        explicit: Option<Arc<dyn ControllerClient>>,
        store: Arc<dyn OwnershipStore>,
    ) -> Self {
        Self::with_client(registry.get_or_default(explicit), store)
    }

    fn with_client(
        client: Option<Arc<dyn ControllerClient>>,
        store: Arc<dyn OwnershipStore>,
    ) -> Self {
        if client.is_none() {
            debug!("network service built without a controller client");
        }
        Self {
            inner: Arc::new(ServiceInner {
                client,
                store,
                locks: NetworkLocks::default(),
            }),
        }
    }

    /// Access the ownership ledger.
    pub fn store(&self) -> &Arc<dyn OwnershipStore> {
        &self.inner.store
    }

    pub fn has_client(&self) -> bool {
        self.inner.client.is_some()
    }

    // ── Internal helpers ─────────────────────────────────────────

    fn client(&self) -> Result<&Arc<dyn ControllerClient>, CoreError> {
        self.inner
            .client
            .as_ref()
            .ok_or(CoreError::NotInitialized {
                component: CONTROLLER_CLIENT,
            })
    }

    /// The ledger row for `id` if `requester_id` owns it.
    async fn authorize(
        &self,
        operation: &'static str,
        id: &str,
        requester_id: &str,
    ) -> Result<NetworkRecord, CoreError> {
        let record = self
            .inner
            .store
            .get_network(id)
            .await
            .map_err(|e| CoreError::persistence(operation, Some(id), e))?;

        match record {
            None => Err(CoreError::NotFound { id: id.to_owned() }),
            Some(r) if r.is_owned_by(requester_id) => Ok(r),
            Some(_) => {
                debug!(network_id = id, requester = requester_id, operation, "access denied");
                Err(CoreError::Unauthorized { id: id.to_owned() })
            }
        }
    }

    // ── Status ───────────────────────────────────────────────────

    pub async fn status(&self) -> Result<ControllerStatus, CoreError> {
        self.client()?
            .status()
            .await
            .map_err(|e| CoreError::upstream("status", None, e))
    }

    // ── Listing ──────────────────────────────────────────────────

    /// Ledger rows owned by `owner_id`, ordered by network ID.
    pub async fn list_owned(&self, owner_id: &str) -> Result<Vec<NetworkRecord>, CoreError> {
        if owner_id.is_empty() {
            return Ok(Vec::new());
        }
        self.inner
            .store
            .networks_by_owner(owner_id)
            .await
            .map_err(|e| CoreError::persistence("list networks", None, e))
    }

    /// Owned rows joined with the controller's current view.
    ///
    /// One bulk controller fetch, joined in memory. Rows whose network the
    /// controller no longer has come back with `remote: None`.
    pub async fn list_owned_detailed(
        &self,
        owner_id: &str,
    ) -> Result<Vec<OwnedNetwork>, CoreError> {
        let records = self.list_owned(owner_id).await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let wanted: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let mut remote: HashMap<String, RemoteNetwork> = self
            .client()?
            .list_networks()
            .await
            .map_err(|e| CoreError::upstream("list networks", None, e))?
            .into_iter()
            .filter(|n| wanted.contains(n.id.as_str()))
            .map(|n| (n.id.clone(), n))
            .collect();

        Ok(records
            .into_iter()
            .map(|record| {
                let remote = remote.remove(&record.id);
                OwnedNetwork { record, remote }
            })
            .collect())
    }

    // ── Single network ───────────────────────────────────────────

    /// The live network if `requester_id` owns it.
    ///
    /// Returns `Ok(None)` both for unknown IDs and for networks owned by
    /// someone else, so callers cannot probe for foreign networks.
    pub async fn get_network(
        &self,
        id: &str,
        requester_id: &str,
    ) -> Result<Option<RemoteNetwork>, CoreError> {
        match self.authorize("get network", id, requester_id).await {
            Ok(_) => {}
            Err(e) if e.is_access_denied() => return Ok(None),
            Err(e) => return Err(e),
        }

        self.client()?
            .get_network(id)
            .await
            .map_err(|e| CoreError::upstream("get network", Some(id), e))
    }

    /// Create a private network on the controller and record `owner_id`
    /// as its owner.
    ///
    /// If the ledger write fails, the remote network is deleted again and
    /// the ledger error is returned.
    pub async fn create_network(
        &self,
        network: NewNetwork,
        owner_id: &str,
    ) -> Result<RemoteNetwork, CoreError> {
        if owner_id.is_empty() {
            return Err(CoreError::MissingIdentity {
                operation: "create network",
            });
        }
        let client = self.client()?;

        let mut network = network;
        network.config.private = true;

        let remote = client
            .create_network(&network)
            .await
            .map_err(|e| CoreError::upstream("create network", None, e))?;

        let record = NetworkRecord::new(
            remote.id.clone(),
            owner_id,
            network.name,
            network.description,
        );
        if let Err(store_err) = self.inner.store.create_network(record).await {
            match client.delete_network(&remote.id).await {
                Ok(()) => warn!(
                    network_id = %remote.id,
                    owner = owner_id,
                    error = %store_err,
                    "ledger write failed, remote network rolled back"
                ),
                Err(rollback_err) => error!(
                    network_id = %remote.id,
                    owner = owner_id,
                    error = %store_err,
                    rollback_error = %rollback_err,
                    "ledger write and rollback both failed, network is orphaned on the controller"
                ),
            }
            return Err(CoreError::persistence(
                "create network",
                Some(&remote.id),
                store_err,
            ));
        }

        info!(network_id = %remote.id, owner = owner_id, "network created");
        Ok(remote)
    }

    /// Apply `update` to a network owned by `requester_id`.
    ///
    /// `private` is always sent as `true`. Name and description are
    /// mirrored into the ledger afterwards; a failed mirror is only logged.
    pub async fn update_network(
        &self,
        id: &str,
        update: NetworkUpdate,
        requester_id: &str,
    ) -> Result<RemoteNetwork, CoreError> {
        let client = self.client()?;
        let _guard = self.inner.locks.acquire(id).await;
        let mut record = self.authorize("update network", id, requester_id).await?;

        let mut update = update;
        update.config.private = Some(true);

        let remote = client
            .update_network(id, &update)
            .await
            .map_err(|e| CoreError::upstream("update network", Some(id), e))?;

        if record.name != remote.name || record.description != remote.description {
            record.name.clone_from(&remote.name);
            record.description.clone_from(&remote.description);
            record.touch();
            if let Err(e) = self.inner.store.update_network(record).await {
                warn!(network_id = id, error = %e, "failed to mirror network metadata into ledger");
            }
        }

        info!(network_id = id, requester = requester_id, "network updated");
        Ok(remote)
    }

    /// Delete a network owned by `requester_id` from the controller, then
    /// drop its ledger row. A failed ledger delete leaves an orphaned row
    /// and is only logged.
    pub async fn delete_network(&self, id: &str, requester_id: &str) -> Result<(), CoreError> {
        let client = self.client()?;
        let _guard = self.inner.locks.acquire(id).await;
        self.authorize("delete network", id, requester_id).await?;

        client
            .delete_network(id)
            .await
            .map_err(|e| CoreError::upstream("delete network", Some(id), e))?;

        if let Err(e) = self.inner.store.delete_network(id).await {
            warn!(network_id = id, error = %e, "network deleted remotely but ledger row remains");
        }

        info!(network_id = id, requester = requester_id, "network deleted");
        Ok(())
    }
}

impl std::fmt::Debug for NetworkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkService")
            .field("has_client", &self.has_client())
            .finish_non_exhaustive()
    }
}
