// ── Test doubles for the service seams ──

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use ztly_api::Error;

use crate::client::ControllerClient;
use crate::model::{
    ControllerStatus, Member, MemberUpdate, NetworkConfig, NetworkRecord, NetworkUpdate,
    NewNetwork, RemoteNetwork,
};
use crate::store::{MemoryOwnershipStore, OwnershipStore, StoreError};

const NODE_ADDRESS: &str = "8056c2e21c";

fn injected() -> Error {
    Error::Controller {
        status: 500,
        message: "injected failure".into(),
    }
}

/// In-memory controller that records every mutating call.
#[derive(Debug, Default)]
pub(crate) struct FakeController {
    networks: Mutex<BTreeMap<String, RemoteNetwork>>,
    members: Mutex<BTreeMap<(String, String), Member>>,
    next_id: AtomicUsize,
    mutations: AtomicUsize,
    deletes: AtomicUsize,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    pub(crate) fail_create: AtomicBool,
    pub(crate) fail_update: AtomicBool,
    pub(crate) fail_delete: AtomicBool,
}

impl FakeController {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed a network directly, bypassing the call counters.
    pub(crate) fn seed(&self, id: &str, name: &str) {
        let network = RemoteNetwork {
            id: id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            config: NetworkConfig::default(),
            created_at: None,
        };
        self.networks.lock().unwrap().insert(id.to_owned(), network);
    }

    pub(crate) fn seed_member(&self, network_id: &str, node_id: &str) {
        let member = Member {
            node_id: node_id.to_owned(),
            network_id: network_id.to_owned(),
            authorized: false,
            active_bridge: false,
            ip_assignments: Vec::new(),
            revision: Some(1),
        };
        self.members
            .lock()
            .unwrap()
            .insert((network_id.to_owned(), node_id.to_owned()), member);
    }

    pub(crate) fn network(&self, id: &str) -> Option<RemoteNetwork> {
        self.networks.lock().unwrap().get(id).cloned()
    }

    pub(crate) fn network_count(&self) -> usize {
        self.networks.lock().unwrap().len()
    }

    pub(crate) fn member(&self, network_id: &str, node_id: &str) -> Option<Member> {
        self.members
            .lock()
            .unwrap()
            .get(&(network_id.to_owned(), node_id.to_owned()))
            .cloned()
    }

    /// Count of create, update, and delete calls on networks and members.
    pub(crate) fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Count of network delete calls, failed ones included.
    pub(crate) fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Count of `list_networks` calls.
    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Count of single-network `get_network` calls.
    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn mutated(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ControllerClient for FakeController {
    async fn status(&self) -> Result<ControllerStatus, Error> {
        Ok(ControllerStatus {
            address: NODE_ADDRESS.into(),
            version: "1.14.0".into(),
            online: true,
        })
    }

    async fn list_networks(&self) -> Result<Vec<RemoteNetwork>, Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.networks.lock().unwrap().values().cloned().collect())
    }

    async fn list_network_ids(&self) -> Result<Vec<String>, Error> {
        Ok(self.networks.lock().unwrap().keys().cloned().collect())
    }

    async fn get_network(&self, id: &str) -> Result<Option<RemoteNetwork>, Error> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.network(id))
    }

    async fn create_network(&self, network: &NewNetwork) -> Result<RemoteNetwork, Error> {
        self.mutated();
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(injected());
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = RemoteNetwork {
            id: format!("{NODE_ADDRESS}{n:06x}"),
            name: network.name.clone(),
            description: network.description.clone(),
            config: network.config.clone(),
            created_at: None,
        };
        self.networks
            .lock()
            .unwrap()
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update_network(
        &self,
        id: &str,
        update: &NetworkUpdate,
    ) -> Result<RemoteNetwork, Error> {
        self.mutated();
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(injected());
        }
        let mut networks = self.networks.lock().unwrap();
        let Some(network) = networks.get_mut(id) else {
            return Err(Error::Controller {
                status: 404,
                message: "not found".into(),
            });
        };
        if let Some(name) = &update.name {
            network.name.clone_from(name);
        }
        if let Some(description) = &update.description {
            network.description.clone_from(description);
        }
        if let Some(private) = update.config.private {
            network.config.private = private;
        }
        if let Some(limit) = update.config.multicast_limit {
            network.config.multicast_limit = limit;
        }
        Ok(network.clone())
    }

    async fn delete_network(&self, id: &str) -> Result<(), Error> {
        self.mutated();
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(injected());
        }
        self.networks.lock().unwrap().remove(id);
        Ok(())
    }

    async fn list_members(&self, network_id: &str) -> Result<Vec<Member>, Error> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.network_id == network_id)
            .cloned()
            .collect())
    }

    async fn get_member(&self, network_id: &str, node_id: &str) -> Result<Option<Member>, Error> {
        Ok(self.member(network_id, node_id))
    }

    async fn update_member(
        &self,
        network_id: &str,
        node_id: &str,
        update: &MemberUpdate,
    ) -> Result<Member, Error> {
        self.mutated();
        let mut members = self.members.lock().unwrap();
        let member = members
            .entry((network_id.to_owned(), node_id.to_owned()))
            .or_insert_with(|| Member {
                node_id: node_id.to_owned(),
                network_id: network_id.to_owned(),
                authorized: false,
                active_bridge: false,
                ip_assignments: Vec::new(),
                revision: Some(0),
            });
        if let Some(authorized) = update.authorized {
            member.authorized = authorized;
        }
        if let Some(bridge) = update.active_bridge {
            member.active_bridge = bridge;
        }
        if let Some(ips) = &update.ip_assignments {
            member.ip_assignments.clone_from(ips);
        }
        member.revision = member.revision.map(|r| r + 1);
        Ok(member.clone())
    }

    async fn delete_member(&self, network_id: &str, node_id: &str) -> Result<(), Error> {
        self.mutated();
        self.members
            .lock()
            .unwrap()
            .remove(&(network_id.to_owned(), node_id.to_owned()));
        Ok(())
    }
}

/// Memory store with switchable write failures.
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    pub(crate) inner: MemoryOwnershipStore,
    pub(crate) fail_create: AtomicBool,
    pub(crate) fail_update: AtomicBool,
    pub(crate) fail_delete: AtomicBool,
}

impl FailingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn check(flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: "injected failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OwnershipStore for FailingStore {
    async fn get_network(&self, id: &str) -> Result<Option<NetworkRecord>, StoreError> {
        self.inner.get_network(id).await
    }

    async fn networks_by_owner(&self, owner_id: &str) -> Result<Vec<NetworkRecord>, StoreError> {
        self.inner.networks_by_owner(owner_id).await
    }

    async fn all_networks(&self) -> Result<Vec<NetworkRecord>, StoreError> {
        self.inner.all_networks().await
    }

    async fn create_network(&self, record: NetworkRecord) -> Result<(), StoreError> {
        Self::check(&self.fail_create)?;
        self.inner.create_network(record).await
    }

    async fn update_network(&self, record: NetworkRecord) -> Result<(), StoreError> {
        Self::check(&self.fail_update)?;
        self.inner.update_network(record).await
    }

    async fn delete_network(&self, id: &str) -> Result<(), StoreError> {
        Self::check(&self.fail_delete)?;
        self.inner.delete_network(id).await
    }
}
