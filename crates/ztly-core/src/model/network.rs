// ── Network domain types ──

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Controller health as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStatus {
    /// Node address; generated network IDs start with it.
    pub address: String,
    pub version: String,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAssignmentPool {
    pub start: IpAddr,
    pub end: IpAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// CIDR target.
    pub target: String,
    #[serde(default)]
    pub via: Option<String>,
}

/// Addressing and access settings of a network.
///
/// `private` is forced to `true` on every create and update that passes
/// through [`NetworkService`](crate::NetworkService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub private: bool,
    pub ip_assignment_pools: Vec<IpAssignmentPool>,
    pub routes: Vec<Route>,
    pub multicast_limit: u32,
    pub enable_broadcast: bool,
    /// Auto-assign IPv4 addresses from the pools.
    pub v4_auto_assign: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            private: true,
            ip_assignment_pools: Vec::new(),
            routes: Vec::new(),
            multicast_limit: 32,
            enable_broadcast: true,
            v4_auto_assign: true,
        }
    }
}

/// A network as the controller knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNetwork {
    pub id: String,
    pub name: String,
    pub description: String,
    pub config: NetworkConfig,
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for creating a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewNetwork {
    pub name: String,
    pub description: String,
    pub config: NetworkConfig,
}

/// Partial update of a network's config. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfigUpdate {
    pub private: Option<bool>,
    pub ip_assignment_pools: Option<Vec<IpAssignmentPool>>,
    pub routes: Option<Vec<Route>>,
    pub multicast_limit: Option<u32>,
    pub enable_broadcast: Option<bool>,
    pub v4_auto_assign: Option<bool>,
}

/// Partial update of a network. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub config: NetworkConfigUpdate,
}
