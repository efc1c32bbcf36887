use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// A device joined to a network.
///
/// Members have no ledger entry; access follows the parent network's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub node_id: String,
    pub network_id: String,
    pub authorized: bool,
    pub active_bridge: bool,
    pub ip_assignments: Vec<IpAddr>,
    pub revision: Option<u64>,
}

/// Partial update of a member. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberUpdate {
    pub authorized: Option<bool>,
    pub active_bridge: Option<bool>,
    pub ip_assignments: Option<Vec<IpAddr>>,
}
