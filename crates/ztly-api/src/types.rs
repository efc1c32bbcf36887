//! Controller API request and response types.
//!
//! Match the JSON documents served under `/status` and `/controller/network/`.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

// ── Status ───────────────────────────────────────────────────────────

/// Node status, from `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// 10-hex-digit node address. Network IDs are prefixed with it.
    pub address: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub public_identity: Option<String>,
}

// ── Networks ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAssignmentPool {
    pub ip_range_start: IpAddr,
    pub ip_range_end: IpAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// CIDR target, e.g. `10.147.17.0/24`.
    pub target: String,
    /// Gateway, `None` for directly reachable (LAN) routes.
    #[serde(default)]
    pub via: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct V4AssignMode {
    #[serde(default)]
    pub zt: bool,
}

/// Network document, from `GET /controller/network/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub enable_broadcast: bool,
    #[serde(default)]
    pub multicast_limit: u32,
    #[serde(default)]
    pub v4_assign_mode: V4AssignMode,
    #[serde(default)]
    pub ip_assignment_pools: Vec<IpAssignmentPool>,
    #[serde(default)]
    pub routes: Vec<Route>,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub creation_time: Option<i64>,
    #[serde(default)]
    pub revision: Option<u64>,
}

/// Body for `POST /controller/network/{id}` (create and update).
///
/// Omitted fields are left untouched by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_broadcast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multicast_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v4_assign_mode: Option<V4AssignMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_assignment_pools: Option<Vec<IpAssignmentPool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,
}

// ── Members ──────────────────────────────────────────────────────────

/// Member document, from `GET /controller/network/{id}/member/{node}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    /// 10-hex-digit node address of the device.
    pub id: String,
    /// Owning network ID.
    pub nwid: String,
    #[serde(default)]
    pub authorized: bool,
    #[serde(default)]
    pub active_bridge: bool,
    #[serde(default)]
    pub ip_assignments: Vec<IpAddr>,
    #[serde(default)]
    pub revision: Option<u64>,
}

/// Body for `POST /controller/network/{id}/member/{node}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_bridge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_assignments: Option<Vec<IpAddr>>,
}
