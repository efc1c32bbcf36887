// ── API-to-domain type conversions ──
//
// Bridges raw `ztly_api::types` documents into `ztly_core::model` types
// and back into request bodies. Missing optional data gets the same
// defaults the controller applies.

use chrono::{DateTime, Utc};

use ztly_api::types::{
    IpAssignmentPool as ApiPool, MemberRequest, MemberResponse, NetworkRequest, NetworkResponse,
    Route as ApiRoute, StatusResponse, V4AssignMode,
};

use crate::model::{
    ControllerStatus, IpAssignmentPool, Member, MemberUpdate, NetworkConfig, NetworkUpdate,
    NewNetwork, RemoteNetwork, Route,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Convert an optional epoch-milliseconds timestamp to `DateTime<Utc>`.
fn millis_to_datetime(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis.and_then(DateTime::from_timestamp_millis)
}

fn pools_to_api(pools: &[IpAssignmentPool]) -> Vec<ApiPool> {
    pools
        .iter()
        .map(|p| ApiPool {
            ip_range_start: p.start,
            ip_range_end: p.end,
        })
        .collect()
}

fn routes_to_api(routes: &[Route]) -> Vec<ApiRoute> {
    routes
        .iter()
        .map(|r| ApiRoute {
            target: r.target.clone(),
            via: r.via.clone(),
        })
        .collect()
}

// ── Controller → domain ────────────────────────────────────────────

impl From<StatusResponse> for ControllerStatus {
    fn from(s: StatusResponse) -> Self {
        Self {
            address: s.address,
            version: s.version,
            online: s.online,
        }
    }
}

impl From<NetworkResponse> for RemoteNetwork {
    fn from(n: NetworkResponse) -> Self {
        Self {
            id: n.id,
            name: n.name,
            description: n.description.unwrap_or_default(),
            config: NetworkConfig {
                private: n.private,
                ip_assignment_pools: n
                    .ip_assignment_pools
                    .into_iter()
                    .map(|p| IpAssignmentPool {
                        start: p.ip_range_start,
                        end: p.ip_range_end,
                    })
                    .collect(),
                routes: n
                    .routes
                    .into_iter()
                    .map(|r| Route {
                        target: r.target,
                        via: r.via,
                    })
                    .collect(),
                multicast_limit: n.multicast_limit,
                enable_broadcast: n.enable_broadcast,
                v4_auto_assign: n.v4_assign_mode.zt,
            },
            created_at: millis_to_datetime(n.creation_time),
        }
    }
}

impl From<MemberResponse> for Member {
    fn from(m: MemberResponse) -> Self {
        Self {
            node_id: m.id,
            network_id: m.nwid,
            authorized: m.authorized,
            active_bridge: m.active_bridge,
            ip_assignments: m.ip_assignments,
            revision: m.revision,
        }
    }
}

// ── Domain → controller ────────────────────────────────────────────

impl From<&NewNetwork> for NetworkRequest {
    fn from(n: &NewNetwork) -> Self {
        Self {
            name: Some(n.name.clone()),
            description: (!n.description.is_empty()).then(|| n.description.clone()),
            private: Some(n.config.private),
            enable_broadcast: Some(n.config.enable_broadcast),
            multicast_limit: Some(n.config.multicast_limit),
            v4_assign_mode: Some(V4AssignMode {
                zt: n.config.v4_auto_assign,
            }),
            ip_assignment_pools: Some(pools_to_api(&n.config.ip_assignment_pools)),
            routes: Some(routes_to_api(&n.config.routes)),
        }
    }
}

impl From<&NetworkUpdate> for NetworkRequest {
    fn from(u: &NetworkUpdate) -> Self {
        Self {
            name: u.name.clone(),
            description: u.description.clone(),
            private: u.config.private,
            enable_broadcast: u.config.enable_broadcast,
            multicast_limit: u.config.multicast_limit,
            v4_assign_mode: u.config.v4_auto_assign.map(|zt| V4AssignMode { zt }),
            ip_assignment_pools: u.config.ip_assignment_pools.as_deref().map(pools_to_api),
            routes: u.config.routes.as_deref().map(routes_to_api),
        }
    }
}

impl From<&MemberUpdate> for MemberRequest {
    fn from(u: &MemberUpdate) -> Self {
        Self {
            authorized: u.authorized,
            active_bridge: u.active_bridge,
            ip_assignments: u.ip_assignments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NetworkConfigUpdate;

    #[test]
    fn remote_network_from_sparse_response() {
        let resp = NetworkResponse {
            id: "8056c2e21c000001".into(),
            name: "lab".into(),
            description: None,
            private: false,
            enable_broadcast: true,
            multicast_limit: 32,
            v4_assign_mode: V4AssignMode { zt: true },
            ip_assignment_pools: Vec::new(),
            routes: vec![ApiRoute {
                target: "10.147.17.0/24".into(),
                via: None,
            }],
            creation_time: Some(1_700_000_000_000),
            revision: Some(1),
        };

        let net = RemoteNetwork::from(resp);

        assert_eq!(net.description, "");
        assert!(!net.config.private);
        assert!(net.config.v4_auto_assign);
        assert_eq!(net.config.routes[0].target, "10.147.17.0/24");
        assert_eq!(
            net.created_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn update_request_only_carries_set_fields() {
        let update = NetworkUpdate {
            name: Some("renamed".into()),
            config: NetworkConfigUpdate {
                private: Some(true),
                ..NetworkConfigUpdate::default()
            },
            ..NetworkUpdate::default()
        };

        let req = NetworkRequest::from(&update);

        assert_eq!(req.name.as_deref(), Some("renamed"));
        assert_eq!(req.private, Some(true));
        assert!(req.routes.is_none());
        assert!(req.v4_assign_mode.is_none());
    }

    #[test]
    fn create_request_skips_empty_description() {
        let new = NewNetwork {
            name: "lab".into(),
            ..NewNetwork::default()
        };
        let req = NetworkRequest::from(&new);
        assert!(req.description.is_none());
        assert_eq!(req.private, Some(true));
    }
}
