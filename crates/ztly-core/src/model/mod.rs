// ── Domain model ──
//
// Controller-side types (`RemoteNetwork`, `Member`) are converted from
// `ztly_api::types` in `convert.rs`. Ledger-side types (`NetworkRecord`)
// are persisted by an `OwnershipStore`. Import and audit types are derived
// by diffing the two and are never persisted.

pub mod audit;
pub mod import;
pub mod member;
pub mod network;
pub mod record;

pub use audit::{DriftReport, MetadataDrift};
pub use import::{ImportCandidate, ImportReason};
pub use member::{Member, MemberUpdate};
pub use network::{
    ControllerStatus, IpAssignmentPool, NetworkConfig, NetworkConfigUpdate, NetworkUpdate,
    NewNetwork, RemoteNetwork, Route,
};
pub use record::{NetworkRecord, OwnedNetwork, OwnershipState};
