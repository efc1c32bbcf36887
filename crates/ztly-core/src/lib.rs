//! Ownership and access-control layer between `ztly-api` and its callers.
//!
//! The controller has no notion of who owns a network. This crate keeps a
//! local ownership ledger next to it and makes the two agree:
//!
//! - **[`NetworkService`]**: every operation takes a requester identity,
//!   authorizes against the ledger, talks to the controller, then brings
//!   the ledger in line with the outcome. A failed ledger write after a
//!   remote create triggers a compensating remote delete.
//!
//! - **[`ControllerClient`]** / **[`OwnershipStore`]**: the two seams the
//!   service consumes. [`HttpControllerClient`] adapts
//!   [`ztly_api::ControllerApi`]; [`MemoryOwnershipStore`] and
//!   [`FileOwnershipStore`] hold the ledger.
//!
//! - **[`ClientRegistry`]**: replaceable handle to the active controller
//!   client, consulted when a service is built without an explicit one.
//!
//! - **Domain model** ([`model`]): [`RemoteNetwork`], [`Member`],
//!   [`NetworkRecord`], [`ImportCandidate`], and the [`DriftReport`]
//!   produced by the reconciliation audit.

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod registry;
pub mod service;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::{ControllerClient, HttpControllerClient};
pub use config::{ControllerConfig, TlsVerification};
pub use error::CoreError;
pub use registry::ClientRegistry;
pub use service::NetworkService;
pub use store::{FileOwnershipStore, MemoryOwnershipStore, OwnershipStore, StoreError};

pub use model::{
    ControllerStatus, DriftReport, ImportCandidate, ImportReason, IpAssignmentPool, Member,
    MemberUpdate, MetadataDrift, NetworkConfig, NetworkConfigUpdate, NetworkRecord, NetworkUpdate,
    NewNetwork, OwnedNetwork, OwnershipState, RemoteNetwork, Route,
};
