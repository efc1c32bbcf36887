// ── Ownership ledger storage ──
//
// The ledger maps controller network IDs to their owners. The service only
// sees the `OwnershipStore` trait; the memory store backs tests and
// embedding, the file store backs the CLI.

mod file;
mod memory;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::NetworkRecord;

pub use file::FileOwnershipStore;
pub use memory::MemoryOwnershipStore;

/// Failures reported by an [`OwnershipStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network {id} is already tracked")]
    Conflict { id: String },

    #[error("Network {id} is not tracked")]
    NotFound { id: String },

    #[error("Ledger I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ledger file is corrupt: {message}")]
    Corrupt { message: String },

    #[error("Ledger backend unavailable: {message}")]
    Unavailable { message: String },
}

/// CRUD over ledger rows, keyed by controller network ID.
///
/// Implementations must be safe for concurrent use and keep at most one
/// row per ID.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    async fn get_network(&self, id: &str) -> Result<Option<NetworkRecord>, StoreError>;

    /// Rows owned by `owner_id`, ordered by ID.
    async fn networks_by_owner(&self, owner_id: &str) -> Result<Vec<NetworkRecord>, StoreError>;

    /// Every row, ordered by ID.
    async fn all_networks(&self) -> Result<Vec<NetworkRecord>, StoreError>;

    /// Insert a new row. Fails with [`StoreError::Conflict`] if the ID exists.
    async fn create_network(&self, record: NetworkRecord) -> Result<(), StoreError>;

    /// Replace an existing row. Fails with [`StoreError::NotFound`] if absent.
    async fn update_network(&self, record: NetworkRecord) -> Result<(), StoreError>;

    /// Remove a row. Removing an absent row succeeds.
    async fn delete_network(&self, id: &str) -> Result<(), StoreError>;
}
