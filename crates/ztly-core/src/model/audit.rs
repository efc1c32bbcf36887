use serde::{Deserialize, Serialize};

use super::record::NetworkRecord;

/// Ledger and controller disagreeing on a network's name or description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDrift {
    pub id: String,
    pub ledger_name: String,
    pub remote_name: String,
    pub ledger_description: String,
    pub remote_description: String,
}

/// Differences between the controller and the ownership ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Ledger rows whose network the controller no longer has.
    pub orphaned: Vec<NetworkRecord>,
    /// Controller networks without a ledger row.
    pub untracked: Vec<String>,
    /// Ledger rows with no owner.
    pub unclaimed: Vec<String>,
    pub metadata_drift: Vec<MetadataDrift>,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned.is_empty()
            && self.untracked.is_empty()
            && self.unclaimed.is_empty()
            && self.metadata_drift.is_empty()
    }
}
