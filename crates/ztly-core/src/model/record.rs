// ── Ownership ledger types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::network::RemoteNetwork;

/// One ledger row: who owns a controller network.
///
/// `id` is the controller's network ID. `name` and `description` are
/// best-effort copies of the controller's values. An empty `owner_id`
/// means the network is tracked but unclaimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NetworkRecord {
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            owner_id: owner_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_unclaimed(&self) -> bool {
        self.owner_id.is_empty()
    }

    /// An empty requester never owns anything, even an unclaimed row.
    pub fn is_owned_by(&self, requester_id: &str) -> bool {
        !requester_id.is_empty() && self.owner_id == requester_id
    }

    /// Bump `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Ownership status of a controller network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "owner", rename_all = "snake_case")]
pub enum OwnershipState {
    /// No ledger row.
    Untracked,
    /// Ledger row with an empty owner.
    Unclaimed,
    Owned(String),
}

impl OwnershipState {
    pub fn of(record: Option<&NetworkRecord>) -> Self {
        match record {
            None => Self::Untracked,
            Some(r) if r.is_unclaimed() => Self::Unclaimed,
            Some(r) => Self::Owned(r.owner_id.clone()),
        }
    }
}

/// A ledger row joined with the controller's live view of the network.
///
/// `remote` is `None` when the ledger points at a network the controller
/// no longer has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedNetwork {
    pub record: NetworkRecord,
    pub remote: Option<RemoteNetwork>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_follows_owner_field() {
        let mut record = NetworkRecord::new("8056c2e21c000001", "", "lab", "");
        assert_eq!(OwnershipState::of(None), OwnershipState::Untracked);
        assert_eq!(OwnershipState::of(Some(&record)), OwnershipState::Unclaimed);

        record.owner_id = "alice".into();
        assert_eq!(
            OwnershipState::of(Some(&record)),
            OwnershipState::Owned("alice".into())
        );
    }

    #[test]
    fn empty_requester_owns_nothing() {
        let record = NetworkRecord::new("8056c2e21c000001", "", "lab", "");
        assert!(record.is_unclaimed());
        assert!(!record.is_owned_by(""));
    }
}
