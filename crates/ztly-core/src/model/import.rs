use serde::{Deserialize, Serialize};
use strum::Display;

use super::record::NetworkRecord;

/// Why a controller network can or cannot be imported by a requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportReason {
    #[strum(to_string = "untracked")]
    Untracked,
    #[strum(to_string = "unclaimed")]
    Unclaimed,
    #[strum(to_string = "already owned by you")]
    OwnedByRequester,
    #[strum(to_string = "owned by another user")]
    OwnedByOther,
}

impl ImportReason {
    /// Classify a controller network against its ledger row, if any.
    pub fn classify(record: Option<&NetworkRecord>, requester_id: &str) -> Self {
        match record {
            None => Self::Untracked,
            Some(r) if r.is_unclaimed() => Self::Unclaimed,
            Some(r) if r.is_owned_by(requester_id) => Self::OwnedByRequester,
            Some(_) => Self::OwnedByOther,
        }
    }

    pub fn is_importable(self) -> bool {
        matches!(self, Self::Untracked | Self::Unclaimed)
    }
}

/// A controller network viewed from one requester's import perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCandidate {
    pub network_id: String,
    pub reason: ImportReason,
    pub importable: bool,
}

impl ImportCandidate {
    pub fn new(network_id: impl Into<String>, reason: ImportReason) -> Self {
        Self {
            network_id: network_id.into(),
            reason,
            importable: reason.is_importable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_render_human_text() {
        assert_eq!(ImportReason::Untracked.to_string(), "untracked");
        assert_eq!(ImportReason::OwnedByRequester.to_string(), "already owned by you");
        assert_eq!(ImportReason::OwnedByOther.to_string(), "owned by another user");
    }

    #[test]
    fn classify_covers_every_state() {
        let mut record = NetworkRecord::new("8056c2e21c000001", "", "lab", "");
        assert_eq!(ImportReason::classify(None, "alice"), ImportReason::Untracked);
        assert_eq!(
            ImportReason::classify(Some(&record), "alice"),
            ImportReason::Unclaimed
        );

        record.owner_id = "alice".into();
        assert_eq!(
            ImportReason::classify(Some(&record), "alice"),
            ImportReason::OwnedByRequester
        );
        assert_eq!(
            ImportReason::classify(Some(&record), "bob"),
            ImportReason::OwnedByOther
        );
    }

    #[test]
    fn candidate_importable_matches_reason() {
        assert!(ImportCandidate::new("a", ImportReason::Unclaimed).importable);
        assert!(!ImportCandidate::new("a", ImportReason::OwnedByOther).importable);
    }
}
