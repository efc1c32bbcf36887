// ── Core error types ──
//
// Errors surfaced by the reconciliation service. Controller failures keep
// their `ztly_api::Error` as the source and ledger failures keep their
// `StoreError`, each tagged with the operation and network involved.

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup ────────────────────────────────────────────────────────
    #[error("{component} is not initialized")]
    NotInitialized { component: &'static str },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Access ───────────────────────────────────────────────────────
    #[error("A requester identity is required for {operation}")]
    MissingIdentity { operation: &'static str },

    #[error("Network not found: {id}")]
    NotFound { id: String },

    #[error("Not authorized to manage network {id}")]
    Unauthorized { id: String },

    // ── Backends ─────────────────────────────────────────────────────
    #[error("Controller request failed during {operation}{}: {source}", fmt_id(.id.as_deref()))]
    Upstream {
        operation: &'static str,
        id: Option<String>,
        #[source]
        source: ztly_api::Error,
    },

    #[error("Ownership ledger failed during {operation}{}: {source}", fmt_id(.id.as_deref()))]
    Persistence {
        operation: &'static str,
        id: Option<String>,
        #[source]
        source: StoreError,
    },
}

fn fmt_id(id: Option<&str>) -> String {
    id.map(|id| format!(" of {id}")).unwrap_or_default()
}

impl CoreError {
    pub(crate) fn upstream(operation: &'static str, id: Option<&str>, source: ztly_api::Error) -> Self {
        Self::Upstream {
            operation,
            id: id.map(str::to_owned),
            source,
        }
    }

    pub(crate) fn persistence(operation: &'static str, id: Option<&str>, source: StoreError) -> Self {
        Self::Persistence {
            operation,
            id: id.map(str::to_owned),
            source,
        }
    }

    /// Returns `true` for access failures (missing or foreign network).
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Unauthorized { .. })
    }

    /// The controller error behind an `Upstream` failure.
    pub fn upstream_source(&self) -> Option<&ztly_api::Error> {
        match self {
            Self::Upstream { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_names_operation_and_id() {
        let err = CoreError::upstream(
            "delete network",
            Some("8056c2e21c000001"),
            ztly_api::Error::Controller {
                status: 500,
                message: "boom".into(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("delete network of 8056c2e21c000001"), "{msg}");
        assert!(msg.contains("boom"), "{msg}");
    }

    #[test]
    fn persistence_without_id() {
        let err = CoreError::persistence("list networks", None, StoreError::Corrupt {
            message: "bad json".into(),
        });
        assert_eq!(
            err.to_string(),
            "Ownership ledger failed during list networks: Ledger file is corrupt: bad json"
        );
    }
}
