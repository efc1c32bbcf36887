//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ztly_config::ConfigError;
use ztly_core::{CoreError, StoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the controller during {operation}")]
    #[diagnostic(
        code(ztly::connection_failed),
        help(
            "Check that zerotier-one is running and its local API is reachable.\n\
             Try: ztly status --controller http://127.0.0.1:9993"
        )
    )]
    ConnectionFailed {
        operation: String,
        #[source]
        source: ztly_api::Error,
    },

    #[error("TLS error talking to the controller: {message}")]
    #[diagnostic(
        code(ztly::tls_error),
        help(
            "Use --insecure (-k) to accept a self-signed certificate,\n\
             or configure ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    #[error("Controller client is not configured")]
    #[diagnostic(
        code(ztly::not_connected),
        help("Set a controller URL with --controller or in your profile: ztly config init")
    )]
    NotConnected,

    // ── Authentication ───────────────────────────────────────────────
    #[error("The controller rejected the auth token")]
    #[diagnostic(
        code(ztly::auth_failed),
        help(
            "The token is the contents of the node's authtoken.secret.\n\
             Run: ztly config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No auth token configured for profile '{profile}'")]
    #[diagnostic(
        code(ztly::no_credentials),
        help(
            "Configure one with: ztly config init\n\
             Or set ZTLY_TOKEN, or point auth_token_file at authtoken.secret."
        )
    )]
    NoCredentials { profile: String },

    #[error("No user identity given")]
    #[diagnostic(
        code(ztly::no_identity),
        help("Pass --user <name>, set ZTLY_USER, or set `user` in your profile.")
    )]
    NoIdentity,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(ztly::not_found),
        help("Run: ztly {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Network '{identifier}' belongs to another user")]
    #[diagnostic(
        code(ztly::permission_denied),
        help("Only the owning user can change a network or its members.")
    )]
    PermissionDenied { identifier: String },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(ztly::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── Backends ─────────────────────────────────────────────────────
    #[error("Controller error during {operation}: {source}")]
    #[diagnostic(code(ztly::api_error))]
    ApiError {
        operation: String,
        #[source]
        source: ztly_api::Error,
    },

    #[error("Ownership ledger error: {message}")]
    #[diagnostic(
        code(ztly::ledger),
        help("Check the ledger path (--ledger) and its permissions.")
    )]
    Ledger { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ztly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ztly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ztly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(ztly::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ztly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Controller request timed out during {operation}")]
    #[diagnostic(
        code(ztly::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { operation: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(ztly::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } | Self::NotConnected => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NoIdentity
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to errors whose help text names it.
    #[must_use]
    pub fn for_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { profile } if profile.is_empty() => Self::AuthFailed {
                profile: name.to_owned(),
            },
            other => other,
        }
    }

    pub fn network_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "network".into(),
            identifier: id.into(),
            list_command: "networks list".into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotInitialized { .. } => CliError::NotConnected,

            CoreError::Config { message } => CliError::Validation {
                field: "controller".into(),
                reason: message,
            },

            CoreError::MissingIdentity { .. } => CliError::NoIdentity,

            CoreError::NotFound { id } => CliError::network_not_found(id),

            CoreError::Unauthorized { id } => CliError::PermissionDenied { identifier: id },

            CoreError::Upstream {
                operation, source, ..
            } => from_api_error(operation, source),

            CoreError::Persistence { source, .. } => match source {
                StoreError::Conflict { id } => CliError::Conflict {
                    resource_type: "network".into(),
                    identifier: id,
                },
                other => CliError::Ledger {
                    message: other.to_string(),
                },
            },
        }
    }
}

fn from_api_error(operation: &str, source: ztly_api::Error) -> CliError {
    let operation = operation.to_owned();
    if source.is_timeout() {
        return CliError::Timeout { operation };
    }
    if source.is_connect() {
        return CliError::ConnectionFailed { operation, source };
    }
    match source {
        ztly_api::Error::InvalidAuthToken | ztly_api::Error::Authentication { .. } => {
            CliError::AuthFailed {
                profile: String::new(),
            }
        }
        ztly_api::Error::Tls(message) => CliError::TlsError { message },
        ztly_api::Error::InvalidId { id } => CliError::Validation {
            field: "id".into(),
            reason: format!("{id:?} is not a valid controller identifier"),
        },
        other => CliError::ApiError {
            operation,
            source: other,
        },
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "see `ztly config show`".into(),
            },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
