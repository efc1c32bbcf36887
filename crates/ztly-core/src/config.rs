// ── Runtime connection configuration ──
//
// These types describe *how* to reach a controller and where the ledger
// lives. They carry credential data and connection tuning, but never
// touch disk. The CLI constructs a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use ztly_api::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). The controller usually listens on
    /// plain HTTP on loopback, where this has no effect.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs on a TLS-terminating proxy).
    DangerAcceptInvalid,
}

/// Configuration for one controller plus its ownership ledger.
///
/// Built by the CLI, passed to [`HttpControllerClient`](crate::HttpControllerClient)
/// and [`FileOwnershipStore`](crate::FileOwnershipStore) -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller service URL (e.g., `http://127.0.0.1:9993`).
    pub url: Url,
    /// Value sent in the `X-ZT1-Auth` header.
    pub auth_token: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Ownership ledger file.
    pub ledger_path: PathBuf,
}

impl ControllerConfig {
    /// Transport settings for the API client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
