//! CLI configuration -- thin wrapper around `ztly_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--controller, --token, --user, --ledger, ...).

use std::time::Duration;

use secrecy::SecretString;

use ztly_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ztly_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// The profile to resolve against. An explicitly requested profile must
/// exist; the implicit default may be absent.
pub fn active_profile(
    global: &GlobalOpts,
    config: &Config,
) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profile(&name) {
        Ok(profile) => Ok((name, profile)),
        Err(_) if global.profile.is_none() => Ok((name, Profile::default())),
        Err(_) => {
            let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            })
        }
    }
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    config: &Config,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    // 1. Controller URL (flag > env > profile)
    let url_str = global.controller.as_deref().unwrap_or(&profile.controller);
    let url = ztly_config::parse_controller_url(url_str)?;

    // 2. Auth token (flag > env > profile chain)
    let auth_token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => ztly_config::resolve_auth_token(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(config.defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(config.defaults.timeout),
    );

    // 5. Ledger (flag > profile > per-profile data dir)
    let ledger_path = global
        .ledger
        .clone()
        .or_else(|| profile.ledger.clone())
        .unwrap_or_else(|| ztly_config::default_ledger_path(profile_name));

    Ok(ControllerConfig {
        url,
        auth_token,
        tls,
        timeout,
        ledger_path,
    })
}

/// Requester identity: `--user` > profile `user` > `defaults.user`.
pub fn resolve_user(
    global: &GlobalOpts,
    profile: &Profile,
    config: &Config,
) -> Result<String, CliError> {
    global
        .user
        .clone()
        .or_else(|| profile.user.clone())
        .or_else(|| config.defaults.user.clone())
        .filter(|u| !u.trim().is_empty())
        .ok_or(CliError::NoIdentity)
}
