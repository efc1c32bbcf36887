//! Shared configuration for the ztly CLI.
//!
//! TOML profiles, auth token resolution (env + keyring + plaintext +
//! `authtoken.secret`), ledger location, and translation to
//! `ztly_core::ControllerConfig`. The CLI layers its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use ztly_core::{ControllerConfig, TlsVerification};

/// Keyring service name; entries are keyed `<profile>/auth-token`.
pub const KEYRING_SERVICE: &str = "ztly";

/// Local controller API address used when a profile names none.
pub const DEFAULT_CONTROLLER: &str = "http://127.0.0.1:9993";

/// Where a ZeroTier node keeps its local API token, per platform.
const AUTHTOKEN_LOCATIONS: &[&str] = &[
    "/var/lib/zerotier-one/authtoken.secret",
    "/Library/Application Support/ZeroTier/One/authtoken.secret",
    "C:\\ProgramData\\ZeroTier\\One\\authtoken.secret",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no auth token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Requester identity used when `--user` is not given.
    pub user: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            user: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_controller() -> String {
    DEFAULT_CONTROLLER.into()
}

/// A named controller profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller API base URL (e.g., "http://127.0.0.1:9993").
    #[serde(default = "default_controller")]
    pub controller: String,

    /// Auth token (plaintext; prefer keyring, env var, or token file).
    pub auth_token: Option<String>,

    /// Environment variable name containing the auth token.
    pub auth_token_env: Option<String>,

    /// File holding the auth token, e.g. the node's `authtoken.secret`.
    pub auth_token_file: Option<PathBuf>,

    /// Ownership ledger file. Defaults to `<data dir>/<profile>/ledger.json`.
    pub ledger: Option<PathBuf>,

    /// Requester identity for this profile.
    pub user: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            controller: default_controller(),
            auth_token: None,
            auth_token_env: None,
            auth_token_file: None,
            ledger: None,
            user: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

impl Config {
    /// Name of the profile to use: `requested`, else `default_profile`,
    /// else `"default"`.
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile. The implicit `"default"` profile resolves to
    /// [`Profile::default`] when the file does not define it.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ztly", "ztly")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default ledger file for a profile.
pub fn default_ledger_path(profile_name: &str) -> PathBuf {
    let base = project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    );
    base.join(profile_name).join("ledger.json")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("ztly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + `ZTLY_` environment variables.
///
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ZTLY_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the controller auth token from the credential chain
/// (no CLI flag step).
///
/// Order: `auth_token_env`, keyring, plaintext `auth_token`,
/// `auth_token_file`, then the node's well-known `authtoken.secret`.
pub fn resolve_auth_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's auth_token_env → env var lookup
    if let Some(ref env_name) = profile.auth_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/auth-token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.auth_token {
        return Ok(SecretString::from(token.clone()));
    }

    // 4. Token file named by the profile; a missing file is an error here
    if let Some(ref path) = profile.auth_token_file {
        return read_token_file(path);
    }

    // 5. Well-known node locations
    for candidate in AUTHTOKEN_LOCATIONS {
        let path = Path::new(candidate);
        if path.is_file() {
            if let Ok(token) = read_token_file(path) {
                debug!(path = %path.display(), "using node auth token file");
                return Ok(token);
            }
        }
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Read a token file, trimming surrounding whitespace.
pub fn read_token_file(path: &Path) -> Result<SecretString, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let token = raw.trim();
    if token.is_empty() {
        return Err(ConfigError::Validation {
            field: "auth_token_file".into(),
            reason: format!("{} is empty", path.display()),
        });
    }
    Ok(SecretString::from(token.to_owned()))
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_auth_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/auth-token"))
        .and_then(|entry| entry.set_password(token))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// Build a `ControllerConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let url = parse_controller_url(&profile.controller)?;
    let auth_token = resolve_auth_token(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let ledger_path = profile
        .ledger
        .clone()
        .unwrap_or_else(|| default_ledger_path(profile_name));

    Ok(ControllerConfig {
        url,
        auth_token,
        tls,
        timeout,
        ledger_path,
    })
}

/// Parse and check a controller base URL.
pub fn parse_controller_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "controller".into(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}
