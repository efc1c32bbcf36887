//! Config subcommand handlers.

use std::fmt::Write as _;
use std::path::PathBuf;

use dialoguer::{Input, Password, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// A copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.auth_token.is_some() {
            profile.auth_token = Some(MASK.into());
        }
    }
    cfg
}

/// Format config as TOML-like text for display. Expects a redacted config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    if let Some(ref user) = cfg.defaults.user {
        let _ = writeln!(out, "user = \"{user}\"");
    }

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "controller = \"{}\"", p.controller);
        if let Some(ref user) = p.user {
            let _ = writeln!(out, "user = \"{user}\"");
        }
        if let Some(ref token) = p.auth_token {
            let _ = writeln!(out, "auth_token = \"{token}\"");
        }
        if let Some(ref env) = p.auth_token_env {
            let _ = writeln!(out, "auth_token_env = \"{env}\"");
        }
        if let Some(ref file) = p.auth_token_file {
            let _ = writeln!(out, "auth_token_file = \"{}\"", file.display());
        }
        if let Some(ref ledger) = p.ledger {
            let _ = writeln!(out, "ledger = \"{}\"", ledger.display());
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<String, CliError> {
    let token = Password::new()
        .with_prompt("Auth token")
        .interact()
        .map_err(prompt_err)?;
    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "auth_token".into(),
            reason: "auth token cannot be empty".into(),
        });
    }
    Ok(token)
}

/// Ask where the token should come from and fill in the profile.
fn prompt_token_source(profile: &mut Profile, profile_name: &str) -> Result<(), CliError> {
    let choices = &[
        "Read the node's authtoken.secret file (recommended on the controller host)",
        "Store a token in the system keyring",
        "Save a token to the config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where should the auth token come from?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    match selection {
        0 => {
            let path: String = Input::new()
                .with_prompt("Token file")
                .default("/var/lib/zerotier-one/authtoken.secret".into())
                .interact_text()
                .map_err(prompt_err)?;
            profile.auth_token_file = Some(PathBuf::from(path));
        }
        1 => {
            let token = prompt_token()?;
            ztly_config::store_auth_token(profile_name, &token)?;
            eprintln!("   ✓ Auth token stored in system keyring");
        }
        _ => profile.auth_token = Some(prompt_token()?),
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("ztly configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let controller: String = Input::new()
                .with_prompt("Controller URL")
                .default(ztly_config::DEFAULT_CONTROLLER.into())
                .interact_text()
                .map_err(prompt_err)?;
            ztly_config::parse_controller_url(&controller)?;

            let user: String = Input::new()
                .with_prompt("Your user name (network owner identity)")
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                controller,
                user: Some(user).filter(|u| !u.trim().is_empty()),
                ..Profile::default()
            };
            prompt_token_source(&mut profile, &profile_name)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let written = config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", written.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!(
                "  Ledger: {}",
                ztly_config::default_ledger_path(&profile_name).display()
            );
            eprintln!("\n  Test it: ztly status");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            let token = prompt_token()?;
            ztly_config::store_auth_token(&profile_name, &token)?;
            eprintln!("✓ Auth token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                auth_token: Some("super-secret".into()),
                user: Some("alice".into()),
                ..Profile::default()
            },
        );

        let text = format_config(&redacted(&cfg));

        assert!(!text.contains("super-secret"));
        assert!(text.contains("auth_token = \"****\""));
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("user = \"alice\""));
    }
}
