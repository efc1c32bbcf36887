//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::net::IpAddr;
use std::path::Path;

use serde::de::DeserializeOwned;

use ztly_core::{IpAssignmentPool, Route};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, refuses instead of hanging.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Parse `START-END` into an assignment pool.
pub fn parse_pool(raw: &str) -> Result<IpAssignmentPool, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: "pool".into(),
        reason,
    };
    let (start, end) = raw
        .split_once('-')
        .ok_or_else(|| invalid(format!("expected START-END, got '{raw}'")))?;
    let start: IpAddr = start
        .trim()
        .parse()
        .map_err(|_| invalid(format!("bad start address '{start}'")))?;
    let end: IpAddr = end
        .trim()
        .parse()
        .map_err(|_| invalid(format!("bad end address '{end}'")))?;
    if start.is_ipv4() != end.is_ipv4() {
        return Err(invalid(format!("'{raw}' mixes IPv4 and IPv6")));
    }
    if start > end {
        return Err(invalid(format!("start is after end in '{raw}'")));
    }
    Ok(IpAssignmentPool { start, end })
}

/// Parse `TARGET` or `TARGET@VIA` into a managed route.
pub fn parse_route(raw: &str) -> Result<Route, CliError> {
    let (target, via) = match raw.split_once('@') {
        Some((target, via)) => (target, Some(via)),
        None => (raw, None),
    };
    if !target.contains('/') {
        return Err(CliError::Validation {
            field: "route".into(),
            reason: format!("target '{target}' must be in CIDR form"),
        });
    }
    if let Some(via) = via {
        via.parse::<IpAddr>().map_err(|_| CliError::Validation {
            field: "route".into(),
            reason: format!("bad gateway address '{via}'"),
        })?;
    }
    Ok(Route {
        target: target.to_owned(),
        via: via.map(str::to_owned),
    })
}

pub fn parse_all<T>(
    raw: &[String],
    parse: impl Fn(&str) -> Result<T, CliError>,
) -> Result<Vec<T>, CliError> {
    raw.iter().map(|r| parse(r)).collect()
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pool_parses_range() {
        let pool = parse_pool("10.147.17.1-10.147.17.254").unwrap();
        assert_eq!(pool.start.to_string(), "10.147.17.1");
        assert_eq!(pool.end.to_string(), "10.147.17.254");
    }

    #[test]
    fn pool_rejects_inverted_or_mixed() {
        assert!(parse_pool("10.0.0.9-10.0.0.1").is_err());
        assert!(parse_pool("10.0.0.1-fd00::1").is_err());
        assert!(parse_pool("10.0.0.1").is_err());
    }

    #[test]
    fn route_with_and_without_gateway() {
        let direct = parse_route("10.147.17.0/24").unwrap();
        assert_eq!(direct.via, None);

        let via = parse_route("0.0.0.0/0@10.147.17.1").unwrap();
        assert_eq!(via.target, "0.0.0.0/0");
        assert_eq!(via.via.as_deref(), Some("10.147.17.1"));

        assert!(parse_route("10.0.0.1").is_err());
        assert!(parse_route("10.0.0.0/8@gateway").is_err());
    }
}
