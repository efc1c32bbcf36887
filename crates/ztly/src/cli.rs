//! Clap derive structures for the `ztly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ztly -- owner-scoped network management for ZeroTier controllers
#[derive(Debug, Parser)]
#[command(
    name = "ztly",
    version,
    about = "Manage ZeroTier controller networks with per-user ownership",
    long_about = "Manage networks on a self-hosted ZeroTier controller.\n\n\
        A local ownership ledger records which user owns each network;\n\
        every command acts as the user given by --user, and networks are\n\
        always kept private on the controller.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "ZTLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller API URL (overrides profile)
    #[arg(long, short = 'c', env = "ZTLY_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Controller auth token (X-ZT1-Auth)
    #[arg(long, env = "ZTLY_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// User to act as (network owner identity)
    #[arg(long, short = 'u', env = "ZTLY_USER", global = true)]
    pub user: Option<String>,

    /// Ownership ledger file (overrides profile)
    #[arg(long, env = "ZTLY_LEDGER", global = true)]
    pub ledger: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ZTLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ZTLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ZTLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show controller address, version, and health
    Status,

    /// Manage your networks
    #[command(alias = "net", alias = "n")]
    Networks(NetworksArgs),

    /// Manage members of your networks
    #[command(alias = "mem", alias = "m")]
    Members(MembersArgs),

    /// Claim existing controller networks
    Import(ImportArgs),

    /// Compare the controller with the ownership ledger
    Audit,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NETWORKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List networks you own
    #[command(alias = "ls")]
    List {
        /// Join each network with the controller's live view
        #[arg(long, short = 'd')]
        detailed: bool,
    },

    /// Get network details
    Get {
        /// Network ID (16 hex digits)
        id: String,
    },

    /// Create a new private network
    Create {
        /// Network name
        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,

        /// IP assignment pool as START-END (repeatable)
        #[arg(long = "pool")]
        pools: Vec<String>,

        /// Managed route as TARGET or TARGET@VIA (repeatable)
        #[arg(long = "route")]
        routes: Vec<String>,

        /// Multicast recipient limit
        #[arg(long)]
        multicast_limit: Option<u32>,

        /// Disable broadcast (ff:ff:ff:ff:ff:ff)
        #[arg(long)]
        no_broadcast: bool,

        /// Create from JSON file (overrides individual flags)
        #[arg(long, short = 'F', conflicts_with_all = &["name", "description"])]
        from_file: Option<PathBuf>,
    },

    /// Update a network you own
    Update {
        /// Network ID (16 hex digits)
        id: String,

        /// Load full update payload from JSON file
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,

        /// Network name
        #[arg(long)]
        name: Option<String>,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,

        /// Replace IP assignment pools (START-END, repeatable)
        #[arg(long = "pool")]
        pools: Vec<String>,

        /// Replace managed routes (TARGET or TARGET@VIA, repeatable)
        #[arg(long = "route")]
        routes: Vec<String>,

        /// Multicast recipient limit
        #[arg(long)]
        multicast_limit: Option<u32>,

        /// Enable/disable broadcast
        #[arg(long, action = clap::ArgAction::Set)]
        broadcast: Option<bool>,
    },

    /// Delete a network you own
    Delete {
        /// Network ID (16 hex digits)
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MEMBERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MembersArgs {
    #[command(subcommand)]
    pub command: MembersCommand,
}

#[derive(Debug, Subcommand)]
pub enum MembersCommand {
    /// List members of a network
    #[command(alias = "ls")]
    List {
        /// Network ID
        network: String,
    },

    /// Get member details
    Get {
        /// Network ID
        network: String,
        /// Member node ID (10 hex digits)
        node: String,
    },

    /// Update a member
    Update {
        /// Network ID
        network: String,
        /// Member node ID
        node: String,

        /// Authorize or deauthorize the member
        #[arg(long, action = clap::ArgAction::Set)]
        authorized: Option<bool>,

        /// Allow the member to bridge other traffic
        #[arg(long, action = clap::ArgAction::Set)]
        bridge: Option<bool>,

        /// Replace assigned IP addresses (repeatable)
        #[arg(long = "ip")]
        ips: Vec<IpAddr>,
    },

    /// Shortcut for `update --authorized true`
    Authorize {
        network: String,
        node: String,
    },

    /// Shortcut for `update --authorized false`
    Deauthorize {
        network: String,
        node: String,
    },

    /// Remove a member from a network
    #[command(alias = "rm")]
    Remove {
        network: String,
        node: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IMPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[command(subcommand)]
    pub command: ImportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Show controller networks and whether you can claim them
    #[command(alias = "ls")]
    Candidates {
        /// Include networks that cannot be imported
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Claim untracked or unclaimed networks
    Claim {
        /// Network IDs to claim
        #[arg(required_unless_present = "all_importable")]
        ids: Vec<String>,

        /// Claim every importable network
        #[arg(long, conflicts_with = "ids")]
        all_importable: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file location
    Path,

    /// Store the controller auth token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
