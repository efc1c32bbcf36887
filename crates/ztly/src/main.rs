mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ztly_core::{ClientRegistry, FileOwnershipStore, HttpControllerClient, NetworkService};

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "ztly", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let ctx = build_context(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &ctx, &cli.global).await
        }
    }
}

/// Resolve config, register the controller client, and open the ledger.
fn build_context(global: &cli::GlobalOpts) -> Result<Context, CliError> {
    let cfg = config::load_config_or_default();
    let (profile_name, profile) = config::active_profile(global, &cfg)?;
    let controller_config = config::resolve_profile(&profile, &profile_name, &cfg, global)?;

    let client = HttpControllerClient::from_config(&controller_config)?;
    let registry = ClientRegistry::new();
    registry.set(Some(Arc::new(client)));

    tracing::debug!(
        profile = %profile_name,
        ledger = %controller_config.ledger_path.display(),
        "opening ownership ledger"
    );
    let store = Arc::new(FileOwnershipStore::new(&controller_config.ledger_path));
    let service = NetworkService::from_registry(&registry, None, store);

    Ok(Context {
        service,
        user: config::resolve_user(global, &profile, &cfg).ok(),
        profile: profile_name,
    })
}
