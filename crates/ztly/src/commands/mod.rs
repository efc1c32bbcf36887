//! Command dispatch: bridges CLI args -> `NetworkService` -> output formatting.

pub mod audit;
pub mod config_cmd;
pub mod import;
pub mod members;
pub mod networks;
pub mod status;
pub mod util;

use ztly_core::NetworkService;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Everything a controller-bound command needs.
pub struct Context {
    pub service: NetworkService,
    /// Name of the profile the controller settings came from.
    pub profile: String,
    /// Requester identity, if one was configured.
    pub user: Option<String>,
}

impl Context {
    /// The requester identity, required by owner-scoped commands.
    pub fn user(&self) -> Result<&str, CliError> {
        self.user.as_deref().ok_or(CliError::NoIdentity)
    }
}

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let result = match cmd {
        Command::Status => status::handle(ctx, global).await,
        Command::Networks(args) => networks::handle(ctx, args, global).await,
        Command::Members(args) => members::handle(ctx, args, global).await,
        Command::Import(args) => import::handle(ctx, args, global).await,
        Command::Audit => audit::handle(ctx, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled before dispatch".into(),
        }),
    };
    result.map_err(|e| e.for_profile(&ctx.profile))
}
