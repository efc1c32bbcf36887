//! Import command handlers.

use tabled::Tabled;

use ztly_core::ImportCandidate;

use crate::cli::{GlobalOpts, ImportArgs, ImportCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Importable")]
    importable: &'static str,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&ImportCandidate> for CandidateRow {
    fn from(c: &ImportCandidate) -> Self {
        Self {
            id: c.network_id.clone(),
            importable: util::yes_no(c.importable),
            reason: c.reason.to_string(),
        }
    }
}

pub async fn handle(ctx: &Context, args: ImportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let user = ctx.user()?;

    match args.command {
        ImportCommand::Candidates { all } => {
            let mut candidates = ctx.service.importable_networks(user).await?;
            if !all {
                candidates.retain(|c| c.importable);
            }
            let out = output::render_list(
                &global.output,
                &candidates,
                |c| CandidateRow::from(c),
                |c| c.network_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ImportCommand::Claim {
            ids,
            all_importable,
        } => {
            let ids = if all_importable {
                ctx.service
                    .importable_networks(user)
                    .await?
                    .into_iter()
                    .filter(|c| c.importable)
                    .map(|c| c.network_id)
                    .collect()
            } else {
                ids
            };

            let claimed = ctx.service.import_networks(&ids, user).await?;
            let out = output::render_list(
                &global.output,
                &claimed,
                |id| ClaimedRow { id: id.clone() },
                String::clone,
            );
            output::print_output(&out, global.quiet);

            let skipped = ids.len().saturating_sub(claimed.len());
            output::notice(
                &format!("Claimed {} network(s), skipped {skipped}", claimed.len()),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[derive(Tabled)]
struct ClaimedRow {
    #[tabled(rename = "Claimed")]
    id: String,
}
