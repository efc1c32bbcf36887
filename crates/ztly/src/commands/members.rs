//! Member command handlers.

use tabled::Tabled;

use ztly_core::{Member, MemberUpdate};

use crate::cli::{GlobalOpts, MembersArgs, MembersCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Authorized")]
    authorized: &'static str,
    #[tabled(rename = "Bridge")]
    bridge: &'static str,
    #[tabled(rename = "IPs")]
    ips: String,
}

impl From<&Member> for MemberRow {
    fn from(m: &Member) -> Self {
        Self {
            node: m.node_id.clone(),
            authorized: util::yes_no(m.authorized),
            bridge: util::yes_no(m.active_bridge),
            ips: join_ips(m),
        }
    }
}

fn join_ips(m: &Member) -> String {
    m.ip_assignments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn detail(m: &Member) -> String {
    let mut lines = vec![
        format!("Node:       {}", m.node_id),
        format!("Network:    {}", m.network_id),
        format!("Authorized: {}", util::yes_no(m.authorized)),
        format!("Bridge:     {}", util::yes_no(m.active_bridge)),
        format!("IPs:        {}", join_ips(m)),
    ];
    if let Some(rev) = m.revision {
        lines.push(format!("Revision:   {rev}"));
    }
    lines.join("\n")
}

fn member_not_found(network: &str, node: &str) -> CliError {
    CliError::NotFound {
        resource_type: "member".into(),
        identifier: node.into(),
        list_command: format!("members list {network}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: MembersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let user = ctx.user()?;

    let (network, node, update) = match args.command {
        MembersCommand::List { network } => {
            let members = ctx.service.list_members(&network, user).await?;
            let out = output::render_list(
                &global.output,
                &members,
                |m| MemberRow::from(m),
                |m| m.node_id.clone(),
            );
            output::print_output(&out, global.quiet);
            return Ok(());
        }

        MembersCommand::Get { network, node } => {
            let member = ctx
                .service
                .get_member(&network, &node, user)
                .await?
                .ok_or_else(|| member_not_found(&network, &node))?;
            let out = output::render_single(&global.output, &member, detail, |m| {
                m.node_id.clone()
            });
            output::print_output(&out, global.quiet);
            return Ok(());
        }

        MembersCommand::Remove { network, node } => {
            if !util::confirm(
                &format!("Remove member {node} from network {network}?"),
                "members remove",
                global.yes,
            )? {
                return Ok(());
            }
            ctx.service.remove_member(&network, &node, user).await?;
            output::notice(&format!("Member {node} removed"), global.quiet);
            return Ok(());
        }

        MembersCommand::Update {
            network,
            node,
            authorized,
            bridge,
            ips,
        } => {
            let update = MemberUpdate {
                authorized,
                active_bridge: bridge,
                ip_assignments: (!ips.is_empty()).then_some(ips),
            };
            if update == MemberUpdate::default() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --authorized, --bridge, or --ip".into(),
                });
            }
            (network, node, update)
        }

        MembersCommand::Authorize { network, node } => (network, node, MemberUpdate {
            authorized: Some(true),
            ..MemberUpdate::default()
        }),

        MembersCommand::Deauthorize { network, node } => (network, node, MemberUpdate {
            authorized: Some(false),
            ..MemberUpdate::default()
        }),
    };

    let member = ctx
        .service
        .update_member(&network, &node, &update, user)
        .await?;
    let out = output::render_single(&global.output, &member, detail, |m| m.node_id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
