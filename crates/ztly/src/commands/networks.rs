//! Network command handlers.

use tabled::Tabled;

use ztly_core::{
    NetworkConfig, NetworkConfigUpdate, NetworkRecord, NetworkUpdate, NewNetwork, OwnedNetwork,
    RemoteNetwork,
};

use crate::cli::{GlobalOpts, NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&NetworkRecord> for NetworkRow {
    fn from(r: &NetworkRecord) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            description: r.description.clone(),
            created: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Tabled)]
struct DetailedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pools")]
    pools: String,
    #[tabled(rename = "Routes")]
    routes: String,
    #[tabled(rename = "Controller")]
    state: String,
}

impl From<&OwnedNetwork> for DetailedRow {
    fn from(n: &OwnedNetwork) -> Self {
        match &n.remote {
            Some(remote) => Self {
                id: n.record.id.clone(),
                name: remote.name.clone(),
                pools: format_pools(&remote.config),
                routes: format_routes(&remote.config),
                state: if remote.name == n.record.name {
                    "ok".into()
                } else {
                    format!("renamed (ledger: {})", n.record.name)
                },
            },
            None => Self {
                id: n.record.id.clone(),
                name: n.record.name.clone(),
                pools: String::new(),
                routes: String::new(),
                state: "missing".into(),
            },
        }
    }
}

fn format_pools(config: &NetworkConfig) -> String {
    config
        .ip_assignment_pools
        .iter()
        .map(|p| format!("{}-{}", p.start, p.end))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_routes(config: &NetworkConfig) -> String {
    config
        .routes
        .iter()
        .map(|r| match &r.via {
            Some(via) => format!("{} via {via}", r.target),
            None => r.target.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn detail(n: &RemoteNetwork) -> String {
    let mut lines = vec![
        format!("ID:          {}", n.id),
        format!("Name:        {}", n.name),
        format!("Description: {}", n.description),
        format!("Private:     {}", util::yes_no(n.config.private)),
        format!("Broadcast:   {}", util::yes_no(n.config.enable_broadcast)),
        format!("Multicast:   {}", n.config.multicast_limit),
        format!("Auto-assign: {}", util::yes_no(n.config.v4_auto_assign)),
        format!("Pools:       {}", format_pools(&n.config)),
        format!("Routes:      {}", format_routes(&n.config)),
    ];
    if let Some(created) = n.created_at {
        lines.push(format!("Created:     {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines.join("\n")
}

// ── Argument translation ────────────────────────────────────────────

fn new_network_from_flags(
    name: String,
    description: Option<String>,
    pools: &[String],
    routes: &[String],
    multicast_limit: Option<u32>,
    no_broadcast: bool,
) -> Result<NewNetwork, CliError> {
    let mut config = NetworkConfig {
        ip_assignment_pools: util::parse_all(pools, util::parse_pool)?,
        routes: util::parse_all(routes, util::parse_route)?,
        enable_broadcast: !no_broadcast,
        ..NetworkConfig::default()
    };
    if let Some(limit) = multicast_limit {
        config.multicast_limit = limit;
    }
    Ok(NewNetwork {
        name,
        description: description.unwrap_or_default(),
        config,
    })
}

fn update_from_flags(
    name: Option<String>,
    description: Option<String>,
    pools: &[String],
    routes: &[String],
    multicast_limit: Option<u32>,
    broadcast: Option<bool>,
) -> Result<NetworkUpdate, CliError> {
    let update = NetworkUpdate {
        name,
        description,
        config: NetworkConfigUpdate {
            ip_assignment_pools: (!pools.is_empty())
                .then(|| util::parse_all(pools, util::parse_pool))
                .transpose()?,
            routes: (!routes.is_empty())
                .then(|| util::parse_all(routes, util::parse_route))
                .transpose()?,
            multicast_limit,
            enable_broadcast: broadcast,
            ..NetworkConfigUpdate::default()
        },
    };
    if update == NetworkUpdate::default() {
        return Err(CliError::Validation {
            field: "update".into(),
            reason: "nothing to change; pass at least one field or --from-file".into(),
        });
    }
    Ok(update)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: NetworksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let user = ctx.user()?;

    match args.command {
        NetworksCommand::List { detailed: false } => {
            let records = ctx.service.list_owned(user).await?;
            let out = output::render_list(
                &global.output,
                &records,
                |r| NetworkRow::from(r),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::List { detailed: true } => {
            let networks = ctx.service.list_owned_detailed(user).await?;
            let out = output::render_list(
                &global.output,
                &networks,
                |n| DetailedRow::from(n),
                |n| n.record.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Get { id } => {
            let network = ctx
                .service
                .get_network(&id, user)
                .await?
                .ok_or_else(|| CliError::network_not_found(&id))?;
            let out = output::render_single(&global.output, &network, detail, |n| n.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Create {
            name,
            description,
            pools,
            routes,
            multicast_limit,
            no_broadcast,
            from_file,
        } => {
            let network = match (from_file, name) {
                (Some(path), _) => util::read_json_file::<NewNetwork>(&path)?,
                (None, Some(name)) => new_network_from_flags(
                    name,
                    description,
                    &pools,
                    &routes,
                    multicast_limit,
                    no_broadcast,
                )?,
                (None, None) => {
                    return Err(CliError::Validation {
                        field: "name".into(),
                        reason: "--name or --from-file is required".into(),
                    });
                }
            };

            let created = ctx.service.create_network(network, user).await?;
            let out = output::render_single(&global.output, &created, detail, |n| n.id.clone());
            output::print_output(&out, global.quiet);
            output::notice(&format!("Network {} created", created.id), global.quiet);
            Ok(())
        }

        NetworksCommand::Update {
            id,
            from_file,
            name,
            description,
            pools,
            routes,
            multicast_limit,
            broadcast,
        } => {
            let update = match from_file {
                Some(path) => util::read_json_file::<NetworkUpdate>(&path)?,
                None => update_from_flags(
                    name,
                    description,
                    &pools,
                    &routes,
                    multicast_limit,
                    broadcast,
                )?,
            };

            let updated = ctx.service.update_network(&id, update, user).await?;
            let out = output::render_single(&global.output, &updated, detail, |n| n.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete network {id}? Members lose access immediately."),
                "networks delete",
                global.yes,
            )? {
                return Ok(());
            }
            ctx.service.delete_network(&id, user).await?;
            output::notice(&format!("Network {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_rejected() {
        let err = update_from_flags(None, None, &[], &[], None, None).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn create_flags_build_config() {
        let network = new_network_from_flags(
            "lab".into(),
            None,
            &["10.147.17.1-10.147.17.254".into()],
            &["10.147.17.0/24".into()],
            Some(8),
            true,
        )
        .unwrap();
        assert_eq!(network.config.ip_assignment_pools.len(), 1);
        assert_eq!(network.config.multicast_limit, 8);
        assert!(!network.config.enable_broadcast);
        assert!(network.description.is_empty());
    }
}
