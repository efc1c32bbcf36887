//! Reconciliation audit handler.

use serde::Serialize;
use tabled::Tabled;

use ztly_core::DriftReport;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Clone, Serialize, Tabled)]
struct FindingRow {
    #[tabled(rename = "Network")]
    id: String,
    #[tabled(rename = "Finding")]
    kind: &'static str,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn findings(report: &DriftReport) -> Vec<FindingRow> {
    let mut rows = Vec::new();
    for record in &report.orphaned {
        rows.push(FindingRow {
            id: record.id.clone(),
            kind: "orphaned",
            detail: format!("ledger row owned by '{}', gone from controller", record.owner_id),
        });
    }
    for id in &report.untracked {
        rows.push(FindingRow {
            id: id.clone(),
            kind: "untracked",
            detail: "on controller, no ledger row".into(),
        });
    }
    for id in &report.unclaimed {
        rows.push(FindingRow {
            id: id.clone(),
            kind: "unclaimed",
            detail: "ledger row without owner".into(),
        });
    }
    for drift in &report.metadata_drift {
        rows.push(FindingRow {
            id: drift.id.clone(),
            kind: "drift",
            detail: format!("ledger '{}' vs controller '{}'", drift.ledger_name, drift.remote_name),
        });
    }
    rows
}

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let report = ctx.service.audit().await?;

    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain if report.is_clean() => {
            "Controller and ledger agree".to_owned()
        }
        OutputFormat::Table | OutputFormat::Plain => {
            let rows = findings(&report);
            output::render_list(&global.output, &rows, FindingRow::clone, |r| {
                format!("{}\t{}", r.kind, r.id)
            })
        }
        _ => output::render_single(&global.output, &report, |_| String::new(), |_| String::new()),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
