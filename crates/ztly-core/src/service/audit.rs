// ── Reconciliation audit ──
//
// Operator-facing diff of controller and ledger. Reports orphans left by
// failed ledger deletes or failed rollbacks; never repairs anything.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::NetworkService;
use crate::error::CoreError;
use crate::model::{DriftReport, MetadataDrift, RemoteNetwork};

impl NetworkService {
    pub async fn audit(&self) -> Result<DriftReport, CoreError> {
        let remote = self
            .client()?
            .list_networks()
            .await
            .map_err(|e| CoreError::upstream("audit", None, e))?;
        let records = self
            .inner
            .store
            .all_networks()
            .await
            .map_err(|e| CoreError::persistence("audit", None, e))?;

        let remote_by_id: HashMap<&str, &RemoteNetwork> =
            remote.iter().map(|n| (n.id.as_str(), n)).collect();
        let tracked: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();

        let mut report = DriftReport::default();
        for record in &records {
            if record.is_unclaimed() {
                report.unclaimed.push(record.id.clone());
            }
            match remote_by_id.get(record.id.as_str()) {
                None => report.orphaned.push(record.clone()),
                Some(live) => {
                    if live.name != record.name || live.description != record.description {
                        report.metadata_drift.push(MetadataDrift {
                            id: record.id.clone(),
                            ledger_name: record.name.clone(),
                            remote_name: live.name.clone(),
                            ledger_description: record.description.clone(),
                            remote_description: live.description.clone(),
                        });
                    }
                }
            }
        }

        report.untracked = remote
            .iter()
            .filter(|n| !tracked.contains(n.id.as_str()))
            .map(|n| n.id.clone())
            .collect();
        report.untracked.sort();

        debug!(
            orphaned = report.orphaned.len(),
            untracked = report.untracked.len(),
            unclaimed = report.unclaimed.len(),
            drifted = report.metadata_drift.len(),
            "audit complete"
        );
        Ok(report)
    }
}
