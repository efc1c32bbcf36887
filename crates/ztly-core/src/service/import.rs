// ── Import (claiming existing controller networks) ──

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::NetworkService;
use crate::client::ControllerClient;
use crate::error::CoreError;
use crate::model::{ImportCandidate, ImportReason, NetworkRecord};

impl NetworkService {
    /// Every controller network classified for `requester_id`.
    ///
    /// Read-only: one controller ID listing plus one full ledger read.
    pub async fn importable_networks(
        &self,
        requester_id: &str,
    ) -> Result<Vec<ImportCandidate>, CoreError> {
        let mut remote_ids = self
            .client()?
            .list_network_ids()
            .await
            .map_err(|e| CoreError::upstream("list importable networks", None, e))?;
        remote_ids.sort();
        remote_ids.dedup();

        let records: HashMap<String, NetworkRecord> = self
            .inner
            .store
            .all_networks()
            .await
            .map_err(|e| CoreError::persistence("list importable networks", None, e))?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        Ok(remote_ids
            .into_iter()
            .map(|id| {
                let reason = ImportReason::classify(records.get(&id), requester_id);
                ImportCandidate::new(id, reason)
            })
            .collect())
    }

    /// Claim untracked or unclaimed networks for `requester_id`.
    ///
    /// IDs the controller does not know are skipped, as are networks that
    /// already have an owner. Failures on one ID are logged and do not stop
    /// the rest. Returns the IDs actually claimed, in request order.
    pub async fn import_networks(
        &self,
        ids: &[String],
        requester_id: &str,
    ) -> Result<Vec<String>, CoreError> {
        if requester_id.is_empty() {
            return Err(CoreError::MissingIdentity {
                operation: "import networks",
            });
        }
        let client = self.client()?;

        let remote_ids: HashSet<String> = client
            .list_network_ids()
            .await
            .map_err(|e| CoreError::upstream("import networks", None, e))?
            .into_iter()
            .collect();

        let mut seen = HashSet::new();
        let mut claimed = Vec::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            if !remote_ids.contains(id) {
                debug!(network_id = %id, "not on the controller, skipping import");
                continue;
            }
            match self.claim(client, id, requester_id).await {
                Ok(true) => claimed.push(id.clone()),
                Ok(false) => {}
                Err(e) => {
                    warn!(network_id = %id, requester = requester_id, error = %e, "import failed, skipping");
                }
            }
        }

        info!(
            requester = requester_id,
            requested = ids.len(),
            claimed = claimed.len(),
            "import finished"
        );
        Ok(claimed)
    }

    /// Claim one network. `Ok(false)` means there was nothing to claim.
    async fn claim(
        &self,
        client: &Arc<dyn ControllerClient>,
        id: &str,
        requester_id: &str,
    ) -> Result<bool, CoreError> {
        let _guard = self.inner.locks.acquire(id).await;
        let existing = self
            .inner
            .store
            .get_network(id)
            .await
            .map_err(|e| CoreError::persistence("import network", Some(id), e))?;

        match (ImportReason::classify(existing.as_ref(), requester_id), existing) {
            (ImportReason::Untracked, _) => {
                let Some(remote) = client
                    .get_network(id)
                    .await
                    .map_err(|e| CoreError::upstream("import network", Some(id), e))?
                else {
                    debug!(network_id = id, "network vanished before import");
                    return Ok(false);
                };
                let record = NetworkRecord::new(id, requester_id, remote.name, remote.description);
                self.inner
                    .store
                    .create_network(record)
                    .await
                    .map_err(|e| CoreError::persistence("import network", Some(id), e))?;
                info!(network_id = id, owner = requester_id, "untracked network imported");
                Ok(true)
            }
            (ImportReason::Unclaimed, Some(mut record)) => {
                record.owner_id = requester_id.to_owned();
                record.touch();
                self.inner
                    .store
                    .update_network(record)
                    .await
                    .map_err(|e| CoreError::persistence("import network", Some(id), e))?;
                info!(network_id = id, owner = requester_id, "unclaimed network claimed");
                Ok(true)
            }
            (ImportReason::OwnedByOther, _) => {
                warn!(
                    network_id = id,
                    requester = requester_id,
                    "network is owned by another user, skipping import"
                );
                Ok(false)
            }
            _ => Ok(false),
        }
    }
}
