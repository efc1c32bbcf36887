// ── Member operations ──
//
// Members have no ledger rows. Access follows the parent network's owner,
// and unlike `get_network` a failed check is reported explicitly.

use tracing::info;

use super::NetworkService;
use crate::error::CoreError;
use crate::model::{Member, MemberUpdate};

impl NetworkService {
    pub async fn list_members(
        &self,
        network_id: &str,
        requester_id: &str,
    ) -> Result<Vec<Member>, CoreError> {
        let client = self.client()?;
        self.authorize("list members", network_id, requester_id).await?;
        client
            .list_members(network_id)
            .await
            .map_err(|e| CoreError::upstream("list members", Some(network_id), e))
    }

    pub async fn get_member(
        &self,
        network_id: &str,
        node_id: &str,
        requester_id: &str,
    ) -> Result<Option<Member>, CoreError> {
        let client = self.client()?;
        self.authorize("get member", network_id, requester_id).await?;
        client
            .get_member(network_id, node_id)
            .await
            .map_err(|e| CoreError::upstream("get member", Some(network_id), e))
    }

    pub async fn update_member(
        &self,
        network_id: &str,
        node_id: &str,
        update: &MemberUpdate,
        requester_id: &str,
    ) -> Result<Member, CoreError> {
        let client = self.client()?;
        let _guard = self.inner.locks.acquire(network_id).await;
        self.authorize("update member", network_id, requester_id).await?;

        let member = client
            .update_member(network_id, node_id, update)
            .await
            .map_err(|e| CoreError::upstream("update member", Some(network_id), e))?;
        info!(network_id, node_id, requester = requester_id, "member updated");
        Ok(member)
    }

    /// Remove a member from a network owned by `requester_id`.
    pub async fn remove_member(
        &self,
        network_id: &str,
        node_id: &str,
        requester_id: &str,
    ) -> Result<(), CoreError> {
        let client = self.client()?;
        let _guard = self.inner.locks.acquire(network_id).await;
        self.authorize("remove member", network_id, requester_id).await?;

        client
            .delete_member(network_id, node_id)
            .await
            .map_err(|e| CoreError::upstream("remove member", Some(network_id), e))?;
        info!(network_id, node_id, requester = requester_id, "member removed");
        Ok(())
    }
}
