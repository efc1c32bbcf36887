// ── Controller client seam ──
//
// The service talks to the controller only through `ControllerClient`.
// `HttpControllerClient` is the production implementation over
// `ztly_api::ControllerApi`; tests substitute an in-memory fake.

use async_trait::async_trait;
use tracing::debug;

use ztly_api::types::{MemberRequest, NetworkRequest};
use ztly_api::{ControllerApi, Error};

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::model::{
    ControllerStatus, Member, MemberUpdate, NetworkUpdate, NewNetwork, RemoteNetwork,
};

/// Network and member CRUD against the remote controller.
///
/// Single-entity lookups return `Ok(None)` when the controller has no such
/// entity. Implementations must be safe for concurrent use.
#[async_trait]
pub trait ControllerClient: Send + Sync {
    async fn status(&self) -> Result<ControllerStatus, Error>;

    /// Every network with full details (one logical bulk call).
    async fn list_networks(&self) -> Result<Vec<RemoteNetwork>, Error>;

    /// Every network ID, without details.
    async fn list_network_ids(&self) -> Result<Vec<String>, Error>;

    async fn get_network(&self, id: &str) -> Result<Option<RemoteNetwork>, Error>;

    async fn create_network(&self, network: &NewNetwork) -> Result<RemoteNetwork, Error>;

    async fn update_network(&self, id: &str, update: &NetworkUpdate)
    -> Result<RemoteNetwork, Error>;

    async fn delete_network(&self, id: &str) -> Result<(), Error>;

    async fn list_members(&self, network_id: &str) -> Result<Vec<Member>, Error>;

    async fn get_member(&self, network_id: &str, node_id: &str) -> Result<Option<Member>, Error>;

    async fn update_member(
        &self,
        network_id: &str,
        node_id: &str,
        update: &MemberUpdate,
    ) -> Result<Member, Error>;

    async fn delete_member(&self, network_id: &str, node_id: &str) -> Result<(), Error>;
}

// ── HTTP implementation ──────────────────────────────────────────

/// [`ControllerClient`] backed by the controller's JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpControllerClient {
    api: ControllerApi,
}

impl HttpControllerClient {
    pub fn new(api: ControllerApi) -> Self {
        Self { api }
    }

    /// Build the API client from runtime configuration.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, CoreError> {
        let api = ControllerApi::from_auth_token(
            config.url.as_str(),
            &config.auth_token,
            &config.transport(),
        )
        .map_err(|e| CoreError::Config {
            message: format!("cannot build controller client for {}: {e}", config.url),
        })?;
        debug!(url = %config.url, "controller client ready");
        Ok(Self::new(api))
    }
}

#[async_trait]
impl ControllerClient for HttpControllerClient {
    async fn status(&self) -> Result<ControllerStatus, Error> {
        Ok(self.api.status().await?.into())
    }

    async fn list_networks(&self) -> Result<Vec<RemoteNetwork>, Error> {
        let networks = self.api.list_networks().await?;
        Ok(networks.into_iter().map(RemoteNetwork::from).collect())
    }

    async fn list_network_ids(&self) -> Result<Vec<String>, Error> {
        self.api.list_network_ids().await
    }

    async fn get_network(&self, id: &str) -> Result<Option<RemoteNetwork>, Error> {
        Ok(self.api.get_network(id).await?.map(RemoteNetwork::from))
    }

    async fn create_network(&self, network: &NewNetwork) -> Result<RemoteNetwork, Error> {
        let body = NetworkRequest::from(network);
        Ok(self.api.create_network(&body).await?.into())
    }

    async fn update_network(
        &self,
        id: &str,
        update: &NetworkUpdate,
    ) -> Result<RemoteNetwork, Error> {
        let body = NetworkRequest::from(update);
        Ok(self.api.update_network(id, &body).await?.into())
    }

    async fn delete_network(&self, id: &str) -> Result<(), Error> {
        self.api.delete_network(id).await
    }

    async fn list_members(&self, network_id: &str) -> Result<Vec<Member>, Error> {
        let members = self.api.list_members(network_id).await?;
        Ok(members.into_iter().map(Member::from).collect())
    }

    async fn get_member(&self, network_id: &str, node_id: &str) -> Result<Option<Member>, Error> {
        Ok(self
            .api
            .get_member(network_id, node_id)
            .await?
            .map(Member::from))
    }

    async fn update_member(
        &self,
        network_id: &str,
        node_id: &str,
        update: &MemberUpdate,
    ) -> Result<Member, Error> {
        let body = MemberRequest::from(update);
        Ok(self
            .api
            .update_member(network_id, node_id, &body)
            .await?
            .into())
    }

    async fn delete_member(&self, network_id: &str, node_id: &str) -> Result<(), Error> {
        self.api.delete_member(network_id, node_id).await
    }
}
