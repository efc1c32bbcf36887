// Async HTTP client for the ZeroTier network controller API.
//
// Base path: the node's local service root (e.g. http://127.0.0.1:9993/)
// Auth: X-ZT1-Auth header

use std::collections::HashMap;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{MemberRequest, MemberResponse, NetworkRequest, NetworkResponse, StatusResponse};

const AUTH_HEADER: &str = "X-ZT1-Auth";

/// Max in-flight requests when expanding an ID list into full documents.
const LIST_CONCURRENCY: usize = 8;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the controller API.
///
/// Every request carries the `X-ZT1-Auth` token. Single-entity GETs map
/// HTTP 404 to `Ok(None)`; every other non-success status is an error.
#[derive(Debug, Clone)]
pub struct ControllerApi {
    http: reqwest::Client,
    base_url: Url,
}

impl ControllerApi {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an auth token and transport config.
    pub fn from_auth_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut token_value =
            HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid auth token header value: {e}"),
            })?;
        token_value.set_sensitive(true);
        headers.insert(AUTH_HEADER, token_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/` so relative joins keep its path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        handle_response(resp).await.map(Some)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        handle_empty(resp).await
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Node status: address, version, online flag.
    pub async fn status(&self) -> Result<StatusResponse, Error> {
        self.get("status").await
    }

    // ── Networks ─────────────────────────────────────────────────────

    /// All network IDs hosted by this controller (one request).
    pub async fn list_network_ids(&self) -> Result<Vec<String>, Error> {
        self.get("controller/network").await
    }

    /// All networks with full documents.
    ///
    /// Fetches the ID list, then each network with bounded concurrency.
    /// Networks deleted between the two steps are skipped.
    pub async fn list_networks(&self) -> Result<Vec<NetworkResponse>, Error> {
        let ids = self.list_network_ids().await?;
        let fetched: Vec<Option<NetworkResponse>> = stream::iter(ids)
            .map(|id| async move { self.get_network(&id).await })
            .buffered(LIST_CONCURRENCY)
            .try_collect()
            .await?;
        Ok(fetched.into_iter().flatten().collect())
    }

    pub async fn get_network(&self, id: &str) -> Result<Option<NetworkResponse>, Error> {
        let id = path_segment(id)?;
        self.get_optional(&format!("controller/network/{id}")).await
    }

    /// Create a network with a controller-generated ID.
    ///
    /// The controller allocates an ID when posting to
    /// `/controller/network/{address}______`, so the node address is
    /// looked up first.
    pub async fn create_network(&self, body: &NetworkRequest) -> Result<NetworkResponse, Error> {
        let status = self.status().await?;
        if status.address.is_empty() {
            return Err(Error::MissingAddress);
        }
        let address = path_segment(&status.address)?;
        self.post(&format!("controller/network/{address}______"), body)
            .await
    }

    pub async fn update_network(
        &self,
        id: &str,
        body: &NetworkRequest,
    ) -> Result<NetworkResponse, Error> {
        let id = path_segment(id)?;
        self.post(&format!("controller/network/{id}"), body).await
    }

    pub async fn delete_network(&self, id: &str) -> Result<(), Error> {
        let id = path_segment(id)?;
        self.delete(&format!("controller/network/{id}")).await
    }

    // ── Members ──────────────────────────────────────────────────────

    /// Member node IDs of a network.
    ///
    /// The controller answers with a `{node: revision}` map.
    pub async fn list_member_ids(&self, network_id: &str) -> Result<Vec<String>, Error> {
        let network_id = path_segment(network_id)?;
        let revisions: HashMap<String, u64> = self
            .get(&format!("controller/network/{network_id}/member"))
            .await?;
        let mut ids: Vec<String> = revisions.into_keys().collect();
        ids.sort();
        Ok(ids)
    }

    pub async fn list_members(&self, network_id: &str) -> Result<Vec<MemberResponse>, Error> {
        let ids = self.list_member_ids(network_id).await?;
        let fetched: Vec<Option<MemberResponse>> = stream::iter(ids)
            .map(|node| async move { self.get_member(network_id, &node).await })
            .buffered(LIST_CONCURRENCY)
            .try_collect()
            .await?;
        Ok(fetched.into_iter().flatten().collect())
    }

    pub async fn get_member(
        &self,
        network_id: &str,
        node_id: &str,
    ) -> Result<Option<MemberResponse>, Error> {
        let network_id = path_segment(network_id)?;
        let node_id = path_segment(node_id)?;
        self.get_optional(&format!("controller/network/{network_id}/member/{node_id}"))
            .await
    }

    pub async fn update_member(
        &self,
        network_id: &str,
        node_id: &str,
        body: &MemberRequest,
    ) -> Result<MemberResponse, Error> {
        let network_id = path_segment(network_id)?;
        let node_id = path_segment(node_id)?;
        self.post(
            &format!("controller/network/{network_id}/member/{node_id}"),
            body,
        )
        .await
    }

    pub async fn delete_member(&self, network_id: &str, node_id: &str) -> Result<(), Error> {
        let network_id = path_segment(network_id)?;
        let node_id = path_segment(node_id)?;
        self.delete(&format!("controller/network/{network_id}/member/{node_id}"))
            .await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Error::InvalidAuthToken;
    }

    let raw = resp.text().await.unwrap_or_default();
    Error::Controller {
        status: status.as_u16(),
        message: if raw.trim().is_empty() {
            status.to_string()
        } else {
            raw
        },
    }
}

/// Controller IDs are hex strings; anything else is refused before it
/// reaches a URL.
fn path_segment(id: &str) -> Result<&str, Error> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(id)
    } else {
        Err(Error::InvalidId { id: id.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segment_rejects_traversal() {
        assert!(path_segment("8056c2e21c000001").is_ok());
        assert!(path_segment("../status").is_err());
        assert!(path_segment("").is_err());
        assert!(path_segment("abc/def").is_err());
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = ControllerApi::from_reqwest("http://127.0.0.1:9993/zt", reqwest::Client::new());
        assert!(matches!(api, Ok(ref a) if a.base_url().as_str() == "http://127.0.0.1:9993/zt/"));
    }
}
