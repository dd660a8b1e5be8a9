//! HTTP implementation of [`ResourceClient`] against OpenProject API v3.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::hal::ErrorResponse;
use super::{
    Activity, ClientError, ClientResult, Page, PageQuery, Relation, ResourceClient, ResourceId,
    ResourceKind,
};

/// Connection settings for an OpenProject instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the instance, without the `/api/v3` suffix.
    pub base_url: Url,
    /// API key of the acting user.
    pub api_key: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Authenticated OpenProject API client.
///
/// Cheap to share behind an `Arc`; read-only after construction.
#[derive(Debug, Clone)]
pub struct OpenProjectClient {
    api_root: String,
    client: Client,
}

fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

impl OpenProjectClient {
    /// Create a new client for the given instance.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        install_crypto_provider();

        let credentials = STANDARD.encode(format!("apikey:{}", config.api_key));
        let mut auth = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|e| {
            ClientError::InvalidResponse {
                message: format!("API key cannot be sent as a header: {e}"),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .user_agent(concat!("openproject-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ClientError::Transport { source })?;

        let base = config.base_url.as_str().trim_end_matches('/');
        Ok(Self {
            api_root: format!("{base}/api/v3"),
            client,
        })
    }

    /// Root of the API, e.g. `https://op.example.com/api/v3`.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path)
    }

    fn entity_path(kind: ResourceKind, id: &ResourceId) -> String {
        format!("{}/{}", kind.path(), id)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        Ok(request.send().await?)
    }

    /// Turn a non-success response into a [`ClientError`].
    ///
    /// The remote `message` is preserved verbatim; without one the canonical
    /// status text is used.
    async fn rejection(response: Response) -> ClientError {
        let status = response.status();
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
        ClientError::Remote {
            status: status.as_u16(),
            message,
        }
    }

    /// Decode a successful response, mapping 404 to `NotFound`.
    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        kind: ResourceKind,
        id: Option<&ResourceId>,
    ) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse {
                    message: e.to_string(),
                });
        }
        match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(ClientError::NotFound {
                kind,
                id: id.to_string(),
            }),
            _ => Err(Self::rejection(response).await),
        }
    }
}

impl ResourceClient for OpenProjectClient {
    async fn fetch_page<T: DeserializeOwned + Send>(
        &self,
        kind: ResourceKind,
        query: PageQuery,
    ) -> ClientResult<Page<T>> {
        debug!(
            kind = %kind,
            offset = query.offset,
            page_size = query.page_size,
            "fetching page"
        );
        let mut params = vec![
            ("pageSize", query.page_size.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(filters) = query.filters {
            params.push(("filters", filters));
        }

        let response = self
            .send(self.client.get(self.url(kind.path())).query(&params))
            .await?;
        Self::handle_response(response, kind, None).await
    }

    async fn fetch_one<T: DeserializeOwned + Send>(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> ClientResult<T> {
        let response = self
            .send(self.client.get(self.url(&Self::entity_path(kind, id))))
            .await?;
        Self::handle_response(response, kind, Some(id)).await
    }

    async fn fetch_relations(&self, work_package_id: &ResourceId) -> ClientResult<Vec<Relation>> {
        let path = format!(
            "{}/relations",
            Self::entity_path(ResourceKind::WorkPackages, work_package_id)
        );
        let response = self.send(self.client.get(self.url(&path))).await?;
        let page: Page<Relation> =
            Self::handle_response(response, ResourceKind::WorkPackages, Some(work_package_id))
                .await?;
        Ok(page.items)
    }

    async fn fetch_activities(
        &self,
        work_package_id: &ResourceId,
        page_size: usize,
        offset: usize,
    ) -> ClientResult<Page<Activity>> {
        let path = format!(
            "{}/activities",
            Self::entity_path(ResourceKind::WorkPackages, work_package_id)
        );
        let params = [
            ("pageSize", page_size.to_string()),
            ("offset", offset.to_string()),
        ];
        let response = self
            .send(self.client.get(self.url(&path)).query(&params))
            .await?;
        Self::handle_response(response, ResourceKind::WorkPackages, Some(work_package_id)).await
    }

    async fn create(&self, kind: ResourceKind, payload: Value) -> ClientResult<Value> {
        let response = self
            .send(self.client.post(self.url(kind.path())).json(&payload))
            .await?;
        Self::handle_response(response, kind, None).await
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        payload: Value,
    ) -> ClientResult<Value> {
        let response = self
            .send(
                self.client
                    .patch(self.url(&Self::entity_path(kind, id)))
                    .json(&payload),
            )
            .await?;
        Self::handle_response(response, kind, Some(id)).await
    }

    async fn delete(&self, kind: ResourceKind, id: &ResourceId) -> ClientResult<()> {
        let response = self
            .send(self.client.delete(self.url(&Self::entity_path(kind, id))))
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound {
                kind,
                id: id.to_string(),
            })
        } else {
            Err(Self::rejection(response).await)
        }
    }
}
