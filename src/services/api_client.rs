use async_trait::async_trait;
use reqwest::{Client, header};

use crate::dto::{
    BindRequest, BindResponse, CodesDocument, DeleteBindingRequest, DeleteBindingResponse,
};
use crate::errors::ApiError;

/// Resource path of the code list, relative to the base URL.
pub const CODES_PATH: &str = "/codes.json";
/// Bind endpoint path.
pub const BIND_PATH: &str = "/api/bind";
/// Delete-binding endpoint path.
pub const DELETE_BINDING_PATH: &str = "/api/delete-binding";

/// The three calls the client makes against the code server.
///
/// Held as `Arc<dyn CodeApi>` so the repository and widgets can be driven by a
/// test double instead of a live server.
#[async_trait]
pub trait CodeApi: Send + Sync {
    /// Fetch and leniently parse the code document.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the request fails or the body is not JSON.
    async fn fetch_codes(&self) -> Result<CodesDocument, ApiError>;

    /// Ask the server to bind a code to a game.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` on a non-2xx status or `ok: false`, and
    /// `ApiError::Transport` if the server could not be reached.
    async fn bind(&self, request: &BindRequest) -> Result<BindResponse, ApiError>;

    /// Ask the server to remove a binding.
    ///
    /// # Errors
    ///
    /// Same failure split as [`CodeApi::bind`].
    async fn delete_binding(
        &self,
        request: &DeleteBindingRequest,
    ) -> Result<DeleteBindingResponse, ApiError>;
}

/// `CodeApi` over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCodeApi {
    base_url: String,
    client: Client,
}

impl HttpCodeApi {
    /// Create a client rooted at `base_url` (trailing slashes are ignored).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl CodeApi for HttpCodeApi {
    async fn fetch_codes(&self) -> Result<CodesDocument, ApiError> {
        let url = self.url(CODES_PATH);
        tracing::debug!(%url, "Fetching code document");

        let resp = self
            .client
            .get(&url)
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        // The status is not consulted: whatever body comes back is parsed, and
        // anything that is not JSON counts as a transport failure.
        let body = resp.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        Ok(CodesDocument::from_json(&value))
    }

    async fn bind(&self, request: &BindRequest) -> Result<BindResponse, ApiError> {
        let url = self.url(BIND_PATH);
        tracing::debug!(%url, code = %request.code, game = %request.game, "Sending bind request");

        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        let parsed: BindResponse = serde_json::from_slice(&body).unwrap_or_default();

        if status.is_success() && parsed.ok {
            Ok(parsed)
        } else {
            Err(ApiError::Rejected {
                status: status.as_u16(),
                reason: parsed.error,
            })
        }
    }

    async fn delete_binding(
        &self,
        request: &DeleteBindingRequest,
    ) -> Result<DeleteBindingResponse, ApiError> {
        let url = self.url(DELETE_BINDING_PATH);
        tracing::debug!(%url, code = %request.code, "Sending delete-binding request");

        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        let parsed: DeleteBindingResponse = serde_json::from_slice(&body).unwrap_or_default();

        if status.is_success() && parsed.ok {
            Ok(parsed)
        } else {
            Err(ApiError::Rejected {
                status: status.as_u16(),
                reason: parsed.error,
            })
        }
    }
}
