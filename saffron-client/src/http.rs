//! HTTP client for network-based API calls
//!
//! Every admin-server response is the unified envelope
//! `{"success": bool, "data" | "error": ...}`; decoding maps failed
//! envelopes onto [`ClientError`] by error code.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::{ClientConfig, ClientError, ClientResult};
use shared::models::{
    Franchise, Guest, MenuItem, Offer, OfferAnalyticsResponse, Session, SessionCreate,
    SessionDeactivate, SessionUpdate, SyncStatus,
};
use shared::response::ApiResponse;

/// HTTP client for making network requests to the admin server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.patch(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.delete(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Decode the unified envelope, mapping failures by error code
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => envelope.into_data().map_err(|err| match err.code.as_str() {
                "E0003" => ClientError::NotFound(err.message),
                "E0002" => ClientError::Validation(err.message),
                _ => ClientError::Api {
                    code: err.code,
                    message: err.message,
                },
            }),
            // Not an envelope (framework-level rejection, proxy error, ...)
            Err(_) if status == StatusCode::NOT_FOUND => {
                Err(ClientError::NotFound("Resource not found".to_string()))
            }
            Err(_) if !status.is_success() => Err(ClientError::Internal(format!(
                "HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            ))),
            Err(e) => Err(ClientError::InvalidResponse(e.to_string())),
        }
    }

    // ========== Collections ==========

    /// List sessions
    pub async fn sessions(&self) -> ClientResult<Vec<Session>> {
        self.get("/api/sessions").await
    }

    /// List guests
    pub async fn guests(&self) -> ClientResult<Vec<Guest>> {
        self.get("/api/guests").await
    }

    /// List staff
    pub async fn staff(&self) -> ClientResult<Vec<shared::models::Staff>> {
        self.get("/api/staff").await
    }

    /// List offers
    pub async fn offers(&self) -> ClientResult<Vec<Offer>> {
        self.get("/api/offers").await
    }

    /// List menu items
    pub async fn menu_items(&self) -> ClientResult<Vec<MenuItem>> {
        self.get("/api/menu-items").await
    }

    /// List franchises
    pub async fn franchises(&self) -> ClientResult<Vec<Franchise>> {
        self.get("/api/franchises").await
    }

    // ========== Sessions API ==========

    /// Create a session
    pub async fn create_session(&self, payload: &SessionCreate) -> ClientResult<Session> {
        self.post("/api/sessions", payload).await
    }

    /// Update a session
    pub async fn update_session(
        &self,
        id: i64,
        payload: &SessionUpdate,
    ) -> ClientResult<Session> {
        self.put(&format!("/api/sessions/{id}"), payload).await
    }

    /// Soft-deactivate a session with a reason
    pub async fn deactivate_session(&self, id: i64, reason: &str) -> ClientResult<Session> {
        let payload = SessionDeactivate {
            reason: reason.to_string(),
        };
        self.patch(&format!("/api/sessions/{id}/deactivate"), &payload)
            .await
    }

    // ========== RPC ==========

    /// Check whether a named collection exists
    pub async fn collection_exists(&self, name: &str) -> ClientResult<bool> {
        self.get(&format!("/api/rpc/collection-exists?name={name}"))
            .await
    }

    /// Compute offer analytics for a list of offer IDs
    pub async fn offer_analytics(&self, offer_ids: &[i64]) -> ClientResult<OfferAnalyticsResponse> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Request<'a> {
            offer_ids: &'a [i64],
        }
        self.post("/api/rpc/offer-analytics", &Request { offer_ids })
            .await
    }

    /// Fetch the server's sync status (epoch + resource versions)
    pub async fn sync_status(&self) -> ClientResult<SyncStatus> {
        self.get("/api/sync/status").await
    }
}
