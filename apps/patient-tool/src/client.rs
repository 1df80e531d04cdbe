//! HTTP client for the Patient API.

use std::time::Duration;

use patient_store_core::Resource;
use reqwest::{Response, StatusCode};
use serde_json::Value;

/// Errors surfaced by [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin wrapper over the Patient endpoints.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Stored ids in ascending order; `None` when the store is empty.
    pub async fn list_ids(&self) -> Result<Option<Vec<u64>>, ClientError> {
        let response = check(self.client.get(self.url("/PatientIDs")).send().await?).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    pub async fn get(&self, id: u64) -> Result<Resource, ClientError> {
        let response = check(
            self.client
                .get(self.url(&format!("/Patient/{}", id)))
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    /// Creates a patient and returns the stored record.
    pub async fn create(&self, patient: &Resource) -> Result<Resource, ClientError> {
        let response = check(
            self.client
                .post(self.url("/Patient"))
                .json(patient)
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    /// Replaces the patient stored under `id`.
    pub async fn update(&self, id: u64, patient: &Resource) -> Result<Resource, ClientError> {
        let response = check(
            self.client
                .put(self.url(&format!("/Patient/{}", id)))
                .json(patient)
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, id: u64) -> Result<(), ClientError> {
        check(
            self.client
                .delete(self.url(&format!("/Patient/{}", id)))
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }
}

/// Turns non-2xx responses into [`ClientError::Api`].
///
/// The message is the server's `message` field, or `HTTP <status>` when the
/// body carries none.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    tracing::debug!(status = status.as_u16(), "{}", message);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
