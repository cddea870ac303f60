//! HTTP wrappers for the inspection API endpoints.

use inspecta_core::AnnotationSet;
use serde::Deserialize;

use crate::config::ApiConfig;

/// Header carrying the static auth token on every request.
const AUTH_HEADER: &str = "X-Auth-Token";

/// Sort order for recent-file listings: newest first.
const RECENT_SORT: &str = "created_at DESC";

/// Dataset purpose marking a dataset as an inspection workcenter.
const INSPECTION_PURPOSE: &str = "inspection";

/// HTTP client for one inspection API deployment.
pub struct InspectionApi {
    client: reqwest::Client,
    config: ApiConfig,
}

/// An inspection workcenter: a dataset flagged with the inspection
/// purpose upstream.
#[derive(Debug, Clone)]
pub struct Workcenter {
    /// Upstream dataset ID.
    pub id: String,
    /// Human-readable workcenter name; becomes the folder name on disk.
    pub name: String,
}

/// Reference to one file (image) within a dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    /// Upstream file ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning dataset ID.
    pub dataset_id: String,
    /// Free-form metadata attached by the inspection station. The result
    /// label is extracted from here.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Raw dataset entry as returned by `GET /datasets`.
#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    purpose: Option<String>,
}

/// Errors from the inspection API layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Inspection API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Unexpected payload: {0}")]
    Payload(String),
}

impl InspectionApi {
    /// Create a new client for the given API deployment.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful
    /// for connection pooling across components).
    pub fn with_client(client: reqwest::Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    /// List all inspection workcenters.
    ///
    /// Sends `GET /datasets` and keeps only datasets whose `purpose` is
    /// `"inspection"`.
    pub async fn list_workcenters(&self) -> Result<Vec<Workcenter>, ClientError> {
        let response = self
            .client
            .get(format!("{}/datasets", self.config.base_url))
            .header(AUTH_HEADER, &self.config.auth_token)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let datasets: Vec<Dataset> =
            serde_json::from_str(&body).map_err(|e| ClientError::Payload(e.to_string()))?;

        let workcenters: Vec<Workcenter> = datasets
            .into_iter()
            .filter(|d| d.purpose.as_deref() == Some(INSPECTION_PURPOSE))
            .map(|d| Workcenter {
                id: d.id,
                name: d.name,
            })
            .collect();

        tracing::debug!(count = workcenters.len(), "Listed inspection workcenters");
        Ok(workcenters)
    }

    /// List the most recent files of a workcenter, newest first.
    ///
    /// Sends `GET /datasets/{id}/files?limit={limit}&sortby=created_at DESC`.
    pub async fn list_recent_files(
        &self,
        workcenter: &Workcenter,
        limit: usize,
    ) -> Result<Vec<FileRef>, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/datasets/{}/files",
                self.config.base_url, workcenter.id
            ))
            .header(AUTH_HEADER, &self.config.auth_token)
            .query(&[("limit", limit.to_string()), ("sortby", RECENT_SORT.into())])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Payload(e.to_string()))
    }

    /// Download the raw encoded image bytes for a file.
    ///
    /// Sends `GET /datasets/{dataset_id}/files/{id}/download`.
    pub async fn download(&self, file: &FileRef) -> Result<Vec<u8>, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/datasets/{}/files/{}/download",
                self.config.base_url, file.dataset_id, file.id
            ))
            .header(AUTH_HEADER, &self.config.auth_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch the label set for a file.
    ///
    /// Sends `GET /datasets/{dataset_id}/files/{id}/labels`. An empty or
    /// label-less body deserializes to an empty [`AnnotationSet`].
    pub async fn labels(&self, file: &FileRef) -> Result<AnnotationSet, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/datasets/{}/files/{}/labels",
                self.config.base_url, file.dataset_id, file.id
            ))
            .header(AUTH_HEADER, &self.config.auth_token)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(AnnotationSet::default());
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Payload(e.to_string()))
    }

    /// Check the status and return the response body, mapping non-2xx
    /// responses to [`ClientError::Api`].
    async fn read_body(response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
