use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::join_segments;
use crate::domain::error::SyncError;
use crate::domain::ports::MarkerStore;
use runtime::FirebaseConfig;

/// Field stamped with the Firestore server time on creation.
pub const REFRESH_TIME_FIELD: &str = "refreshTime";

#[derive(Debug, Serialize)]
struct CommitRequest {
    writes: Vec<Write>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Write {
    update: Document,
    update_transforms: Vec<FieldTransform>,
    current_document: Precondition,
}

#[derive(Debug, Serialize)]
struct Document {
    name: String,
    fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldTransform {
    field_path: &'static str,
    set_to_server_value: &'static str,
}

#[derive(Debug, Serialize)]
struct Precondition {
    exists: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
}

/// `MarkerStore` over the Firestore REST API. Markers are documents in one
/// collection, keyed by the provider's external id.
#[derive(Clone)]
pub struct FirestoreMarkerStore {
    http: reqwest::Client,
    base: Url,
    project_id: String,
    collection: String,
    access_token: Option<String>,
}

impl FirestoreMarkerStore {
    pub fn new(
        http: reqwest::Client,
        base: Url,
        project_id: impl Into<String>,
        collection: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            http,
            base,
            project_id: project_id.into(),
            collection: collection.into(),
            access_token,
        }
    }

    pub fn from_config(http: reqwest::Client, cfg: &FirebaseConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&cfg.firestore_base_url).map_err(|e| {
            anyhow::anyhow!(
                "Invalid firebase.firestore_base_url '{}': {}",
                cfg.firestore_base_url,
                e
            )
        })?;
        Ok(Self::new(
            http,
            base,
            cfg.project_id.clone(),
            cfg.marker_collection.clone(),
            cfg.access_token.clone(),
        ))
    }

    fn document_name(&self, key: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}/{}",
            self.project_id, self.collection, key
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Document ids may not contain '/', which would address a subcollection.
fn check_key(key: &str) -> Result<(), SyncError> {
    if key.is_empty() || key.contains('/') {
        return Err(SyncError::marker_store(key, "invalid document id"));
    }
    Ok(())
}

fn is_already_exists(status: StatusCode, body: &str) -> bool {
    status == StatusCode::CONFLICT
        || serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|e| e.error.status)
            .is_some_and(|s| s == "ALREADY_EXISTS")
}

#[async_trait]
impl MarkerStore for FirestoreMarkerStore {
    /// One commit with an `exists: false` precondition and a `REQUEST_TIME`
    /// transform: create-only, stamped with server time.
    #[instrument(name = "user_sync.firestore.create_marker", skip_all, fields(key = %key))]
    async fn create_marker(&self, key: &str) -> Result<(), SyncError> {
        check_key(key)?;
        let url = join_segments(
            &self.base,
            &[
                "v1",
                "projects",
                &self.project_id,
                "databases",
                "(default)",
                "documents:commit",
            ],
        )
        .map_err(|m| SyncError::marker_store(key, m))?;

        let body = CommitRequest {
            writes: vec![Write {
                update: Document {
                    name: self.document_name(key),
                    fields: serde_json::Map::new(),
                },
                update_transforms: vec![FieldTransform {
                    field_path: REFRESH_TIME_FIELD,
                    set_to_server_value: "REQUEST_TIME",
                }],
                current_document: Precondition { exists: false },
            }],
        };

        let response = self
            .authorized(self.http.post(url).json(&body))
            .send()
            .await
            .map_err(|e| SyncError::marker_store(key, format!("commit: {e}")))?;

        let status = response.status();
        if status.is_success() {
            debug!("Refresh marker written");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        if is_already_exists(status, &text) {
            return Err(SyncError::duplicate_marker(key));
        }
        Err(SyncError::marker_store(key, format!("HTTP {status}: {text}")))
    }

    #[instrument(name = "user_sync.firestore.delete_marker", skip_all, fields(key = %key))]
    async fn delete_marker(&self, key: &str) -> Result<(), SyncError> {
        check_key(key)?;
        let url = join_segments(
            &self.base,
            &[
                "v1",
                "projects",
                &self.project_id,
                "databases",
                "(default)",
                "documents",
                &self.collection,
                key,
            ],
        )
        .map_err(|m| SyncError::marker_store(key, m))?;

        let response = self
            .authorized(self.http.delete(url))
            .send()
            .await
            .map_err(|e| SyncError::marker_store(key, format!("delete: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SyncError::marker_store(key, format!("HTTP {status}: {text}")));
        }

        debug!("Refresh marker deleted");
        Ok(())
    }
}
