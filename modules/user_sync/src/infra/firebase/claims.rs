use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use super::join_segments;
use crate::contract::model::TokenClaims;
use crate::domain::error::SyncError;
use crate::domain::ports::ClaimsPort;
use runtime::FirebaseConfig;

/// Firebase rejects custom claims payloads above this size.
pub const MAX_CUSTOM_CLAIMS_BYTES: usize = 1000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountsUpdateRequest<'a> {
    local_id: &'a str,
    /// The claims object serialized as a JSON string.
    custom_attributes: String,
}

/// `ClaimsPort` over the Identity Toolkit `accounts:update` endpoint.
#[derive(Clone)]
pub struct FirebaseClaimsClient {
    http: reqwest::Client,
    base: Url,
    project_id: String,
    access_token: Option<String>,
}

impl FirebaseClaimsClient {
    pub fn new(
        http: reqwest::Client,
        base: Url,
        project_id: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            http,
            base,
            project_id: project_id.into(),
            access_token,
        }
    }

    pub fn from_config(http: reqwest::Client, cfg: &FirebaseConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&cfg.auth_base_url).map_err(|e| {
            anyhow::anyhow!("Invalid firebase.auth_base_url '{}': {}", cfg.auth_base_url, e)
        })?;
        Ok(Self::new(
            http,
            base,
            cfg.project_id.clone(),
            cfg.access_token.clone(),
        ))
    }
}

#[async_trait]
impl ClaimsPort for FirebaseClaimsClient {
    #[instrument(
        name = "user_sync.firebase.set_custom_claims",
        skip_all,
        fields(external_id = %external_id)
    )]
    async fn set_custom_claims(
        &self,
        external_id: &str,
        claims: &TokenClaims,
    ) -> Result<(), SyncError> {
        let fail = |message: String| SyncError::claims_assignment_failed(external_id, message);

        let custom_attributes = claims.to_custom_claims().to_string();
        if custom_attributes.len() > MAX_CUSTOM_CLAIMS_BYTES {
            return Err(fail(format!(
                "custom claims are {} bytes (max {})",
                custom_attributes.len(),
                MAX_CUSTOM_CLAIMS_BYTES
            )));
        }

        let url = join_segments(
            &self.base,
            &["v1", "projects", &self.project_id, "accounts:update"],
        )
        .map_err(fail)?;

        let mut request = self.http.post(url).json(&AccountsUpdateRequest {
            local_id: external_id,
            custom_attributes,
        });
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| fail(format!("POST accounts:update: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(fail(format!("HTTP {status}: {body}")));
        }

        debug!("Custom claims accepted");
        Ok(())
    }
}
