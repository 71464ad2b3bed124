use async_trait::async_trait;

use crate::contract::model::TokenClaims;
use crate::domain::error::SyncError;

/// Claim assignment on the auth provider's identity.
#[async_trait]
pub trait ClaimsPort: Send + Sync {
    /// Replaces all custom claims of `external_id` with `claims`.
    async fn set_custom_claims(&self, external_id: &str, claims: &TokenClaims)
        -> Result<(), SyncError>;
}
