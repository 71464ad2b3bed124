use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::contract::model::{CreateOutcome, NewBackendUser, ProviderIdentity, TokenClaims};
use crate::domain::error::SyncError;
use crate::domain::ports::{ClaimsPort, MarkerStore, UserDirectory};

/// Reacts to "user created": mirrors the identity into the backend, puts
/// the backend id into the identity's token claims, then creates the
/// refresh marker.
#[derive(Clone)]
pub struct CreateHandler {
    directory: Arc<dyn UserDirectory>,
    claims: Arc<dyn ClaimsPort>,
    markers: Arc<dyn MarkerStore>,
}

impl CreateHandler {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        claims: Arc<dyn ClaimsPort>,
        markers: Arc<dyn MarkerStore>,
    ) -> Self {
        Self {
            directory,
            claims,
            markers,
        }
    }

    /// Event boundary: runs the sync and logs the outcome. Failures are not
    /// retried, rolled back, or reported to the caller.
    #[instrument(
        name = "user_sync.create.handle",
        skip_all,
        fields(external_id = %identity.external_id)
    )]
    pub async fn handle(&self, identity: &ProviderIdentity) {
        info!(display_name = ?identity.display_name, "Provider user created");

        match self.run(identity).await {
            Ok(outcome) => info!(
                user_id = %outcome.user.id,
                "Backend user mirrored and claims assigned"
            ),
            Err(e) => error!(error = %e, "User create sync failed"),
        }
    }

    /// The create sequence. Each step is awaited before the next starts and
    /// the first failure ends the run.
    pub async fn run(&self, identity: &ProviderIdentity) -> Result<CreateOutcome, SyncError> {
        let external_id = identity.external_id.as_str();
        let new_user = NewBackendUser::from_identity(identity);

        let user = self
            .directory
            .insert_user(&new_user)
            .await
            .map_err(|e| SyncError::insert_failed(external_id, e))?
            .ok_or_else(|| SyncError::missing_insert_result(external_id))?;
        debug!(user_id = %user.id, "Inserted backend user");

        let claims = TokenClaims::for_user(&user.id);
        self.claims.set_custom_claims(external_id, &claims).await?;
        debug!("Custom claims set");

        self.markers.create_marker(external_id).await?;
        debug!("Refresh marker created");

        Ok(CreateOutcome { user, claims })
    }
}
