use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::contract::model::{DeleteOutcome, ProviderIdentity};
use crate::domain::error::SyncError;
use crate::domain::ports::{MarkerStore, UserDirectory};

/// Reacts to "user deleted": removes the user's todos, then the user row,
/// then the refresh marker.
#[derive(Clone)]
pub struct DeleteHandler {
    directory: Arc<dyn UserDirectory>,
    markers: Arc<dyn MarkerStore>,
}

impl DeleteHandler {
    pub fn new(directory: Arc<dyn UserDirectory>, markers: Arc<dyn MarkerStore>) -> Self {
        Self { directory, markers }
    }

    /// Event boundary: runs the cleanup and logs the outcome. Failures are
    /// not retried or compensated.
    #[instrument(
        name = "user_sync.delete.handle",
        skip_all,
        fields(external_id = %identity.external_id)
    )]
    pub async fn handle(&self, identity: &ProviderIdentity) {
        info!("Provider user deleted");

        match self.run(identity).await {
            Ok(outcome) => info!(
                user_id = %outcome.user_id,
                todos_deleted = outcome.todos_deleted,
                "Backend user removed"
            ),
            Err(e) => error!(error = %e, "User delete sync failed"),
        }
    }

    /// The delete sequence. Deletions are keyed by the backend id, so the
    /// lookup comes first; todos must be gone before their owner row.
    pub async fn run(&self, identity: &ProviderIdentity) -> Result<DeleteOutcome, SyncError> {
        let external_id = identity.external_id.as_str();

        let user_id = self
            .directory
            .find_user_id(external_id)
            .await?
            .ok_or_else(|| SyncError::user_not_found(external_id))?;
        debug!(user_id = %user_id, "Resolved backend user");

        let todos_deleted = self.directory.delete_todos(&user_id).await?;
        debug!(todos_deleted, "Deleted dependent todos");

        let users_deleted = self.directory.delete_user(&user_id).await?;
        if users_deleted == 0 {
            warn!(user_id = %user_id, "Backend user row was already gone");
        }

        self.markers.delete_marker(external_id).await?;
        debug!("Refresh marker removed");

        Ok(DeleteOutcome {
            user_id,
            todos_deleted,
            users_deleted,
        })
    }
}
