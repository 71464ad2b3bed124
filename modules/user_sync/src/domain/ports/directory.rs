use async_trait::async_trait;

use crate::contract::model::{BackendUser, NewBackendUser};
use crate::domain::error::SyncError;

/// Backend store holding the mirrored user rows and their dependents.
/// Rows are keyed by the store-assigned id; only lookup goes by external id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Insert one user row. `None` when the store returned no row.
    async fn insert_user(&self, new_user: &NewBackendUser)
        -> Result<Option<BackendUser>, SyncError>;
    /// Resolve the store id for a provider identity.
    async fn find_user_id(&self, firebase_uid: &str) -> Result<Option<String>, SyncError>;
    /// Delete every todo owned by `user_id`. Returns affected rows.
    async fn delete_todos(&self, user_id: &str) -> Result<u64, SyncError>;
    /// Delete the user row itself. Returns affected rows.
    async fn delete_user(&self, user_id: &str) -> Result<u64, SyncError>;
}
