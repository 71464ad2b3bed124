use async_trait::async_trait;

use crate::domain::error::SyncError;

/// Refresh markers: one keyed record per identity whose creation tells the
/// client to force a token refresh.
#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// Create the marker stamped with the store's server time.
    /// Fails with `SyncError::DuplicateMarker` if it already exists.
    async fn create_marker(&self, key: &str) -> Result<(), SyncError>;
    async fn delete_marker(&self, key: &str) -> Result<(), SyncError>;
}
