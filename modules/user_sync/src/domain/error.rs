use thiserror::Error;

/// Every way a create or delete sync can fail. All variants are terminal
/// for the invocation that produced them.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("Backend error: {message}")]
    BackendError { message: String },

    #[error("Backend GraphQL error: {}", .messages.join("; "))]
    BackendGraphQl { messages: Vec<String> },

    #[error("Inserting backend user for '{external_id}' failed: {source}")]
    InsertFailed {
        external_id: String,
        source: Box<SyncError>,
    },

    #[error("Inserting backend user for '{external_id}' returned no row")]
    MissingInsertResult { external_id: String },

    #[error("No backend user for '{external_id}'")]
    UserNotFound { external_id: String },

    #[error("Refresh marker '{key}' already exists")]
    DuplicateMarker { key: String },

    #[error("Setting custom claims for '{external_id}' failed: {message}")]
    ClaimsAssignmentFailed { external_id: String, message: String },

    #[error("Marker store call for '{key}' failed: {message}")]
    MarkerStore { key: String, message: String },
}

impl SyncError {
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
        }
    }

    pub fn backend_error(message: impl Into<String>) -> Self {
        Self::BackendError {
            message: message.into(),
        }
    }

    pub fn backend_graphql(messages: Vec<String>) -> Self {
        Self::BackendGraphQl { messages }
    }

    pub fn insert_failed(external_id: impl Into<String>, source: SyncError) -> Self {
        Self::InsertFailed {
            external_id: external_id.into(),
            source: Box::new(source),
        }
    }

    pub fn missing_insert_result(external_id: impl Into<String>) -> Self {
        Self::MissingInsertResult {
            external_id: external_id.into(),
        }
    }

    pub fn user_not_found(external_id: impl Into<String>) -> Self {
        Self::UserNotFound {
            external_id: external_id.into(),
        }
    }

    pub fn duplicate_marker(key: impl Into<String>) -> Self {
        Self::DuplicateMarker { key: key.into() }
    }

    pub fn claims_assignment_failed(
        external_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ClaimsAssignmentFailed {
            external_id: external_id.into(),
            message: message.into(),
        }
    }

    pub fn marker_store(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MarkerStore {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn insert_failed_keeps_cause() {
        let err = SyncError::insert_failed(
            "abc",
            SyncError::backend_graphql(vec!["uniqueness violation".into()]),
        );

        assert!(err.to_string().contains("'abc'"));
        assert!(err.to_string().contains("uniqueness violation"));
        let source = err.source().expect("source");
        assert!(source.to_string().starts_with("Backend GraphQL error"));
    }

    #[test]
    fn graphql_messages_are_joined() {
        let err = SyncError::backend_graphql(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "Backend GraphQL error: first; second");
    }
}
