use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tracing::info;

use crate::api::rest::routes;
use crate::domain::create::CreateHandler;
use crate::domain::delete::DeleteHandler;
use crate::domain::ports::{ClaimsPort, MarkerStore, UserDirectory};
use crate::infra::firebase::{FirebaseClaimsClient, FirestoreMarkerStore};
use crate::infra::graphql::{GraphqlClient, GraphqlUserDirectory};
use runtime::{BackendConfig, FirebaseConfig};

/// Both lifecycle handlers wired to one set of adapters. Built once at
/// startup; nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct UserSync {
    create: Arc<CreateHandler>,
    delete: Arc<DeleteHandler>,
}

impl UserSync {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        claims: Arc<dyn ClaimsPort>,
        markers: Arc<dyn MarkerStore>,
    ) -> Self {
        Self {
            create: Arc::new(CreateHandler::new(
                directory.clone(),
                claims,
                markers.clone(),
            )),
            delete: Arc::new(DeleteHandler::new(directory, markers)),
        }
    }

    /// Wire the GraphQL, Identity Toolkit and Firestore adapters. They share
    /// one `reqwest::Client`.
    pub fn from_config(backend: &BackendConfig, firebase: &FirebaseConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("claimsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let client = GraphqlClient::from_config(http.clone(), backend)?;
        info!(endpoint = %client.endpoint(), "GraphQL backend configured");

        let directory = Arc::new(GraphqlUserDirectory::new(client));
        let claims = Arc::new(FirebaseClaimsClient::from_config(http.clone(), firebase)?);
        let markers = Arc::new(FirestoreMarkerStore::from_config(http, firebase)?);
        info!(
            project_id = %firebase.project_id,
            collection = %firebase.marker_collection,
            "Firebase adapters configured"
        );

        Ok(Self::new(directory, claims, markers))
    }

    pub fn create_handler(&self) -> Arc<CreateHandler> {
        self.create.clone()
    }

    pub fn delete_handler(&self) -> Arc<DeleteHandler> {
        self.delete.clone()
    }

    /// Trigger ingress router.
    pub fn router(&self) -> Router {
        routes::register_routes(Router::new(), self.create.clone(), self.delete.clone())
    }
}
