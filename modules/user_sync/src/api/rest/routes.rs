use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::api::rest::handlers;
use crate::domain::create::CreateHandler;
use crate::domain::delete::DeleteHandler;

pub fn register_routes(
    router: Router,
    create: Arc<CreateHandler>,
    delete: Arc<DeleteHandler>,
) -> Router {
    router
        // POST /events/user-created - provider user created
        .route("/events/user-created", post(handlers::user_created))
        // POST /events/user-deleted - provider user deleted
        .route("/events/user-deleted", post(handlers::user_deleted))
        .route("/health", get(handlers::health))
        .layer(Extension(create))
        .layer(Extension(delete))
        .layer(TraceLayer::new_for_http())
}
