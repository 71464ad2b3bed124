use std::sync::Arc;

use axum::{http::StatusCode, response::Json, Extension};

use crate::api::rest::dto::{HealthDto, TriggerPayload};
use crate::domain::create::CreateHandler;
use crate::domain::delete::DeleteHandler;

// The trigger system gets no failure signal: both event endpoints answer
// 204 once the handler has run, whatever its outcome.

pub async fn user_created(
    Extension(handler): Extension<Arc<CreateHandler>>,
    Json(payload): Json<TriggerPayload>,
) -> StatusCode {
    handler.handle(&payload.into_identity()).await;
    StatusCode::NO_CONTENT
}

pub async fn user_deleted(
    Extension(handler): Extension<Arc<DeleteHandler>>,
    Json(payload): Json<TriggerPayload>,
) -> StatusCode {
    handler.handle(&payload.into_identity()).await;
    StatusCode::NO_CONTENT
}

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}
