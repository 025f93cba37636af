pub mod dto;
pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::ingest::{IngestError, IngestService};
use errors::AppError;
use handlers::ApiDoc;

/// Shared by every request handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IngestService>,
    /// Include store error text in 500 responses.
    pub expose_error_details: bool,
}

impl AppState {
    fn error(&self, err: IngestError) -> AppError {
        AppError::new(err, self.expose_error_details)
    }
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/sensor-data",
            get(handlers::list_readings).post(handlers::submit_reading),
        )
        .route("/api/leak-alerts", get(handlers::list_leak_alerts))
        .route("/api/status", get(handlers::status))
        .with_state(state)
        .split_for_parts();

    router
        .route("/", get(handlers::root))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
