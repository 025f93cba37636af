use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::dto::ErrorBody;
use crate::ingest::{IngestError, ValidationError};

/// HTTP-facing error. Built from an [`IngestError`] at the handler boundary,
/// where the environment decides whether persistence details are shown.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    body: ErrorBody,
}

impl AppError {
    pub fn new(err: IngestError, expose_details: bool) -> Self {
        match err {
            IngestError::Validation(v) => v.into(),
            IngestError::Persistence(e) => {
                error!(error = %e, "Persistence error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: ErrorBody {
                        error: "PersistenceError".to_owned(),
                        message: "failed to access sensor data storage".to_owned(),
                        required: None,
                        detail: expose_details.then(|| e.to_string()),
                    },
                }
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(v: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: "ValidationError".to_owned(),
                message: v.to_string(),
                required: Some(v.required_fields())
                    .filter(|fields| !fields.is_empty())
                    .map(|fields| fields.iter().map(|f| (*f).to_owned()).collect()),
                detail: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
