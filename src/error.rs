//! Error taxonomy.
//!
//! The store only ever fails with a not-found condition. Validation and
//! extractor rejections come from the HTTP boundary and all map to 422. Every
//! error renders as `{"detail": "..."}`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::types::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum PrognosisError {
    #[error("Prediction not found")]
    PredictionNotFound { id: String },
    #[error("Sport not found")]
    SportNotFound { sport: String },
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),
    #[error(transparent)]
    InvalidQuery(#[from] QueryRejection),
}

impl PrognosisError {
    pub fn status(&self) -> StatusCode {
        match self {
            PrognosisError::PredictionNotFound { .. } | PrognosisError::SportNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            // One status for every malformed request: bad query, bad JSON,
            // wrong content type or out-of-range field.
            PrognosisError::Validation(_)
            | PrognosisError::InvalidBody(_)
            | PrognosisError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn detail(&self) -> String {
        match self {
            PrognosisError::InvalidBody(rejection) => rejection.body_text(),
            PrognosisError::InvalidQuery(rejection) => rejection.body_text(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for PrognosisError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            PrognosisError::PredictionNotFound { id } => warn!(id = %id, "Prediction not found"),
            PrognosisError::SportNotFound { sport } => warn!(sport = %sport, "Sport not found"),
            other => warn!(status = %status, error = %other, "Request rejected"),
        }
        (status, Json(ErrorBody { detail: self.detail() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
