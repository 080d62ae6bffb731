//! Error taxonomy shared by the store and the report endpoints.
//!
//! Report handlers return [`ReportError`] and let axum turn it into a
//! response. Only `NotFound` carries its message to the caller; everything
//! else is logged here and answered with a generic 500 body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// ---

/// Failures raised by a [`crate::store::Store`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Failures raised while building a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report's minimum-data precondition was not met.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl ReportError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ReportError::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ReportError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        // ---
        let status = self.status();
        let message = match &self {
            ReportError::NotFound(msg) => msg.clone(),
            other => {
                error!("Report failed: {other}");
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use axum::body;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        // ---
        let resp = ReportError::not_found("no sensor data").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "no sensor data");
    }

    #[tokio::test]
    async fn test_internal_errors_do_not_leak_detail() {
        // ---
        let errors = [
            ReportError::Render("svg backend exploded".into()),
            ReportError::Malformed("environment e-7 sensor 3 has no type".into()),
            ReportError::from(StoreError::Malformed("bad sensors array".into())),
            ReportError::from(StoreError::Database(sqlx::Error::PoolTimedOut)),
        ];

        for err in errors {
            let resp = err.into_response();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body_json(resp).await["error"], "Internal server error");
        }
    }

    #[test]
    fn test_store_errors_are_not_double_wrapped() {
        // ---
        let err = ReportError::from(StoreError::Malformed("x".into()));
        assert_eq!(err.to_string(), "Malformed document: x");
    }
}
