//! Server error type and its HTTP mapping.
//!
//! Callers see two outcomes only: a 404 naming the missing resource, or a
//! generic 500. Detail for the 500 case is logged and never sent back.

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Body sent with every 500 response.
pub const GENERIC_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Error)]
pub enum Error {
    /// Lookup by identifier found no row. Carries the resource name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The request body could not be decoded into the expected shape.
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("invoice item total overflows")]
    TotalOverflow,

    #[error("storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn storage_err(e: tokio_rusqlite::Error) -> Error {
    Error::Storage(Box::new(e))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    message: format!("{resource} not found"),
                }),
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            message: GENERIC_MESSAGE.to_string(),
        }),
    )
        .into_response()
}

/// Catch-all for handler panics, installed through `CatchPanicLayer`.
pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "request handler panicked");
    internal_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::NotFound("Customer").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let response = Error::Storage("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn panic_maps_to_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_message_names_resource() {
        assert_eq!(Error::NotFound("Invoice").to_string(), "Invoice not found");
    }
}
