//! Error types for the invoice API client.
//!
//! `NotFound` gets a dedicated variant because callers distinguish "the
//! resource does not exist" from "the server failed". All other unexpected
//! statuses land in `HttpError` with the raw status code and body.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested customer or invoice does not exist.
    #[error("resource not found")]
    NotFound,

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The host transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}
