//! Error types and handling for the `VoiceRelay` service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the `VoiceRelay` service
#[derive(Error, Debug)]
pub enum VoiceRelayError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream provider answered with a non-success status
    #[error("{status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Transport failure talking to a provider (connect, timeout, body read)
    #[error("{source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Provider response did not have the expected shape
    #[error("{message}")]
    Decode { message: String },

    /// Provider answered successfully but had nothing to return
    #[error("{message}")]
    NotFound { message: String },
}

impl VoiceRelayError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream status error
    pub fn upstream<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

/// JSON error envelope returned to clients: `{"error": ..., "details"?: ...}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error envelope paired with the HTTP status it is sent with
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                details: None,
            },
        }
    }

    /// Error payload sent with a 200 status. "Nothing found" answers keep the
    /// shape clients already parse.
    pub fn soft<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::OK, message)
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    #[must_use]
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.body.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
