//! Error taxonomy and the teaching error envelope.
//!
//! Every failure the API surfaces is meant to teach: 400/404/405/413
//! responses carry a human-readable hint (and sometimes a copy-pasteable
//! example), while 500 responses stay deliberately opaque.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::validator::ValidationError;
use crate::world::WorldError;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Errors a handler can return. Each variant maps to one row of the
/// error taxonomy; conversion to the envelope happens in `IntoResponse`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        hint: Option<String>,
        example: Option<String>,
    },

    #[error("{message}")]
    NotFound { message: String, hint: Option<String> },

    #[error("{message}")]
    MethodNotAllowed { message: String, hint: Option<String> },

    #[error("{message}")]
    PayloadTooLarge { message: String, hint: Option<String> },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            hint: None,
            example: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            hint: None,
        }
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
            hint: None,
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::PayloadTooLarge {
            message: message.into(),
            hint: None,
        }
    }

    /// 404 for a missing entity, with the valid ids as the teaching hint.
    pub fn unknown_id(label: &str, plural: &str, id: &str, known: &[String]) -> Self {
        let mut err = Self::not_found(format!("{label} '{id}' not found"));
        if !known.is_empty() {
            err = err.with_hint(format!("Known {plural}: {}", known.join(", ")));
        }
        err
    }

    /// Attach a hint. Internal errors stay opaque and ignore it.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        match &mut self {
            Self::BadRequest { hint: h, .. }
            | Self::NotFound { hint: h, .. }
            | Self::MethodNotAllowed { hint: h, .. }
            | Self::PayloadTooLarge { hint: h, .. } => *h = Some(hint.into()),
            Self::Internal(_) => {}
        }
        self
    }

    /// Attach a copy-pasteable example body. Only meaningful on 400s.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        if let Self::BadRequest { example: e, .. } = &mut self {
            *e = Some(example.into());
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownChallenge { id, known } => {
                ApiError::unknown_id("Challenge", "challenges", &id, &known)
            }
        }
    }
}

impl From<WorldError> for ApiError {
    fn from(err: WorldError) -> Self {
        match err {
            WorldError::UnknownId { kind, id, known } => {
                ApiError::unknown_id(kind.label(), kind.plural(), &id, &known)
            }
            WorldError::AlreadyHeld(id) => {
                ApiError::bad_request(format!("Item '{id}' is already in your inventory"))
                    .with_hint("GET /inventory shows everything you are carrying.")
            }
            WorldError::DuplicateId(id) => {
                ApiError::bad_request(format!("An item with id '{id}' already exists"))
                    .with_hint("Pick a different id, or omit it to get a generated one.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = match self {
            Self::BadRequest {
                message,
                hint,
                example,
            } => ErrorEnvelope {
                error: message,
                status_code: status.as_u16(),
                hint,
                example,
            },
            Self::NotFound { message, hint }
            | Self::MethodNotAllowed { message, hint }
            | Self::PayloadTooLarge { message, hint } => ErrorEnvelope {
                error: message,
                status_code: status.as_u16(),
                hint,
                example: None,
            },
            Self::Internal(err) => {
                // Detail goes to the log only; players get nothing to latch onto.
                tracing::error!("internal error: {err:#}");
                ErrorEnvelope {
                    error: "Something went wrong on our side".to_string(),
                    status_code: status.as_u16(),
                    hint: None,
                    example: None,
                }
            }
        };
        (status, Json(envelope)).into_response()
    }
}
