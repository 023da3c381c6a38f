//! API route handlers.
//!
//! Each submodule handles a specific group of endpoints:
//! - `challenges`: campaign listing and attempt validation
//! - `world`: items, doors, NPCs and enemies
//! - `player`: the player record and the inventory
//! - `meta`: health, status and the endpoint catalog

pub mod challenges;
pub mod meta;
pub mod player;
pub mod world;

// Re-export commonly used handlers for convenience
pub use challenges::{get_challenge, list_challenges, validate_challenge, ChallengeSummary};
pub use meta::{health, list_endpoints, server_status, StatusResponse};

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Request body as plain text. Handlers take this instead of axum's `String`
/// so that unreadable, oversized and non-UTF-8 bodies all come back as
/// teaching envelopes; [`decode_body`] then handles the JSON step.
#[derive(Debug)]
pub struct RawBody(pub String);

#[async_trait]
impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(ApiError::payload_too_large("Request body is too large")
                    .with_hint("Lessons never need more than a few lines of JSON."));
            }
            Err(rejection) => {
                return Err(ApiError::bad_request(format!(
                    "Could not read request body: {}",
                    rejection.body_text()
                )));
            }
        };
        match String::from_utf8(bytes.into()) {
            Ok(raw) => Ok(Self(raw)),
            Err(_) => Err(ApiError::bad_request("Request body is not valid UTF-8")
                .with_hint("Send the body as UTF-8 encoded JSON.")),
        }
    }
}

/// Decode a JSON request body by hand so every failure mode comes back as a
/// teaching envelope instead of a bare rejection.
pub(crate) fn decode_body<T: DeserializeOwned>(
    raw: &str,
    example: &'static str,
) -> Result<T, ApiError> {
    if raw.trim().is_empty() {
        return Err(ApiError::bad_request("Request body is empty")
            .with_hint("This endpoint expects a JSON body.")
            .with_example(example));
    }
    serde_json::from_str(raw).map_err(|err| {
        ApiError::bad_request(format!("Invalid request body: {err}"))
            .with_hint("Compare your JSON against the example.")
            .with_example(example)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Probe {
        locked: bool,
    }

    const EXAMPLE: &str = r#"{"locked": false}"#;

    #[tokio::test]
    async fn test_raw_body_reads_utf8_text() {
        let request = Request::builder()
            .body(Body::from(r#"{"locked": true}"#))
            .unwrap();
        let RawBody(raw) = RawBody::from_request(request, &()).await.unwrap();
        assert_eq!(raw, r#"{"locked": true}"#);
    }

    #[tokio::test]
    async fn test_raw_body_rejects_invalid_utf8() {
        // A truncated multi-byte sequence.
        let request = Request::builder()
            .body(Body::from(vec![0xf0, 0x9f, 0x92]))
            .unwrap();
        let err = RawBody::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Request body is not valid UTF-8");
    }

    #[test]
    fn test_decode_body_accepts_valid_json() {
        let probe: Probe = decode_body(r#"{"locked": true}"#, EXAMPLE).unwrap();
        assert!(probe.locked);
    }

    #[test]
    fn test_decode_body_flags_empty_bodies() {
        let err = decode_body::<Probe>("   ", EXAMPLE).unwrap_err();
        assert_eq!(err.to_string(), "Request body is empty");
    }

    #[test]
    fn test_decode_body_reports_the_parse_error() {
        let err = decode_body::<Probe>(r#"{"lockd": true}"#, EXAMPLE).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("unknown field"), "got: {rendered}");
    }
}
