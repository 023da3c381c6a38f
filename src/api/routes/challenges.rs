//! Challenge endpoints: campaign listing and attempt validation.
//!
//! Listings never include `correct_endpoint` or `success_message`; the whole
//! game is guessing the call, so the answer never crosses the wire until the
//! player has earned it.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::routes::{decode_body, RawBody};
use crate::api::state::ApiState;
use crate::challenge::Challenge;
use crate::error::ApiError;
use crate::validator::{PlayerRequest, ValidationResult};

const VALIDATE_EXAMPLE: &str = r#"{"challengeId": "unlock_door_1", "playerRequest": {"method": "PATCH", "path": "/doors/entrance", "body": {"locked": false}}}"#;

/// Player-facing view of a challenge: the puzzle without the answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSummary {
    pub id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl From<&Challenge> for ChallengeSummary {
    fn from(challenge: &Challenge) -> Self {
        Self {
            id: challenge.id.clone(),
            description: challenge.description.clone(),
            hint: (!challenge.hint.is_empty()).then(|| challenge.hint.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidateRequest {
    pub challenge_id: String,
    pub player_request: PlayerRequest,
}

/// GET /challenges
pub async fn list_challenges(
    State(state): State<Arc<ApiState>>,
) -> Json<Vec<ChallengeSummary>> {
    Json(state.challenges.iter().map(ChallengeSummary::from).collect())
}

/// GET /challenges/:id
pub async fn get_challenge(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeSummary>, ApiError> {
    let challenge = state
        .challenges
        .get(&id)
        .ok_or_else(|| ApiError::unknown_id("Challenge", "challenges", &id, &state.challenges.ids()))?;
    Ok(Json(ChallengeSummary::from(challenge)))
}

/// POST /challenges/validate
///
/// The body arrives as raw text so a malformed attempt gets the full
/// teaching envelope rather than axum's default rejection.
pub async fn validate_challenge(
    State(state): State<Arc<ApiState>>,
    RawBody(body): RawBody,
) -> Result<Json<ValidationResult>, ApiError> {
    let request: ValidateRequest = decode_body(&body, VALIDATE_EXAMPLE)?;
    let result = state
        .validator
        .validate(&request.challenge_id, &request.player_request)?;

    state.attempts.fetch_add(1, Ordering::Relaxed);
    if result.correct {
        state.correct.fetch_add(1, Ordering::Relaxed);
        info!(challenge = %request.challenge_id, "challenge solved");
    } else {
        info!(
            challenge = %request.challenge_id,
            method = %request.player_request.method,
            path = %request.player_request.path,
            "incorrect attempt"
        );
    }

    Ok(Json(result))
}
