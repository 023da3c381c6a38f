//! The challenge validator: compares a player's hand-written HTTP call
//! against the authored answer and explains the first mismatch.
//!
//! Comparison is pure and side-effect free. Checks run in a fixed order so
//! the player always gets the most fundamental correction first:
//!
//! 1. method (case-sensitive string equality)
//! 2. path (exact string equality, no pattern matching)
//! 3. body (structural JSON equality, key order irrelevant)
//!
//! The first mismatch wins; later checks are skipped entirely. A challenge
//! that expects no body ignores whatever body the player sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::challenge::{Challenge, ChallengeSet};

/// What the player typed into the in-game request editor. Lives for a single
/// validation call and is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerRequest {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Outcome of one validation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<Value>,
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Challenge '{id}' not found")]
    UnknownChallenge { id: String, known: Vec<String> },
}

/// Read-only challenge lookup, injected into the validator so tests and the
/// server can supply their own sets.
pub trait ChallengeLookup {
    fn challenge(&self, id: &str) -> Option<&Challenge>;
    fn challenge_ids(&self) -> Vec<String>;
}

impl ChallengeLookup for ChallengeSet {
    fn challenge(&self, id: &str) -> Option<&Challenge> {
        self.get(id)
    }

    fn challenge_ids(&self) -> Vec<String> {
        self.ids()
    }
}

impl<L: ChallengeLookup> ChallengeLookup for std::sync::Arc<L> {
    fn challenge(&self, id: &str) -> Option<&Challenge> {
        (**self).challenge(id)
    }

    fn challenge_ids(&self) -> Vec<String> {
        (**self).challenge_ids()
    }
}

/// Stateless validation service over an injected challenge lookup.
pub struct Validator<L> {
    challenges: L,
}

impl<L: ChallengeLookup> Validator<L> {
    pub fn new(challenges: L) -> Self {
        Self { challenges }
    }

    /// Validate one attempt against one challenge.
    ///
    /// Only an unknown challenge id is an error; a wrong answer is a normal
    /// `ValidationResult` with `correct: false`.
    pub fn validate(
        &self,
        challenge_id: &str,
        request: &PlayerRequest,
    ) -> Result<ValidationResult, ValidationError> {
        let challenge = self.challenges.challenge(challenge_id).ok_or_else(|| {
            ValidationError::UnknownChallenge {
                id: challenge_id.to_string(),
                known: self.challenges.challenge_ids(),
            }
        })?;
        Ok(check(challenge, request))
    }
}

/// Compare one request against one challenge.
pub fn check(challenge: &Challenge, request: &PlayerRequest) -> ValidationResult {
    let expected = &challenge.correct_endpoint;

    if request.method != expected.method {
        return mismatch(
            format!("Wrong HTTP method. Expected {}", expected.method),
            None,
            challenge,
        );
    }

    if request.path != expected.path {
        return mismatch(
            "Incorrect endpoint path".to_string(),
            Some(format!("The expected path is {}", expected.path)),
            challenge,
        );
    }

    if let Some(expected_body) = &expected.body {
        // Value equality is structural, so {"a":1,"b":2} matches regardless
        // of the order the player typed the keys in.
        if request.body.as_ref() != Some(expected_body) {
            let rendered = serde_json::to_string(expected_body).unwrap_or_default();
            return mismatch(
                "Request body does not match expected format".to_string(),
                Some(format!("Expected body: {rendered}")),
                challenge,
            );
        }
    }

    ValidationResult {
        correct: true,
        message: Some(challenge.success_message.clone()),
        hints: Vec::new(),
        reward: challenge.reward.clone(),
    }
}

fn mismatch(message: String, detail: Option<String>, challenge: &Challenge) -> ValidationResult {
    let mut hints = Vec::new();
    if let Some(detail) = detail {
        hints.push(detail);
    }
    if !challenge.hint.is_empty() {
        hints.push(challenge.hint.clone());
    }
    ValidationResult {
        correct: false,
        message: Some(message),
        hints,
        reward: None,
    }
}
