//! Authored challenges: the puzzles that pair an in-game obstacle with the
//! exact HTTP call that resolves it.
//!
//! Challenges are immutable once loaded. The server ships a builtin tutorial
//! campaign and can also load packs from TOML files, so new puzzles never
//! require a recompile.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// HTTP verbs a challenge is allowed to expect.
pub const KNOWN_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

/// The exact call that resolves a challenge. Fixed at authoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Uppercase verb, e.g. `PATCH`.
    pub method: String,
    /// Exact path, e.g. `/doors/entrance`. Query strings are not part of
    /// any lesson and never appear here.
    pub path: String,
    /// Expected JSON body, if the verb carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// One authored puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    /// Stable id the client submits attempts against.
    pub id: String,
    /// What the player sees: the in-game obstacle.
    pub description: String,
    /// Teaching nudge shown alongside any failed attempt.
    #[serde(default)]
    pub hint: String,
    /// The answer. Never serialized to players; see the API layer.
    pub correct_endpoint: EndpointSpec,
    /// Flavor text returned on a correct attempt.
    pub success_message: String,
    /// Optional in-game payout attached to a correct attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<Value>,
}

/// On-disk authoring format: one TOML file holding a batch of challenges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengePack {
    #[serde(default = "default_pack_version")]
    pub version: String,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

fn default_pack_version() -> String {
    "1".to_string()
}

impl ChallengePack {
    /// Load a single pack from a TOML file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read challenge pack: {}", path.display()))?;
        let pack: ChallengePack = toml::from_str(&content)
            .with_context(|| format!("Failed to parse challenge pack: {}", path.display()))?;
        Ok(pack)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ChallengeSetError {
    #[error("Challenge with empty id")]
    EmptyId,
    #[error("Duplicate challenge id: {0}")]
    DuplicateId(String),
    #[error("Challenge '{id}' expects unknown HTTP method '{method}'")]
    UnknownMethod { id: String, method: String },
}

/// Immutable, ordered collection of challenges with id lookup.
///
/// Authored order is preserved so the campaign reads as a progression.
#[derive(Debug, Clone, Default)]
pub struct ChallengeSet {
    order: Vec<String>,
    by_id: HashMap<String, Challenge>,
}

impl ChallengeSet {
    /// Build a set, rejecting empty ids, duplicates and unknown verbs.
    pub fn from_challenges(
        challenges: impl IntoIterator<Item = Challenge>,
    ) -> Result<Self, ChallengeSetError> {
        let mut set = Self::default();
        for challenge in challenges {
            if challenge.id.trim().is_empty() {
                return Err(ChallengeSetError::EmptyId);
            }
            if !KNOWN_METHODS.contains(&challenge.correct_endpoint.method.as_str()) {
                return Err(ChallengeSetError::UnknownMethod {
                    id: challenge.id,
                    method: challenge.correct_endpoint.method,
                });
            }
            if set.by_id.contains_key(&challenge.id) {
                return Err(ChallengeSetError::DuplicateId(challenge.id));
            }
            set.order.push(challenge.id.clone());
            set.by_id.insert(challenge.id.clone(), challenge);
        }
        Ok(set)
    }

    /// Load every `*.toml` pack in a directory, in filename order.
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read challenge directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let mut challenges = Vec::new();
        for path in &paths {
            challenges.extend(ChallengePack::from_path(path)?.challenges);
        }
        let set = Self::from_challenges(challenges)
            .with_context(|| format!("Invalid challenge pack in {}", dir.display()))?;
        anyhow::ensure!(
            !set.is_empty(),
            "No challenges found under {}",
            dir.display()
        );
        Ok(set)
    }

    /// The builtin tutorial campaign: one lesson per HTTP verb.
    pub fn builtin() -> Self {
        let challenges = vec![
            Challenge {
                id: "look_around".to_string(),
                description: "You wake up in a dim cave with an empty pack. \
                              Get a list of every item lying around you."
                    .to_string(),
                hint: "GET fetches a resource without changing it. List endpoints \
                       take no body."
                    .to_string(),
                correct_endpoint: EndpointSpec {
                    method: "GET".to_string(),
                    path: "/items".to_string(),
                    body: None,
                },
                success_message: "Your eyes adjust. A rusty key and an unlit torch \
                                  glint in the gravel."
                    .to_string(),
                reward: Some(json!({ "xp": 10 })),
            },
            Challenge {
                id: "ask_the_sage".to_string(),
                description: "A hooded figure sits by the wall. Fetch the NPC with \
                              id 'sage' to hear what they have to say."
                    .to_string(),
                hint: "Single resources live under their collection: /npcs/<id>.".to_string(),
                correct_endpoint: EndpointSpec {
                    method: "GET".to_string(),
                    path: "/npcs/sage".to_string(),
                    body: None,
                },
                success_message: "The sage looks up: 'The door yields to those who \
                                  PATCH, not to those who push.'"
                    .to_string(),
                reward: Some(json!({ "xp": 10 })),
            },
            Challenge {
                id: "grab_the_key".to_string(),
                description: "That rusty key looks useful. Add it to your inventory."
                    .to_string(),
                hint: "POST creates something new inside a collection. Send the item \
                       id in the body."
                    .to_string(),
                correct_endpoint: EndpointSpec {
                    method: "POST".to_string(),
                    path: "/inventory".to_string(),
                    body: Some(json!({ "item": "rusty_key" })),
                },
                success_message: "The rusty key is in your pack. It hums faintly.".to_string(),
                reward: Some(json!({ "xp": 15 })),
            },
            Challenge {
                id: "unlock_door_1".to_string(),
                description: "The entrance door is locked. Change its 'locked' field \
                              to get through."
                    .to_string(),
                hint: "PATCH updates only the fields you send, leaving the rest \
                       untouched."
                    .to_string(),
                correct_endpoint: EndpointSpec {
                    method: "PATCH".to_string(),
                    path: "/doors/entrance".to_string(),
                    body: Some(json!({ "locked": false })),
                },
                success_message: "The lock clicks. The entrance door swings open.".to_string(),
                reward: Some(json!({ "xp": 25, "item": "dungeon_map" })),
            },
            Challenge {
                id: "become_the_hero".to_string(),
                description: "The hall of mirrors replaces you with whoever you \
                              declare. Replace the whole player record with name \
                              'Sir Fetchalot', position (0, 0) and health 100."
                    .to_string(),
                hint: "PUT replaces the entire resource, so every field must be in \
                       the body."
                    .to_string(),
                correct_endpoint: EndpointSpec {
                    method: "PUT".to_string(),
                    path: "/player".to_string(),
                    body: Some(json!({
                        "name": "Sir Fetchalot",
                        "x": 0,
                        "y": 0,
                        "health": 100
                    })),
                },
                success_message: "The mirror ripples. Sir Fetchalot steps out, \
                                  polished and whole."
                    .to_string(),
                reward: Some(json!({ "xp": 25 })),
            },
            Challenge {
                id: "defeat_the_slime".to_string(),
                description: "A slime blocks the corridor. Remove it. Permanently."
                    .to_string(),
                hint: "DELETE removes a resource for good. No body needed.".to_string(),
                correct_endpoint: EndpointSpec {
                    method: "DELETE".to_string(),
                    path: "/enemies/slime".to_string(),
                    body: None,
                },
                success_message: "The slime dissolves with an indignant squelch. The \
                                  corridor is clear."
                    .to_string(),
                reward: Some(json!({ "xp": 30, "item": "slime_residue" })),
            },
        ];
        // Static campaign, checked by tests; construction cannot fail.
        Self::from_challenges(challenges).expect("builtin campaign is valid")
    }

    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.by_id.get(id)
    }

    /// Challenge ids in authored order.
    pub fn ids(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Challenges in authored order.
    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
