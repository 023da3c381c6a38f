//! API state.
//!
//! One `ApiState` is built at startup and shared across all handlers behind
//! an `Arc`. Everything a handler needs arrives through it; no globals.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::challenge::ChallengeSet;
use crate::validator::Validator;
use crate::world::GameWorld;

pub struct ApiState {
    /// The live game world players poke at.
    pub world: GameWorld,
    /// The loaded campaign, shared with the validator.
    pub challenges: Arc<ChallengeSet>,
    /// Pure comparison service for challenge attempts.
    pub validator: Validator<Arc<ChallengeSet>>,
    pub started_at: DateTime<Utc>,
    /// Attempt counters, surfaced by GET /status. Per-player progress is a
    /// client concern; the server only keeps aggregates.
    pub attempts: AtomicU64,
    pub correct: AtomicU64,
}

impl ApiState {
    pub fn new(challenges: ChallengeSet) -> Self {
        let challenges = Arc::new(challenges);
        Self {
            world: GameWorld::seeded(),
            validator: Validator::new(Arc::clone(&challenges)),
            challenges,
            started_at: Utc::now(),
            attempts: AtomicU64::new(0),
            correct: AtomicU64::new(0),
        }
    }
}
