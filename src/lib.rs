//! Fetch Legends backend
//!
//! An educational game API: players fight monsters, open doors and grab loot
//! by writing real HTTP requests. Every puzzle ("challenge") hides one exact
//! call; the validator compares an attempt against it and explains the first
//! thing that went wrong.
//!
//! ## Module Structure
//!
//! - `challenge`: authored puzzles, packs and the builtin campaign
//! - `validator`: the pure request-vs-answer comparison core
//! - `world`: in-memory game entities and their CRUD operations
//! - `catalog`: the endpoint table behind /endpoints and the 404/405 hints
//! - `api`: REST handlers and shared state
//! - `server`: router assembly and startup
//! - `config`: server configuration
//! - `error`: error taxonomy and the teaching envelope

/// REST API
pub mod api;

/// Endpoint catalog
pub mod catalog;

/// Challenge definitions and loading
pub mod challenge;

/// Server configuration
pub mod config;

/// Error taxonomy
pub mod error;

/// HTTP server
pub mod server;

/// Attempt validation
pub mod validator;

/// Game world state
pub mod world;

pub use challenge::{Challenge, ChallengePack, ChallengeSet, EndpointSpec};
pub use config::{LimitConfig, ServerConfig};
pub use error::{ApiError, ErrorEnvelope};
pub use validator::{check, PlayerRequest, ValidationError, ValidationResult, Validator};
pub use world::GameWorld;
