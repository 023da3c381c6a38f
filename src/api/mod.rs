//! REST API implementation.

pub mod routes;
pub mod state;

pub use state::ApiState;
