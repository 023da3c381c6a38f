//! HTTP server assembly.
//!
//! Builds the axum router over the world, challenge and meta handlers, wires
//! in the two teaching fallbacks (unknown path, wrong verb) and starts the
//! listener. Route registration must stay in step with the endpoint catalog;
//! the fallbacks and `GET /endpoints` both describe the surface from there.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, Uri};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::api::routes::{challenges, meta, player, world};
use crate::api::state::ApiState;
use crate::catalog;
use crate::challenge::ChallengeSet;
use crate::config::{LimitConfig, ServerConfig};
use crate::error::ApiError;

// ============================================================================
// FALLBACKS
// ============================================================================

/// Nothing lives at this path at all.
async fn unknown_path(method: Method, uri: Uri) -> ApiError {
    warn!(%method, path = %uri.path(), "unknown path");
    let err = ApiError::not_found(format!("No such path: {}", uri.path()));
    // A trailing slash is the usual culprit; point straight at the fix.
    let trimmed = uri.path().trim_end_matches('/');
    if !trimmed.is_empty() && catalog::knows_path(trimmed) {
        return err.with_hint(format!("Did you mean '{trimmed}'? Trailing slashes count."));
    }
    let roots = catalog::top_level_paths().join(", ");
    err.with_hint(format!(
        "GET /endpoints lists every route. Places to explore: {roots}"
    ))
}

/// The path exists but not with this verb. The catalog supplies the verbs
/// that would have worked.
async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    warn!(%method, path = %uri.path(), "method not allowed");
    let err = ApiError::method_not_allowed(format!(
        "Method {} is not allowed for {}",
        method,
        uri.path()
    ));
    let allowed = catalog::allowed_methods(uri.path());
    if allowed.is_empty() {
        err.with_hint("GET /endpoints lists every route and its verbs.")
    } else {
        err.with_hint(format!("{} supports: {}", uri.path(), allowed.join(", ")))
    }
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn build_router(state: Arc<ApiState>, limits: &LimitConfig) -> Router {
    Router::new()
        // Meta
        .route("/health", get(meta::health))
        .route("/status", get(meta::server_status))
        .route("/endpoints", get(meta::list_endpoints))
        // Challenges
        .route("/challenges", get(challenges::list_challenges))
        .route("/challenges/validate", post(challenges::validate_challenge))
        .route("/challenges/:id", get(challenges::get_challenge))
        // World: items get the full verb set, the rest stay deliberately
        // narrow so wrong verbs become 405 lessons
        .route("/items", get(world::list_items).post(world::create_item))
        .route(
            "/items/:id",
            get(world::get_item)
                .patch(world::patch_item)
                .put(world::replace_item)
                .delete(world::delete_item),
        )
        .route("/doors", get(world::list_doors))
        .route("/doors/:id", get(world::get_door).patch(world::patch_door))
        .route("/npcs", get(world::list_npcs))
        .route("/npcs/:id", get(world::get_npc).patch(world::patch_npc))
        .route("/enemies", get(world::list_enemies))
        .route(
            "/enemies/:id",
            get(world::get_enemy).delete(world::defeat_enemy),
        )
        // Player and inventory
        .route(
            "/player",
            get(player::get_player)
                .patch(player::patch_player)
                .put(player::replace_player),
        )
        .route(
            "/inventory",
            get(player::get_inventory).post(player::add_to_inventory),
        )
        .route("/inventory/:item_id", delete(player::drop_item))
        .route("/world/reset", post(world::reset_world))
        .fallback(unknown_path)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // The cap is enforced per-extractor so an oversized body surfaces as
        // a rejection the handlers can turn into an envelope, instead of a
        // bare middleware response.
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .with_state(state)
}

// ============================================================================
// SERVER STARTUP
// ============================================================================

pub async fn run_server(config: &ServerConfig, challenges: ChallengeSet) -> anyhow::Result<()> {
    let challenge_count = challenges.len().to_string();
    let state = Arc::new(ApiState::new(challenges));
    let app = build_router(state, &config.limits);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("╔══════════════════════════════════════════════════════════════╗");
    info!("║             Fetch Legends - HTTP Learning Server             ║");
    info!("╠══════════════════════════════════════════════════════════════╣");
    info!("║  Challenges:   {:44}  ║", challenge_count);
    info!("║  Listening on: {:44}  ║", addr);
    info!("╠══════════════════════════════════════════════════════════════╣");
    info!("║  Start here:                                                 ║");
    info!("║    GET  /challenges          - The campaign                  ║");
    info!("║    POST /challenges/validate - Check an attempt              ║");
    info!("║    GET  /endpoints           - Everything you can call       ║");
    info!("╚══════════════════════════════════════════════════════════════╝");

    for doc in catalog::ENDPOINTS {
        debug!("{:6} {:26} {}", doc.method, doc.path, doc.description);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Route conflicts panic at registration time, so building once is a
    // meaningful check on its own.
    #[test]
    fn test_router_builds() {
        let state = Arc::new(ApiState::new(ChallengeSet::builtin()));
        let _ = build_router(state, &LimitConfig::default());
    }

    #[tokio::test]
    async fn test_method_not_allowed_names_the_right_verbs() {
        let err = method_not_allowed(Method::DELETE, "/doors/entrance".parse().unwrap()).await;
        match err {
            ApiError::MethodNotAllowed { message, hint } => {
                assert_eq!(message, "Method DELETE is not allowed for /doors/entrance");
                let hint = hint.unwrap();
                assert!(hint.contains("GET"));
                assert!(hint.contains("PATCH"));
                assert!(!hint.contains("DELETE"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_path_points_at_the_catalog() {
        let err = unknown_path(Method::GET, "/treasure".parse().unwrap()).await;
        match err {
            ApiError::NotFound { message, hint } => {
                assert_eq!(message, "No such path: /treasure");
                let hint = hint.unwrap();
                assert!(hint.contains("/endpoints"));
                assert!(hint.contains("/items"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_gets_a_nudge() {
        let err = unknown_path(Method::GET, "/items/".parse().unwrap()).await;
        match err {
            ApiError::NotFound { message, hint } => {
                assert_eq!(message, "No such path: /items/");
                assert!(hint.unwrap().contains("Did you mean '/items'?"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
