//! Player endpoints: the player record and the inventory.
//!
//! The player is a singleton resource, which makes it the natural place to
//! teach the PATCH-vs-PUT distinction: PATCH merges fields, PUT demands the
//! whole record.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::routes::{decode_body, RawBody};
use crate::api::state::ApiState;
use crate::error::ApiError;
use crate::world::{Item, Player, PlayerPatch};

const PLAYER_PATCH_EXAMPLE: &str = r#"{"name": "Sir Fetchalot"}"#;
const PLAYER_PUT_EXAMPLE: &str =
    r#"{"name": "Sir Fetchalot", "x": 0, "y": 0, "health": 100}"#;
const INVENTORY_ADD_EXAMPLE: &str = r#"{"item": "rusty_key"}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InventoryAddRequest {
    /// Id of a world item to pick up.
    pub item: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedItemResponse {
    pub dropped: Item,
}

/// GET /player
pub async fn get_player(State(state): State<Arc<ApiState>>) -> Json<Player> {
    Json(state.world.player())
}

/// PATCH /player
pub async fn patch_player(
    State(state): State<Arc<ApiState>>,
    RawBody(body): RawBody,
) -> Result<Json<Player>, ApiError> {
    let patch: PlayerPatch = decode_body(&body, PLAYER_PATCH_EXAMPLE)?;
    Ok(Json(state.world.patch_player(patch)))
}

/// PUT /player
pub async fn replace_player(
    State(state): State<Arc<ApiState>>,
    RawBody(body): RawBody,
) -> Result<Json<Player>, ApiError> {
    let replacement: Player = decode_body(&body, PLAYER_PUT_EXAMPLE)?;
    let player = state.world.replace_player(replacement);
    info!(name = %player.name, "player replaced");
    Ok(Json(player))
}

/// GET /inventory
pub async fn get_inventory(State(state): State<Arc<ApiState>>) -> Json<Vec<Item>> {
    Json(state.world.inventory())
}

/// POST /inventory
pub async fn add_to_inventory(
    State(state): State<Arc<ApiState>>,
    RawBody(body): RawBody,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let request: InventoryAddRequest = decode_body(&body, INVENTORY_ADD_EXAMPLE)?;
    let item = state.world.add_to_inventory(&request.item)?;
    info!(item = %item.id, "item picked up");
    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE /inventory/:item_id
pub async fn drop_item(
    State(state): State<Arc<ApiState>>,
    Path(item_id): Path<String>,
) -> Result<Json<DroppedItemResponse>, ApiError> {
    let dropped = state.world.drop_from_inventory(&item_id)?;
    info!(item = %item_id, "item dropped");
    Ok(Json(DroppedItemResponse { dropped }))
}
