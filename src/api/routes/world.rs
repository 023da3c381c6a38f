//! World endpoints: items, doors, NPCs and enemies.
//!
//! These are the practice targets. Each collection deliberately supports
//! only the verbs that make sense for it (doors cannot be DELETEd, enemies
//! cannot be PATCHed), so wrong-verb attempts turn into 405 lessons.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::routes::{decode_body, RawBody};
use crate::api::state::ApiState;
use crate::error::ApiError;
use crate::world::{
    Door, DoorPatch, Enemy, Item, ItemBody, ItemPatch, NewItem, Npc, NpcPatch,
};

const NEW_ITEM_EXAMPLE: &str =
    r#"{"name": "Glowing Mushroom", "description": "Faintly luminous.", "location": "cave_wall"}"#;
const ITEM_PATCH_EXAMPLE: &str = r#"{"location": "backpack"}"#;
const ITEM_PUT_EXAMPLE: &str =
    r#"{"name": "Lit Torch", "description": "Finally burning.", "location": "hand"}"#;
const DOOR_PATCH_EXAMPLE: &str = r#"{"locked": false}"#;
const NPC_PATCH_EXAMPLE: &str = r#"{"mood": "cheerful"}"#;

// ============================================================================
// Items
// ============================================================================

/// GET /items
pub async fn list_items(State(state): State<Arc<ApiState>>) -> Json<Vec<Item>> {
    Json(state.world.items())
}

/// GET /items/:id
pub async fn get_item(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.world.item(&id)?))
}

/// POST /items
pub async fn create_item(
    State(state): State<Arc<ApiState>>,
    RawBody(body): RawBody,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let new: NewItem = decode_body(&body, NEW_ITEM_EXAMPLE)?;
    let item = state.world.create_item(new)?;
    info!(item = %item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /items/:id
pub async fn patch_item(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    RawBody(body): RawBody,
) -> Result<Json<Item>, ApiError> {
    let patch: ItemPatch = decode_body(&body, ITEM_PATCH_EXAMPLE)?;
    Ok(Json(state.world.patch_item(&id, patch)?))
}

/// PUT /items/:id
pub async fn replace_item(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    RawBody(body): RawBody,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let replacement: ItemBody = decode_body(&body, ITEM_PUT_EXAMPLE)?;
    let (item, created) = state.world.replace_item(&id, replacement)?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(item)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedItemResponse {
    pub removed: Item,
}

/// DELETE /items/:id
pub async fn delete_item(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<RemovedItemResponse>, ApiError> {
    let removed = state.world.delete_item(&id)?;
    info!(item = %id, "item deleted");
    Ok(Json(RemovedItemResponse { removed }))
}

// ============================================================================
// Doors
// ============================================================================

/// GET /doors
pub async fn list_doors(State(state): State<Arc<ApiState>>) -> Json<Vec<Door>> {
    Json(state.world.doors())
}

/// GET /doors/:id
pub async fn get_door(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Door>, ApiError> {
    Ok(Json(state.world.door(&id)?))
}

/// PATCH /doors/:id
pub async fn patch_door(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    RawBody(body): RawBody,
) -> Result<Json<Door>, ApiError> {
    let patch: DoorPatch = decode_body(&body, DOOR_PATCH_EXAMPLE)?;
    let door = state.world.patch_door(&id, patch)?;
    if !door.locked {
        info!(door = %door.id, "door unlocked");
    }
    Ok(Json(door))
}

// ============================================================================
// NPCs
// ============================================================================

/// GET /npcs
pub async fn list_npcs(State(state): State<Arc<ApiState>>) -> Json<Vec<Npc>> {
    Json(state.world.npcs())
}

/// GET /npcs/:id
pub async fn get_npc(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Npc>, ApiError> {
    Ok(Json(state.world.npc(&id)?))
}

/// PATCH /npcs/:id
pub async fn patch_npc(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    RawBody(body): RawBody,
) -> Result<Json<Npc>, ApiError> {
    let patch: NpcPatch = decode_body(&body, NPC_PATCH_EXAMPLE)?;
    Ok(Json(state.world.patch_npc(&id, patch)?))
}

// ============================================================================
// Enemies
// ============================================================================

/// GET /enemies
pub async fn list_enemies(State(state): State<Arc<ApiState>>) -> Json<Vec<Enemy>> {
    Json(state.world.enemies())
}

/// GET /enemies/:id
pub async fn get_enemy(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Enemy>, ApiError> {
    Ok(Json(state.world.enemy(&id)?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefeatResponse {
    pub message: String,
    pub defeated: Enemy,
}

/// DELETE /enemies/:id
pub async fn defeat_enemy(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<DefeatResponse>, ApiError> {
    let defeated = state.world.defeat_enemy(&id)?;
    info!(enemy = %id, "enemy defeated");
    Ok(Json(DefeatResponse {
        message: format!("{} is defeated!", defeated.name),
        defeated,
    }))
}

// ============================================================================
// Reset
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub message: String,
}

/// POST /world/reset
pub async fn reset_world(State(state): State<Arc<ApiState>>) -> Json<ResetResponse> {
    state.world.reset();
    info!("world reset to its starting layout");
    Json(ResetResponse {
        message: "The world shimmers and snaps back to how it began.".to_string(),
    })
}
