//! The in-memory game world: items, doors, NPCs, enemies, the player and
//! their inventory.
//!
//! The world exists so players have something real to poke at while solving
//! challenges. Every mutation here is honest REST practice: PATCH merges,
//! PUT replaces, DELETE removes. State lives behind one lock and resets to
//! the seeded tutorial layout on demand.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Where the item currently sits, e.g. `cave_floor` or `backpack`.
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub id: String,
    pub name: String,
    pub locked: bool,
    #[serde(default)]
    pub leads_to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub dialogue: String,
    #[serde(default)]
    pub mood: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub health: i32,
}

/// The player singleton. PUT replaces it wholesale, so deserialization
/// requires every field and tolerates no extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Player {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub health: i32,
}

// ============================================================================
// Mutation payloads
// ============================================================================
//
// PATCH bodies reject unknown fields on purpose: a typo like "lockd" should
// come back as a lesson, not be silently dropped.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DoorPatch {
    pub name: Option<String>,
    pub locked: Option<bool>,
    pub leads_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NpcPatch {
    pub name: Option<String>,
    pub dialogue: Option<String>,
    pub mood: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub health: Option<i32>,
}

/// POST /items payload. The id is optional; a fresh one is generated when
/// omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewItem {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

/// Item body for PUT /items/:id. The id comes from the path, never the body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Item,
    Door,
    Npc,
    Enemy,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Door => "Door",
            Self::Npc => "NPC",
            Self::Enemy => "Enemy",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Self::Item => "items",
            Self::Door => "doors",
            Self::Npc => "NPCs",
            Self::Enemy => "enemies",
        }
    }
}

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("{} '{id}' not found", .kind.label())]
    UnknownId {
        kind: EntityKind,
        id: String,
        known: Vec<String>,
    },
    #[error("Item '{0}' is already in the inventory")]
    AlreadyHeld(String),
    #[error("Item '{0}' already exists")]
    DuplicateId(String),
}

// ============================================================================
// World state
// ============================================================================

/// Mutable world contents. BTreeMaps keep listings in a stable order.
#[derive(Debug, Clone)]
struct WorldState {
    items: BTreeMap<String, Item>,
    doors: BTreeMap<String, Door>,
    npcs: BTreeMap<String, Npc>,
    enemies: BTreeMap<String, Enemy>,
    player: Player,
    /// Items the player carries. Picking up moves an item out of `items`.
    inventory: Vec<Item>,
}

impl WorldState {
    /// The tutorial layout every fresh server (and every reset) starts from.
    /// The builtin campaign's puzzles all reference entities seeded here.
    fn seeded() -> Self {
        let items = [
            Item {
                id: "rusty_key".to_string(),
                name: "Rusty Key".to_string(),
                description: "Old iron, still solid. Looks like it fits something nearby."
                    .to_string(),
                location: "cave_floor".to_string(),
            },
            Item {
                id: "torch".to_string(),
                name: "Unlit Torch".to_string(),
                description: "Pitch-soaked and ready, if you ever find a flame.".to_string(),
                location: "cave_floor".to_string(),
            },
        ];
        let doors = [
            Door {
                id: "entrance".to_string(),
                name: "Entrance Door".to_string(),
                locked: true,
                leads_to: "corridor".to_string(),
            },
            Door {
                id: "vault".to_string(),
                name: "Vault Door".to_string(),
                locked: true,
                leads_to: "treasure_room".to_string(),
            },
        ];
        let npcs = [Npc {
            id: "sage".to_string(),
            name: "The Cave Sage".to_string(),
            dialogue: "The door yields to those who PATCH, not to those who push.".to_string(),
            mood: "cryptic".to_string(),
        }];
        let enemies = [
            Enemy {
                id: "slime".to_string(),
                name: "Corridor Slime".to_string(),
                health: 10,
            },
            Enemy {
                id: "goblin".to_string(),
                name: "Vault Goblin".to_string(),
                health: 25,
            },
        ];

        Self {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
            doors: doors.into_iter().map(|d| (d.id.clone(), d)).collect(),
            npcs: npcs.into_iter().map(|n| (n.id.clone(), n)).collect(),
            enemies: enemies.into_iter().map(|e| (e.id.clone(), e)).collect(),
            player: Player {
                name: "Adventurer".to_string(),
                x: 0,
                y: 0,
                health: 100,
            },
            inventory: Vec::new(),
        }
    }
}

/// Shared handle to the live world. Cheap to clone behind an `Arc` at the
/// API layer; all methods lock internally.
pub struct GameWorld {
    state: RwLock<WorldState>,
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::seeded()
    }
}

impl GameWorld {
    pub fn seeded() -> Self {
        Self {
            state: RwLock::new(WorldState::seeded()),
        }
    }

    /// Throw away all mutations and restore the tutorial layout.
    pub fn reset(&self) {
        *self.state.write() = WorldState::seeded();
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    pub fn items(&self) -> Vec<Item> {
        self.state.read().items.values().cloned().collect()
    }

    pub fn item(&self, id: &str) -> Result<Item, WorldError> {
        let state = self.state.read();
        state
            .items
            .get(id)
            .cloned()
            .ok_or_else(|| unknown(EntityKind::Item, id, state.items.keys()))
    }

    pub fn create_item(&self, new: NewItem) -> Result<Item, WorldError> {
        let mut state = self.state.write();
        let id = new
            .id
            .unwrap_or_else(|| format!("item_{}", Uuid::new_v4().simple()));
        if state.items.contains_key(&id) || state.inventory.iter().any(|i| i.id == id) {
            return Err(WorldError::DuplicateId(id));
        }
        let item = Item {
            id: id.clone(),
            name: new.name,
            description: new.description,
            location: new.location,
        };
        state.items.insert(id, item.clone());
        Ok(item)
    }

    pub fn patch_item(&self, id: &str, patch: ItemPatch) -> Result<Item, WorldError> {
        let mut state = self.state.write();
        let known: Vec<String> = state.items.keys().cloned().collect();
        let item = state
            .items
            .get_mut(id)
            .ok_or(WorldError::UnknownId {
                kind: EntityKind::Item,
                id: id.to_string(),
                known,
            })?;
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(location) = patch.location {
            item.location = location;
        }
        Ok(item.clone())
    }

    /// PUT semantics: replace when present, create at this id when absent.
    /// An id the player carries is rejected; a held item lives in the pack,
    /// not on the floor. Returns `true` in the second slot when the item
    /// was created.
    pub fn replace_item(&self, id: &str, body: ItemBody) -> Result<(Item, bool), WorldError> {
        let mut state = self.state.write();
        if state.inventory.iter().any(|i| i.id == id) {
            return Err(WorldError::AlreadyHeld(id.to_string()));
        }
        let item = Item {
            id: id.to_string(),
            name: body.name,
            description: body.description,
            location: body.location,
        };
        let created = state.items.insert(id.to_string(), item.clone()).is_none();
        Ok((item, created))
    }

    pub fn delete_item(&self, id: &str) -> Result<Item, WorldError> {
        let mut state = self.state.write();
        match state.items.remove(id) {
            Some(item) => Ok(item),
            None => Err(unknown(EntityKind::Item, id, state.items.keys())),
        }
    }

    // ------------------------------------------------------------------
    // Doors
    // ------------------------------------------------------------------

    pub fn doors(&self) -> Vec<Door> {
        self.state.read().doors.values().cloned().collect()
    }

    pub fn door(&self, id: &str) -> Result<Door, WorldError> {
        let state = self.state.read();
        state
            .doors
            .get(id)
            .cloned()
            .ok_or_else(|| unknown(EntityKind::Door, id, state.doors.keys()))
    }

    pub fn patch_door(&self, id: &str, patch: DoorPatch) -> Result<Door, WorldError> {
        let mut state = self.state.write();
        let known: Vec<String> = state.doors.keys().cloned().collect();
        let door = state.doors.get_mut(id).ok_or(WorldError::UnknownId {
            kind: EntityKind::Door,
            id: id.to_string(),
            known,
        })?;
        if let Some(name) = patch.name {
            door.name = name;
        }
        if let Some(locked) = patch.locked {
            door.locked = locked;
        }
        if let Some(leads_to) = patch.leads_to {
            door.leads_to = leads_to;
        }
        Ok(door.clone())
    }

    // ------------------------------------------------------------------
    // NPCs
    // ------------------------------------------------------------------

    pub fn npcs(&self) -> Vec<Npc> {
        self.state.read().npcs.values().cloned().collect()
    }

    pub fn npc(&self, id: &str) -> Result<Npc, WorldError> {
        let state = self.state.read();
        state
            .npcs
            .get(id)
            .cloned()
            .ok_or_else(|| unknown(EntityKind::Npc, id, state.npcs.keys()))
    }

    pub fn patch_npc(&self, id: &str, patch: NpcPatch) -> Result<Npc, WorldError> {
        let mut state = self.state.write();
        let known: Vec<String> = state.npcs.keys().cloned().collect();
        let npc = state.npcs.get_mut(id).ok_or(WorldError::UnknownId {
            kind: EntityKind::Npc,
            id: id.to_string(),
            known,
        })?;
        if let Some(name) = patch.name {
            npc.name = name;
        }
        if let Some(dialogue) = patch.dialogue {
            npc.dialogue = dialogue;
        }
        if let Some(mood) = patch.mood {
            npc.mood = mood;
        }
        Ok(npc.clone())
    }

    // ------------------------------------------------------------------
    // Enemies
    // ------------------------------------------------------------------

    pub fn enemies(&self) -> Vec<Enemy> {
        self.state.read().enemies.values().cloned().collect()
    }

    pub fn enemy(&self, id: &str) -> Result<Enemy, WorldError> {
        let state = self.state.read();
        state
            .enemies
            .get(id)
            .cloned()
            .ok_or_else(|| unknown(EntityKind::Enemy, id, state.enemies.keys()))
    }

    pub fn defeat_enemy(&self, id: &str) -> Result<Enemy, WorldError> {
        let mut state = self.state.write();
        match state.enemies.remove(id) {
            Some(enemy) => Ok(enemy),
            None => Err(unknown(EntityKind::Enemy, id, state.enemies.keys())),
        }
    }

    // ------------------------------------------------------------------
    // Player and inventory
    // ------------------------------------------------------------------

    pub fn player(&self) -> Player {
        self.state.read().player.clone()
    }

    pub fn patch_player(&self, patch: PlayerPatch) -> Player {
        let mut state = self.state.write();
        if let Some(name) = patch.name {
            state.player.name = name;
        }
        if let Some(x) = patch.x {
            state.player.x = x;
        }
        if let Some(y) = patch.y {
            state.player.y = y;
        }
        if let Some(health) = patch.health {
            state.player.health = health;
        }
        state.player.clone()
    }

    pub fn replace_player(&self, player: Player) -> Player {
        let mut state = self.state.write();
        state.player = player;
        state.player.clone()
    }

    pub fn inventory(&self) -> Vec<Item> {
        self.state.read().inventory.clone()
    }

    /// Pick up a world item: it moves from the floor into the pack.
    pub fn add_to_inventory(&self, item_id: &str) -> Result<Item, WorldError> {
        let mut state = self.state.write();
        if state.inventory.iter().any(|i| i.id == item_id) {
            return Err(WorldError::AlreadyHeld(item_id.to_string()));
        }
        let mut item = match state.items.remove(item_id) {
            Some(item) => item,
            None => return Err(unknown(EntityKind::Item, item_id, state.items.keys())),
        };
        item.location = "backpack".to_string();
        state.inventory.push(item.clone());
        Ok(item)
    }

    /// Drop a carried item back into the world.
    pub fn drop_from_inventory(&self, item_id: &str) -> Result<Item, WorldError> {
        let mut state = self.state.write();
        let pos = state.inventory.iter().position(|i| i.id == item_id);
        match pos {
            Some(pos) => {
                let mut item = state.inventory.remove(pos);
                item.location = "dropped".to_string();
                state.items.insert(item.id.clone(), item.clone());
                Ok(item)
            }
            None => Err(unknown(
                EntityKind::Item,
                item_id,
                state.inventory.iter().map(|i| &i.id),
            )),
        }
    }
}

fn unknown<'a>(
    kind: EntityKind,
    id: &str,
    known: impl Iterator<Item = &'a String>,
) -> WorldError {
    WorldError::UnknownId {
        kind,
        id: id.to_string(),
        known: known.cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_world_matches_tutorial_campaign() {
        let world = GameWorld::seeded();
        // Entities the builtin challenges reference must exist.
        assert!(world.item("rusty_key").is_ok());
        assert!(world.npc("sage").is_ok());
        assert!(world.enemy("slime").is_ok());
        let entrance = world.door("entrance").unwrap();
        assert!(entrance.locked);
    }

    #[test]
    fn test_patch_door_merges_fields() {
        let world = GameWorld::seeded();
        let door = world
            .patch_door(
                "entrance",
                DoorPatch {
                    locked: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!door.locked);
        // Untouched fields survive the patch.
        assert_eq!(door.name, "Entrance Door");
        assert_eq!(door.leads_to, "corridor");
    }

    #[test]
    fn test_patch_unknown_door_reports_alternatives() {
        let world = GameWorld::seeded();
        let err = world
            .patch_door("exit", DoorPatch::default())
            .unwrap_err();
        match err {
            WorldError::UnknownId { kind, id, known } => {
                assert_eq!(kind, EntityKind::Door);
                assert_eq!(id, "exit");
                assert!(known.contains(&"entrance".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_create_item_generates_id_when_omitted() {
        let world = GameWorld::seeded();
        let item = world
            .create_item(NewItem {
                id: None,
                name: "Glowing Mushroom".to_string(),
                description: String::new(),
                location: "cave_wall".to_string(),
            })
            .unwrap();
        assert!(item.id.starts_with("item_"));
        assert!(world.item(&item.id).is_ok());
    }

    #[test]
    fn test_create_item_rejects_duplicate_id() {
        let world = GameWorld::seeded();
        let err = world
            .create_item(NewItem {
                id: Some("torch".to_string()),
                name: "Second Torch".to_string(),
                description: String::new(),
                location: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, WorldError::DuplicateId(id) if id == "torch"));
    }

    #[test]
    fn test_replace_item_upserts() {
        let world = GameWorld::seeded();
        let (_, created) = world
            .replace_item(
                "torch",
                ItemBody {
                    name: "Lit Torch".to_string(),
                    description: "Finally burning.".to_string(),
                    location: "hand".to_string(),
                },
            )
            .unwrap();
        assert!(!created);
        assert_eq!(world.item("torch").unwrap().name, "Lit Torch");

        let (_, created) = world
            .replace_item(
                "rope",
                ItemBody {
                    name: "Rope".to_string(),
                    description: String::new(),
                    location: String::new(),
                },
            )
            .unwrap();
        assert!(created);
    }

    #[test]
    fn test_replace_held_item_is_rejected() {
        let world = GameWorld::seeded();
        world.add_to_inventory("rusty_key").unwrap();
        let err = world
            .replace_item(
                "rusty_key",
                ItemBody {
                    name: "Forged Key".to_string(),
                    description: String::new(),
                    location: "cave_floor".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, WorldError::AlreadyHeld(id) if id == "rusty_key"));
        // No floor copy was written: dropping brings back the real key.
        let dropped = world.drop_from_inventory("rusty_key").unwrap();
        assert_eq!(dropped.name, "Rusty Key");
        assert_eq!(world.item("rusty_key").unwrap().name, "Rusty Key");
    }

    #[test]
    fn test_inventory_pickup_moves_the_item() {
        let world = GameWorld::seeded();
        let item = world.add_to_inventory("rusty_key").unwrap();
        assert_eq!(item.location, "backpack");
        // No longer on the floor, now in the pack.
        assert!(world.item("rusty_key").is_err());
        assert_eq!(world.inventory().len(), 1);
    }

    #[test]
    fn test_inventory_rejects_double_pickup() {
        let world = GameWorld::seeded();
        world.add_to_inventory("rusty_key").unwrap();
        let err = world.add_to_inventory("rusty_key").unwrap_err();
        assert!(matches!(err, WorldError::AlreadyHeld(id) if id == "rusty_key"));
    }

    #[test]
    fn test_drop_returns_item_to_world() {
        let world = GameWorld::seeded();
        world.add_to_inventory("rusty_key").unwrap();
        let dropped = world.drop_from_inventory("rusty_key").unwrap();
        assert_eq!(dropped.location, "dropped");
        assert!(world.inventory().is_empty());
        assert!(world.item("rusty_key").is_ok());
    }

    #[test]
    fn test_drop_unknown_item_lists_carried_ids() {
        let world = GameWorld::seeded();
        world.add_to_inventory("torch").unwrap();
        let err = world.drop_from_inventory("rusty_key").unwrap_err();
        match err {
            WorldError::UnknownId { known, .. } => {
                assert_eq!(known, vec!["torch".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_defeat_enemy_removes_it() {
        let world = GameWorld::seeded();
        let slime = world.defeat_enemy("slime").unwrap();
        assert_eq!(slime.name, "Corridor Slime");
        assert!(world.enemy("slime").is_err());
        assert_eq!(world.enemies().len(), 1);
    }

    #[test]
    fn test_player_patch_and_replace() {
        let world = GameWorld::seeded();
        let patched = world.patch_player(PlayerPatch {
            health: Some(42),
            ..Default::default()
        });
        assert_eq!(patched.health, 42);
        assert_eq!(patched.name, "Adventurer");

        let replaced = world.replace_player(Player {
            name: "Sir Fetchalot".to_string(),
            x: 0,
            y: 0,
            health: 100,
        });
        assert_eq!(replaced.name, "Sir Fetchalot");
        assert_eq!(replaced.health, 100);
    }

    #[test]
    fn test_reset_restores_the_seed() {
        let world = GameWorld::seeded();
        world
            .patch_door(
                "entrance",
                DoorPatch {
                    locked: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        world.add_to_inventory("rusty_key").unwrap();
        world.defeat_enemy("slime").unwrap();

        world.reset();

        assert!(world.door("entrance").unwrap().locked);
        assert!(world.inventory().is_empty());
        assert!(world.enemy("slime").is_ok());
        assert!(world.item("rusty_key").is_ok());
    }

    #[test]
    fn test_listings_are_stably_ordered() {
        let world = GameWorld::seeded();
        let ids: Vec<_> = world.items().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["rusty_key".to_string(), "torch".to_string()]);
    }
}
