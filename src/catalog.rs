//! Static endpoint catalog.
//!
//! Single source of truth for what the API surface looks like. It backs the
//! public `GET /endpoints` listing and the teaching hints attached to 404
//! (unknown path) and 405 (wrong verb) responses. Route registration in the
//! server module must stay in step with this table.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EndpointDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const fn doc(
    method: &'static str,
    path: &'static str,
    description: &'static str,
) -> EndpointDoc {
    EndpointDoc {
        method,
        path,
        description,
    }
}

/// Every route the server exposes, in presentation order.
pub const ENDPOINTS: &[EndpointDoc] = &[
    doc("GET", "/health", "Liveness probe; answers OK"),
    doc("GET", "/status", "Server status and attempt counters"),
    doc("GET", "/endpoints", "This listing"),
    doc("GET", "/challenges", "List the campaign (without answers)"),
    doc("GET", "/challenges/:id", "A single challenge"),
    doc("POST", "/challenges/validate", "Check an attempt against a challenge"),
    doc("GET", "/items", "List every item lying around the world"),
    doc("POST", "/items", "Create a new item"),
    doc("GET", "/items/:id", "A single item"),
    doc("PATCH", "/items/:id", "Update some fields of an item"),
    doc("PUT", "/items/:id", "Replace an item wholesale"),
    doc("DELETE", "/items/:id", "Remove an item from the world"),
    doc("GET", "/doors", "List the doors"),
    doc("GET", "/doors/:id", "A single door"),
    doc("PATCH", "/doors/:id", "Update a door, e.g. its locked field"),
    doc("GET", "/npcs", "List the NPCs"),
    doc("GET", "/npcs/:id", "Talk to an NPC"),
    doc("PATCH", "/npcs/:id", "Update an NPC's mood or dialogue"),
    doc("GET", "/enemies", "List the enemies still standing"),
    doc("GET", "/enemies/:id", "Size up a single enemy"),
    doc("DELETE", "/enemies/:id", "Defeat an enemy"),
    doc("GET", "/player", "The player record"),
    doc("PATCH", "/player", "Update some player fields"),
    doc("PUT", "/player", "Replace the whole player record"),
    doc("GET", "/inventory", "What the player is carrying"),
    doc("POST", "/inventory", "Pick up an item ({\"item\": \"<id>\"})"),
    doc("DELETE", "/inventory/:item_id", "Drop a carried item"),
    doc("POST", "/world/reset", "Restore the world to its starting layout"),
];

/// Methods the API accepts on a concrete request path.
///
/// `:param` segments in catalog paths match any single segment, mirroring the
/// router. The router also resolves a literal route over a `:param` capture
/// when both fit, so a literal catalog path shadows pattern rows here the
/// same way. A query string on the request path is ignored.
pub fn allowed_methods(path: &str) -> Vec<&'static str> {
    let path = strip_query(path);
    let mut methods = Vec::new();
    for doc in ENDPOINTS {
        if doc.path == path && !methods.contains(&doc.method) {
            methods.push(doc.method);
        }
    }
    if methods.is_empty() {
        for doc in ENDPOINTS {
            if pattern_matches(doc.path, path) && !methods.contains(&doc.method) {
                methods.push(doc.method);
            }
        }
    }
    methods
}

/// Whether any route at all lives at this path.
pub fn knows_path(path: &str) -> bool {
    !allowed_methods(path).is_empty()
}

/// The collection roots, for pointing lost players somewhere useful.
pub fn top_level_paths() -> Vec<&'static str> {
    let mut roots = Vec::new();
    for doc in ENDPOINTS {
        let root = match doc.path[1..].split('/').next() {
            Some(first) if !first.is_empty() => first,
            _ => continue,
        };
        let full = &doc.path[..root.len() + 1];
        if !roots.contains(&full) {
            roots.push(full);
        }
    }
    roots
}

fn strip_query(path: &str) -> &str {
    match path.split_once('?') {
        Some((before, _)) => before,
        None => path,
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segs = pattern.split('/');
    let mut path_segs = path.split('/');
    loop {
        match (pattern_segs.next(), path_segs.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) => {
                if p.starts_with(':') {
                    if s.is_empty() {
                        return false;
                    }
                } else if p != s {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
