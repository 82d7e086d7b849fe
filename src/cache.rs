//! In-process TTL cache for game overviews.
//!
//! Overviews are the hottest read and are assembled from four tables; keeping
//! the rendered JSON for a few seconds spares Postgres without changing what
//! members may see. Every write touching a game drops its entry.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde_json::Value;
use uuid::Uuid;

static OVERVIEWS: Lazy<DashMap<Uuid, (Instant, Value)>> = Lazy::new(DashMap::new);

/// Cached overview for a game, if still fresh.
pub fn get(game_id: Uuid, max_age: Duration) -> Option<Value> {
    OVERVIEWS
        .get(&game_id)
        .filter(|entry| entry.0.elapsed() <= max_age)
        .map(|entry| entry.1.clone())
}

pub fn put(game_id: Uuid, body: Value) {
    OVERVIEWS.insert(game_id, (Instant::now(), body));
}

pub fn invalidate(game_id: Uuid) {
    OVERVIEWS.remove(&game_id);
}
