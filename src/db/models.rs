use chrono::{DateTime, Utc};
use geo::MultiPolygon;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, FromRow)]
pub struct League {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub admin_player_id: Uuid,
    pub invite_code: String,
    pub is_public: bool,
    pub max_members: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct LeagueMember {
    pub id: Uuid,
    pub league_id: Uuid,
    pub player_id: Uuid,
    pub status: String,
    pub joined_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
}

#[derive(Debug, FromRow)]
pub struct Game {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub status: String,
    pub duration_days: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub winner_player_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct PlayerBase {
    pub id: Uuid,
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub activity_id: Uuid,
    pub polygons: serde_json::Value,
    pub area_km2: f64,
    pub created_at: DateTime<Utc>,
    pub last_calculated_at: Option<DateTime<Utc>>,
}

/// Derived per-(game, player) aggregate; rewritten only by the claim engine
/// and seeded by base assignment.
#[derive(Debug, FromRow)]
pub struct Territory {
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub polygons: serde_json::Value,
    pub area_km2: f64,
    pub eliminated_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Territory {
    pub fn multipolygon(&self) -> Result<MultiPolygon<f64>> {
        serde_json::from_value(self.polygons.clone())
            .map_err(|e| Error::Retryable(format!("stored territory geometry is unreadable: {e}")))
    }
}

/// Read-only input row maintained by the external activity provider.
#[derive(Debug, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub player_id: Uuid,
    pub name: String,
    pub route: serde_json::Value,
    pub distance_m: f64,
    pub moving_time_s: i32,
    pub elevation_gain_m: f64,
    pub started_at: DateTime<Utc>,
}

impl Activity {
    pub fn route_points(&self) -> Result<Vec<crate::game::types::RoutePoint>> {
        serde_json::from_value(self.route.clone())
            .map_err(|e| Error::Validation(format!("activity route is unreadable: {e}")))
    }
}

/// Idempotency ledger row: one per processed (game, activity) submission,
/// also caching the activity's points and the recorded claim result.
#[derive(Debug, FromRow)]
pub struct GameActivity {
    pub id: Uuid,
    pub game_id: Uuid,
    pub activity_id: Uuid,
    pub player_id: Uuid,
    pub points: i64,
    pub area_gained_km2: f64,
    pub territory_area_km2: f64,
    pub takeover_count: i32,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct LeaderboardRow {
    pub player_id: Uuid,
    pub area_km2: f64,
    pub points: i64,
    pub eliminated: bool,
    pub joined_at: Option<DateTime<Utc>>,
}
