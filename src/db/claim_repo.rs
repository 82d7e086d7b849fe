//! Territory Claim Engine, transactional half.
//!
//! One submission = one transaction holding the game's advisory lock, so area
//! subtraction/addition within a game is linearizable. Transient storage
//! faults are retried with backoff before the caller sees a retryable error;
//! the `game_activities` unique key makes any retry a no-op on applied work.

use serde::Serialize;
use sqlx::PgPool;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use uuid::Uuid;

use crate::cache;
use crate::config::Settings;
use crate::db::game_repo;
use crate::db::models::{Activity, Game, GameActivity, Territory};
use crate::error::{Error, Result};
use crate::game::claim::{self, RivalTerritory};
use crate::game::geometry::Projection;
use crate::game::types::GameStatus;
use crate::game::{route, scoring};

/// What the caller gets back, and what a replay returns unchanged.
#[derive(Debug, Serialize)]
pub struct ClaimReceipt {
    pub activity_id: Uuid,
    pub points: i64,
    pub area_km2: f64,
    pub area_gained_km2: f64,
    pub takeover_count: i64,
    /// True when this submission had already been processed.
    pub replay: bool,
}

impl ClaimReceipt {
    fn replayed(row: GameActivity) -> Self {
        ClaimReceipt {
            activity_id: row.activity_id,
            points: row.points,
            area_km2: row.territory_area_km2,
            area_gained_km2: row.area_gained_km2,
            takeover_count: row.takeover_count as i64,
            replay: true,
        }
    }
}

pub async fn submit_activity(
    db: &PgPool,
    settings: &Settings,
    game_id: Uuid,
    player: Uuid,
    activity_id: Uuid,
) -> Result<ClaimReceipt> {
    let strategy = ExponentialBackoff::from_millis(50)
        .map(jitter)
        .take(settings.claim_retry_attempts.saturating_sub(1));

    let receipt = RetryIf::spawn(
        strategy,
        || claim_once(db, settings, game_id, player, activity_id),
        |e: &Error| e.is_transient(),
    )
    .await?;

    cache::invalidate(game_id);

    // Terminal win condition: everyone else eliminated.
    if receipt.takeover_count > 0 && all_rivals_eliminated(db, game_id, player).await? {
        if let Some(winner) = game_repo::finish_game(db, game_id).await? {
            log::info!("game {game_id} finished early, winner {winner}");
        }
    }

    Ok(receipt)
}

async fn claim_once(
    db: &PgPool,
    settings: &Settings,
    game_id: Uuid,
    player: Uuid,
    activity_id: Uuid,
) -> Result<ClaimReceipt> {
    let mut tx = db.begin().await?;

    // Serialize all claims within this game.
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(game_id.to_string())
        .execute(&mut *tx)
        .await?;

    let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1")
        .bind(game_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("game not found".into()))?;
    if GameStatus::parse(&game.status)? != GameStatus::Active {
        return Err(Error::State(
            "activities can only be submitted to an active game".into(),
        ));
    }

    // Idempotency: a processed (game, activity) pair returns its recorded
    // result with no further effect.
    if let Some(prev) = sqlx::query_as::<_, GameActivity>(
        "SELECT * FROM game_activities WHERE game_id = $1 AND activity_id = $2",
    )
    .bind(game_id)
    .bind(activity_id)
    .fetch_optional(&mut *tx)
    .await?
    {
        return Ok(ClaimReceipt::replayed(prev));
    }

    let activity = sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE id = $1")
        .bind(activity_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("activity not found".into()))?;
    if activity.player_id != player {
        return Err(Error::Authorization(
            "activity belongs to another player".into(),
        ));
    }

    let territories = sqlx::query_as::<_, Territory>(
        "SELECT * FROM territories WHERE game_id = $1 ORDER BY player_id FOR UPDATE",
    )
    .bind(game_id)
    .fetch_all(&mut *tx)
    .await?;

    let own_row = territories
        .iter()
        .find(|t| t.player_id == player)
        .ok_or_else(|| Error::Precondition("no base assigned in this game".into()))?;

    let points = scoring::activity_points(
        activity.distance_m,
        activity.moving_time_s as i64,
        activity.elevation_gain_m,
    );

    // Eliminated players keep submitting and scoring, but cannot gain
    // territory until they hold a polygon seed again.
    if own_row.eliminated_at.is_some() {
        let receipt = record_submission(
            &mut tx,
            game_id,
            activity_id,
            player,
            points,
            0.0,
            own_row.area_km2,
            0,
        )
        .await?;
        tx.commit().await?;
        return Ok(receipt);
    }

    let fixes = activity.route_points()?;
    let candidate_latlng = route::derive_polygon(
        &fixes,
        settings.loop_tolerance_m,
        settings.corridor_half_width_m,
    )?;

    // One shared plane for every polygon taking part in this claim.
    let proj = Projection::centered_on(fixes[0]);
    let candidate = proj.project(&candidate_latlng);
    let own = proj.project(&own_row.multipolygon()?);
    let rivals: Vec<RivalTerritory> = territories
        .iter()
        .filter(|t| t.player_id != player && t.eliminated_at.is_none())
        .map(|t| {
            Ok(RivalTerritory {
                player_id: t.player_id,
                polygons: proj.project(&t.multipolygon()?),
            })
        })
        .collect::<Result<_>>()?;

    let outcome = claim::resolve_claim(&own, &candidate, &rivals);

    // Persist the claimant's merged territory.
    let own_json = serde_json::to_value(proj.unproject(&outcome.territory))
        .map_err(|e| Error::Retryable(format!("could not encode territory: {e}")))?;
    sqlx::query(
        r#"UPDATE territories SET polygons = $3, area_km2 = $4, updated_at = now()
           WHERE game_id = $1 AND player_id = $2"#,
    )
    .bind(game_id)
    .bind(player)
    .bind(own_json)
    .bind(outcome.area_km2)
    .execute(&mut *tx)
    .await?;

    // Subtract from each losing rival and append the ledger rows.
    let mut area_gained = 0.0;
    let mut touched = vec![player];
    for takeover in &outcome.takeovers {
        area_gained += takeover.area_km2;
        touched.push(takeover.rival_id);

        let rival_json = serde_json::to_value(proj.unproject(&takeover.rival_remaining))
            .map_err(|e| Error::Retryable(format!("could not encode territory: {e}")))?;
        sqlx::query(
            r#"UPDATE territories
               SET polygons = $3, area_km2 = $4,
                   eliminated_at = CASE WHEN $5 THEN now() ELSE eliminated_at END,
                   updated_at = now()
               WHERE game_id = $1 AND player_id = $2"#,
        )
        .bind(game_id)
        .bind(takeover.rival_id)
        .bind(rival_json)
        .bind(takeover.rival_area_km2)
        .bind(takeover.eliminated)
        .execute(&mut *tx)
        .await?;

        let point = takeover.point.map(|c| proj.to_latlng(c));
        sqlx::query(
            r#"INSERT INTO territory_takeovers
                   (game_id, taken_from_player_id, taken_by_player_id, activity_id,
                    intersection_lat, intersection_lng, area_lost_km2, area_gained_km2)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $7)"#,
        )
        .bind(game_id)
        .bind(takeover.rival_id)
        .bind(player)
        .bind(activity_id)
        .bind(point.map(|p| p.lat))
        .bind(point.map(|p| p.lng))
        .bind(takeover.area_km2)
        .execute(&mut *tx)
        .await?;

        if takeover.eliminated {
            log::info!(
                "game {game_id}: player {} eliminated by {player}",
                takeover.rival_id
            );
        }
    }

    sqlx::query(
        "UPDATE player_bases SET last_calculated_at = now() WHERE game_id = $1 AND player_id = ANY($2)",
    )
    .bind(game_id)
    .bind(&touched)
    .execute(&mut *tx)
    .await?;

    let receipt = record_submission(
        &mut tx,
        game_id,
        activity_id,
        player,
        points,
        area_gained,
        outcome.area_km2,
        outcome.takeovers.len() as i32,
    )
    .await?;

    tx.commit().await?;
    Ok(receipt)
}

#[allow(clippy::too_many_arguments)]
async fn record_submission(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    game_id: Uuid,
    activity_id: Uuid,
    player: Uuid,
    points: i64,
    area_gained_km2: f64,
    territory_area_km2: f64,
    takeover_count: i32,
) -> Result<ClaimReceipt> {
    sqlx::query(
        r#"INSERT INTO game_activities
               (game_id, activity_id, player_id, points, area_gained_km2,
                territory_area_km2, takeover_count)
           VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
    )
    .bind(game_id)
    .bind(activity_id)
    .bind(player)
    .bind(points)
    .bind(area_gained_km2)
    .bind(territory_area_km2)
    .bind(takeover_count)
    .execute(&mut **tx)
    .await?;

    Ok(ClaimReceipt {
        activity_id,
        points,
        area_km2: territory_area_km2,
        area_gained_km2,
        takeover_count: takeover_count as i64,
        replay: false,
    })
}

async fn all_rivals_eliminated(db: &PgPool, game_id: Uuid, player: Uuid) -> Result<bool> {
    let (total, alive): (i64, i64) = sqlx::query_as(
        r#"SELECT COUNT(*),
                  COUNT(*) FILTER (WHERE eliminated_at IS NULL AND player_id <> $2)
           FROM territories WHERE game_id = $1"#,
    )
    .bind(game_id)
    .bind(player)
    .fetch_one(db)
    .await?;
    Ok(total > 1 && alive == 0)
}
