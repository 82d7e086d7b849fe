//! Base assignment: bind one activity per player per game as the starting
//! territory. The UNIQUE(game_id, player_id) constraint is the authoritative
//! guard against two concurrent assignments for the same player.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Settings;
use crate::db::league_repo;
use crate::db::models::{Activity, Game, PlayerBase};
use crate::error::{Error, Result};
use crate::game::types::GameStatus;
use crate::game::{geometry, route};

pub async fn assign_base(
    db: &PgPool,
    settings: &Settings,
    game_id: Uuid,
    player: Uuid,
    activity_id: Uuid,
) -> Result<PlayerBase> {
    let mut tx = db.begin().await?;

    let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1 FOR UPDATE")
        .bind(game_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("game not found".into()))?;
    if GameStatus::parse(&game.status)? != GameStatus::Setup {
        return Err(Error::State(
            "bases can only be assigned while the game is in setup".into(),
        ));
    }

    let is_member = league_repo::is_approved_member(db, game.league_id, player).await?
        || league_repo::is_admin(db, game.league_id, player).await?;
    if !is_member {
        return Err(Error::Authorization(
            "only approved league members can assign a base".into(),
        ));
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

    let already_used: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM player_bases WHERE game_id = $1 AND activity_id = $2)",
    )
    .bind(game_id)
    .bind(activity_id)
    .fetch_one(&mut *tx)
    .await?;
    if already_used {
        return Err(Error::Conflict(
            "activity is already used as a base in this game".into(),
        ));
    }

    let points = activity.route_points()?;
    let polygons = route::derive_polygon(
        &points,
        settings.loop_tolerance_m,
        settings.corridor_half_width_m,
    )?;
    let area_km2 = geometry::latlng_area_km2(&polygons);
    if area_km2 < geometry::MIN_AREA_KM2 {
        return Err(Error::Validation(
            "route encloses no measurable area".into(),
        ));
    }
    let polygons_json = serde_json::to_value(&polygons)
        .map_err(|e| Error::Validation(format!("could not encode territory: {e}")))?;

    let inserted = sqlx::query_as::<_, PlayerBase>(
        r#"INSERT INTO player_bases (game_id, player_id, activity_id, polygons, area_km2)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING *"#,
    )
    .bind(game_id)
    .bind(player)
    .bind(activity_id)
    .bind(&polygons_json)
    .bind(area_km2)
    .fetch_one(&mut *tx)
    .await;

    let base = match inserted {
        Ok(b) => b,
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23505") => {
            return Err(Error::Conflict(
                "a base is already set for this game; leave and rejoin to change it".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    // seed the derived territory aggregate
    sqlx::query(
        r#"INSERT INTO territories (game_id, player_id, polygons, area_km2)
           VALUES ($1, $2, $3, $4)"#,
    )
    .bind(game_id)
    .bind(player)
    .bind(&polygons_json)
    .bind(area_km2)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(base)
}
