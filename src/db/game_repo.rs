//! Game life-cycle: creation, activation, cancellation, finishing, and the
//! leaderboard/overview queries.
//!
//! Status transitions are guarded by [`crate::game::lifecycle`] and enforced
//! with compare-and-swap updates so a raced double-start cannot both succeed.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Settings;
use crate::db::league_repo;
use crate::db::models::{Game, LeaderboardRow};
use crate::error::{Error, Result};
use crate::game::lifecycle;
use crate::game::types::GameStatus;

pub async fn fetch_game(db: &PgPool, game_id: Uuid) -> Result<Game> {
    sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1")
        .bind(game_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::NotFound("game not found".into()))
}

/// Create a game in `setup`. Admin-only; needs two approved members and a
/// duration inside the plan tier's bounds.
pub async fn create_game(
    db: &PgPool,
    settings: &Settings,
    league_id: Uuid,
    name: &str,
    duration_days: i64,
    requester: Uuid,
) -> Result<Game> {
    if !league_repo::is_admin(db, league_id, requester).await? {
        return Err(Error::Authorization(
            "only the league admin can create games".into(),
        ));
    }
    lifecycle::validate_duration(duration_days, settings)?;
    lifecycle::check_creation(league_repo::approved_member_count(db, league_id).await?)?;

    let name = name.trim();
    let name = if name.is_empty() { "New Game" } else { name };

    Ok(sqlx::query_as::<_, Game>(
        r#"INSERT INTO games (league_id, name, status, duration_days, created_by)
           VALUES ($1, $2, 'setup', $3, $4)
           RETURNING *"#,
    )
    .bind(league_id)
    .bind(name)
    .bind(duration_days as i32)
    .bind(requester)
    .fetch_one(db)
    .await?)
}

pub async fn base_count(db: &PgPool, game_id: Uuid) -> Result<i64> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(*) FROM player_bases WHERE game_id = $1")
            .bind(game_id)
            .fetch_one(db)
            .await?,
    )
}

/// Activate a game: admin-only, gated on members and bases, applied with a
/// CAS on `status = 'setup'` so concurrent starts cannot both win.
pub async fn start_game(db: &PgPool, game_id: Uuid, requester: Uuid) -> Result<Game> {
    let game = fetch_game(db, game_id).await?;
    if !league_repo::is_admin(db, game.league_id, requester).await? {
        return Err(Error::Authorization(
            "only the league admin can start this game".into(),
        ));
    }
    lifecycle::ensure_transition(GameStatus::parse(&game.status)?, GameStatus::Active)?;
    lifecycle::check_start(
        league_repo::approved_member_count(db, game.league_id).await?,
        base_count(db, game_id).await?,
    )?;

    let started = sqlx::query_as::<_, Game>(
        r#"UPDATE games
           SET status = 'active',
               start_date = now(),
               end_date = now() + make_interval(days => duration_days)
           WHERE id = $1 AND status = 'setup'
           RETURNING *"#,
    )
    .bind(game_id)
    .fetch_optional(db)
    .await?;

    started.ok_or_else(|| Error::State("game is no longer in setup".into()))
}

/// Cancel a game still in setup. Admin-only.
pub async fn cancel_game(db: &PgPool, game_id: Uuid, requester: Uuid) -> Result<()> {
    let game = fetch_game(db, game_id).await?;
    if !league_repo::is_admin(db, game.league_id, requester).await? {
        return Err(Error::Authorization(
            "only the league admin can cancel this game".into(),
        ));
    }
    lifecycle::ensure_transition(GameStatus::parse(&game.status)?, GameStatus::Cancelled)?;

    let cancelled = sqlx::query("UPDATE games SET status = 'cancelled' WHERE id = $1 AND status = 'setup'")
        .bind(game_id)
        .execute(db)
        .await?
        .rows_affected();
    if cancelled == 0 {
        return Err(Error::State("game is no longer in setup".into()));
    }
    Ok(())
}

/// System-triggered finish: due date reached or one player holds everything.
/// Silent no-op when the game is not active. Returns the winner, if any.
pub async fn finish_game(db: &PgPool, game_id: Uuid) -> Result<Option<Uuid>> {
    let mut tx = db.begin().await?;

    let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1 FOR UPDATE")
        .bind(game_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("game not found".into()))?;
    if GameStatus::parse(&game.status)? != GameStatus::Active {
        return Ok(None);
    }

    // winner = largest territory at this instant; earliest update breaks ties
    let winner: Option<Uuid> = sqlx::query_scalar(
        r#"SELECT player_id FROM territories
           WHERE game_id = $1
           ORDER BY area_km2 DESC, updated_at ASC
           LIMIT 1"#,
    )
    .bind(game_id)
    .fetch_optional(&mut *tx)
    .await?;

    sqlx::query(
        r#"UPDATE games
           SET status = 'finished',
               end_date = COALESCE(end_date, now()),
               winner_player_id = $2
           WHERE id = $1 AND status = 'active'"#,
    )
    .bind(game_id)
    .bind(winner)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(winner)
}

/// Active games whose end time has passed; the sweeper finishes these.
pub async fn due_games(db: &PgPool) -> Result<Vec<Uuid>> {
    Ok(sqlx::query_scalar(
        "SELECT id FROM games WHERE status = 'active' AND end_date <= now()",
    )
    .fetch_all(db)
    .await?)
}

/// Leaderboard rows sorted by area desc, points desc, join time asc.
pub async fn leaderboard(db: &PgPool, game_id: Uuid) -> Result<Vec<LeaderboardRow>> {
    Ok(sqlx::query_as::<_, LeaderboardRow>(
        r#"SELECT t.player_id,
                  t.area_km2,
                  COALESCE(p.points, 0)::bigint AS points,
                  (t.eliminated_at IS NOT NULL) AS eliminated,
                  m.joined_at
           FROM territories t
           JOIN games g ON g.id = t.game_id
           LEFT JOIN (
               SELECT player_id, SUM(points)::bigint AS points
               FROM game_activities
               WHERE game_id = $1
               GROUP BY player_id
           ) p ON p.player_id = t.player_id
           LEFT JOIN league_members m
                  ON m.league_id = g.league_id AND m.player_id = t.player_id
           WHERE t.game_id = $1
           ORDER BY t.area_km2 DESC, points DESC, m.joined_at ASC"#,
    )
    .bind(game_id)
    .fetch_all(db)
    .await?)
}

pub async fn takeover_count(db: &PgPool, game_id: Uuid) -> Result<i64> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(*) FROM territory_takeovers WHERE game_id = $1")
            .bind(game_id)
            .fetch_one(db)
            .await?,
    )
}
