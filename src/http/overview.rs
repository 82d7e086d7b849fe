//! Game overview: metadata, counts and the leaderboard, members only.

use std::time::Duration;

use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache;
use crate::config::Settings;
use crate::db::{game_repo, league_repo};
use crate::error::Error;
use crate::http::auth::PlayerAuth;

/// GET /api/games/{game_id}/overview
#[get("/games/{game_id}/overview")]
pub async fn overview(
    auth: PlayerAuth,
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, Error> {
    let game_id = path.into_inner();
    let game = game_repo::fetch_game(db.get_ref(), game_id).await?;

    let allowed = league_repo::is_approved_member(db.get_ref(), game.league_id, auth.player_id)
        .await?
        || league_repo::is_admin(db.get_ref(), game.league_id, auth.player_id).await?;
    if !allowed {
        return Err(Error::Authorization(
            "only approved league members can view this game".into(),
        ));
    }

    let max_age = Duration::from_secs(settings.overview_cache_secs);
    if let Some(body) = cache::get(game_id, max_age) {
        return Ok(HttpResponse::Ok().json(body));
    }

    let members = league_repo::approved_member_count(db.get_ref(), game.league_id).await?;
    let bases = game_repo::base_count(db.get_ref(), game_id).await?;
    let takeovers = game_repo::takeover_count(db.get_ref(), game_id).await?;
    let rows = game_repo::leaderboard(db.get_ref(), game_id).await?;

    let leaderboard: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            serde_json::json!({
                "rank": i + 1,
                "player_id": r.player_id,
                "territory_area_km2": r.area_km2,
                "points": r.points,
                "eliminated": r.eliminated,
            })
        })
        .collect();

    let body = serde_json::json!({
        "success": true,
        "game": {
            "id": game.id,
            "name": game.name,
            "status": game.status,
            "duration_days": game.duration_days,
            "start_date": game.start_date,
            "end_date": game.end_date,
            "winner_player_id": game.winner_player_id,
        },
        "counts": {
            "approved_members": members,
            "bases": bases,
            "takeovers": takeovers,
        },
        "leaderboard": leaderboard,
    });
    cache::put(game_id, body.clone());

    Ok(HttpResponse::Ok().json(body))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(overview);
}
