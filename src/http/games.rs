//! Game life-cycle endpoints: create / start / cancel.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache;
use crate::config::Settings;
use crate::db::game_repo;
use crate::error::Error;
use crate::http::auth::PlayerAuth;

#[derive(Deserialize)]
pub struct CreateReq {
    pub league_id: Uuid,
    #[serde(default)]
    pub name: String,
    pub duration_days: i64,
}

#[derive(Deserialize)]
pub struct GameReq {
    pub game_id: Uuid,
}

/// POST /api/games/create — league admin only.
#[post("/games/create")]
pub async fn create(
    auth: PlayerAuth,
    info: web::Json<CreateReq>,
    db: web::Data<PgPool>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, Error> {
    let game = game_repo::create_game(
        db.get_ref(),
        settings.get_ref(),
        info.league_id,
        &info.name,
        info.duration_days,
        auth.player_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "game_id": game.id,
        "game_name": game.name,
        "status": game.status,
        "duration_days": game.duration_days,
    })))
}

/// POST /api/games/start — league admin only; needs 2 members and 2 bases.
#[post("/games/start")]
pub async fn start(
    auth: PlayerAuth,
    info: web::Json<GameReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, Error> {
    let game = game_repo::start_game(db.get_ref(), info.game_id, auth.player_id).await?;
    cache::invalidate(game.id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "game_id": game.id,
        "status": game.status,
        "start_date": game.start_date,
        "end_date": game.end_date,
    })))
}

/// POST /api/games/cancel — league admin only, setup games only.
#[post("/games/cancel")]
pub async fn cancel(
    auth: PlayerAuth,
    info: web::Json<GameReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, Error> {
    game_repo::cancel_game(db.get_ref(), info.game_id, auth.player_id).await?;
    cache::invalidate(info.game_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create).service(start).service(cancel);
}
