//! Base assignment endpoint: one activity per player per game.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache;
use crate::config::Settings;
use crate::db::base_repo;
use crate::error::Error;
use crate::http::auth::PlayerAuth;

#[derive(Deserialize)]
pub struct AssignReq {
    pub game_id: Uuid,
    pub activity_id: Uuid,
}

/// POST /api/games/base
#[post("/games/base")]
pub async fn assign(
    auth: PlayerAuth,
    info: web::Json<AssignReq>,
    db: web::Data<PgPool>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, Error> {
    let base = base_repo::assign_base(
        db.get_ref(),
        settings.get_ref(),
        info.game_id,
        auth.player_id,
        info.activity_id,
    )
    .await?;
    cache::invalidate(info.game_id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "base_id": base.id,
        "activity_id": base.activity_id,
        "area_km2": base.area_km2,
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(assign);
}
