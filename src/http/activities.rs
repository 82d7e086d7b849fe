//! Qualifying-activity submission — the claim engine's front door.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Settings;
use crate::db::claim_repo;
use crate::error::Error;
use crate::http::auth::PlayerAuth;

#[derive(Deserialize)]
pub struct SubmitReq {
    pub game_id: Uuid,
    pub activity_id: Uuid,
}

/// POST /api/activities/submit
#[post("/activities/submit")]
pub async fn submit(
    auth: PlayerAuth,
    info: web::Json<SubmitReq>,
    db: web::Data<PgPool>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, Error> {
    let receipt = claim_repo::submit_activity(
        db.get_ref(),
        settings.get_ref(),
        info.game_id,
        auth.player_id,
        info.activity_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "activity_id": receipt.activity_id,
        "points": receipt.points,
        "territory_area_km2": receipt.area_km2,
        "area_gained_km2": receipt.area_gained_km2,
        "takeovers_created": receipt.takeover_count,
        "replay": receipt.replay,
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit);
}
