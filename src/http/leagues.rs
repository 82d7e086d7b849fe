//! League endpoints: create / join / membership management / leave.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::league_repo::{self, NewLeague};
use crate::error::Error;
use crate::http::auth::PlayerAuth;

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct CreateReq {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default = "default_max_members")]
    pub max_members: i32,
}

fn default_max_members() -> i32 {
    10
}

#[derive(Deserialize)]
pub struct JoinReq {
    pub invite_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipAction {
    Approve,
    Reject,
}

#[derive(Deserialize)]
pub struct MembershipReq {
    pub league_id: Uuid,
    pub player_id: Uuid,
    pub action: MembershipAction,
}

#[derive(Deserialize)]
pub struct LeaveReq {
    pub league_id: Uuid,
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /api/leagues/create
#[post("/leagues/create")]
pub async fn create(
    auth: PlayerAuth,
    info: web::Json<CreateReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, Error> {
    let league = league_repo::create_league(
        db.get_ref(),
        auth.player_id,
        &NewLeague {
            name: info.name.clone(),
            description: info.description.clone(),
            is_public: info.is_public,
            max_members: info.max_members,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "league_id": league.id,
        "invite_code": league.invite_code,
    })))
}

/// POST /api/leagues/join
#[post("/leagues/join")]
pub async fn join(
    auth: PlayerAuth,
    info: web::Json<JoinReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, Error> {
    let outcome = league_repo::join_league(db.get_ref(), auth.player_id, &info.invite_code).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "league_id": outcome.league_id,
        "league_name": outcome.league_name,
        "status": outcome.status.as_str(),
    })))
}

/// POST /api/leagues/membership — approve or reject a pending request.
#[post("/leagues/membership")]
pub async fn membership(
    auth: PlayerAuth,
    info: web::Json<MembershipReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, Error> {
    let approve = matches!(info.action, MembershipAction::Approve);
    let status = league_repo::manage_membership(
        db.get_ref(),
        info.league_id,
        info.player_id,
        auth.player_id,
        approve,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "league_id": info.league_id,
        "player_id": info.player_id,
        "new_status": status.as_str(),
    })))
}

/// POST /api/leagues/leave
#[post("/leagues/leave")]
pub async fn leave(
    auth: PlayerAuth,
    info: web::Json<LeaveReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, Error> {
    league_repo::leave_league(db.get_ref(), info.league_id, auth.player_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(join)
        .service(membership)
        .service(leave);
}
