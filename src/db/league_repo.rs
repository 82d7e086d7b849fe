//! League registry: leagues, invite codes, membership life-cycle.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{League, LeagueMember};
use crate::error::{Error, Result};
use crate::game::types::MembershipStatus;

/// Unambiguous uppercase alphabet (no 0/O, 1/I/L) for invite codes.
const INVITE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const INVITE_CODE_LEN: usize = 8;
/// How many fresh codes to try before giving up on a collision streak.
const INVITE_RETRIES: usize = 5;

pub fn new_invite_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..INVITE_CODE_LEN)
        .map(|_| INVITE_ALPHABET[rng.random_range(0..INVITE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug)]
pub struct NewLeague {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub max_members: i32,
}

/// Create a league plus the auto-approved admin membership, retrying the
/// insert with a fresh invite code if the unique constraint trips.
pub async fn create_league(db: &PgPool, admin: Uuid, req: &NewLeague) -> Result<League> {
    if req.name.trim().is_empty() {
        return Err(Error::Validation("league name must not be empty".into()));
    }
    if req.max_members < 2 {
        return Err(Error::Validation(format!(
            "max members must be at least 2, got {}",
            req.max_members
        )));
    }

    for _ in 0..INVITE_RETRIES {
        let code = new_invite_code();
        let mut tx = db.begin().await?;

        let inserted = sqlx::query_as::<_, League>(
            r#"INSERT INTO leagues (name, description, admin_player_id, invite_code, is_public, max_members)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(admin)
        .bind(&code)
        .bind(req.is_public)
        .bind(req.max_members)
        .fetch_one(&mut *tx)
        .await;

        let league = match inserted {
            Ok(l) => l,
            // invite-code collision: roll a new one
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23505") => {
                tx.rollback().await.ok();
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        sqlx::query(
            r#"INSERT INTO league_members (league_id, player_id, status, approved_at, approved_by)
               VALUES ($1, $2, 'approved', now(), $2)"#,
        )
        .bind(league.id)
        .bind(admin)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        return Ok(league);
    }

    Err(Error::Retryable(
        "could not allocate a unique invite code, please retry".into(),
    ))
}

#[derive(Debug)]
pub struct JoinOutcome {
    pub league_id: Uuid,
    pub league_name: String,
    pub status: MembershipStatus,
}

/// Join by invite code. Public leagues approve immediately; private ones
/// leave the membership pending for the admin. A membership previously set
/// to `left` re-requests in place, preserving (league, player) uniqueness.
pub async fn join_league(db: &PgPool, player: Uuid, invite_code: &str) -> Result<JoinOutcome> {
    let mut tx = db.begin().await?;

    let league = sqlx::query_as::<_, League>("SELECT * FROM leagues WHERE invite_code = $1 FOR UPDATE")
        .bind(invite_code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("no league with that invite code".into()))?;

    let existing = sqlx::query_as::<_, LeagueMember>(
        "SELECT * FROM league_members WHERE league_id = $1 AND player_id = $2 FOR UPDATE",
    )
    .bind(league.id)
    .bind(player)
    .fetch_optional(&mut *tx)
    .await?;
    if let Some(member) = &existing {
        if MembershipStatus::parse(&member.status)? != MembershipStatus::Left {
            return Err(Error::Conflict("already a member of this league".into()));
        }
    }

    let approved: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM league_members WHERE league_id = $1 AND status = 'approved'",
    )
    .bind(league.id)
    .fetch_one(&mut *tx)
    .await?;
    if approved >= league.max_members as i64 {
        return Err(Error::Capacity(format!(
            "league '{}' is full ({} members)",
            league.name, league.max_members
        )));
    }

    let status = if league.is_public {
        MembershipStatus::Approved
    } else {
        MembershipStatus::Pending
    };

    match existing {
        Some(member) => {
            sqlx::query(
                r#"UPDATE league_members
                   SET status = $1, joined_at = now(),
                       approved_at = CASE WHEN $1 = 'approved' THEN now() END,
                       approved_by = NULL
                   WHERE id = $2"#,
            )
            .bind(status.as_str())
            .bind(member.id)
            .execute(&mut *tx)
            .await?;
        }
        None => {
            sqlx::query(
                r#"INSERT INTO league_members (league_id, player_id, status, approved_at)
                   VALUES ($1, $2, $3, CASE WHEN $3 = 'approved' THEN now() END)"#,
            )
            .bind(league.id)
            .bind(player)
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(JoinOutcome {
        league_id: league.id,
        league_name: league.name,
        status,
    })
}

/// Approve or reject a pending membership. Admin-only.
pub async fn manage_membership(
    db: &PgPool,
    league_id: Uuid,
    target: Uuid,
    approver: Uuid,
    approve: bool,
) -> Result<MembershipStatus> {
    let mut tx = db.begin().await?;

    let league = sqlx::query_as::<_, League>("SELECT * FROM leagues WHERE id = $1 FOR UPDATE")
        .bind(league_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("league not found".into()))?;
    if league.admin_player_id != approver {
        return Err(Error::Authorization(
            "only the league admin may manage memberships".into(),
        ));
    }

    let member = sqlx::query_as::<_, LeagueMember>(
        "SELECT * FROM league_members WHERE league_id = $1 AND player_id = $2 FOR UPDATE",
    )
    .bind(league_id)
    .bind(target)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| Error::NotFound("no membership request for that player".into()))?;

    let current = MembershipStatus::parse(&member.status)?;
    if current != MembershipStatus::Pending {
        return Err(Error::State(format!(
            "membership is {}, only pending requests can be managed",
            current.as_str()
        )));
    }

    let new_status = if approve {
        let approved: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM league_members WHERE league_id = $1 AND status = 'approved'",
        )
        .bind(league_id)
        .fetch_one(&mut *tx)
        .await?;
        if approved >= league.max_members as i64 {
            return Err(Error::Capacity(format!(
                "league '{}' is full ({} members)",
                league.name, league.max_members
            )));
        }
        MembershipStatus::Approved
    } else {
        MembershipStatus::Rejected
    };

    sqlx::query(
        "UPDATE league_members SET status = $1, approved_at = now(), approved_by = $2 WHERE id = $3",
    )
    .bind(new_status.as_str())
    .bind(approver)
    .bind(member.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(new_status)
}

/// Self-leave. The admin cannot leave their own league.
pub async fn leave_league(db: &PgPool, league_id: Uuid, player: Uuid) -> Result<()> {
    let admin: Option<Uuid> = sqlx::query_scalar("SELECT admin_player_id FROM leagues WHERE id = $1")
        .bind(league_id)
        .fetch_optional(db)
        .await?;
    match admin {
        None => return Err(Error::NotFound("league not found".into())),
        Some(a) if a == player => {
            return Err(Error::State("the league admin cannot leave the league".into()))
        }
        Some(_) => {}
    }

    let updated = sqlx::query(
        r#"UPDATE league_members SET status = 'left'
           WHERE league_id = $1 AND player_id = $2 AND status IN ('pending', 'approved')"#,
    )
    .bind(league_id)
    .bind(player)
    .execute(db)
    .await?
    .rows_affected();

    if updated == 0 {
        Err(Error::NotFound("no active membership to leave".into()))
    } else {
        Ok(())
    }
}

pub async fn approved_member_count(db: &PgPool, league_id: Uuid) -> Result<i64> {
    Ok(sqlx::query_scalar(
        "SELECT COUNT(*) FROM league_members WHERE league_id = $1 AND status = 'approved'",
    )
    .bind(league_id)
    .fetch_one(db)
    .await?)
}

pub async fn is_admin(db: &PgPool, league_id: Uuid, player: Uuid) -> Result<bool> {
    Ok(sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM leagues WHERE id = $1 AND admin_player_id = $2)",
    )
    .bind(league_id)
    .bind(player)
    .fetch_one(db)
    .await?)
}

pub async fn is_approved_member(db: &PgPool, league_id: Uuid, player: Uuid) -> Result<bool> {
    Ok(sqlx::query_scalar(
        r#"SELECT EXISTS(
               SELECT 1 FROM league_members
               WHERE league_id = $1 AND player_id = $2 AND status = 'approved'
           )"#,
    )
    .bind(league_id)
    .bind(player)
    .fetch_one(db)
    .await?)
}
