//! Game state machine and activation gates.
//!
//! The transition rules live here as plain functions so they are testable
//! without a database; the repos enforce them with compare-and-swap updates.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::game::types::GameStatus;

/// Allowed transitions: setup → active → finished, setup → cancelled.
/// Terminal states accept nothing.
pub fn can_transition(from: GameStatus, to: GameStatus) -> bool {
    use GameStatus::*;
    matches!(
        (from, to),
        (Setup, Active) | (Setup, Cancelled) | (Active, Finished)
    )
}

pub fn ensure_transition(from: GameStatus, to: GameStatus) -> Result<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(Error::State(format!(
            "game cannot go from {} to {}",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// Duration must fall inside the plan tier's bounds.
pub fn validate_duration(duration_days: i64, settings: &Settings) -> Result<()> {
    if duration_days < settings.min_duration_days || duration_days > settings.max_duration_days {
        return Err(Error::Validation(format!(
            "duration must be between {} and {} days, got {duration_days}",
            settings.min_duration_days, settings.max_duration_days
        )));
    }
    Ok(())
}

/// Gate for `create_game`: a league needs at least two approved members.
pub fn check_creation(approved_members: i64) -> Result<()> {
    if approved_members < 2 {
        return Err(Error::Precondition(format!(
            "league needs at least 2 approved members to create a game, has {approved_members}"
        )));
    }
    Ok(())
}

/// Gate for `start_game`; the message names whichever condition is unmet.
pub fn check_start(approved_members: i64, base_count: i64) -> Result<()> {
    if approved_members < 2 {
        return Err(Error::Precondition(format!(
            "not enough approved members to start: need 2, have {approved_members}"
        )));
    }
    if base_count < 2 {
        return Err(Error::Precondition(format!(
            "not enough bases assigned to start: need 2, have {base_count}"
        )));
    }
    Ok(())
}
