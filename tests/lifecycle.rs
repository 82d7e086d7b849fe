//! Game state-machine, activation-gate and invite-code tests.

use stridelands_server::config::Settings;
use stridelands_server::db::league_repo::{new_invite_code, INVITE_CODE_LEN};
use stridelands_server::error::Error;
use stridelands_server::game::lifecycle::{
    can_transition, check_creation, check_start, ensure_transition, validate_duration,
};
use stridelands_server::game::types::GameStatus;

#[test]
fn setup_can_activate_or_cancel() {
    assert!(can_transition(GameStatus::Setup, GameStatus::Active));
    assert!(can_transition(GameStatus::Setup, GameStatus::Cancelled));
    assert!(!can_transition(GameStatus::Setup, GameStatus::Finished));
}

#[test]
fn active_can_only_finish() {
    assert!(can_transition(GameStatus::Active, GameStatus::Finished));
    assert!(!can_transition(GameStatus::Active, GameStatus::Cancelled));
    assert!(!can_transition(GameStatus::Active, GameStatus::Setup));
}

#[test]
fn terminal_states_accept_nothing() {
    for terminal in [GameStatus::Finished, GameStatus::Cancelled] {
        for next in [
            GameStatus::Setup,
            GameStatus::Active,
            GameStatus::Finished,
            GameStatus::Cancelled,
        ] {
            assert!(
                !can_transition(terminal, next),
                "{} must not leave {}",
                next.as_str(),
                terminal.as_str()
            );
        }
    }
}

#[test]
fn double_start_is_a_state_error() {
    let err = ensure_transition(GameStatus::Active, GameStatus::Active).unwrap_err();
    assert!(matches!(err, Error::State(_)), "got {err:?}");
}

#[test]
fn duration_respects_plan_tier_bounds() {
    let settings = Settings::default();
    assert!(validate_duration(14, &settings).is_ok());
    assert!(validate_duration(30, &settings).is_ok());

    for bad in [0, -5, 13, 31] {
        let err = validate_duration(bad, &settings).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{bad} days: got {err:?}");
    }
}

#[test]
fn creation_needs_two_approved_members() {
    assert!(check_creation(2).is_ok());
    let err = check_creation(1).unwrap_err();
    assert!(matches!(err, Error::Precondition(_)), "got {err:?}");
}

#[test]
fn start_gate_names_the_missing_members() {
    let err = check_start(1, 2).unwrap_err();
    match err {
        Error::Precondition(msg) => {
            assert!(msg.contains("members"), "message should name members: {msg}")
        }
        other => panic!("expected precondition error, got {other:?}"),
    }
}

#[test]
fn start_gate_names_the_missing_bases() {
    // Scenario A: two approved members but no bases assigned yet.
    let err = check_start(2, 0).unwrap_err();
    match err {
        Error::Precondition(msg) => {
            assert!(msg.contains("bases"), "message should name bases: {msg}")
        }
        other => panic!("expected precondition error, got {other:?}"),
    }
}

#[test]
fn start_gate_passes_with_members_and_bases() {
    assert!(check_start(2, 2).is_ok());
}

#[test]
fn invite_codes_are_short_and_unambiguous() {
    let code = new_invite_code();
    assert_eq!(code.len(), INVITE_CODE_LEN);
    assert!(
        code.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        "unexpected character in {code}"
    );
    // 0/O and 1/I/L are excluded so codes survive being read aloud
    assert!(!code.contains(['0', 'O', '1', 'I', 'L']), "ambiguous char in {code}");
}
