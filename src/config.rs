//! Runtime configuration for the Stridelands server.
//!
//! Built once in `main` from the environment and injected into handlers as
//! `web::Data<Settings>`; nothing in here is a process global.

use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Shortest allowed game duration for the plan tier (days).
    pub min_duration_days: i64,
    /// Longest allowed game duration for the plan tier (days).
    pub max_duration_days: i64,
    /// Start ≈ end distance under which a route counts as a closed loop (m).
    pub loop_tolerance_m: f64,
    /// Half-width of the corridor polygon used for open routes (m).
    pub corridor_half_width_m: f64,
    /// Attempts for the claim transaction before surfacing a retryable error.
    pub claim_retry_attempts: usize,
    /// Seconds between due-game sweeps.
    pub sweep_interval_secs: u64,
    /// Seconds a cached game overview stays fresh.
    pub overview_cache_secs: u64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            min_duration_days: env_parse("MIN_GAME_DURATION_DAYS", 14),
            max_duration_days: env_parse("MAX_GAME_DURATION_DAYS", 30),
            loop_tolerance_m: env_parse("LOOP_TOLERANCE_M", 50.0),
            corridor_half_width_m: env_parse("CORRIDOR_HALF_WIDTH_M", 25.0),
            claim_retry_attempts: env_parse("CLAIM_RETRY_ATTEMPTS", 3),
            sweep_interval_secs: env_parse("SWEEP_INTERVAL_SECS", 60),
            overview_cache_secs: env_parse("OVERVIEW_CACHE_SECS", 15),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            min_duration_days: 14,
            max_duration_days: 30,
            loop_tolerance_m: 50.0,
            corridor_half_width_m: 25.0,
            claim_retry_attempts: 3,
            sweep_interval_secs: 60,
            overview_cache_secs: 15,
        }
    }
}
