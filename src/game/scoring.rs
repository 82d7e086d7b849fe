//! Activity point formula.
//!
//! Computed once when an activity is submitted and cached on the submission
//! ledger; the leaderboard only ever sums cached values.

/// +5 at a 10 km/h average, +10 at 12 km/h.
const SPEED_BONUS_KMH: [(f64, i64); 2] = [(12.0, 10), (10.0, 5)];
/// +2 per full 100 m of elevation gain.
const ELEVATION_STEP_M: f64 = 100.0;
const ELEVATION_BONUS: i64 = 2;

/// Points for one activity: `floor(km * 10)` plus speed/elevation bonuses.
pub fn activity_points(distance_m: f64, moving_time_s: i64, elevation_gain_m: f64) -> i64 {
    let km = (distance_m / 1000.0).max(0.0);
    let mut points = (km * 10.0).floor() as i64;

    if moving_time_s > 0 {
        let kmh = km / (moving_time_s as f64 / 3600.0);
        for (threshold, bonus) in SPEED_BONUS_KMH {
            if kmh >= threshold {
                points += bonus;
                break;
            }
        }
    }

    if elevation_gain_m > 0.0 {
        points += (elevation_gain_m / ELEVATION_STEP_M).floor() as i64 * ELEVATION_BONUS;
    }

    points
}
