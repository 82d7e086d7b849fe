//! Activity point formula.

use stridelands_server::game::scoring::activity_points;

#[test]
fn base_points_are_ten_per_kilometre() {
    // 5.2 km at an easy pace, flat
    assert_eq!(activity_points(5200.0, 2400, 0.0), 52);
}

#[test]
fn fast_runs_earn_the_speed_bonus() {
    // 10 km in 50 min = 12 km/h
    assert_eq!(activity_points(10_000.0, 3000, 0.0), 110);
    // 10 km in 57.5 min ≈ 10.4 km/h
    assert_eq!(activity_points(10_000.0, 3450, 0.0), 105);
    // 10 km in 75 min = 8 km/h, no bonus
    assert_eq!(activity_points(10_000.0, 4500, 0.0), 100);
}

#[test]
fn climbing_earns_two_points_per_hundred_metres() {
    assert_eq!(activity_points(5000.0, 2400, 250.0), 50 + 4);
    assert_eq!(activity_points(5000.0, 2400, 99.0), 50);
}

#[test]
fn zero_moving_time_earns_no_speed_bonus() {
    assert_eq!(activity_points(5000.0, 0, 0.0), 50);
}

#[test]
fn bonuses_stack() {
    // 10 km in 48 min = 12.5 km/h with 120 m of climb
    assert_eq!(activity_points(10_000.0, 2880, 120.0), 100 + 10 + 2);
}
