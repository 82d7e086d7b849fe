//! Takeover resolution: conservation, elimination, and replay behaviour,
//! exercised in plane coordinates (km).

use geo::{LineString, MultiPolygon, Polygon};
use uuid::Uuid;

use stridelands_server::game::claim::{resolve_claim, RivalTerritory};
use stridelands_server::game::geometry::area_km2;

fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon::from(Polygon::new(
        LineString::from(vec![
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
            (x0, y0),
        ]),
        Vec::new(),
    ))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn candidate_merges_into_own_territory() {
    let own = square(0.0, 0.0, 1.0);
    let candidate = square(2.0, 0.0, 1.0);

    let outcome = resolve_claim(&own, &candidate, &[]);
    assert!(close(outcome.area_km2, 2.0), "got {}", outcome.area_km2);
    assert!(outcome.takeovers.is_empty());
}

#[test]
fn overlap_with_own_territory_is_not_a_takeover() {
    let own = square(0.0, 0.0, 1.0);
    let candidate = square(0.5, 0.0, 1.0); // half inside own

    let outcome = resolve_claim(&own, &candidate, &[]);
    assert!(close(outcome.area_km2, 1.5), "got {}", outcome.area_km2);
    assert!(outcome.takeovers.is_empty());
}

#[test]
fn takeover_transfers_exactly_the_contested_area() {
    // Scenario: the claimant's loop bites 0.5 km² out of the rival.
    let rival_id = Uuid::new_v4();
    let own = square(0.0, 0.0, 1.0);
    let rival = square(2.0, 0.0, 1.0);
    let candidate = square(1.5, 0.0, 1.0); // overlaps rival on [2.0, 2.5]

    let outcome = resolve_claim(
        &own,
        &candidate,
        &[RivalTerritory {
            player_id: rival_id,
            polygons: rival.clone(),
        }],
    );

    assert_eq!(outcome.takeovers.len(), 1, "exactly one takeover row");
    let takeover = &outcome.takeovers[0];
    assert_eq!(takeover.rival_id, rival_id);
    assert!(close(takeover.area_km2, 0.5), "gained {}", takeover.area_km2);

    // gained == lost, exactly
    let rival_lost = area_km2(&rival) - takeover.rival_area_km2;
    assert!(
        close(takeover.area_km2, rival_lost),
        "gained {} but rival lost {rival_lost}",
        takeover.area_km2
    );
    assert!(!takeover.eliminated);

    // claimant's union already contains the contested piece
    assert!(close(outcome.area_km2, 2.0), "got {}", outcome.area_km2);

    // the representative point sits inside the contested strip
    let p = takeover.point.expect("intersection centroid");
    assert!(p.x > 2.0 && p.x < 2.5 && p.y > 0.0 && p.y < 1.0);
}

#[test]
fn engulfed_rival_is_eliminated() {
    let rival_id = Uuid::new_v4();
    let own = square(0.0, 0.0, 1.0);
    let rival = square(3.0, 3.0, 1.0);
    let candidate = square(2.5, 2.5, 2.0); // swallows the rival whole

    let outcome = resolve_claim(
        &own,
        &candidate,
        &[RivalTerritory {
            player_id: rival_id,
            polygons: rival,
        }],
    );

    let takeover = &outcome.takeovers[0];
    assert!(close(takeover.area_km2, 1.0), "gained {}", takeover.area_km2);
    assert!(takeover.eliminated, "rival at zero area must be eliminated");
    assert!(close(takeover.rival_area_km2, 0.0));
}

#[test]
fn distant_rival_is_untouched() {
    let rival_id = Uuid::new_v4();
    let own = square(0.0, 0.0, 1.0);
    let rival = square(10.0, 10.0, 1.0);
    let candidate = square(1.0, 0.0, 1.0);

    let outcome = resolve_claim(
        &own,
        &candidate,
        &[RivalTerritory {
            player_id: rival_id,
            polygons: rival,
        }],
    );
    assert!(outcome.takeovers.is_empty(), "no contested area, no ledger row");
}

#[test]
fn replaying_the_same_candidate_changes_nothing() {
    // Scenario: after a takeover, folding the identical candidate again
    // gains nothing because the contested area already changed hands.
    let rival_id = Uuid::new_v4();
    let own = square(0.0, 0.0, 1.0);
    let rival = square(2.0, 0.0, 1.0);
    let candidate = square(1.5, 0.0, 1.0);

    let first = resolve_claim(
        &own,
        &candidate,
        &[RivalTerritory {
            player_id: rival_id,
            polygons: rival,
        }],
    );
    let rival_after = first.takeovers[0].rival_remaining.clone();

    let second = resolve_claim(
        &first.territory,
        &candidate,
        &[RivalTerritory {
            player_id: rival_id,
            polygons: rival_after,
        }],
    );

    assert!(second.takeovers.is_empty(), "no second takeover");
    assert!(
        close(second.area_km2, first.area_km2),
        "territory unchanged: {} vs {}",
        second.area_km2,
        first.area_km2
    );
}

#[test]
fn two_rivals_lose_independently() {
    let (r1, r2) = (Uuid::new_v4(), Uuid::new_v4());
    let own = square(0.0, 5.0, 1.0);
    let rival_a = square(2.0, 0.0, 1.0);
    let rival_b = square(2.0, 2.0, 1.0);
    // tall strip clipping 0.25 km² off each rival
    let candidate = MultiPolygon::from(Polygon::new(
        LineString::from(vec![(2.0, -1.0), (2.25, -1.0), (2.25, 4.0), (2.0, 4.0), (2.0, -1.0)]),
        Vec::new(),
    ));

    let outcome = resolve_claim(
        &own,
        &candidate,
        &[
            RivalTerritory {
                player_id: r1,
                polygons: rival_a,
            },
            RivalTerritory {
                player_id: r2,
                polygons: rival_b,
            },
        ],
    );

    assert_eq!(outcome.takeovers.len(), 2, "one ledger row per rival");
    for takeover in &outcome.takeovers {
        assert!(close(takeover.area_km2, 0.25), "gained {}", takeover.area_km2);
        assert!(close(takeover.rival_area_km2, 0.75));
    }
}
