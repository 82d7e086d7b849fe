//! Territory takeover resolution.
//!
//! Pure plane-coordinate fold: given the claimant's current territory, the
//! candidate polygon of the new activity, and every rival territory touching
//! it, compute the claimant's next territory and one takeover event per rival
//! that loses area. The subtracted intersection is the same polygon set the
//! claimant's union already contains, so gained and lost areas match exactly.

use geo::{BooleanOps, Centroid, Coord, MultiPolygon};
use uuid::Uuid;

use crate::game::geometry::{self, MIN_AREA_KM2};

/// One rival's current holdings, projected into the claim plane.
#[derive(Debug, Clone)]
pub struct RivalTerritory {
    pub player_id: Uuid,
    pub polygons: MultiPolygon<f64>,
}

/// One rival losing ground to the claimant.
#[derive(Debug, Clone)]
pub struct TakeoverEvent {
    pub rival_id: Uuid,
    /// Area changing hands, km². Gained by the claimant, lost by the rival.
    pub area_km2: f64,
    /// Representative point of the contested region (centroid), plane coords.
    pub point: Option<Coord<f64>>,
    /// What the rival keeps after the subtraction.
    pub rival_remaining: MultiPolygon<f64>,
    pub rival_area_km2: f64,
    /// True when the rival's remaining area reached zero.
    pub eliminated: bool,
}

#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    /// The claimant's merged territory after the submission.
    pub territory: MultiPolygon<f64>,
    pub area_km2: f64,
    pub takeovers: Vec<TakeoverEvent>,
}

/// Fold one qualifying activity into the game's territory state.
///
/// Rivals must arrive in a deterministic order (the repos sort by player id)
/// so concurrent replays of the same submission produce identical ledgers.
pub fn resolve_claim(
    own: &MultiPolygon<f64>,
    candidate: &MultiPolygon<f64>,
    rivals: &[RivalTerritory],
) -> ClaimOutcome {
    let territory = own.union(candidate);

    let mut takeovers = Vec::new();
    for rival in rivals {
        let contested = candidate.intersection(&rival.polygons);
        let area = geometry::area_km2(&contested);
        if area < MIN_AREA_KM2 {
            continue;
        }

        let remaining = rival.polygons.difference(&contested);
        let rival_area = geometry::area_km2(&remaining);
        takeovers.push(TakeoverEvent {
            rival_id: rival.player_id,
            area_km2: area,
            point: contested.centroid().map(|p| p.0),
            eliminated: geometry::is_empty(&remaining),
            rival_remaining: remaining,
            rival_area_km2: rival_area,
        });
    }

    ClaimOutcome {
        area_km2: geometry::area_km2(&territory),
        territory,
        takeovers,
    }
}
