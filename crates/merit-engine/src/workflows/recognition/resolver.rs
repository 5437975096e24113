//! Tier-priority score resolution.
//!
//! A central evaluation completely shadows the unit tier, which completely
//! shadows the peer average; lower tiers stay readable for audit but never
//! blend into the resolved score.

use super::domain::{FinalEvaluation, PeerRating, ResolvedScore, ScoreTier, UnitEvaluation};

/// The authoritative score for one (subject, period), or `None` when the
/// subject has no ratings and no override and therefore does not rank.
pub fn resolve(
    ratings: &[PeerRating],
    unit: Option<&UnitEvaluation>,
    central: Option<&FinalEvaluation>,
) -> Option<ResolvedScore> {
    if let Some(evaluation) = central {
        return Some(ResolvedScore {
            score: evaluation.final_score(),
            source_tier: ScoreTier::Final,
        });
    }

    if let Some(evaluation) = unit {
        return Some(ResolvedScore {
            score: evaluation.final_score(),
            source_tier: ScoreTier::Unit,
        });
    }

    peer_average(ratings).map(|score| ResolvedScore {
        score,
        source_tier: ScoreTier::PeerAverage,
    })
}

/// Sum of a period's peer totals. This is the base fed into the override
/// calculator at both tiers.
pub fn peer_total_sum(ratings: &[PeerRating]) -> i32 {
    ratings.iter().map(|rating| rating.total_points).sum()
}

/// Mean of a period's peer totals, rounded half away from zero. This is
/// the no-override fallback shown on leaderboards; it intentionally
/// differs from [`peer_total_sum`].
pub fn peer_average(ratings: &[PeerRating]) -> Option<i32> {
    if ratings.is_empty() {
        return None;
    }

    let sum = f64::from(peer_total_sum(ratings));
    Some((sum / ratings.len() as f64).round() as i32)
}
