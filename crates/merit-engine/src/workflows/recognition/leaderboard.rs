//! Ranked projections over resolved scores.
//!
//! Ranking is a pure transformation of pre-resolved standings; the service
//! layer gathers the standings from the store, one category at a time.

use serde::{Deserialize, Serialize};

use super::domain::EmployeeId;

/// A subject's resolved standing before ranking. Standings arrive in
/// first-appearance order of the subject in the period's rating stream,
/// which the stable sort preserves for equal scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectStanding {
    pub subject_id: EmployeeId,
    pub score: i32,
    pub rating_count: usize,
}

/// One row of a ranked leaderboard. Rank 1 is the current leader; the
/// leader is a candidate only and never becomes a winner without an
/// explicit designation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub subject_id: EmployeeId,
    pub score: i32,
    pub rating_count: usize,
}

/// Sort standings descending by score (stable for ties) and assign
/// 1-based ranks.
pub fn rank(mut standings: Vec<SubjectStanding>) -> Vec<LeaderboardEntry> {
    standings.sort_by(|a, b| b.score.cmp(&a.score));

    standings
        .into_iter()
        .enumerate()
        .map(|(index, standing)| LeaderboardEntry {
            rank: index + 1,
            subject_id: standing.subject_id,
            score: standing.score,
            rating_count: standing.rating_count,
        })
        .collect()
}
