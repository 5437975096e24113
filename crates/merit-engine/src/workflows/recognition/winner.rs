//! Winner designation records.
//!
//! Designation is always an explicit administrative action; the computed
//! leaderboard leader is never promoted automatically. At most one record
//! exists per (type, category, period), enforced by the store's atomic
//! upsert rather than a read-then-write sequence.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    DesignatedWinner, EmployeeCategory, EmployeeId, WinnerId, WinnerType,
};
use super::period::Period;

static WINNER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_winner_id() -> WinnerId {
    let id = WINNER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    WinnerId(format!("winner-{id:06}"))
}

/// Administrative confirmation of a winner for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerDesignation {
    pub winner_type: WinnerType,
    pub category: EmployeeCategory,
    pub period: Period,
    pub subject_id: EmployeeId,
    pub final_points: i32,
    pub designated_by: EmployeeId,
}

/// Materialize a fresh record for a designation.
pub(crate) fn new_record(designation: WinnerDesignation, now: DateTime<Utc>) -> DesignatedWinner {
    DesignatedWinner {
        id: next_winner_id(),
        winner_type: designation.winner_type,
        category: designation.category,
        period: designation.period,
        subject_id: designation.subject_id,
        final_points: designation.final_points,
        designated_by: designation.designated_by,
        designated_at: now,
        updated_at: now,
    }
}

/// Merge a candidate onto whatever currently holds its key: the existing
/// record keeps its id and first-designation timestamp while subject,
/// points, actor, and the update timestamp are replaced. Store
/// implementations call this inside their atomic upsert.
pub fn overwrite_in_place(
    existing: Option<&DesignatedWinner>,
    candidate: DesignatedWinner,
) -> DesignatedWinner {
    match existing {
        Some(current) => DesignatedWinner {
            id: current.id.clone(),
            designated_at: current.designated_at,
            ..candidate
        },
        None => candidate,
    }
}
