//! Override calculator shared by the unit and central tiers.
//!
//! Each asserted flag yields `round(base × rate)`, rounded half-away-from-
//! zero independently of the others; magnitudes are never compounded on an
//! already-adjusted total. Both tiers feed the *peer* base score in, so a
//! central override never double-discounts the unit tier's result.

use super::config::RecognitionConfig;
use super::domain::{EvaluationFlags, ScoreAdjustment};

/// Rejections raised before anything is written. Each variant names the
/// field the submitter must fill in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("disciplinary action flag requires a non-empty note")]
    MissingDisciplinaryNote,
    #[error("positive contribution flag requires a non-empty description")]
    MissingContributionDescription,
    #[error("non-zero additional adjustment requires a non-empty note")]
    MissingAdjustmentNote,
}

/// Derive the per-flag magnitudes and the adjusted total for one tier.
///
/// `final_score = base − Σ penalties + Σ bonuses + adjustment`. The unit
/// tier passes a zero adjustment; only the central tier carries one.
pub fn compute(
    base_score: i32,
    flags: &EvaluationFlags,
    adjustment: i32,
    adjustment_note: &str,
    config: &RecognitionConfig,
) -> Result<ScoreAdjustment, ValidationError> {
    if flags.disciplinary_action.flagged && flags.disciplinary_action.note.trim().is_empty() {
        return Err(ValidationError::MissingDisciplinaryNote);
    }
    if flags.positive_contribution.flagged && flags.positive_contribution.note.trim().is_empty() {
        return Err(ValidationError::MissingContributionDescription);
    }
    if adjustment != 0 && adjustment_note.trim().is_empty() {
        return Err(ValidationError::MissingAdjustmentNote);
    }

    let disciplinary_penalty = if flags.disciplinary_action.flagged {
        percent_share(base_score, config.disciplinary_penalty_percent)
    } else {
        0
    };
    let attendance_penalty = if flags.poor_attendance.flagged {
        percent_share(base_score, config.attendance_penalty_percent)
    } else {
        0
    };
    let performance_penalty = if flags.poor_performance.flagged {
        percent_share(base_score, config.performance_penalty_percent)
    } else {
        0
    };
    let contribution_bonus = if flags.positive_contribution.flagged {
        percent_share(base_score, config.contribution_bonus_percent)
    } else {
        0
    };

    let final_score = base_score
        - (disciplinary_penalty + attendance_penalty + performance_penalty)
        + contribution_bonus
        + adjustment;

    Ok(ScoreAdjustment {
        disciplinary_penalty,
        attendance_penalty,
        performance_penalty,
        contribution_bonus,
        adjustment,
        final_score,
    })
}

/// `base × percent / 100`, rounded to the nearest integer half away from
/// zero. Integer arithmetic throughout; `13.5` always lands on `14`.
fn percent_share(base_score: i32, percent: u32) -> i32 {
    let product = i64::from(base_score) * i64::from(percent);
    let rounded = if product >= 0 {
        (product + 50) / 100
    } else {
        (product - 50) / 100
    };
    rounded as i32
}
