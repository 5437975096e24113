use serde::{Deserialize, Serialize};

/// Percentage table for the override calculator. Whole percents keep the
/// half-away-from-zero rounding exact in integer arithmetic; each share
/// is rounded on its own before totals are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    pub disciplinary_penalty_percent: u32,
    pub attendance_penalty_percent: u32,
    pub performance_penalty_percent: u32,
    pub contribution_bonus_percent: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            disciplinary_penalty_percent: 15,
            attendance_penalty_percent: 5,
            performance_penalty_percent: 5,
            contribution_bonus_percent: 10,
        }
    }
}
