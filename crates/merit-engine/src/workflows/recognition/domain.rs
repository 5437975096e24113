use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::period::Period;

/// Identifier wrapper for the rated employee.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for the colleague submitting a rating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaterId(pub String);

impl fmt::Display for RaterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a designated-winner record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinnerId(pub String);

impl fmt::Display for WinnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employment classification partitioning every leaderboard. The two
/// categories never compete against each other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EmployeeCategory {
    #[serde(rename = "ASN")]
    Asn,
    #[serde(rename = "Non-ASN")]
    NonAsn,
}

impl EmployeeCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EmployeeCategory::Asn => "ASN",
            EmployeeCategory::NonAsn => "Non-ASN",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asn" => Some(Self::Asn),
            "non-asn" | "non_asn" | "nonasn" => Some(Self::NonAsn),
            _ => None,
        }
    }
}

/// Criteria keys of the peer rubric. The rubric itself (wording, weights,
/// scoring UI) lives outside the engine; the keys only address sub-scores.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RatingCriterion {
    ServiceOrientation,
    Commitment,
    Discipline,
    Cooperation,
    Initiative,
}

impl RatingCriterion {
    pub const ALL: [RatingCriterion; 5] = [
        RatingCriterion::ServiceOrientation,
        RatingCriterion::Commitment,
        RatingCriterion::Discipline,
        RatingCriterion::Cooperation,
        RatingCriterion::Initiative,
    ];

    /// Upper bound of a single sub-score.
    pub const MAX_SUB_SCORE: u8 = 20;
}

/// One peer's scored rating of a colleague for one period. Immutable once
/// stored; many may exist per (subject, period) from different raters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerRating {
    pub rater_id: RaterId,
    pub subject_id: EmployeeId,
    pub period: Period,
    pub criteria_scores: BTreeMap<RatingCriterion, u8>,
    pub total_points: i32,
    pub max_points: i32,
    pub justification: String,
    pub submitted_at: DateTime<Utc>,
}

impl PeerRating {
    /// Build a rating, deriving the total and its theoretical maximum from
    /// the sub-scores.
    pub fn new(
        rater_id: RaterId,
        subject_id: EmployeeId,
        period: Period,
        criteria_scores: BTreeMap<RatingCriterion, u8>,
        justification: String,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let total_points = criteria_scores.values().map(|score| i32::from(*score)).sum();
        let max_points =
            RatingCriterion::ALL.len() as i32 * i32::from(RatingCriterion::MAX_SUB_SCORE);

        Self {
            rater_id,
            subject_id,
            period,
            criteria_scores,
            total_points,
            max_points,
            justification,
            submitted_at,
        }
    }
}

/// One supervisor-reviewed criterion: whether it applies, the supporting
/// note, and an optional evidence link for the audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionAssessment {
    pub flagged: bool,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_link: Option<String>,
}

impl CriterionAssessment {
    pub fn flagged(note: impl Into<String>) -> Self {
        Self {
            flagged: true,
            note: note.into(),
            evidence_link: None,
        }
    }

    pub fn with_evidence(note: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            flagged: true,
            note: note.into(),
            evidence_link: Some(link.into()),
        }
    }
}

/// The four override criteria a supervisor or administrator can assert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationFlags {
    pub disciplinary_action: CriterionAssessment,
    pub poor_attendance: CriterionAssessment,
    pub poor_performance: CriterionAssessment,
    pub positive_contribution: CriterionAssessment,
}

/// Central-tier audit markers. Verification never alters the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagVerification {
    pub disciplinary_action: bool,
    pub poor_attendance: bool,
    pub poor_performance: bool,
    pub positive_contribution: bool,
}

/// Per-flag magnitudes derived by the override calculator, persisted with
/// the evaluation so the audit view can show how the total was formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub disciplinary_penalty: i32,
    pub attendance_penalty: i32,
    pub performance_penalty: i32,
    pub contribution_bonus: i32,
    pub adjustment: i32,
    pub final_score: i32,
}

impl ScoreAdjustment {
    pub fn total_penalties(&self) -> i32 {
        self.disciplinary_penalty + self.attendance_penalty + self.performance_penalty
    }

    pub fn total_bonuses(&self) -> i32 {
        self.contribution_bonus
    }
}

/// Unit-supervisor override for one (subject, period). Unique per key;
/// superseded, not deleted, when a central evaluation exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEvaluation {
    pub subject_id: EmployeeId,
    pub period: Period,
    pub base_score: i32,
    pub flags: EvaluationFlags,
    pub breakdown: ScoreAdjustment,
    pub evaluated_by: EmployeeId,
    pub updated_at: DateTime<Utc>,
}

impl UnitEvaluation {
    pub fn final_score(&self) -> i32 {
        self.breakdown.final_score
    }
}

/// Central-administrator override for one (subject, period). Highest tier;
/// always derived from the peer base score, never from the unit total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalEvaluation {
    pub subject_id: EmployeeId,
    pub period: Period,
    pub base_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_score_snapshot: Option<i32>,
    pub flags: EvaluationFlags,
    pub verified: FlagVerification,
    pub additional_adjustment: i32,
    pub adjustment_note: String,
    pub breakdown: ScoreAdjustment,
    pub evaluated_by: EmployeeId,
    pub updated_at: DateTime<Utc>,
}

impl FinalEvaluation {
    pub fn final_score(&self) -> i32 {
        self.breakdown.final_score
    }
}

/// Cadence of a designated winner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WinnerType {
    Monthly,
    Yearly,
}

impl WinnerType {
    pub const fn label(self) -> &'static str {
        match self {
            WinnerType::Monthly => "monthly",
            WinnerType::Yearly => "yearly",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Uniqueness key for designated winners: at most one record per key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WinnerKey {
    pub winner_type: WinnerType,
    pub category: EmployeeCategory,
    pub period: Period,
}

/// An explicitly confirmed winner, distinct from whoever currently tops
/// the computed leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignatedWinner {
    pub id: WinnerId,
    pub winner_type: WinnerType,
    pub category: EmployeeCategory,
    pub period: Period,
    pub subject_id: EmployeeId,
    pub final_points: i32,
    pub designated_by: EmployeeId,
    pub designated_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DesignatedWinner {
    pub fn key(&self) -> WinnerKey {
        WinnerKey {
            winner_type: self.winner_type,
            category: self.category,
            period: self.period,
        }
    }
}

/// Which tier produced a resolved score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Final,
    Unit,
    PeerAverage,
}

impl ScoreTier {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreTier::Final => "final",
            ScoreTier::Unit => "unit",
            ScoreTier::PeerAverage => "peer_average",
        }
    }
}

/// The single authoritative score for a (subject, period). Derived on
/// every read; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedScore {
    pub score: i32,
    pub source_tier: ScoreTier,
}
