//! Multi-tier performance recognition: peer ratings, supervisor and
//! administrator overrides, score resolution, leaderboards, and winner
//! designation.

pub mod config;
pub mod domain;
pub mod leaderboard;
pub mod overrides;
pub mod period;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;
pub mod winner;

#[cfg(test)]
mod tests;

pub use config::RecognitionConfig;
pub use domain::{
    CriterionAssessment, DesignatedWinner, EmployeeCategory, EmployeeId, EvaluationFlags,
    FinalEvaluation, FlagVerification, PeerRating, RaterId, RatingCriterion, ResolvedScore,
    ScoreAdjustment, ScoreTier, UnitEvaluation, WinnerId, WinnerKey, WinnerType,
};
pub use leaderboard::{LeaderboardEntry, SubjectStanding};
pub use overrides::ValidationError;
pub use period::{Period, PeriodParseError};
pub use repository::{EmployeeDirectory, RecognitionStore, StoreError};
pub use router::recognition_router;
pub use service::{
    FinalEvaluationDraft, FinalEvaluationSubmission, PeerRatingSubmission, RecognitionService,
    RecognitionServiceError, ScoreBreakdown, UnitEvaluationSubmission,
};
pub use winner::WinnerDesignation;
