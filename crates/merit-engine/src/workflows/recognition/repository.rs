use super::domain::{
    DesignatedWinner, EmployeeCategory, EmployeeId, FinalEvaluation, PeerRating, UnitEvaluation,
    WinnerId, WinnerKey, WinnerType,
};
use super::period::Period;

/// Error enumeration for record-store failures. Propagated unchanged to
/// the caller; the engine never retries or falls back silently.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed read/write collection backing the engine. Implementations only
/// need filtering by subject, period, and year; they decide nothing about
/// scores.
pub trait RecognitionStore: Send + Sync {
    fn insert_rating(&self, rating: PeerRating) -> Result<PeerRating, StoreError>;
    fn ratings_for(&self, subject: &EmployeeId, period: Period)
        -> Result<Vec<PeerRating>, StoreError>;
    fn ratings_in_period(&self, period: Period) -> Result<Vec<PeerRating>, StoreError>;
    fn ratings_in_year(&self, year: i32) -> Result<Vec<PeerRating>, StoreError>;

    fn unit_evaluation(
        &self,
        subject: &EmployeeId,
        period: Period,
    ) -> Result<Option<UnitEvaluation>, StoreError>;
    /// Last write wins for one (subject, period); the replaced record is
    /// gone entirely.
    fn upsert_unit_evaluation(
        &self,
        evaluation: UnitEvaluation,
    ) -> Result<UnitEvaluation, StoreError>;
    fn unit_evaluations_in(&self, period: Period) -> Result<Vec<UnitEvaluation>, StoreError>;

    fn final_evaluation(
        &self,
        subject: &EmployeeId,
        period: Period,
    ) -> Result<Option<FinalEvaluation>, StoreError>;
    fn upsert_final_evaluation(
        &self,
        evaluation: FinalEvaluation,
    ) -> Result<FinalEvaluation, StoreError>;
    fn final_evaluations_in(&self, period: Period) -> Result<Vec<FinalEvaluation>, StoreError>;

    /// Single atomic insert-or-replace on the winner key. Implementations
    /// must apply [`super::winner::overwrite_in_place`] so an existing
    /// record keeps its id and first-designation timestamp.
    fn upsert_winner(&self, winner: DesignatedWinner) -> Result<DesignatedWinner, StoreError>;
    fn remove_winner(&self, id: &WinnerId) -> Result<Option<DesignatedWinner>, StoreError>;
    fn winner_for(&self, key: &WinnerKey) -> Result<Option<DesignatedWinner>, StoreError>;
    fn winners_in_year(
        &self,
        winner_type: WinnerType,
        year: i32,
    ) -> Result<Vec<DesignatedWinner>, StoreError>;
}

/// Master-data lookup mapping employees to their leaderboard category.
/// Owned by the HR core outside this engine.
pub trait EmployeeDirectory: Send + Sync {
    fn category_of(&self, id: &EmployeeId) -> Result<Option<EmployeeCategory>, StoreError>;
}
