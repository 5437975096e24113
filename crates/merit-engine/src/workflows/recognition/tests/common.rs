use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::workflows::recognition::config::RecognitionConfig;
use crate::workflows::recognition::domain::{
    CriterionAssessment, DesignatedWinner, EmployeeCategory, EmployeeId, EvaluationFlags,
    FinalEvaluation, PeerRating, RaterId, RatingCriterion, UnitEvaluation, WinnerId, WinnerKey,
    WinnerType,
};
use crate::workflows::recognition::period::Period;
use crate::workflows::recognition::repository::{
    EmployeeDirectory, RecognitionStore, StoreError,
};
use crate::workflows::recognition::service::RecognitionService;
use crate::workflows::recognition::winner;

pub(super) fn employee(id: &str) -> EmployeeId {
    EmployeeId(id.to_string())
}

pub(super) fn period(token: &str) -> Period {
    token.parse().expect("valid period token")
}

/// A rating whose sub-scores spread `total` across the five criteria.
pub(super) fn rating(rater: &str, subject: &str, token: &str, total: u8) -> PeerRating {
    let criteria = RatingCriterion::ALL;
    let per = total / criteria.len() as u8;
    let remainder = total % criteria.len() as u8;

    let mut scores = BTreeMap::new();
    for (index, criterion) in criteria.iter().enumerate() {
        let extra = if (index as u8) < remainder { 1 } else { 0 };
        scores.insert(*criterion, per + extra);
    }

    PeerRating::new(
        RaterId(rater.to_string()),
        employee(subject),
        period(token),
        scores,
        format!("peer rating from {rater}"),
        Utc::now(),
    )
}

pub(super) fn blank_flags() -> EvaluationFlags {
    EvaluationFlags::default()
}

pub(super) fn flags_with_disciplinary(note: &str) -> EvaluationFlags {
    EvaluationFlags {
        disciplinary_action: CriterionAssessment {
            flagged: true,
            note: note.to_string(),
            evidence_link: None,
        },
        ..EvaluationFlags::default()
    }
}

pub(super) fn worked_example_flags() -> EvaluationFlags {
    EvaluationFlags {
        disciplinary_action: CriterionAssessment::with_evidence(
            "Written warning issued",
            "docs://hr/warning-041",
        ),
        poor_attendance: CriterionAssessment::flagged("Seven late arrivals"),
        positive_contribution: CriterionAssessment::flagged("Led the service desk revamp"),
        ..EvaluationFlags::default()
    }
}

#[derive(Default, Clone)]
pub(super) struct InMemoryStore {
    ratings: Arc<Mutex<Vec<PeerRating>>>,
    unit_evaluations: Arc<Mutex<BTreeMap<(EmployeeId, Period), UnitEvaluation>>>,
    final_evaluations: Arc<Mutex<BTreeMap<(EmployeeId, Period), FinalEvaluation>>>,
    winners: Arc<Mutex<BTreeMap<WinnerKey, DesignatedWinner>>>,
}

impl RecognitionStore for InMemoryStore {
    fn insert_rating(&self, rating: PeerRating) -> Result<PeerRating, StoreError> {
        let mut guard = self.ratings.lock().expect("rating mutex poisoned");
        guard.push(rating.clone());
        Ok(rating)
    }

    fn ratings_for(
        &self,
        subject: &EmployeeId,
        period: Period,
    ) -> Result<Vec<PeerRating>, StoreError> {
        let guard = self.ratings.lock().expect("rating mutex poisoned");
        Ok(guard
            .iter()
            .filter(|rating| rating.subject_id == *subject && rating.period == period)
            .cloned()
            .collect())
    }

    fn ratings_in_period(&self, period: Period) -> Result<Vec<PeerRating>, StoreError> {
        let guard = self.ratings.lock().expect("rating mutex poisoned");
        Ok(guard
            .iter()
            .filter(|rating| rating.period == period)
            .cloned()
            .collect())
    }

    fn ratings_in_year(&self, year: i32) -> Result<Vec<PeerRating>, StoreError> {
        let guard = self.ratings.lock().expect("rating mutex poisoned");
        Ok(guard
            .iter()
            .filter(|rating| rating.period.year() == year)
            .cloned()
            .collect())
    }

    fn unit_evaluation(
        &self,
        subject: &EmployeeId,
        period: Period,
    ) -> Result<Option<UnitEvaluation>, StoreError> {
        let guard = self.unit_evaluations.lock().expect("unit mutex poisoned");
        Ok(guard.get(&(subject.clone(), period)).cloned())
    }

    fn upsert_unit_evaluation(
        &self,
        evaluation: UnitEvaluation,
    ) -> Result<UnitEvaluation, StoreError> {
        let mut guard = self.unit_evaluations.lock().expect("unit mutex poisoned");
        guard.insert(
            (evaluation.subject_id.clone(), evaluation.period),
            evaluation.clone(),
        );
        Ok(evaluation)
    }

    fn unit_evaluations_in(&self, period: Period) -> Result<Vec<UnitEvaluation>, StoreError> {
        let guard = self.unit_evaluations.lock().expect("unit mutex poisoned");
        Ok(guard
            .values()
            .filter(|evaluation| evaluation.period == period)
            .cloned()
            .collect())
    }

    fn final_evaluation(
        &self,
        subject: &EmployeeId,
        period: Period,
    ) -> Result<Option<FinalEvaluation>, StoreError> {
        let guard = self.final_evaluations.lock().expect("final mutex poisoned");
        Ok(guard.get(&(subject.clone(), period)).cloned())
    }

    fn upsert_final_evaluation(
        &self,
        evaluation: FinalEvaluation,
    ) -> Result<FinalEvaluation, StoreError> {
        let mut guard = self.final_evaluations.lock().expect("final mutex poisoned");
        guard.insert(
            (evaluation.subject_id.clone(), evaluation.period),
            evaluation.clone(),
        );
        Ok(evaluation)
    }

    fn final_evaluations_in(&self, period: Period) -> Result<Vec<FinalEvaluation>, StoreError> {
        let guard = self.final_evaluations.lock().expect("final mutex poisoned");
        Ok(guard
            .values()
            .filter(|evaluation| evaluation.period == period)
            .cloned()
            .collect())
    }

    fn upsert_winner(&self, candidate: DesignatedWinner) -> Result<DesignatedWinner, StoreError> {
        let mut guard = self.winners.lock().expect("winner mutex poisoned");
        let key = candidate.key();
        let merged = winner::overwrite_in_place(guard.get(&key), candidate);
        guard.insert(key, merged.clone());
        Ok(merged)
    }

    fn remove_winner(&self, id: &WinnerId) -> Result<Option<DesignatedWinner>, StoreError> {
        let mut guard = self.winners.lock().expect("winner mutex poisoned");
        let key = guard
            .iter()
            .find(|(_, winner)| winner.id == *id)
            .map(|(key, _)| *key);
        Ok(key.and_then(|key| guard.remove(&key)))
    }

    fn winner_for(&self, key: &WinnerKey) -> Result<Option<DesignatedWinner>, StoreError> {
        let guard = self.winners.lock().expect("winner mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn winners_in_year(
        &self,
        winner_type: WinnerType,
        year: i32,
    ) -> Result<Vec<DesignatedWinner>, StoreError> {
        let guard = self.winners.lock().expect("winner mutex poisoned");
        Ok(guard
            .values()
            .filter(|winner| winner.winner_type == winner_type && winner.period.year() == year)
            .cloned()
            .collect())
    }
}

/// Store double that fails every call, for error-propagation coverage.
pub(super) struct UnavailableStore;

impl RecognitionStore for UnavailableStore {
    fn insert_rating(&self, _rating: PeerRating) -> Result<PeerRating, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn ratings_for(
        &self,
        _subject: &EmployeeId,
        _period: Period,
    ) -> Result<Vec<PeerRating>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn ratings_in_period(&self, _period: Period) -> Result<Vec<PeerRating>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn ratings_in_year(&self, _year: i32) -> Result<Vec<PeerRating>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn unit_evaluation(
        &self,
        _subject: &EmployeeId,
        _period: Period,
    ) -> Result<Option<UnitEvaluation>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn upsert_unit_evaluation(
        &self,
        _evaluation: UnitEvaluation,
    ) -> Result<UnitEvaluation, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn unit_evaluations_in(&self, _period: Period) -> Result<Vec<UnitEvaluation>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn final_evaluation(
        &self,
        _subject: &EmployeeId,
        _period: Period,
    ) -> Result<Option<FinalEvaluation>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn upsert_final_evaluation(
        &self,
        _evaluation: FinalEvaluation,
    ) -> Result<FinalEvaluation, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn final_evaluations_in(&self, _period: Period) -> Result<Vec<FinalEvaluation>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn upsert_winner(&self, _winner: DesignatedWinner) -> Result<DesignatedWinner, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn remove_winner(&self, _id: &WinnerId) -> Result<Option<DesignatedWinner>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn winner_for(&self, _key: &WinnerKey) -> Result<Option<DesignatedWinner>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }

    fn winners_in_year(
        &self,
        _winner_type: WinnerType,
        _year: i32,
    ) -> Result<Vec<DesignatedWinner>, StoreError> {
        Err(StoreError::Unavailable("record store offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct StaticDirectory {
    categories: BTreeMap<EmployeeId, EmployeeCategory>,
}

impl StaticDirectory {
    pub(super) fn with(entries: &[(&str, EmployeeCategory)]) -> Self {
        let categories = entries
            .iter()
            .map(|(id, category)| (employee(id), *category))
            .collect();
        Self { categories }
    }
}

impl EmployeeDirectory for StaticDirectory {
    fn category_of(&self, id: &EmployeeId) -> Result<Option<EmployeeCategory>, StoreError> {
        Ok(self.categories.get(id).copied())
    }
}

pub(super) fn default_directory() -> StaticDirectory {
    StaticDirectory::with(&[
        ("emp-andi", EmployeeCategory::Asn),
        ("emp-budi", EmployeeCategory::Asn),
        ("emp-citra", EmployeeCategory::Asn),
        ("emp-dewi", EmployeeCategory::NonAsn),
        ("emp-eka", EmployeeCategory::NonAsn),
    ])
}

pub(super) fn build_service() -> (
    RecognitionService<InMemoryStore, StaticDirectory>,
    Arc<InMemoryStore>,
    Arc<StaticDirectory>,
) {
    let store = Arc::new(InMemoryStore::default());
    let directory = Arc::new(default_directory());
    let service = RecognitionService::new(
        store.clone(),
        directory.clone(),
        RecognitionConfig::default(),
    );
    (service, store, directory)
}

/// Seed one rating per entry in `totals`, each from a distinct rater.
pub(super) fn seed_ratings(
    store: &InMemoryStore,
    subject: &str,
    token: &str,
    totals: &[u8],
) {
    for (index, total) in totals.iter().enumerate() {
        store
            .insert_rating(rating(&format!("rater-{index}"), subject, token, *total))
            .expect("seed rating");
    }
}
