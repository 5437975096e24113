use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use merit_engine::workflows::recognition::{
    winner, DesignatedWinner, EmployeeCategory, EmployeeDirectory, EmployeeId, FinalEvaluation,
    PeerRating, Period, RecognitionConfig, RecognitionStore, StoreError, UnitEvaluation,
    WinnerId, WinnerKey, WinnerType,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local record store. Stands in for the portal's managed
/// database behind the same trait the engine is written against.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecognitionStore {
    ratings: Arc<Mutex<Vec<PeerRating>>>,
    unit_evaluations: Arc<Mutex<BTreeMap<(EmployeeId, Period), UnitEvaluation>>>,
    final_evaluations: Arc<Mutex<BTreeMap<(EmployeeId, Period), FinalEvaluation>>>,
    winners: Arc<Mutex<BTreeMap<WinnerKey, DesignatedWinner>>>,
}

impl RecognitionStore for InMemoryRecognitionStore {
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

/// Process-local stand-in for the HR master-data directory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEmployeeDirectory {
    categories: Arc<Mutex<BTreeMap<EmployeeId, EmployeeCategory>>>,
}

impl InMemoryEmployeeDirectory {
    pub(crate) fn register(&self, id: &str, category: EmployeeCategory) {
        self.categories
            .lock()
            .expect("directory mutex poisoned")
            .insert(EmployeeId(id.to_string()), category);
    }
}

impl EmployeeDirectory for InMemoryEmployeeDirectory {
    fn category_of(&self, id: &EmployeeId) -> Result<Option<EmployeeCategory>, StoreError> {
        let guard = self.categories.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).copied())
    }
}

/// Roster used by the serve default, the demo, and the leaderboard
/// preview until a real directory integration lands.
pub(crate) fn sample_directory() -> InMemoryEmployeeDirectory {
    let directory = InMemoryEmployeeDirectory::default();
    directory.register("emp-andi", EmployeeCategory::Asn);
    directory.register("emp-budi", EmployeeCategory::Asn);
    directory.register("emp-citra", EmployeeCategory::Asn);
    directory.register("emp-dewi", EmployeeCategory::NonAsn);
    directory.register("emp-eka", EmployeeCategory::NonAsn);
    directory
}

pub(crate) fn default_recognition_config() -> RecognitionConfig {
    RecognitionConfig::default()
}

pub(crate) fn parse_period(raw: &str) -> Result<Period, String> {
    raw.trim()
        .parse::<Period>()
        .map_err(|err| err.to_string())
}

pub(crate) fn parse_category(raw: &str) -> Result<EmployeeCategory, String> {
    EmployeeCategory::from_label(raw)
        .ok_or_else(|| format!("unknown employee category '{raw}' (expected ASN or Non-ASN)"))
}
