use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::RecognitionConfig;
use super::domain::{
    DesignatedWinner, EmployeeCategory, EmployeeId, EvaluationFlags, FinalEvaluation,
    FlagVerification, PeerRating, RaterId, RatingCriterion, ResolvedScore, UnitEvaluation,
    WinnerId, WinnerKey, WinnerType,
};
use super::leaderboard::{self, LeaderboardEntry, SubjectStanding};
use super::overrides::{self, ValidationError};
use super::period::Period;
use super::repository::{EmployeeDirectory, RecognitionStore, StoreError};
use super::resolver;
use super::winner::{self, WinnerDesignation};

/// Intake payload for a peer rating row produced by the portal's rating
/// screens. Totals are derived here, never trusted from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerRatingSubmission {
    pub rater_id: RaterId,
    pub subject_id: EmployeeId,
    pub period: Period,
    pub criteria_scores: BTreeMap<RatingCriterion, u8>,
    pub justification: String,
}

/// Unit-supervisor evaluation form for one (subject, period).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitEvaluationSubmission {
    pub subject_id: EmployeeId,
    pub period: Period,
    pub flags: EvaluationFlags,
    pub evaluated_by: EmployeeId,
}

/// Central-administrator evaluation form for one (subject, period).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalEvaluationSubmission {
    pub subject_id: EmployeeId,
    pub period: Period,
    pub flags: EvaluationFlags,
    #[serde(default)]
    pub verified: FlagVerification,
    #[serde(default)]
    pub additional_adjustment: i32,
    #[serde(default)]
    pub adjustment_note: String,
    pub evaluated_by: EmployeeId,
}

/// Editable starting point for a central evaluation: unit-tier flags when
/// a unit evaluation exists, blank flags otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalEvaluationDraft {
    pub subject_id: EmployeeId,
    pub period: Period,
    pub base_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_score_snapshot: Option<i32>,
    pub flags: EvaluationFlags,
    pub verified: FlagVerification,
    pub additional_adjustment: i32,
    pub adjustment_note: String,
}

/// Everything the audit/UI view needs for one (subject, period): the
/// resolved score plus every tier that fed or was shadowed by it.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub subject_id: EmployeeId,
    pub period: Period,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedScore>,
    pub rating_count: usize,
    pub peer_total: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_average: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitEvaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_evaluation: Option<FinalEvaluation>,
}

/// Error raised by the recognition service.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no designated winner with id {0}")]
    WinnerNotFound(WinnerId),
    #[error("employee {0} is not present in the directory")]
    UnknownEmployee(EmployeeId),
}

/// Service composing the record store, the employee directory, and the
/// pure calculator/resolver/ranking components.
pub struct RecognitionService<S, D> {
    store: Arc<S>,
    directory: Arc<D>,
    config: RecognitionConfig,
}

impl<S, D> RecognitionService<S, D>
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, config: RecognitionConfig) -> Self {
        Self {
            store,
            directory,
            config,
        }
    }

    fn require_category(
        &self,
        subject: &EmployeeId,
    ) -> Result<EmployeeCategory, RecognitionServiceError> {
        self.directory
            .category_of(subject)?
            .ok_or_else(|| RecognitionServiceError::UnknownEmployee(subject.clone()))
    }

    /// Store a rating row delivered by the rating screens. Ratings are
    /// immutable; nothing here ever mutates or deletes one.
    pub fn record_peer_rating(
        &self,
        submission: PeerRatingSubmission,
    ) -> Result<PeerRating, RecognitionServiceError> {
        self.require_category(&submission.subject_id)?;

        let rating = PeerRating::new(
            submission.rater_id,
            submission.subject_id,
            submission.period,
            submission.criteria_scores,
            submission.justification,
            Utc::now(),
        );

        let stored = self.store.insert_rating(rating)?;
        info!(
            subject = %stored.subject_id,
            period = %stored.period,
            total = stored.total_points,
            "peer rating recorded"
        );
        Ok(stored)
    }

    /// Create or replace the unit-tier evaluation for one (subject,
    /// period). The base score is the sum of the period's peer totals.
    pub fn submit_unit_evaluation(
        &self,
        submission: UnitEvaluationSubmission,
    ) -> Result<UnitEvaluation, RecognitionServiceError> {
        self.require_category(&submission.subject_id)?;

        let ratings = self
            .store
            .ratings_for(&submission.subject_id, submission.period)?;
        let base_score = resolver::peer_total_sum(&ratings);
        let breakdown = overrides::compute(base_score, &submission.flags, 0, "", &self.config)?;

        let evaluation = UnitEvaluation {
            subject_id: submission.subject_id,
            period: submission.period,
            base_score,
            flags: submission.flags,
            breakdown,
            evaluated_by: submission.evaluated_by,
            updated_at: Utc::now(),
        };

        let stored = self.store.upsert_unit_evaluation(evaluation)?;
        info!(
            subject = %stored.subject_id,
            period = %stored.period,
            final_score = stored.final_score(),
            "unit evaluation recorded"
        );
        Ok(stored)
    }

    /// Starting point for the central evaluation form: flags copied from
    /// the unit tier when one exists, blank otherwise.
    pub fn prefill_final_evaluation(
        &self,
        subject: &EmployeeId,
        period: Period,
    ) -> Result<FinalEvaluationDraft, RecognitionServiceError> {
        self.require_category(subject)?;

        let ratings = self.store.ratings_for(subject, period)?;
        let unit = self.store.unit_evaluation(subject, period)?;

        Ok(FinalEvaluationDraft {
            subject_id: subject.clone(),
            period,
            base_score: resolver::peer_total_sum(&ratings),
            unit_score_snapshot: unit.as_ref().map(UnitEvaluation::final_score),
            flags: unit.map(|evaluation| evaluation.flags).unwrap_or_default(),
            verified: FlagVerification::default(),
            additional_adjustment: 0,
            adjustment_note: String::new(),
        })
    }

    /// Create or replace the central-tier evaluation. The calculator runs
    /// against the peer base score, never the unit tier's adjusted total;
    /// the unit score is only snapshotted for audit display.
    pub fn submit_final_evaluation(
        &self,
        submission: FinalEvaluationSubmission,
    ) -> Result<FinalEvaluation, RecognitionServiceError> {
        self.require_category(&submission.subject_id)?;

        let ratings = self
            .store
            .ratings_for(&submission.subject_id, submission.period)?;
        let base_score = resolver::peer_total_sum(&ratings);
        let breakdown = overrides::compute(
            base_score,
            &submission.flags,
            submission.additional_adjustment,
            &submission.adjustment_note,
            &self.config,
        )?;
        let unit_score_snapshot = self
            .store
            .unit_evaluation(&submission.subject_id, submission.period)?
            .map(|evaluation| evaluation.final_score());

        let evaluation = FinalEvaluation {
            subject_id: submission.subject_id,
            period: submission.period,
            base_score,
            unit_score_snapshot,
            flags: submission.flags,
            verified: submission.verified,
            additional_adjustment: submission.additional_adjustment,
            adjustment_note: submission.adjustment_note,
            breakdown,
            evaluated_by: submission.evaluated_by,
            updated_at: Utc::now(),
        };

        let stored = self.store.upsert_final_evaluation(evaluation)?;
        info!(
            subject = %stored.subject_id,
            period = %stored.period,
            final_score = stored.final_score(),
            "final evaluation recorded"
        );
        Ok(stored)
    }

    /// The current authoritative score for one (subject, period).
    pub fn resolved_score(
        &self,
        subject: &EmployeeId,
        period: Period,
    ) -> Result<Option<ResolvedScore>, RecognitionServiceError> {
        let ratings = self.store.ratings_for(subject, period)?;
        let unit = self.store.unit_evaluation(subject, period)?;
        let central = self.store.final_evaluation(subject, period)?;
        Ok(resolver::resolve(&ratings, unit.as_ref(), central.as_ref()))
    }

    /// The resolved score together with every tier it shadows, for the
    /// audit and evaluation-form views.
    pub fn score_breakdown(
        &self,
        subject: &EmployeeId,
        period: Period,
    ) -> Result<ScoreBreakdown, RecognitionServiceError> {
        let ratings = self.store.ratings_for(subject, period)?;
        let unit = self.store.unit_evaluation(subject, period)?;
        let central = self.store.final_evaluation(subject, period)?;
        let resolved = resolver::resolve(&ratings, unit.as_ref(), central.as_ref());

        Ok(ScoreBreakdown {
            subject_id: subject.clone(),
            period,
            resolved,
            rating_count: ratings.len(),
            peer_total: resolver::peer_total_sum(&ratings),
            peer_average: resolver::peer_average(&ratings),
            unit,
            final_evaluation: central,
        })
    }

    /// Ranked standings for one period and category. Subjects appear in
    /// first-appearance order of the period's rating stream (then override
    /// stream) so ties stay deterministic.
    pub fn monthly_leaderboard(
        &self,
        period: Period,
        category: EmployeeCategory,
    ) -> Result<Vec<LeaderboardEntry>, RecognitionServiceError> {
        let ratings = self.store.ratings_in_period(period)?;
        let units = self.store.unit_evaluations_in(period)?;
        let centrals = self.store.final_evaluations_in(period)?;

        let mut subjects: Vec<EmployeeId> = Vec::new();
        let mut seen: BTreeSet<EmployeeId> = BTreeSet::new();
        for rating in &ratings {
            if seen.insert(rating.subject_id.clone()) {
                subjects.push(rating.subject_id.clone());
            }
        }
        for evaluation in &units {
            if seen.insert(evaluation.subject_id.clone()) {
                subjects.push(evaluation.subject_id.clone());
            }
        }
        for evaluation in &centrals {
            if seen.insert(evaluation.subject_id.clone()) {
                subjects.push(evaluation.subject_id.clone());
            }
        }

        let mut standings = Vec::new();
        for subject in subjects {
            if self.directory.category_of(&subject)? != Some(category) {
                continue;
            }

            let subject_ratings: Vec<PeerRating> = ratings
                .iter()
                .filter(|rating| rating.subject_id == subject)
                .cloned()
                .collect();
            let unit = units
                .iter()
                .find(|evaluation| evaluation.subject_id == subject);
            let central = centrals
                .iter()
                .find(|evaluation| evaluation.subject_id == subject);

            if let Some(resolved) = resolver::resolve(&subject_ratings, unit, central) {
                standings.push(SubjectStanding {
                    subject_id: subject,
                    score: resolved.score,
                    rating_count: subject_ratings.len(),
                });
            }
        }

        Ok(leaderboard::rank(standings))
    }

    /// Ranked yearly standings for one category: each subject's sum of
    /// resolved monthly scores across the year's months holding at least
    /// one peer rating.
    pub fn yearly_leaderboard(
        &self,
        year: i32,
        category: EmployeeCategory,
    ) -> Result<Vec<LeaderboardEntry>, RecognitionServiceError> {
        let ratings = self.store.ratings_in_year(year)?;

        let mut subjects: Vec<EmployeeId> = Vec::new();
        let mut rated_months: BTreeMap<EmployeeId, BTreeSet<Period>> = BTreeMap::new();
        for rating in &ratings {
            let months = rated_months.entry(rating.subject_id.clone()).or_default();
            if months.is_empty() {
                subjects.push(rating.subject_id.clone());
            }
            months.insert(rating.period);
        }

        let mut standings = Vec::new();
        for subject in subjects {
            if self.directory.category_of(&subject)? != Some(category) {
                continue;
            }

            let months = &rated_months[&subject];
            let mut yearly_total = 0;
            let mut rating_count = 0;
            for period in months {
                let month_ratings: Vec<PeerRating> = ratings
                    .iter()
                    .filter(|rating| {
                        rating.subject_id == subject && rating.period == *period
                    })
                    .cloned()
                    .collect();
                rating_count += month_ratings.len();

                let unit = self.store.unit_evaluation(&subject, *period)?;
                let central = self.store.final_evaluation(&subject, *period)?;
                if let Some(resolved) =
                    resolver::resolve(&month_ratings, unit.as_ref(), central.as_ref())
                {
                    yearly_total += resolved.score;
                }
            }

            standings.push(SubjectStanding {
                subject_id: subject,
                score: yearly_total,
                rating_count,
            });
        }

        Ok(leaderboard::rank(standings))
    }

    /// Persist an administrative winner confirmation. Upserts on the
    /// (type, category, period) key: a prior holder is overwritten in
    /// place and exactly one winner remains for the key.
    pub fn designate_winner(
        &self,
        designation: WinnerDesignation,
    ) -> Result<DesignatedWinner, RecognitionServiceError> {
        let record = winner::new_record(designation, Utc::now());
        let stored = self.store.upsert_winner(record)?;
        info!(
            winner = %stored.id,
            subject = %stored.subject_id,
            period = %stored.period,
            category = stored.category.label(),
            "winner designated"
        );
        Ok(stored)
    }

    /// Remove a designated winner, freeing its key for a fresh
    /// designation. Revoking an unknown id is a surfaced failure, not a
    /// silent no-op.
    pub fn revoke_winner(
        &self,
        id: &WinnerId,
    ) -> Result<DesignatedWinner, RecognitionServiceError> {
        let removed = self
            .store
            .remove_winner(id)?
            .ok_or_else(|| RecognitionServiceError::WinnerNotFound(id.clone()))?;
        info!(winner = %removed.id, period = %removed.period, "winner revoked");
        Ok(removed)
    }

    /// The confirmed winner currently holding a key, if any.
    pub fn current_winner(
        &self,
        key: &WinnerKey,
    ) -> Result<Option<DesignatedWinner>, RecognitionServiceError> {
        Ok(self.store.winner_for(key)?)
    }

    /// Historical recap: every confirmed winner of one cadence across a
    /// year, ordered by period then category.
    pub fn winner_recap(
        &self,
        winner_type: WinnerType,
        year: i32,
    ) -> Result<Vec<DesignatedWinner>, RecognitionServiceError> {
        let mut winners = self.store.winners_in_year(winner_type, year)?;
        winners.sort_by(|a, b| {
            a.period
                .cmp(&b.period)
                .then_with(|| a.category.label().cmp(b.category.label()))
        });
        Ok(winners)
    }
}
