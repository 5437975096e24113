use std::collections::BTreeMap;
use std::sync::Arc;

use super::common::*;
use crate::workflows::recognition::config::RecognitionConfig;
use crate::workflows::recognition::domain::{RaterId, RatingCriterion, ScoreTier};
use crate::workflows::recognition::repository::{RecognitionStore, StoreError};
use crate::workflows::recognition::service::{
    FinalEvaluationSubmission, PeerRatingSubmission, RecognitionService,
    RecognitionServiceError, UnitEvaluationSubmission,
};

#[test]
fn recorded_ratings_derive_their_totals() {
    let (service, _, _) = build_service();

    let mut scores = BTreeMap::new();
    scores.insert(RatingCriterion::ServiceOrientation, 18);
    scores.insert(RatingCriterion::Commitment, 17);
    scores.insert(RatingCriterion::Discipline, 20);
    scores.insert(RatingCriterion::Cooperation, 15);
    scores.insert(RatingCriterion::Initiative, 16);

    let rating = service
        .record_peer_rating(PeerRatingSubmission {
            rater_id: RaterId("rater-9".to_string()),
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            criteria_scores: scores,
            justification: "Consistently helps the front desk".to_string(),
        })
        .expect("rating accepted");

    assert_eq!(rating.total_points, 86);
    assert_eq!(rating.max_points, 100);
}

#[test]
fn unit_submission_uses_the_period_sum_as_base() {
    let (service, store, _) = build_service();
    seed_ratings(&store, "emp-andi", "2025-01", &[80, 90, 100]);

    let evaluation = service
        .submit_unit_evaluation(UnitEvaluationSubmission {
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            flags: blank_flags(),
            evaluated_by: employee("sup-yusuf"),
        })
        .expect("unit evaluation accepted");

    // Sum of totals, not their average.
    assert_eq!(evaluation.base_score, 270);
    assert_eq!(evaluation.final_score(), 270);
}

#[test]
fn failed_validation_writes_nothing() {
    let (service, store, _) = build_service();
    seed_ratings(&store, "emp-andi", "2025-01", &[80]);

    let result = service.submit_unit_evaluation(UnitEvaluationSubmission {
        subject_id: employee("emp-andi"),
        period: period("2025-01"),
        flags: flags_with_disciplinary(""),
        evaluated_by: employee("sup-yusuf"),
    });

    assert!(matches!(
        result,
        Err(RecognitionServiceError::Validation(_))
    ));
    assert!(store
        .unit_evaluation(&employee("emp-andi"), period("2025-01"))
        .expect("store reachable")
        .is_none());
}

#[test]
fn unit_resubmission_fully_replaces_the_prior_record() {
    let (service, store, _) = build_service();
    seed_ratings(&store, "emp-andi", "2025-01", &[100]);

    service
        .submit_unit_evaluation(UnitEvaluationSubmission {
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            flags: worked_example_flags(),
            evaluated_by: employee("sup-yusuf"),
        })
        .expect("first submission accepted");
    service
        .submit_unit_evaluation(UnitEvaluationSubmission {
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            flags: blank_flags(),
            evaluated_by: employee("sup-zain"),
        })
        .expect("second submission accepted");

    let stored = store
        .unit_evaluation(&employee("emp-andi"), period("2025-01"))
        .expect("store reachable")
        .expect("record present");
    assert!(!stored.flags.disciplinary_action.flagged);
    assert_eq!(stored.final_score(), 100);
    assert_eq!(stored.evaluated_by, employee("sup-zain"));
}

#[test]
fn final_submission_rederives_from_the_peer_base() {
    let (service, store, _) = build_service();
    seed_ratings(&store, "emp-andi", "2025-01", &[100]);

    let unit = service
        .submit_unit_evaluation(UnitEvaluationSubmission {
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            flags: worked_example_flags(),
            evaluated_by: employee("sup-yusuf"),
        })
        .expect("unit evaluation accepted");
    assert_eq!(unit.final_score(), 90);

    let evaluation = service
        .submit_final_evaluation(FinalEvaluationSubmission {
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            flags: blank_flags(),
            verified: Default::default(),
            additional_adjustment: 5,
            adjustment_note: "Directorate commendation".to_string(),
            evaluated_by: employee("adm-ratna"),
        })
        .expect("final evaluation accepted");

    // Base 100, not the unit tier's 90; the unit total is only a snapshot.
    assert_eq!(evaluation.base_score, 100);
    assert_eq!(evaluation.final_score(), 105);
    assert_eq!(evaluation.unit_score_snapshot, Some(90));
}

#[test]
fn final_draft_prefills_from_the_unit_tier() {
    let (service, store, _) = build_service();
    seed_ratings(&store, "emp-andi", "2025-01", &[100]);

    service
        .submit_unit_evaluation(UnitEvaluationSubmission {
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            flags: worked_example_flags(),
            evaluated_by: employee("sup-yusuf"),
        })
        .expect("unit evaluation accepted");

    let draft = service
        .prefill_final_evaluation(&employee("emp-andi"), period("2025-01"))
        .expect("draft builds");

    assert!(draft.flags.disciplinary_action.flagged);
    assert!(draft.flags.positive_contribution.flagged);
    assert_eq!(draft.base_score, 100);
    assert_eq!(draft.unit_score_snapshot, Some(90));
    assert_eq!(draft.additional_adjustment, 0);
}

#[test]
fn final_draft_is_blank_without_a_unit_tier() {
    let (service, store, _) = build_service();
    seed_ratings(&store, "emp-budi", "2025-01", &[60]);

    let draft = service
        .prefill_final_evaluation(&employee("emp-budi"), period("2025-01"))
        .expect("draft builds");

    assert!(!draft.flags.disciplinary_action.flagged);
    assert!(!draft.flags.positive_contribution.flagged);
    assert_eq!(draft.unit_score_snapshot, None);
    assert_eq!(draft.base_score, 60);
}

#[test]
fn breakdown_keeps_shadowed_tiers_visible() {
    let (service, store, _) = build_service();
    seed_ratings(&store, "emp-andi", "2025-01", &[80, 90, 100]);

    service
        .submit_unit_evaluation(UnitEvaluationSubmission {
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            flags: worked_example_flags(),
            evaluated_by: employee("sup-yusuf"),
        })
        .expect("unit evaluation accepted");
    service
        .submit_final_evaluation(FinalEvaluationSubmission {
            subject_id: employee("emp-andi"),
            period: period("2025-01"),
            flags: blank_flags(),
            verified: Default::default(),
            additional_adjustment: 0,
            adjustment_note: String::new(),
            evaluated_by: employee("adm-ratna"),
        })
        .expect("final evaluation accepted");

    let breakdown = service
        .score_breakdown(&employee("emp-andi"), period("2025-01"))
        .expect("breakdown builds");

    let resolved = breakdown.resolved.expect("subject resolves");
    assert_eq!(resolved.source_tier, ScoreTier::Final);
    assert_eq!(breakdown.rating_count, 3);
    assert_eq!(breakdown.peer_total, 270);
    assert_eq!(breakdown.peer_average, Some(90));
    assert!(breakdown.unit.is_some());
    assert!(breakdown.final_evaluation.is_some());
}

#[test]
fn unknown_employees_are_rejected_before_any_write() {
    let (service, store, _) = build_service();

    let result = service.submit_unit_evaluation(UnitEvaluationSubmission {
        subject_id: employee("emp-ghost"),
        period: period("2025-01"),
        flags: blank_flags(),
        evaluated_by: employee("sup-yusuf"),
    });

    match result {
        Err(RecognitionServiceError::UnknownEmployee(id)) => {
            assert_eq!(id, employee("emp-ghost"));
        }
        other => panic!("expected unknown-employee rejection, got {other:?}"),
    }
    assert!(store
        .unit_evaluation(&employee("emp-ghost"), period("2025-01"))
        .expect("store reachable")
        .is_none());
}

#[test]
fn store_failures_propagate_unchanged() {
    let service = RecognitionService::new(
        Arc::new(UnavailableStore),
        Arc::new(default_directory()),
        RecognitionConfig::default(),
    );

    let result = service.submit_unit_evaluation(UnitEvaluationSubmission {
        subject_id: employee("emp-andi"),
        period: period("2025-01"),
        flags: blank_flags(),
        evaluated_by: employee("sup-yusuf"),
    });

    match result {
        Err(RecognitionServiceError::Store(StoreError::Unavailable(message))) => {
            assert!(message.contains("offline"));
        }
        other => panic!("expected store failure, got {other:?}"),
    }
}
