use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{DesignatedWinner, EmployeeCategory, EmployeeId, WinnerId, WinnerType};
use super::leaderboard::LeaderboardEntry;
use super::period::Period;
use super::repository::{EmployeeDirectory, RecognitionStore, StoreError};
use super::service::{
    FinalEvaluationSubmission, PeerRatingSubmission, RecognitionService, RecognitionServiceError,
    UnitEvaluationSubmission,
};
use super::winner::WinnerDesignation;

/// Router builder exposing the recognition endpoints over a shared
/// service instance.
pub fn recognition_router<S, D>(service: Arc<RecognitionService<S, D>>) -> Router
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    Router::new()
        .route("/api/v1/recognition/ratings", post(submit_rating::<S, D>))
        .route(
            "/api/v1/recognition/evaluations/unit",
            post(submit_unit_evaluation::<S, D>),
        )
        .route(
            "/api/v1/recognition/evaluations/final",
            post(submit_final_evaluation::<S, D>),
        )
        .route(
            "/api/v1/recognition/evaluations/final/draft/:subject/:period",
            get(final_evaluation_draft::<S, D>),
        )
        .route(
            "/api/v1/recognition/subjects/:subject/scores/:period",
            get(score_breakdown::<S, D>),
        )
        .route(
            "/api/v1/recognition/leaderboards/monthly/:period",
            get(monthly_leaderboard::<S, D>),
        )
        .route(
            "/api/v1/recognition/leaderboards/yearly/:year",
            get(yearly_leaderboard::<S, D>),
        )
        .route("/api/v1/recognition/winners", post(designate_winner::<S, D>))
        .route(
            "/api/v1/recognition/winners/:winner_id",
            delete(revoke_winner::<S, D>),
        )
        .route(
            "/api/v1/recognition/winners/:winner_type/recap/:year",
            get(winner_recap::<S, D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryQuery {
    category: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MonthlyLeaderboardResponse {
    period: Period,
    period_label: String,
    category: &'static str,
    entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct YearlyLeaderboardResponse {
    year: i32,
    category: &'static str,
    entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WinnerRecapResponse {
    winner_type: &'static str,
    year: i32,
    winners: Vec<DesignatedWinner>,
}

fn service_error_response(error: RecognitionServiceError) -> Response {
    let status = match &error {
        RecognitionServiceError::Validation(_) | RecognitionServiceError::UnknownEmployee(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RecognitionServiceError::WinnerNotFound(_) => StatusCode::NOT_FOUND,
        RecognitionServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        RecognitionServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn parse_period(raw: &str) -> Result<Period, Response> {
    raw.parse::<Period>()
        .map_err(|err| bad_request(err.to_string()))
}

fn parse_category(raw: &str) -> Result<EmployeeCategory, Response> {
    EmployeeCategory::from_label(raw)
        .ok_or_else(|| bad_request(format!("unknown employee category '{raw}'")))
}

pub(crate) async fn submit_rating<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    axum::Json(submission): axum::Json<PeerRatingSubmission>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    match service.record_peer_rating(submission) {
        Ok(rating) => (StatusCode::CREATED, axum::Json(rating)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn submit_unit_evaluation<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    axum::Json(submission): axum::Json<UnitEvaluationSubmission>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    match service.submit_unit_evaluation(submission) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn submit_final_evaluation<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    axum::Json(submission): axum::Json<FinalEvaluationSubmission>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    match service.submit_final_evaluation(submission) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn final_evaluation_draft<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    Path((subject, period)): Path<(String, String)>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    let period = match parse_period(&period) {
        Ok(period) => period,
        Err(response) => return response,
    };

    match service.prefill_final_evaluation(&EmployeeId(subject), period) {
        Ok(draft) => (StatusCode::OK, axum::Json(draft)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn score_breakdown<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    Path((subject, period)): Path<(String, String)>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    let period = match parse_period(&period) {
        Ok(period) => period,
        Err(response) => return response,
    };

    match service.score_breakdown(&EmployeeId(subject), period) {
        Ok(breakdown) => (StatusCode::OK, axum::Json(breakdown)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn monthly_leaderboard<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    Path(period): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    let period = match parse_period(&period) {
        Ok(period) => period,
        Err(response) => return response,
    };
    let category = match parse_category(&query.category) {
        Ok(category) => category,
        Err(response) => return response,
    };

    match service.monthly_leaderboard(period, category) {
        Ok(entries) => (
            StatusCode::OK,
            axum::Json(MonthlyLeaderboardResponse {
                period,
                period_label: period.long_label(),
                category: category.label(),
                entries,
            }),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn yearly_leaderboard<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    Path(year): Path<i32>,
    Query(query): Query<CategoryQuery>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    let category = match parse_category(&query.category) {
        Ok(category) => category,
        Err(response) => return response,
    };

    match service.yearly_leaderboard(year, category) {
        Ok(entries) => (
            StatusCode::OK,
            axum::Json(YearlyLeaderboardResponse {
                year,
                category: category.label(),
                entries,
            }),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn designate_winner<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    axum::Json(designation): axum::Json<WinnerDesignation>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    match service.designate_winner(designation) {
        Ok(winner) => (StatusCode::CREATED, axum::Json(winner)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn revoke_winner<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    Path(winner_id): Path<String>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    match service.revoke_winner(&WinnerId(winner_id)) {
        Ok(removed) => (StatusCode::OK, axum::Json(removed)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn winner_recap<S, D>(
    State(service): State<Arc<RecognitionService<S, D>>>,
    Path((winner_type, year)): Path<(String, i32)>,
) -> Response
where
    S: RecognitionStore + 'static,
    D: EmployeeDirectory + 'static,
{
    let winner_type = match WinnerType::from_label(&winner_type) {
        Some(winner_type) => winner_type,
        None => return bad_request(format!("unknown winner type '{winner_type}'")),
    };

    match service.winner_recap(winner_type, year) {
        Ok(winners) => (
            StatusCode::OK,
            axum::Json(WinnerRecapResponse {
                winner_type: winner_type.label(),
                year,
                winners,
            }),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}
