use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{
    CoachNoteRequest, CreatedLogResponse, DayLogsResponse, ExtraMealRequest, MealLogsResponse,
    OkResponse, SavePlanMealLogRequest,
};
use super::repo;
use super::services::{
    log_extra_meal, save_plan_meal_log, ExtraMealSubmission, PlanMealSubmission, SavedLog,
};
use crate::{
    auth::{
        access::{client_profile_id, resolve_client_id},
        extractors::AuthUser,
    },
    dates::{day_of, day_or_today},
    error::{AppError, AppResult},
    extract::AppJson,
    plans::{dto::DateQuery, services::plan_for_date, services::DayPlan},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plan-logs", get(get_day_logs).post(save_day_log))
        .route("/meal-logs", get(list_meal_logs).post(create_extra_meal))
        .route("/meal-logs/:id", patch(update_coach_note))
}

/// GET /meal-plan-logs?date&clientId
#[instrument(skip(state))]
pub async fn get_day_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<DayLogsResponse>> {
    let client_id = resolve_client_id(&state.db, &user, q.client_id).await?;
    let date = day_or_today(q.date);

    let mut conn = state.db.acquire().await?;
    let plan = plan_for_date(&mut conn, client_id, date).await?;
    drop(conn);

    let day = plan.day(date).cloned();
    let DayPlan::Planned { assignment, .. } = plan else {
        return Ok(Json(DayLogsResponse {
            assignment: None,
            day: None,
            logs: Vec::new(),
        }));
    };

    let meal_ids: Vec<Uuid> = day
        .as_ref()
        .map(|d| d.meals.iter().map(|m| m.id).collect())
        .unwrap_or_default();
    let logs =
        repo::list_logs(&state.db, client_id, Some(date), Some(meal_ids.as_slice())).await?;

    Ok(Json(DayLogsResponse {
        assignment: Some(assignment),
        day,
        logs,
    }))
}

/// POST /meal-plan-logs
#[instrument(skip(state, body))]
pub async fn save_day_log(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<SavePlanMealLogRequest>,
) -> AppResult<Json<SavedLog>> {
    let user_id = user.require_client()?;
    let client_id = client_profile_id(&state.db, user_id).await?;

    let saved = save_plan_meal_log(
        &state.db,
        PlanMealSubmission {
            client_id,
            date: day_of(body.date),
            meal_id: body.meal_plan_meal_id,
            status: body.status,
            items: body.items,
        },
    )
    .await?;
    Ok(Json(saved))
}

/// GET /meal-logs?date&clientId
#[instrument(skip(state))]
pub async fn list_meal_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<MealLogsResponse>> {
    let client_id = resolve_client_id(&state.db, &user, q.client_id).await?;
    let meals = repo::list_logs(&state.db, client_id, q.date.map(day_of), None).await?;
    Ok(Json(MealLogsResponse { meals }))
}

/// POST /meal-logs
#[instrument(skip(state, body))]
pub async fn create_extra_meal(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<ExtraMealRequest>,
) -> AppResult<Json<CreatedLogResponse>> {
    let user_id = user.require_client()?;
    let client_id = client_profile_id(&state.db, user_id).await?;

    let log_id = log_extra_meal(
        &state.db,
        ExtraMealSubmission {
            client_id,
            date: day_of(body.date),
            name: body.name,
            items: body.items.into_iter().map(Into::into).collect(),
        },
    )
    .await?;
    Ok(Json(CreatedLogResponse { log_id }))
}

/// PATCH /meal-logs/:id (coach note only)
#[instrument(skip(state, body))]
pub async fn update_coach_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<CoachNoteRequest>,
) -> AppResult<Json<OkResponse>> {
    let coach_id = user.require_coach()?;
    let note = body
        .coach_note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    if !repo::set_coach_note(&state.db, id, coach_id, note).await? {
        return Err(AppError::NotFound("Meal log"));
    }
    info!(log_id = %id, %coach_id, "coach note updated");
    Ok(Json(OkResponse { ok: true }))
}
