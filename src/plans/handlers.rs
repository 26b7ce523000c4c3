use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{AssignmentWithPlan, CurrentAssignmentResponse, DateQuery};
use super::services::{plan_for_date, DayPlan};
use crate::{
    auth::{access::resolve_client_id, extractors::AuthUser},
    dates::day_or_today,
    error::AppResult,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/meal-plan-assignments/current", get(current_assignment))
}

/// GET /meal-plan-assignments/current?date&clientId
#[instrument(skip(state))]
pub async fn current_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<CurrentAssignmentResponse>> {
    let client_id = resolve_client_id(&state.db, &user, q.client_id).await?;
    let date = day_or_today(q.date);

    let mut conn = state.db.acquire().await?;
    let assignment = match plan_for_date(&mut conn, client_id, date).await? {
        DayPlan::NoPlan => None,
        DayPlan::Planned { assignment, plan } => Some(AssignmentWithPlan {
            assignment,
            meal_plan: plan,
        }),
    };
    Ok(Json(CurrentAssignmentResponse { assignment }))
}
