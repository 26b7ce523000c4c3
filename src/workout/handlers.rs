use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CreateWorkoutLogRequest, WorkoutLogResponse, WorkoutLogsResponse};
use super::repo;
use crate::{
    auth::{
        access::{resolve_client_id, ClientQuery},
        extractors::AuthUser,
    },
    dates::day_of,
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/workout-logs", get(list_workout_logs).post(create_workout_log))
}

/// GET /workout-logs?clientId
#[instrument(skip(state))]
pub async fn list_workout_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<ClientQuery>,
) -> AppResult<Json<WorkoutLogsResponse>> {
    let client_id = resolve_client_id(&state.db, &user, q.client_id).await?;
    let workouts = repo::list_workout_logs(&state.db, client_id).await?;
    Ok(Json(WorkoutLogsResponse { workouts }))
}

/// POST /workout-logs
#[instrument(skip(state, body))]
pub async fn create_workout_log(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreateWorkoutLogRequest>,
) -> AppResult<Json<WorkoutLogResponse>> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    let client_id = resolve_client_id(&state.db, &user, body.client_id).await?;

    let workout =
        repo::insert_workout_log(&state.db, client_id, day_of(body.date), title, body.details)
            .await?;
    info!(%client_id, workout_id = %workout.id, "workout logged");
    Ok(Json(WorkoutLogResponse { workout }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{Principal, Role};
    use serde_json::Map;
    use time::macros::datetime;
    use uuid::Uuid;

    #[tokio::test]
    async fn blank_title_is_rejected_before_lookup() {
        let state = AppState::fake();
        let user = AuthUser(Principal {
            user_id: Uuid::new_v4(),
            role: Role::Client,
        });
        let body = CreateWorkoutLogRequest {
            client_id: None,
            date: datetime!(2024-05-01 08:00 UTC),
            title: "   ".into(),
            details: Map::new(),
        };
        let err = create_workout_log(State(state), user, AppJson(body))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
