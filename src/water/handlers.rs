use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CreateWaterLogRequest, WaterLogResponse, WaterLogsResponse};
use super::repo;
use crate::{
    auth::{access::resolve_client_id, extractors::AuthUser},
    dates::day_of,
    error::{AppError, AppResult},
    extract::AppJson,
    plans::dto::DateQuery,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/water-logs", get(list_water_logs).post(create_water_log))
}

/// GET /water-logs?date&clientId
#[instrument(skip(state))]
pub async fn list_water_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<WaterLogsResponse>> {
    let client_id = resolve_client_id(&state.db, &user, q.client_id).await?;
    let water_logs = repo::list_water_logs(&state.db, client_id, q.date.map(day_of)).await?;
    Ok(Json(WaterLogsResponse { water_logs }))
}

/// POST /water-logs
#[instrument(skip(state, body))]
pub async fn create_water_log(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreateWaterLogRequest>,
) -> AppResult<Json<WaterLogResponse>> {
    if body.amount_ml <= 0 {
        return Err(AppError::Validation("amountMl must be positive".into()));
    }
    let client_id = resolve_client_id(&state.db, &user, body.client_id).await?;

    let water_log =
        repo::insert_water_log(&state.db, client_id, day_of(body.date), body.amount_ml).await?;
    info!(%client_id, amount_ml = body.amount_ml, "water logged");
    Ok(Json(WaterLogResponse { water_log }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{Principal, Role};
    use time::macros::datetime;
    use uuid::Uuid;

    #[tokio::test]
    async fn rejects_non_positive_amount_before_lookup() {
        let state = AppState::fake();
        let user = AuthUser(Principal {
            user_id: Uuid::new_v4(),
            role: Role::Client,
        });
        let body = CreateWaterLogRequest {
            client_id: None,
            date: datetime!(2024-05-01 08:00 UTC),
            amount_ml: 0,
        };
        let err = create_water_log(State(state), user, AppJson(body))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
