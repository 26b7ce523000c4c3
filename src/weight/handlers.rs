use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CreateWeightLogRequest, WeightLogResponse, WeightLogsResponse};
use super::repo;
use crate::{
    auth::{
        access::{resolve_client_id, ClientQuery},
        extractors::AuthUser,
    },
    error::AppResult,
    extract::AppJson,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/weight-logs", get(list_weight_logs).post(create_weight_log))
}

/// GET /weight-logs?clientId
#[instrument(skip(state))]
pub async fn list_weight_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<ClientQuery>,
) -> AppResult<Json<WeightLogsResponse>> {
    let client_id = resolve_client_id(&state.db, &user, q.client_id).await?;
    let weight_logs = repo::list_weight_logs(&state.db, client_id).await?;
    Ok(Json(WeightLogsResponse { weight_logs }))
}

/// POST /weight-logs
#[instrument(skip(state, body))]
pub async fn create_weight_log(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreateWeightLogRequest>,
) -> AppResult<Json<WeightLogResponse>> {
    let log = body.validate()?;
    let client_id = resolve_client_id(&state.db, &user, body.client_id).await?;

    let weight_log = repo::insert_weight_log(&state.db, client_id, log).await?;
    info!(%client_id, weight_kg = log.weight_kg, "weight logged");
    Ok(Json(WeightLogResponse { weight_log }))
}
