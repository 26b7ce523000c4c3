use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CheckInResponse, CheckInsResponse, CreateCheckInRequest};
use super::repo;
use crate::{
    auth::{
        access::{resolve_client_id, ClientQuery},
        claims::Role,
        extractors::AuthUser,
    },
    dates::day_of,
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/check-ins", get(list_check_ins).post(create_check_in))
}

/// GET /check-ins?clientId
#[instrument(skip(state))]
pub async fn list_check_ins(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<ClientQuery>,
) -> AppResult<Json<CheckInsResponse>> {
    let client_id = resolve_client_id(&state.db, &user, q.client_id).await?;
    let check_ins = repo::list_check_ins(&state.db, client_id).await?;
    Ok(Json(CheckInsResponse { check_ins }))
}

/// POST /check-ins
///
/// Only a coach may attach `coachNote`.
#[instrument(skip(state, body))]
pub async fn create_check_in(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreateCheckInRequest>,
) -> AppResult<Json<CheckInResponse>> {
    let coach_note = body
        .coach_note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    if coach_note.is_some() && user.role() != Role::Coach {
        return Err(AppError::Forbidden);
    }
    let client_id = resolve_client_id(&state.db, &user, body.client_id).await?;

    let check_in = repo::insert_check_in(
        &state.db,
        client_id,
        day_of(body.week_of),
        body.form_json,
        coach_note,
    )
    .await?;
    info!(%client_id, week_of = %check_in.week_of, "check-in saved");
    Ok(Json(CheckInResponse { check_in }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Principal;
    use serde_json::Map;
    use time::macros::datetime;
    use uuid::Uuid;

    #[tokio::test]
    async fn clients_cannot_write_coach_notes() {
        let state = AppState::fake();
        let user = AuthUser(Principal {
            user_id: Uuid::new_v4(),
            role: Role::Client,
        });
        let body = CreateCheckInRequest {
            client_id: None,
            week_of: datetime!(2024-05-06 00:00 UTC),
            form_json: Map::new(),
            coach_note: Some("great week".into()),
        };
        let err = create_check_in(State(state), user, AppJson(body))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn form_must_be_an_object() {
        let raw = r#"{"weekOf":"2024-05-06T00:00:00Z","formJson":["sleep",7]}"#;
        assert!(serde_json::from_str::<CreateCheckInRequest>(raw).is_err());
        let raw = r#"{"weekOf":"2024-05-06T00:00:00Z","formJson":{"sleep":7}}"#;
        let ok: CreateCheckInRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(ok.form_json["sleep"], 7);
        assert!(ok.coach_note.is_none());
    }
}
