use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{claims::Role, extractors::AuthUser, repo_types::User},
    error::{AppError, AppResult},
    state::AppState,
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

#[instrument(skip(state))]
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<PublicUser>> {
    let found = User::find_by_id(&state.db, user.user_id()).await?;
    let Some(found) = found else {
        warn!(user_id = %user.user_id(), "token for unknown user");
        return Err(AppError::Unauthorized);
    };
    Ok(Json(PublicUser {
        id: found.id,
        email: found.email,
        role: found.role,
    }))
}

#[cfg(test)]
mod me_tests {
    use super::*;

    #[test]
    fn public_user_serialization() {
        let response = PublicUser {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            role: Role::Coach,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains(r#""role":"COACH""#));
    }
}
