use serde::Deserialize;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::claims::Role;
use super::extractors::AuthUser;
use super::repo_types::ClientProfile;
use crate::error::{AppError, AppResult};

/// `?clientId=` for routes that act on one client's records.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuery {
    pub client_id: Option<Uuid>,
}

/// Resolves whose records a request acts on.
///
/// Coaches must name one of their own clients; clients always act on their
/// own profile and any `requested` id is ignored.
pub async fn resolve_client_id(
    db: &PgPool,
    user: &AuthUser,
    requested: Option<Uuid>,
) -> AppResult<Uuid> {
    match user.role() {
        Role::Coach => {
            let client_id =
                requested.ok_or_else(|| AppError::BadRequest("clientId required".into()))?;
            let client = ClientProfile::find_for_coach(db, client_id, user.user_id()).await?;
            match client {
                Some(c) => Ok(c.id),
                None => {
                    warn!(coach_id = %user.user_id(), %client_id, "client not coached by caller");
                    Err(AppError::NotFound("Client"))
                }
            }
        }
        Role::Client => client_profile_id(db, user.user_id()).await,
    }
}

/// The caller's own client profile id.
pub async fn client_profile_id(db: &PgPool, user_id: Uuid) -> AppResult<Uuid> {
    ClientProfile::find_by_user(db, user_id)
        .await?
        .map(|p| p.id)
        .ok_or(AppError::NotFound("Client profile"))
}
