use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::claims::{Principal, Role};
use super::services::{authenticate, JwtKeys};
use crate::error::AppError;

/// Cookie carrying the token for browser clients.
pub const AUTH_COOKIE: &str = "fitflow_token";

/// Extracts and validates the JWT, yielding the caller's id and role.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn require_coach(&self) -> Result<Uuid, AppError> {
        match self.0.role {
            Role::Coach => Ok(self.0.user_id),
            Role::Client => Err(AppError::Forbidden),
        }
    }

    pub fn require_client(&self) -> Result<Uuid, AppError> {
        match self.0.role {
            Role::Client => Ok(self.0.user_id),
            Role::Coach => Err(AppError::Forbidden),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AppError::Unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        let principal = authenticate(&keys, &token).map_err(|e| {
            warn!(error = %e, "token rejected");
            AppError::Unauthorized
        })?;

        Ok(AuthUser(principal))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|t| t.trim().to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, token)| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(name: header::HeaderName, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_bearer_header() {
        let parts = parts_with(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn ignores_other_schemes() {
        let parts = parts_with(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn reads_token_cookie_among_others() {
        let parts = parts_with(header::COOKIE, "theme=dark; fitflow_token=tok123; lang=fr");
        assert_eq!(cookie_token(&parts).as_deref(), Some("tok123"));
    }

    #[test]
    fn role_guards() {
        let coach = AuthUser(Principal {
            user_id: Uuid::new_v4(),
            role: Role::Coach,
        });
        assert!(coach.require_coach().is_ok());
        assert!(matches!(coach.require_client(), Err(AppError::Forbidden)));
    }
}
