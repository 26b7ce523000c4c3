use axum::extract::FromRef;
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::debug;

use super::claims::{Claims, Principal, TokenKind};
use crate::config::JwtConfig;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid or expired token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("access token required")]
    WrongKind,
}

/// Verification side of the shared-secret JWT scheme. Tokens are minted by
/// the account service; this service only checks them.
#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }
}

/// Stateless capability check: a bearer token either names a principal or
/// the request is unauthenticated. Refresh tokens signed with the same
/// secret are refused.
pub fn authenticate(keys: &JwtKeys, token: &str) -> Result<Principal, AuthError> {
    let claims = keys.verify(token)?;
    if claims.kind != TokenKind::Access {
        return Err(AuthError::WrongKind);
    }
    Ok(Principal::from(&claims))
}

/// Token minting for tests, standing in for the account service.
#[cfg(test)]
pub(crate) mod test_tokens {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::auth::claims::{Claims, Role, TokenKind};
    use crate::config::JwtConfig;

    pub fn mint(cfg: &JwtConfig, user_id: Uuid, role: Role, kind: TokenKind) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp: now + 600,
            iss: cfg.issuer.clone(),
            aud: cfg.audience.clone(),
            kind,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(cfg.secret.as_bytes()),
        )
        .unwrap()
    }

    pub fn access(cfg: &JwtConfig, user_id: Uuid, role: Role) -> String {
        mint(cfg, user_id, role, TokenKind::Access)
    }
}
