use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{jwt::JwtKeys, repo::User};
use crate::{error::AppError, state::AppState};

/// Extracts and verifies the bearer token, returning the username claim.
/// Proof of identity only; nothing here checks permissions.
pub struct AuthUser(pub String);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            AppError::Unauthorized(e.to_string())
        })?;
        Ok(AuthUser(claims.username))
    }
}

/// Staff gate. Verifies the token, then re-reads the staff flag from the
/// database so a revoked flag takes effect on the next privileged call
/// instead of waiting for token expiry.
pub struct StaffUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(username) = AuthUser::from_request_parts(parts, state).await?;
        match User::find_by_username(&state.db, &username).await? {
            Some(user) if user.is_staff => Ok(StaffUser(user)),
            _ => {
                warn!(%username, "staff route refused");
                Err(AppError::Forbidden("User is not a staff member".into()))
            }
        }
    }
}
