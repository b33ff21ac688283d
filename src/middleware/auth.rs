use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::repositories::SessionRepository;
use crate::session::session_token;

/// The caller's internal user id, resolved from the session token.
///
/// Requires a `SessionRepository` in the request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session_repo = parts
            .extensions
            .get::<SessionRepository>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Session repository not configured".to_string()))?;

        let token = session_token(&parts.headers).ok_or(AppError::AuthenticationMissing)?;

        let user_id = session_repo
            .find_valid(&token)
            .await?
            .ok_or(AppError::AuthenticationMissing)?;

        Ok(AuthUser { id: user_id })
    }
}
