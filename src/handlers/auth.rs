use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::{CookieJar, WithRejection};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{ResolveIdentity, User};
use crate::repositories::{SessionRepository, UserRepository};
use crate::response::ApiResponse;
use crate::session::{create_session_cookie, remove_session_cookie, session_token};

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
    pub session_repo: SessionRepository,
    /// Trusted header set by the upstream identity provider.
    pub identity_header: String,
}

#[derive(Serialize)]
pub struct SessionGrant {
    pub user: User,
    pub token: String,
}

/// Exchange the upstream identity for a session on the internal user.
pub async fn create_session(
    State(state): State<AuthState>,
    headers: HeaderMap,
    jar: CookieJar,
    WithRejection(Json(form), _): WithRejection<Json<ResolveIdentity>, AppError>,
) -> Result<(CookieJar, Json<ApiResponse<SessionGrant>>)> {
    let auth_id = headers
        .get(state.identity_header.as_str())
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::AuthenticationMissing)?;

    let user = state
        .user_repo
        .resolve_identity(auth_id, form.display_name.as_deref())
        .await?;
    let token = state.session_repo.create(&user.id).await?;

    tracing::info!("Opened session for user {}", user.id);

    let jar = jar.add(create_session_cookie(&token));
    Ok((jar, Json(ApiResponse::ok(SessionGrant { user, token }))))
}

pub async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<()>>)> {
    if let Some(token) = session_token(&headers) {
        state.session_repo.delete(&token).await?;
    }

    Ok((jar.add(remove_session_cookie()), Json(ApiResponse::ok(()))))
}
