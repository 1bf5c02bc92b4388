use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{
        LoginRequest, Pagination, RegisterRequest, StaffCodeRequest, StaffStatusResponse,
        TokenResponse, UserListItem, UserOut,
    },
    extractors::{AuthUser, StaffUser},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::User,
};
use crate::{error::AppError, state::AppState};

/// Shared code an authenticated user presents to self-elevate to staff.
/// Known-weak plaintext gate carried over as-is; see DESIGN.md before
/// changing or rotating it.
const STAFF_ELEVATION_CODE: &str = "надо";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register/", post(register))
        .route("/auth/login/", post(login))
        .route("/auth/users/", get(list_users))
        .route("/auth/users/me/", get(me))
        .route("/auth/users/get-staff-status/", patch(get_staff_status))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserOut>), AppError> {
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already registered");
        return Err(AppError::BadRequest("Username already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.username, &hash).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(UserOut::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = User::find_by_username(&state.db, &payload.username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(username = %user.username, "login invalid password");
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    User::touch_last_login(&state.db, user.id).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&user.username)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".into(),
    }))
}

#[instrument(skip(state, _staff))]
pub async fn list_users(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<UserListItem>>, AppError> {
    let users = User::list(&state.db, p.skip, p.limit).await?;
    Ok(Json(users.into_iter().map(UserListItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<UserOut>, AppError> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(UserOut::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn get_staff_status(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(payload): Json<StaffCodeRequest>,
) -> Result<Json<StaffStatusResponse>, AppError> {
    if payload.code != STAFF_ELEVATION_CODE {
        warn!(%username, "incorrect staff code");
        return Err(AppError::BadRequest("Incorrect secret code".into()));
    }

    let user = User::grant_staff(&state.db, &username).await?;
    info!(user_id = user.id, %username, "staff status granted");
    Ok(Json(StaffStatusResponse {
        status_staff: user.is_staff,
    }))
}
