use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{NextPayRaise, SetRateRequest},
    repo::SalaryRecord,
};
use crate::{
    auth::{
        extractors::{AuthUser, StaffUser},
        repo::User,
    },
    error::AppError,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/salary/set-rate/", post(set_rate))
        .route("/salary/next-pay-raise/", get(next_pay_raise))
}

#[instrument(skip(state, _staff, payload))]
pub async fn set_rate(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(payload): Json<SetRateRequest>,
) -> Result<(StatusCode, Json<SalaryRecord>), AppError> {
    if User::find_by_id(&state.db, payload.employee_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("No such user".into()));
    }

    let record = SalaryRecord::create(
        &state.db,
        payload.employee_id,
        payload.current_rate,
        payload.rate_increase_period,
    )
    .await?;

    info!(
        employee_id = record.employee_id,
        rate = record.current_rate,
        "salary rate set"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
pub async fn next_pay_raise(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<NextPayRaise>, AppError> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let record = SalaryRecord::latest_for_employee(&state.db, user.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("You are not yet registered as an employee.".into())
        })?;

    Ok(Json(NextPayRaise {
        current_rate: record.current_rate,
        next_raise_date: record.next_raise_date_formatted(),
    }))
}
