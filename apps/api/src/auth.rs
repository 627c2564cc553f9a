use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use skillmatrix_application::AuthOutcome;
use skillmatrix_core::{Actor, AppError};
use tower_sessions::Session;
use tracing::info;

use crate::dto::{ActorResponse, LoginRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_ACTOR_KEY: &str = "actor";

/// POST /auth/login - Authenticate with email+password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<ActorResponse>> {
    let outcome = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    let AuthOutcome::Authenticated(employee) = outcome else {
        return Err(AppError::Unauthorized("invalid email or password".to_owned()).into());
    };

    let actor = Actor::new(employee.id, employee.role, employee.department_id);

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    session
        .insert(SESSION_ACTOR_KEY, &actor)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session actor: {error}")))?;

    info!(user_id = %actor.id(), role = actor.role().as_str(), "employee logged in");
    Ok(Json(ActorResponse::from_employee(
        &employee,
        state.authorization_service.permissions_for(actor.role()),
    )))
}

/// POST /auth/logout - Drop the session.
pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Current employee and permissions.
pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<ActorResponse>> {
    let actor = session
        .get::<Actor>(SESSION_ACTOR_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session actor: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let employee = state
        .directory_service
        .get_employee(&actor, actor.id())
        .await?;

    Ok(Json(ActorResponse::from_employee(
        &employee,
        state.authorization_service.permissions_for(actor.role()),
    )))
}
