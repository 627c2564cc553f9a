use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use skillmatrix_core::{Actor, SkillId, UserId};

use crate::dto::{
    CreateSkillRequest, EmployeeSkillResponse, SkillResponse, UpdateEmployeeSkillRequest,
    parse_id,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_skills_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<SkillResponse>>> {
    let skills = state
        .skill_service
        .list_skills(&actor)
        .await?
        .into_iter()
        .map(SkillResponse::from)
        .collect();

    Ok(Json(skills))
}

pub async fn create_skill_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateSkillRequest>,
) -> ApiResult<(StatusCode, Json<SkillResponse>)> {
    let skill = state
        .skill_service
        .create_skill(&actor, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(SkillResponse::from(skill))))
}

pub async fn list_employee_skills_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<EmployeeSkillResponse>>> {
    let skills = state
        .skill_service
        .list_employee_skills(&actor, parse_id::<UserId>(&user_id)?)
        .await?
        .into_iter()
        .map(EmployeeSkillResponse::from)
        .collect();

    Ok(Json(skills))
}

pub async fn update_employee_skill_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((user_id, skill_id)): Path<(String, String)>,
    Json(payload): Json<UpdateEmployeeSkillRequest>,
) -> ApiResult<Json<EmployeeSkillResponse>> {
    let skill = state
        .skill_service
        .update_employee_skill(
            &actor,
            parse_id::<UserId>(&user_id)?,
            parse_id::<SkillId>(&skill_id)?,
            payload.into_edit()?,
        )
        .await?;

    Ok(Json(EmployeeSkillResponse::from(skill)))
}
