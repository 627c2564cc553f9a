use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use skillmatrix_core::{Actor, UserId};

use crate::dto::{
    CreateDepartmentRequest, CreateEmployeeRequest, CreateJobProfileRequest, DepartmentResponse,
    EmployeeResponse, JobProfileResponse, PermissionsResponse, parse_id,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn my_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Json<PermissionsResponse> {
    Json(PermissionsResponse::new(
        actor.role().as_str(),
        state.authorization_service.permissions_for(actor.role()),
    ))
}

pub async fn list_employees_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<EmployeeResponse>>> {
    let employees = state
        .directory_service
        .list_employees(&actor)
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(Json(employees))
}

pub async fn create_employee_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<EmployeeResponse>)> {
    let employee = state
        .directory_service
        .create_employee(&actor, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(EmployeeResponse::from(employee))))
}

pub async fn get_employee_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state
        .directory_service
        .get_employee(&actor, parse_id::<UserId>(&user_id)?)
        .await?;

    Ok(Json(EmployeeResponse::from(employee)))
}

pub async fn delete_employee_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .directory_service
        .delete_employee(&actor, parse_id::<UserId>(&user_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_departments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .directory_service
        .list_departments(&actor)
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

pub async fn create_department_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentResponse>)> {
    let department = state
        .directory_service
        .create_department(&actor, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(DepartmentResponse::from(department))))
}

pub async fn list_job_profiles_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<JobProfileResponse>>> {
    let profiles = state
        .job_profile_service
        .list_job_profiles(&actor)
        .await?
        .into_iter()
        .map(JobProfileResponse::from)
        .collect();

    Ok(Json(profiles))
}

pub async fn create_job_profile_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateJobProfileRequest>,
) -> ApiResult<(StatusCode, Json<JobProfileResponse>)> {
    let profile = state
        .job_profile_service
        .create_job_profile(&actor, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(JobProfileResponse::from(profile))))
}
