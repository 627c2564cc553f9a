use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use skillmatrix_core::{Actor, UserId};

use crate::dto::{
    OrganizationSummaryResponse, ScoreReportResponse, SkillGapParams, SkillGapResponse, parse_id,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn skill_gaps_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<SkillGapParams>,
) -> ApiResult<Json<Vec<SkillGapResponse>>> {
    let employee_id = params
        .employee_id
        .as_deref()
        .map(parse_id::<UserId>)
        .transpose()?;

    let gaps = state
        .reporting_service
        .skill_gaps(&actor, employee_id)
        .await?
        .into_iter()
        .map(SkillGapResponse::from)
        .collect();

    Ok(Json(gaps))
}

pub async fn performance_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(employee_id): Path<String>,
) -> ApiResult<Json<ScoreReportResponse>> {
    let report = state
        .reporting_service
        .performance(&actor, parse_id::<UserId>(&employee_id)?)
        .await?;

    Ok(Json(ScoreReportResponse::from(report)))
}

pub async fn organization_summary_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<OrganizationSummaryResponse>> {
    let summary = state.reporting_service.organization_summary(&actor).await?;

    Ok(Json(OrganizationSummaryResponse::from(summary)))
}
