use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use skillmatrix_core::{Actor, AssessmentId};

use crate::dto::{
    AmendAssessmentRequest, AssessmentListParams, AssessmentResponse, RecordAssessmentRequest,
    parse_id,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_assessments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<AssessmentListParams>,
) -> ApiResult<Json<Vec<AssessmentResponse>>> {
    let assessments = state
        .assessment_service
        .list_assessments(&actor, params.into_query()?)
        .await?
        .into_iter()
        .map(AssessmentResponse::from)
        .collect();

    Ok(Json(assessments))
}

pub async fn record_assessment_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<RecordAssessmentRequest>,
) -> ApiResult<(StatusCode, Json<AssessmentResponse>)> {
    let assessment = state
        .assessment_service
        .record_assessment(&actor, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(AssessmentResponse::from(assessment))))
}

pub async fn get_assessment_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(assessment_id): Path<String>,
) -> ApiResult<Json<AssessmentResponse>> {
    let assessment = state
        .assessment_service
        .get_assessment(&actor, parse_id::<AssessmentId>(&assessment_id)?)
        .await?;

    Ok(Json(AssessmentResponse::from(assessment)))
}

pub async fn amend_assessment_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(assessment_id): Path<String>,
    Json(payload): Json<AmendAssessmentRequest>,
) -> ApiResult<Json<AssessmentResponse>> {
    let assessment = state
        .assessment_service
        .amend_assessment(
            &actor,
            parse_id::<AssessmentId>(&assessment_id)?,
            payload.into_amendment()?,
        )
        .await?;

    Ok(Json(AssessmentResponse::from(assessment)))
}

pub async fn delete_assessment_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(assessment_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .assessment_service
        .delete_assessment(&actor, parse_id::<AssessmentId>(&assessment_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
