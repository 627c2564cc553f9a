use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use skillmatrix_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

#[cfg(test)]
mod tests;

pub fn build_router<Store>(
    app_state: AppState,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let protected_routes = Router::new()
        .route(
            "/api/me/permissions",
            get(handlers::organization::my_permissions_handler),
        )
        .route(
            "/api/employees",
            get(handlers::organization::list_employees_handler)
                .post(handlers::organization::create_employee_handler),
        )
        .route(
            "/api/employees/{user_id}",
            get(handlers::organization::get_employee_handler)
                .delete(handlers::organization::delete_employee_handler),
        )
        .route(
            "/api/employees/{user_id}/skills",
            get(handlers::skills::list_employee_skills_handler),
        )
        .route(
            "/api/employees/{user_id}/skills/{skill_id}",
            put(handlers::skills::update_employee_skill_handler),
        )
        .route(
            "/api/assessments",
            get(handlers::assessments::list_assessments_handler)
                .post(handlers::assessments::record_assessment_handler),
        )
        .route(
            "/api/assessments/{assessment_id}",
            get(handlers::assessments::get_assessment_handler)
                .put(handlers::assessments::amend_assessment_handler)
                .delete(handlers::assessments::delete_assessment_handler),
        )
        .route(
            "/api/departments",
            get(handlers::organization::list_departments_handler)
                .post(handlers::organization::create_department_handler),
        )
        .route(
            "/api/job-profiles",
            get(handlers::organization::list_job_profiles_handler)
                .post(handlers::organization::create_job_profile_handler),
        )
        .route(
            "/api/skills",
            get(handlers::skills::list_skills_handler)
                .post(handlers::skills::create_skill_handler),
        )
        .route(
            "/api/reports/skill-gaps",
            get(handlers::reports::skill_gaps_handler),
        )
        .route(
            "/api/reports/performance/{employee_id}",
            get(handlers::reports::performance_handler),
        )
        .route(
            "/api/reports/organization",
            get(handlers::reports::organization_summary_handler),
        )
        .route(
            "/api/audit-log",
            get(handlers::audit::list_audit_log_handler),
        )
        .route("/auth/logout", post(auth::logout_handler))
        .layer(from_fn(middleware::require_auth));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/me", get(auth::me_handler));

    let cors_layer = build_cors_layer(&app_state.frontend_url)?;

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(session_layer)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]))
}
