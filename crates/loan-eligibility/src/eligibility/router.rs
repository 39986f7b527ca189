use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use super::domain::ApplicantSubmission;
use super::form::applicant_form;
use super::service::{EligibilityError, EligibilityService};

/// Router builder exposing the form contract and the submission endpoint.
pub fn eligibility_router(service: Arc<EligibilityService>) -> Router {
    Router::new()
        .route("/api/v1/loan/form", get(form_handler))
        .route("/api/v1/loan/eligibility", post(submit_handler))
        .with_state(service)
}

pub(crate) async fn form_handler(State(service): State<Arc<EligibilityService>>) -> Response {
    let fields = applicant_form();
    let defaults: BTreeMap<&str, Value> = fields
        .iter()
        .map(|field| (field.key, field.default.clone()))
        .collect();

    let payload = json!({
        "fields": fields,
        "defaults": defaults,
        "model": service.model_status(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

/// Body decode failures keep the `{error, field}` shape; `field` is null when no field can be named.
pub(crate) async fn submit_handler(
    State(service): State<Arc<EligibilityService>>,
    payload: Result<axum::Json<ApplicantSubmission>, JsonRejection>,
) -> Response {
    let submission = match payload {
        Ok(axum::Json(submission)) => submission,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
                "field": Value::Null,
            });
            return (rejection.status(), axum::Json(payload)).into_response();
        }
    };

    match service.evaluate(submission) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(EligibilityError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ EligibilityError::ModelUnavailable { .. }) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
                "stage": other.stage().label(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
