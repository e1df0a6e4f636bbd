//! Route handlers for the session API.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::SessionState;
use crate::error::{ApiError, ErrorCode};
use crate::model::{Addon, Configuration, FieldView, WindowSpec, schema};
use crate::normalize::{Payload, normalize};
use crate::pricing::{Estimate, Submission};
use crate::render::{self, Section};
use crate::store::EditValue;

type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::UnknownField | ErrorCode::InvalidFieldValue | ErrorCode::OutOfRange => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::IncompleteField
            | ErrorCode::MissingWarmContourFields
            | ErrorCode::MissingColdContourFields
            | ErrorCode::RemoteValidationRejected => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::SubmissionInFlight => StatusCode::CONFLICT,
            ErrorCode::RemoteUnavailable => StatusCode::BAD_GATEWAY,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Current tree with its revision.
#[derive(Serialize)]
struct ConfigResponse {
    revision: u64,
    config: Arc<Configuration>,
}

#[derive(Deserialize)]
struct EditRequest {
    path: String,
    /// `null` clears the field.
    #[serde(default)]
    value: Option<EditValue>,
}

#[derive(Serialize)]
struct EstimateResponse {
    seq: u64,
    estimate: Estimate,
    sections: Vec<Section>,
}

impl From<&Submission> for EstimateResponse {
    fn from(submission: &Submission) -> Self {
        Self {
            seq: submission.seq,
            estimate: submission.estimate.clone(),
            sections: render::sections(&submission.estimate),
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_config(State(state): State<SessionState>) -> ApiResult<ConfigResponse> {
    let store = state.store()?;
    Ok(Json(ConfigResponse {
        revision: store.revision(),
        config: store.snapshot(),
    }))
}

async fn get_fields(State(state): State<SessionState>) -> ApiResult<Vec<FieldView>> {
    let snapshot = state.store()?.snapshot();
    Ok(Json(schema::describe(&snapshot)))
}

async fn post_edit(
    State(state): State<SessionState>,
    Json(request): Json<EditRequest>,
) -> ApiResult<ConfigResponse> {
    let value = request
        .value
        .unwrap_or_else(|| EditValue::Text(String::new()));
    let mut store = state.store()?;
    let config = store.apply_edit(&request.path, value)?;
    Ok(Json(ConfigResponse {
        revision: store.revision(),
        config,
    }))
}

async fn post_addon(
    State(state): State<SessionState>,
    Json(addon): Json<Addon>,
) -> ApiResult<ConfigResponse> {
    let mut store = state.store()?;
    let config = store.append_addon(addon)?;
    Ok(Json(ConfigResponse {
        revision: store.revision(),
        config,
    }))
}

async fn post_window(
    State(state): State<SessionState>,
    Json(window): Json<WindowSpec>,
) -> ApiResult<ConfigResponse> {
    let mut store = state.store()?;
    let config = store.append_window(window)?;
    Ok(Json(ConfigResponse {
        revision: store.revision(),
        config,
    }))
}

async fn post_payload(State(state): State<SessionState>) -> ApiResult<Payload> {
    let snapshot = state.store()?.snapshot();
    Ok(Json(normalize(&snapshot)?))
}

async fn post_submit(State(state): State<SessionState>) -> ApiResult<EstimateResponse> {
    // The guard is dropped here; edits stay possible while the request runs.
    let snapshot = state.store()?.snapshot();
    let submission = state.submitter().submit(snapshot).await?;
    Ok(Json(EstimateResponse::from(submission.as_ref())))
}

async fn get_estimate(State(state): State<SessionState>) -> ApiResult<EstimateResponse> {
    state
        .submitter()
        .latest()
        .map(|submission| Json(EstimateResponse::from(submission.as_ref())))
        .ok_or_else(|| ApiError::not_found("estimate"))
}

/// Build the router with all routes.
pub fn build_router(state: SessionState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/config", get(get_config))
        .route("/api/fields", get(get_fields))
        .route("/api/edit", post(post_edit))
        .route("/api/addons", post(post_addon))
        .route("/api/windows", post(post_window))
        .route("/api/payload", post(post_payload))
        .route("/api/submit", post(post_submit))
        .route("/api/estimate", get(get_estimate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |code| ApiError::new(code, "x").status();
        assert_eq!(status(ErrorCode::OutOfRange), StatusCode::BAD_REQUEST);
        assert_eq!(status(ErrorCode::IncompleteField), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status(ErrorCode::RemoteValidationRejected),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status(ErrorCode::SubmissionInFlight), StatusCode::CONFLICT);
        assert_eq!(status(ErrorCode::RemoteUnavailable), StatusCode::BAD_GATEWAY);
        assert_eq!(status(ErrorCode::NotFound), StatusCode::NOT_FOUND);
    }
}
