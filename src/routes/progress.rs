use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::response::{json_error, AppError};
use crate::services::progress::{self, ProgressError};
use crate::state::AppState;
use crate::store::models::ActivityType;
use crate::store::ProgressStore;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(streak_view))
        .route("/activity", post(record_activity))
        .route("/:language", get(language_progress))
}

#[derive(Debug, Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordActivityRequest {
    language: String,
    activity_type: ActivityType,
    #[serde(default)]
    minutes: i64,
}

async fn record_activity(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<RecordActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let store = require_store(&state)?;

    let recorded = progress::record_activity(
        store.as_ref(),
        &user_id,
        &body.language,
        body.activity_type,
        body.minutes,
        Utc::now(),
    )
    .await
    .map_err(map_progress_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: recorded,
    }))
}

async fn streak_view(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = require_store(&state)?;

    let view = progress::streak_view(store.as_ref(), &user_id, Utc::now())
        .await
        .map_err(map_progress_error)?;

    Ok(Json(SuccessResponse {
        success: true,
        data: view,
    }))
}

async fn language_progress(
    State(state): State<AppState>,
    Path((user_id, language)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let store = require_store(&state)?;

    let record = store
        .load_progress(&user_id, &language)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to load progress");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DB_ERROR",
                "database operation failed",
            )
        })?
        .ok_or_else(|| AppError::not_found("progress not found"))?;

    Ok(Json(SuccessResponse {
        success: true,
        data: record,
    }))
}

fn require_store(state: &AppState) -> Result<Arc<dyn ProgressStore>, AppError> {
    state
        .store()
        .ok_or_else(|| AppError::service_unavailable("storage unavailable"))
}

fn map_progress_error(err: ProgressError) -> AppError {
    match err {
        ProgressError::UserNotFound => AppError::not_found("user not found"),
        ProgressError::InvalidInput(message) => AppError::validation(message),
        ProgressError::Storage(err) => {
            tracing::error!(error = %err, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DB_ERROR",
                "database operation failed",
            )
        }
    }
}
