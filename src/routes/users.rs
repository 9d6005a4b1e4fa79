use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::{json_error, AppError};
use crate::state::AppState;
use crate::store::models::{LanguagePreference, User};
use crate::store::{ProgressStore, StoreError};

#[derive(Debug, Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    learning_languages: Vec<LanguagePreference>,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let store = require_store(&state)?;

    let id = match body.id {
        Some(id) if id.trim().is_empty() => {
            return Err(AppError::validation("id must not be empty"));
        }
        Some(id) => id,
        None => Uuid::new_v4().to_string(),
    };

    let user = User::new(id, body.learning_languages, Utc::now());

    match store.create_user(&user).await {
        Ok(()) => {}
        Err(StoreError::Custom(msg)) if msg.contains("already exists") => {
            return Err(AppError::conflict("user already exists"));
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to create user");
            return Err(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DB_ERROR",
                "database operation failed",
            ));
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            success: true,
            data: user,
        }),
    ))
}

fn require_store(state: &AppState) -> Result<Arc<dyn ProgressStore>, AppError> {
    state
        .store()
        .ok_or_else(|| AppError::service_unavailable("storage unavailable"))
}
