// src/handlers/module.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::{dto::OpenModuleRequest, error::AppError, models::module::Module};

/// Lists all modules.
pub async fn list_modules(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let modules: Vec<Module> = sqlx::query_as("SELECT id, title FROM modules ORDER BY id")
        .fetch_all(&pool)
        .await?;

    Ok(Json(modules))
}

/// Fetches a single module by id.
pub async fn get_module(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let module: Option<Module> = sqlx::query_as("SELECT id, title FROM modules WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?;

    let module = module.ok_or(AppError::NotFound("Module not found".to_string()))?;
    Ok(Json(module))
}

/// Records that a user opened a module. Idempotent.
pub async fn open_module(
    State(pool): State<PgPool>,
    Json(payload): Json<OpenModuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    sqlx::query(
        "INSERT INTO module_opens (user_id, module_id)
         VALUES ($1, $2)
         ON CONFLICT (user_id, module_id) DO NOTHING",
    )
    .bind(payload.user_id)
    .bind(payload.module_id)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record module open: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(serde_json::json!({ "message": "Module opened" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenStatusParams {
    pub user_id: i64,
    pub module_id: i64,
}

/// Reports whether a user has opened a module.
pub async fn open_status(
    State(pool): State<PgPool>,
    Query(params): Query<OpenStatusParams>,
) -> Result<impl IntoResponse, AppError> {
    if params.user_id < 1 || params.module_id < 1 {
        return Err(AppError::BadRequest(
            "Ids must be positive integers".to_string(),
        ));
    }

    let is_open: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM module_opens WHERE user_id = $1 AND module_id = $2)",
    )
    .bind(params.user_id)
    .bind(params.module_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(is_open))
}
