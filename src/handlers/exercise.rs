// src/handlers/exercise.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use sqlx::types::Json as DbJson;
use validator::Validate;

use crate::{
    dto::CreateExerciseDto,
    error::AppError,
    models::exercise::{Exercise, ExerciseKind, ExerciseRow},
};

/// Lists all exercises.
pub async fn list_exercises(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<ExerciseRow> =
        sqlx::query_as("SELECT id, question, difficulty, kind FROM exercises ORDER BY id")
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list exercises: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

    let exercises: Vec<Exercise> = rows.into_iter().map(Exercise::from).collect();
    Ok(Json(exercises))
}

/// Fetches a single exercise by id.
pub async fn get_exercise(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let row: Option<ExerciseRow> =
        sqlx::query_as("SELECT id, question, difficulty, kind FROM exercises WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await?;

    let row = row.ok_or(AppError::NotFound("Exercise not found".to_string()))?;
    Ok(Json(Exercise::from(row)))
}

/// Creates an exercise from a raw JSON body.
///
/// The body carries both the metadata (`CreateExerciseDto`) and the
/// kind-specific payload selected by the `Type` discriminator, so the two
/// are decoded from the same value.
pub async fn create_exercise(
    State(pool): State<PgPool>,
    Json(raw): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let meta: CreateExerciseDto = serde_json::from_value(raw.clone())?;

    if let Err(validation_errors) = meta.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !ExerciseKind::ALL_TYPES.contains(&meta.kind.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unknown exercise type '{}'.",
            meta.kind
        )));
    }

    let mut kind: ExerciseKind = serde_json::from_value(raw)?;

    // A flashcard without an explicit time gets the per-difficulty default.
    if let ExerciseKind::Flashcard {
        time_in_seconds, ..
    } = &mut kind
    {
        if *time_in_seconds <= 0 {
            *time_in_seconds = ExerciseKind::default_flashcard_seconds(meta.difficulty);
        }
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO exercises (question, difficulty, kind) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&meta.question)
    .bind(meta.difficulty)
    .bind(DbJson(&kind))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert exercise: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let exercise = Exercise {
        id,
        question: meta.question,
        difficulty: meta.difficulty,
        kind,
    };

    tracing::info!("Created {}", exercise);

    Ok((StatusCode::CREATED, Json(exercise)))
}

/// Deletes an exercise by id.
pub async fn delete_exercise(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Exercise not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the exercises of one quiz, in stored order.
pub async fn quiz_exercises(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(&pool)
        .await?;
    quiz_exists.ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let rows: Vec<ExerciseRow> = sqlx::query_as(
        "SELECT e.id, e.question, e.difficulty, e.kind
         FROM exercises e
         JOIN quiz_exercises qe ON qe.exercise_id = e.id
         WHERE qe.quiz_id = $1
         ORDER BY qe.position",
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    let exercises: Vec<Exercise> = rows.into_iter().map(Exercise::from).collect();
    Ok(Json(exercises))
}

/// Lists the exercises of one exam, in stored order.
pub async fn exam_exercises(
    State(pool): State<PgPool>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM exams WHERE id = $1")
        .bind(exam_id)
        .fetch_optional(&pool)
        .await?;
    exam_exists.ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let rows: Vec<ExerciseRow> = sqlx::query_as(
        "SELECT e.id, e.question, e.difficulty, e.kind
         FROM exercises e
         JOIN exam_exercises xe ON xe.exercise_id = e.id
         WHERE xe.exam_id = $1
         ORDER BY xe.position",
    )
    .bind(exam_id)
    .fetch_all(&pool)
    .await?;

    let exercises: Vec<Exercise> = rows.into_iter().map(Exercise::from).collect();
    Ok(Json(exercises))
}
