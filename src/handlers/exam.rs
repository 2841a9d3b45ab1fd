// src/handlers/exam.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    dto::ExamDto,
    error::AppError,
    models::{
        exam::{Exam, ExamRow},
        exercise::{Exercise, ExerciseRow},
    },
};

/// Loads an exam with its full exercise list, in stored order.
async fn load_exam(pool: &PgPool, id: i64) -> Result<Option<Exam>, AppError> {
    let row: Option<ExamRow> = sqlx::query_as("SELECT id, section_id FROM exams WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let exercise_rows: Vec<ExerciseRow> = sqlx::query_as(
        "SELECT e.id, e.question, e.difficulty, e.kind
         FROM exercises e
         JOIN exam_exercises xe ON xe.exercise_id = e.id
         WHERE xe.exam_id = $1
         ORDER BY xe.position",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let exercises = exercise_rows.into_iter().map(Exercise::from).collect();
    Ok(Some(row.into_exam(exercises)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddExamRequest {
    pub section_id: Option<i64>,
}

/// Creates an exam. A section can hold at most one exam.
pub async fn add_exam(
    State(pool): State<PgPool>,
    Json(payload): Json<AddExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(section_id) = payload.section_id {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM exams WHERE section_id = $1)")
                .bind(section_id)
                .fetch_one(&pool)
                .await?;
        if taken {
            return Err(AppError::Conflict(
                "Section already has an exam".to_string(),
            ));
        }
    }

    let id: i64 = sqlx::query_scalar("INSERT INTO exams (section_id) VALUES ($1) RETURNING id")
        .bind(payload.section_id)
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert exam: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let exam = Exam {
        id,
        section_id: payload.section_id,
        exercises: Vec::new(),
    };

    Ok((StatusCode::CREATED, Json(ExamDto::from_exam(&exam))))
}

/// Fetches one exam as a transport snapshot with its exercises.
pub async fn get_exam(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = load_exam(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(ExamDto::from_exam(&exam)))
}

/// Fetches the exam attached to a section, if any.
pub async fn exam_by_section(
    State(pool): State<PgPool>,
    Path(section_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let row: Option<ExamRow> =
        sqlx::query_as("SELECT id, section_id FROM exams WHERE section_id = $1")
            .bind(section_id)
            .fetch_optional(&pool)
            .await?;

    let row = row.ok_or(AppError::NotFound("Section has no exam".to_string()))?;

    let exam = load_exam(&pool, row.id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(ExamDto::from_exam(&exam)))
}

/// Deletes an exam by id.
pub async fn delete_exam(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM exams WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Exam not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Attaches exercises to an exam, appended after the existing ones.
pub async fn attach_exercises(
    State(pool): State<PgPool>,
    Path(exam_id): Path<i64>,
    Json(exercise_ids): Json<Vec<i64>>,
) -> Result<impl IntoResponse, AppError> {
    if exercise_ids.is_empty() {
        return Err(AppError::BadRequest("No exercises given".to_string()));
    }

    let mut tx = pool.begin().await?;

    // The parent row lock serializes concurrent attaches to one exam,
    // so assigned positions stay unique.
    let exam_exists: Option<i64> =
        sqlx::query_scalar("SELECT id FROM exams WHERE id = $1 FOR UPDATE")
            .bind(exam_id)
            .fetch_optional(&mut *tx)
            .await?;
    exam_exists.ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let mut position: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM exam_exercises WHERE exam_id = $1",
    )
    .bind(exam_id)
    .fetch_one(&mut *tx)
    .await?;

    for exercise_id in exercise_ids {
        let result = sqlx::query(
            "INSERT INTO exam_exercises (exam_id, exercise_id, position)
             VALUES ($1, $2, $3)
             ON CONFLICT (exam_id, exercise_id) DO NOTHING",
        )
        .bind(exam_id)
        .bind(exercise_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() > 0 {
            position += 1;
        }
    }

    tx.commit().await?;

    Ok(StatusCode::OK)
}
