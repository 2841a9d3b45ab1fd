// src/handlers/section.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    dto::{AddSectionRequest, SectionDto, UpdateSectionRequest},
    error::AppError,
    models::{
        exam::ExamRow,
        quiz::QuizRow,
        section::{Section, SectionRow},
    },
};

/// Loads a section with its owned quizzes and optional exam.
/// Quiz exercise lists are left empty; the projection only needs ids.
async fn load_section(pool: &PgPool, id: i64) -> Result<Option<Section>, AppError> {
    let row: Option<SectionRow> = sqlx::query_as(
        "SELECT id, subject_id, title, description, roadmap_id, order_number
         FROM sections WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let quiz_rows: Vec<QuizRow> = sqlx::query_as(
        "SELECT id, section_id, order_number, expiration_time FROM quizzes
         WHERE section_id = $1
         ORDER BY order_number NULLS LAST, id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let exam_row: Option<ExamRow> =
        sqlx::query_as("SELECT id, section_id FROM exams WHERE section_id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    let quizzes = quiz_rows
        .into_iter()
        .map(|q| q.into_quiz(Vec::new()))
        .collect();
    let exam = exam_row.map(|e| e.into_exam(Vec::new()));

    Ok(Some(row.into_section(quizzes, exam)))
}

/// Composes full sections for a set of section rows with two grouped
/// queries instead of one pair per section.
async fn compose_sections(
    pool: &PgPool,
    rows: Vec<SectionRow>,
) -> Result<Vec<Section>, AppError> {
    let section_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    if section_ids.is_empty() {
        return Ok(Vec::new());
    }

    let quiz_rows: Vec<QuizRow> = sqlx::query_as(
        "SELECT id, section_id, order_number, expiration_time FROM quizzes
         WHERE section_id = ANY($1)
         ORDER BY order_number NULLS LAST, id",
    )
    .bind(&section_ids)
    .fetch_all(pool)
    .await?;

    let exam_rows: Vec<ExamRow> =
        sqlx::query_as("SELECT id, section_id FROM exams WHERE section_id = ANY($1)")
            .bind(&section_ids)
            .fetch_all(pool)
            .await?;

    let mut quizzes_by_section: HashMap<i64, Vec<QuizRow>> = HashMap::new();
    for quiz in quiz_rows {
        if let Some(section_id) = quiz.section_id {
            quizzes_by_section.entry(section_id).or_default().push(quiz);
        }
    }

    let mut exams_by_section: HashMap<i64, ExamRow> = HashMap::new();
    for exam in exam_rows {
        if let Some(section_id) = exam.section_id {
            exams_by_section.insert(section_id, exam);
        }
    }

    let sections = rows
        .into_iter()
        .map(|row| {
            let quizzes = quizzes_by_section
                .remove(&row.id)
                .unwrap_or_default()
                .into_iter()
                .map(|q| q.into_quiz(Vec::new()))
                .collect();
            let exam = exams_by_section.remove(&row.id).map(|e| e.into_exam(Vec::new()));
            row.into_section(quizzes, exam)
        })
        .collect();

    Ok(sections)
}

/// Creates a section.
pub async fn add_section(
    State(pool): State<PgPool>,
    Json(payload): Json<AddSectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO sections (subject_id, title, description, roadmap_id, order_number)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(payload.subject_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.roadmap_id)
    .bind(payload.order_number)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert section: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let section = Section {
        id,
        subject_id: payload.subject_id,
        title: payload.title,
        description: payload.description,
        roadmap_id: payload.roadmap_id,
        order_number: payload.order_number,
        quizzes: Vec::new(),
        exam: None,
    };

    Ok((StatusCode::CREATED, Json(SectionDto::from_section(&section))))
}

/// Lists all sections as transport snapshots.
pub async fn list_sections(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<SectionRow> = sqlx::query_as(
        "SELECT id, subject_id, title, description, roadmap_id, order_number
         FROM sections ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;

    let sections = compose_sections(&pool, rows).await?;
    let dtos: Vec<SectionDto> = sections.iter().map(SectionDto::from_section).collect();
    Ok(Json(dtos))
}

/// Fetches one section as a transport snapshot.
pub async fn get_section(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let section = load_section(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Section not found".to_string()))?;

    Ok(Json(SectionDto::from_section(&section)))
}

/// Updates a section field-wise; absent fields keep their stored value.
pub async fn update_section(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM sections WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?;
    exists.ok_or(AppError::NotFound("Section not found".to_string()))?;

    if let Some(subject_id) = payload.subject_id {
        sqlx::query("UPDATE sections SET subject_id = $1 WHERE id = $2")
            .bind(subject_id)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(title) = payload.title {
        sqlx::query("UPDATE sections SET title = $1 WHERE id = $2")
            .bind(title)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(description) = payload.description {
        sqlx::query("UPDATE sections SET description = $1 WHERE id = $2")
            .bind(description)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(roadmap_id) = payload.roadmap_id {
        sqlx::query("UPDATE sections SET roadmap_id = $1 WHERE id = $2")
            .bind(roadmap_id)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(order_number) = payload.order_number {
        sqlx::query("UPDATE sections SET order_number = $1 WHERE id = $2")
            .bind(order_number)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    Ok(StatusCode::OK)
}

/// Deletes a section by id.
pub async fn delete_section(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM sections WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Section not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the sections of one roadmap in display order.
pub async fn sections_by_roadmap(
    State(pool): State<PgPool>,
    Path(roadmap_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<SectionRow> = sqlx::query_as(
        "SELECT id, subject_id, title, description, roadmap_id, order_number
         FROM sections
         WHERE roadmap_id = $1
         ORDER BY order_number NULLS LAST, id",
    )
    .bind(roadmap_id)
    .fetch_all(&pool)
    .await?;

    let sections = compose_sections(&pool, rows).await?;
    let dtos: Vec<SectionDto> = sections.iter().map(SectionDto::from_section).collect();
    Ok(Json(dtos))
}
