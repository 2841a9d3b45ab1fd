// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::PgPool;

use crate::{
    dto::{AddQuizRequest, AnswerSubmission, QuizModel, QuizResult, QuizSubmission},
    error::AppError,
    models::{
        exercise::{Exercise, ExerciseRow},
        quiz::{Quiz, QuizRow},
    },
};

/// Loads a quiz with its full exercise list, in stored order.
pub(crate) async fn load_quiz(pool: &PgPool, id: i64) -> Result<Option<Quiz>, AppError> {
    let row: Option<QuizRow> = sqlx::query_as(
        "SELECT id, section_id, order_number, expiration_time FROM quizzes WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let exercise_rows: Vec<ExerciseRow> = sqlx::query_as(
        "SELECT e.id, e.question, e.difficulty, e.kind
         FROM exercises e
         JOIN quiz_exercises qe ON qe.exercise_id = e.id
         WHERE qe.quiz_id = $1
         ORDER BY qe.position",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let exercises = exercise_rows.into_iter().map(Exercise::from).collect();
    Ok(Some(row.into_quiz(exercises)))
}

/// Groups exercise ids per quiz for a set of quiz rows.
async fn exercise_ids_for(
    pool: &PgPool,
    quiz_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>, AppError> {
    if quiz_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let pairs: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT quiz_id, exercise_id FROM quiz_exercises
         WHERE quiz_id = ANY($1)
         ORDER BY quiz_id, position",
    )
    .bind(quiz_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
    for (quiz_id, exercise_id) in pairs {
        grouped.entry(quiz_id).or_default().push(exercise_id);
    }
    Ok(grouped)
}

fn to_models(rows: Vec<QuizRow>, mut ids: HashMap<i64, Vec<i64>>) -> Vec<QuizModel> {
    rows.into_iter()
        .map(|row| QuizModel {
            id: row.id,
            section_id: row.section_id,
            exercise_ids: ids.remove(&row.id).unwrap_or_default(),
            expiration_time: row.expiration_time,
        })
        .collect()
}

/// Creates a quiz.
pub async fn add_quiz(
    State(pool): State<PgPool>,
    Json(payload): Json<AddQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO quizzes (section_id, order_number, expiration_time)
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(payload.section_id)
    .bind(payload.order_number)
    .bind(payload.expiration_time)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert quiz: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let model = QuizModel {
        id,
        section_id: payload.section_id,
        exercise_ids: Vec::new(),
        expiration_time: payload.expiration_time,
    };

    Ok((StatusCode::CREATED, Json(model)))
}

/// Lists all quizzes as read projections.
pub async fn list_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<QuizRow> = sqlx::query_as(
        "SELECT id, section_id, order_number, expiration_time FROM quizzes ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;

    let quiz_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let ids = exercise_ids_for(&pool, &quiz_ids).await?;

    Ok(Json(to_models(rows, ids)))
}

/// Fetches one quiz as a read projection.
pub async fn get_quiz(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = load_quiz(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(QuizModel::from_quiz(&quiz)))
}

/// Deletes a quiz by id.
pub async fn delete_quiz(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the quizzes of one section, ordered within the section.
pub async fn quizzes_by_section(
    State(pool): State<PgPool>,
    Path(section_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<QuizRow> = sqlx::query_as(
        "SELECT id, section_id, order_number, expiration_time FROM quizzes
         WHERE section_id = $1
         ORDER BY order_number NULLS LAST, id",
    )
    .bind(section_id)
    .fetch_all(&pool)
    .await?;

    let quiz_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let ids = exercise_ids_for(&pool, &quiz_ids).await?;

    Ok(Json(to_models(rows, ids)))
}

/// Lists quizzes whose expiration instant is still in the future.
pub async fn available_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<QuizRow> = sqlx::query_as(
        "SELECT id, section_id, order_number, expiration_time FROM quizzes
         WHERE expiration_time > $1
         ORDER BY id",
    )
    .bind(Utc::now())
    .fetch_all(&pool)
    .await?;

    let quiz_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let ids = exercise_ids_for(&pool, &quiz_ids).await?;

    Ok(Json(to_models(rows, ids)))
}

/// Attaches exercises to a quiz, appended after the existing ones.
pub async fn attach_exercises(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<i64>,
    Json(exercise_ids): Json<Vec<i64>>,
) -> Result<impl IntoResponse, AppError> {
    if exercise_ids.is_empty() {
        return Err(AppError::BadRequest("No exercises given".to_string()));
    }

    let mut tx = pool.begin().await?;

    // The parent row lock serializes concurrent attaches to one quiz,
    // so assigned positions stay unique.
    let quiz_exists: Option<i64> =
        sqlx::query_scalar("SELECT id FROM quizzes WHERE id = $1 FOR UPDATE")
            .bind(quiz_id)
            .fetch_optional(&mut *tx)
            .await?;
    quiz_exists.ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let mut position: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM quiz_exercises WHERE quiz_id = $1",
    )
    .bind(quiz_id)
    .fetch_one(&mut *tx)
    .await?;

    for exercise_id in exercise_ids {
        let result = sqlx::query(
            "INSERT INTO quiz_exercises (quiz_id, exercise_id, position)
             VALUES ($1, $2, $3)
             ON CONFLICT (quiz_id, exercise_id) DO NOTHING",
        )
        .bind(quiz_id)
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

/// Detaches one exercise from a quiz.
pub async fn detach_exercise(
    State(pool): State<PgPool>,
    Path((quiz_id, exercise_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let result =
        sqlx::query("DELETE FROM quiz_exercises WHERE quiz_id = $1 AND exercise_id = $2")
            .bind(quiz_id)
            .bind(exercise_id)
            .execute(&pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Exercise is not attached to this quiz".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Matches answers to the quiz's questions by id and grades them.
/// Answers for unknown question ids are dropped, so
/// `correct <= verdicts.len() <= answers.len()` always holds.
pub(crate) fn grade_submission(quiz: &Quiz, answers: &[AnswerSubmission]) -> Vec<(i64, bool)> {
    let questions: HashMap<i64, &Exercise> = quiz.exercises.iter().map(|e| (e.id, e)).collect();

    answers
        .iter()
        .filter_map(|answer| {
            questions
                .get(&answer.question_id)
                .map(|question| (answer.question_id, question.check_answer(answer)))
        })
        .collect()
}

/// Grades a quiz submission and persists it.
///
/// The per-answer verdicts are stored together with the start/end
/// instants so the result can be fetched later. The submission row and
/// its verdict rows are written in one transaction: either all of them
/// land or none do.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    Json(submission): Json<QuizSubmission>,
) -> Result<impl IntoResponse, AppError> {
    if submission.answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let quiz = load_quiz(&pool, submission.quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let verdicts = grade_submission(&quiz, &submission.answers);

    let finished_at = Utc::now();
    let started_at = submission
        .started_at
        .filter(|s| *s <= finished_at)
        .unwrap_or(finished_at);

    let mut tx = pool.begin().await?;

    let submission_id: i64 = sqlx::query_scalar(
        "INSERT INTO quiz_submissions (quiz_id, started_at, finished_at)
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(submission.quiz_id)
    .bind(started_at)
    .bind(finished_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert quiz submission: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    for (question_id, is_correct) in &verdicts {
        sqlx::query(
            "INSERT INTO answer_submissions (submission_id, question_id, is_correct)
             VALUES ($1, $2, $3)",
        )
        .bind(submission_id)
        .bind(question_id)
        .bind(is_correct)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let correct = verdicts.iter().filter(|(_, ok)| *ok).count() as i64;
    let result = QuizResult {
        quiz_id: submission.quiz_id,
        total_questions: verdicts.len() as i64,
        correct_answers: correct,
        time_taken: (finished_at - started_at).num_seconds(),
    };

    Ok(Json(result))
}

/// Returns the grading outcome of the latest submission for a quiz.
pub async fn quiz_result(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let submission: Option<(i64, chrono::DateTime<Utc>, chrono::DateTime<Utc>)> =
        sqlx::query_as(
            "SELECT id, started_at, finished_at FROM quiz_submissions
             WHERE quiz_id = $1
             ORDER BY id DESC
             LIMIT 1",
        )
        .bind(quiz_id)
        .fetch_optional(&pool)
        .await?;

    let (submission_id, started_at, finished_at) = submission.ok_or(AppError::NotFound(
        "Quiz has not been submitted".to_string(),
    ))?;

    let (total, correct): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_correct)
         FROM answer_submissions
         WHERE submission_id = $1",
    )
    .bind(submission_id)
    .fetch_one(&pool)
    .await?;

    let result = QuizResult {
        quiz_id,
        total_questions: total,
        correct_answers: correct,
        time_taken: (finished_at - started_at).num_seconds(),
    };

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::difficulty::Difficulty;
    use crate::models::exercise::{ChoiceOption, ExerciseKind};

    fn quiz_with_two_questions() -> Quiz {
        Quiz {
            id: 1,
            section_id: None,
            order_number: None,
            expiration_time: Utc::now(),
            exercises: vec![
                Exercise {
                    id: 10,
                    question: "pick".to_string(),
                    difficulty: Difficulty::Easy,
                    kind: ExerciseKind::MultipleChoice {
                        choices: vec![
                            ChoiceOption {
                                answer: "wrong".to_string(),
                                is_correct: false,
                            },
                            ChoiceOption {
                                answer: "right".to_string(),
                                is_correct: true,
                            },
                        ],
                    },
                },
                Exercise {
                    id: 11,
                    question: "write".to_string(),
                    difficulty: Difficulty::Easy,
                    kind: ExerciseKind::FillInTheBlank {
                        possible_correct_answers: vec!["four".to_string()],
                    },
                },
            ],
        }
    }

    fn answer(question_id: i64) -> AnswerSubmission {
        AnswerSubmission {
            question_id,
            selected_option_index: None,
            written_answer: None,
            associated_pair_id: None,
        }
    }

    #[test]
    fn grading_matches_answers_by_question_id() {
        let quiz = quiz_with_two_questions();

        // Answers arrive out of question order.
        let mut second = answer(11);
        second.written_answer = Some("four".to_string());
        let mut first = answer(10);
        first.selected_option_index = Some(1);

        let verdicts = grade_submission(&quiz, &[second, first]);
        assert_eq!(verdicts, vec![(11, true), (10, true)]);
    }

    #[test]
    fn grading_drops_unknown_question_ids() {
        let quiz = quiz_with_two_questions();

        let mut known = answer(10);
        known.selected_option_index = Some(0);
        let unknown = answer(999);

        let verdicts = grade_submission(&quiz, &[known, unknown]);
        assert_eq!(verdicts, vec![(10, false)]);
    }

    #[test]
    fn correct_count_never_exceeds_total() {
        let quiz = quiz_with_two_questions();

        let mut a = answer(10);
        a.selected_option_index = Some(1);
        let mut b = answer(11);
        b.written_answer = Some("wrong".to_string());

        let verdicts = grade_submission(&quiz, &[a, b]);
        let correct = verdicts.iter().filter(|(_, ok)| *ok).count();
        assert!(correct <= verdicts.len());
        assert_eq!(verdicts.len(), 2);
        assert_eq!(correct, 1);
    }
}
