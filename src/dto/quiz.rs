// src/dto/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::quiz::Quiz;

/// Read projection of a quiz: exercises reduced to their ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuizModel {
    pub id: i64,
    pub section_id: Option<i64>,
    pub exercise_ids: Vec<i64>,
    pub expiration_time: DateTime<Utc>,
}

impl QuizModel {
    pub fn from_quiz(quiz: &Quiz) -> Self {
        QuizModel {
            id: quiz.id,
            section_id: quiz.section_id,
            exercise_ids: quiz.exercises.iter().map(|e| e.id).collect(),
            expiration_time: quiz.expiration_time,
        }
    }
}

/// Payload for creating a quiz.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddQuizRequest {
    pub section_id: Option<i64>,
    pub order_number: Option<i32>,
    pub expiration_time: DateTime<Utc>,
}

/// One submitted answer. Which optional fields apply depends on the
/// exercise kind; combinations are deliberately not enforced here and
/// grading treats a mismatch as an incorrect answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnswerSubmission {
    pub question_id: i64,
    #[serde(default)]
    pub selected_option_index: Option<i64>,
    #[serde(default)]
    pub written_answer: Option<String>,
    #[serde(default)]
    pub associated_pair_id: Option<i64>,
}

/// A full quiz submission. Answer order is not guaranteed to match
/// question order; grading matches by question id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuizSubmission {
    pub quiz_id: i64,
    pub answers: Vec<AnswerSubmission>,
    /// When the client started the quiz; server receipt time when absent.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

/// Grading outcome of a submission. `correct_answers <= total_questions`
/// holds by construction. `TimeTaken` is whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuizResult {
    pub quiz_id: i64,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub time_taken: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::difficulty::Difficulty;
    use crate::models::exercise::{Exercise, ExerciseKind};

    #[test]
    fn quiz_model_keeps_exercise_order() {
        let quiz = Quiz {
            id: 7,
            section_id: Some(2),
            order_number: None,
            expiration_time: Utc::now(),
            exercises: vec![
                Exercise {
                    id: 30,
                    question: "a".to_string(),
                    difficulty: Difficulty::Easy,
                    kind: ExerciseKind::Flashcard {
                        answer: "x".to_string(),
                        time_in_seconds: 15,
                    },
                },
                Exercise {
                    id: 10,
                    question: "b".to_string(),
                    difficulty: Difficulty::Hard,
                    kind: ExerciseKind::FillInTheBlank {
                        possible_correct_answers: vec!["y".to_string()],
                    },
                },
            ],
        };

        let model = QuizModel::from_quiz(&quiz);
        assert_eq!(model.id, 7);
        assert_eq!(model.section_id, Some(2));
        assert_eq!(model.exercise_ids, vec![30, 10]);
    }

    #[test]
    fn answer_submission_optional_fields_default() {
        let a: AnswerSubmission = serde_json::from_str(r#"{"QuestionId": 4}"#).unwrap();
        assert_eq!(a.question_id, 4);
        assert!(a.selected_option_index.is_none());
        assert!(a.written_answer.is_none());
        assert!(a.associated_pair_id.is_none());
    }
}
