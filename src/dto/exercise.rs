// src/dto/exercise.rs

use serde::Deserialize;
use validator::Validate;

use crate::models::difficulty::Difficulty;

/// Metadata half of an exercise creation payload. The kind-specific
/// fields ride in the same JSON body and are decoded separately as
/// `ExerciseKind`, keyed by the `Type` discriminator.
///
/// `exams` and `quizzes` are name lists carried for the wire contract;
/// attachment goes through the dedicated attach endpoints.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CreateExerciseDto {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub exams: Option<Vec<String>>,
    #[serde(default)]
    pub quizzes: Option<Vec<String>>,
    #[serde(rename = "Type")]
    pub kind: String,
}
