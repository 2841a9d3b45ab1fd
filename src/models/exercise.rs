// src/models/exercise.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use std::fmt;

use crate::dto::AnswerSubmission;
use crate::models::difficulty::Difficulty;

/// A single question/prompt unit. The kind-specific payload lives in
/// [`ExerciseKind`], a closed set of tagged variants, so the `Type`
/// discriminator and the runtime variant are in sync by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Exercise {
    pub id: i64,
    pub question: String,
    pub difficulty: Difficulty,
    #[serde(flatten)]
    pub kind: ExerciseKind,
}

/// One variant per exercise kind. The serde tag doubles as the stable
/// string discriminator used on the wire and in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum ExerciseKind {
    #[serde(rename_all = "PascalCase")]
    Flashcard {
        answer: String,
        #[serde(default)]
        time_in_seconds: i64,
    },
    #[serde(rename_all = "PascalCase")]
    MultipleChoice { choices: Vec<ChoiceOption> },
    #[serde(rename_all = "PascalCase")]
    FillInTheBlank {
        possible_correct_answers: Vec<String>,
    },
    #[serde(rename_all = "PascalCase")]
    Association {
        first_answers: Vec<String>,
        second_answers: Vec<String>,
    },
}

/// One option of a multiple-choice exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChoiceOption {
    pub answer: String,
    pub is_correct: bool,
}

impl ExerciseKind {
    /// The known discriminator strings, in declaration order.
    pub const ALL_TYPES: [&'static str; 4] = [
        "Flashcard",
        "MultipleChoice",
        "FillInTheBlank",
        "Association",
    ];

    pub fn discriminator(&self) -> &'static str {
        match self {
            ExerciseKind::Flashcard { .. } => "Flashcard",
            ExerciseKind::MultipleChoice { .. } => "MultipleChoice",
            ExerciseKind::FillInTheBlank { .. } => "FillInTheBlank",
            ExerciseKind::Association { .. } => "Association",
        }
    }

    /// Default flashcard answer time for a difficulty level.
    pub fn default_flashcard_seconds(difficulty: Difficulty) -> i64 {
        match difficulty {
            Difficulty::Easy => 15,
            Difficulty::Normal => 30,
            Difficulty::Hard => 45,
        }
    }

    /// Checks a submitted answer against this exercise kind.
    ///
    /// An answer whose populated fields do not fit the kind (missing text,
    /// out-of-range index) is incorrect, never an error.
    pub fn check_answer(&self, answer: &AnswerSubmission) -> bool {
        match self {
            ExerciseKind::MultipleChoice { choices } => answer
                .selected_option_index
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| choices.get(i))
                .is_some_and(|choice| choice.is_correct),
            ExerciseKind::FillInTheBlank {
                possible_correct_answers,
            } => answer.written_answer.as_deref().is_some_and(|written| {
                possible_correct_answers
                    .iter()
                    .any(|correct| correct.trim().eq_ignore_ascii_case(written.trim()))
            }),
            ExerciseKind::Flashcard { answer: correct, .. } => answer
                .written_answer
                .as_deref()
                .is_some_and(|written| {
                    !written.trim().is_empty()
                        && written.trim().eq_ignore_ascii_case(correct.trim())
                }),
            ExerciseKind::Association {
                first_answers,
                second_answers,
            } => match (answer.selected_option_index, answer.associated_pair_id) {
                (Some(first), Some(second)) => {
                    // Items pair by index across the two lists.
                    first >= 0
                        && second >= 0
                        && (first as usize) < first_answers.len()
                        && (second as usize) < second_answers.len()
                        && first == second
                }
                _ => false,
            },
        }
    }
}

impl Exercise {
    pub fn check_answer(&self, answer: &AnswerSubmission) -> bool {
        self.kind.check_answer(answer)
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exercise {}: {} (Difficulty: {})",
            self.id, self.question, self.difficulty
        )
    }
}

/// Row shape of the 'exercises' table. The kind payload is a tagged JSON
/// column, the relational analogue of a discriminator table.
#[derive(Debug, FromRow)]
pub struct ExerciseRow {
    pub id: i64,
    pub question: String,
    pub difficulty: Difficulty,
    pub kind: Json<ExerciseKind>,
}

impl From<ExerciseRow> for Exercise {
    fn from(row: ExerciseRow) -> Self {
        Exercise {
            id: row.id,
            question: row.question,
            difficulty: row.difficulty,
            kind: row.kind.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(kind: ExerciseKind) -> Exercise {
        Exercise {
            id: 1,
            question: "q".to_string(),
            difficulty: Difficulty::Normal,
            kind,
        }
    }

    fn answer() -> AnswerSubmission {
        AnswerSubmission {
            question_id: 1,
            selected_option_index: None,
            written_answer: None,
            associated_pair_id: None,
        }
    }

    #[test]
    fn display_format() {
        let e = Exercise {
            id: 3,
            question: "What is 2+2?".to_string(),
            difficulty: Difficulty::Easy,
            kind: ExerciseKind::Flashcard {
                answer: "4".to_string(),
                time_in_seconds: 15,
            },
        };
        assert_eq!(e.to_string(), "Exercise 3: What is 2+2? (Difficulty: Easy)");
    }

    #[test]
    fn discriminator_rides_in_json() {
        let e = exercise(ExerciseKind::FillInTheBlank {
            possible_correct_answers: vec!["four".to_string()],
        });
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value["Type"], "FillInTheBlank");
        assert_eq!(value["Question"], "q");
        assert_eq!(value["Difficulty"], "Normal");

        let back: Exercise = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind.discriminator(), "FillInTheBlank");
    }

    #[test]
    fn multiple_choice_grading() {
        let e = exercise(ExerciseKind::MultipleChoice {
            choices: vec![
                ChoiceOption {
                    answer: "3".to_string(),
                    is_correct: false,
                },
                ChoiceOption {
                    answer: "4".to_string(),
                    is_correct: true,
                },
            ],
        });

        let mut a = answer();
        a.selected_option_index = Some(1);
        assert!(e.check_answer(&a));

        a.selected_option_index = Some(0);
        assert!(!e.check_answer(&a));

        // Out of range or missing index is wrong, not an error.
        a.selected_option_index = Some(7);
        assert!(!e.check_answer(&a));
        a.selected_option_index = None;
        assert!(!e.check_answer(&a));
    }

    #[test]
    fn fill_in_the_blank_is_case_insensitive() {
        let e = exercise(ExerciseKind::FillInTheBlank {
            possible_correct_answers: vec!["Paris".to_string(), "paris, france".to_string()],
        });

        let mut a = answer();
        a.written_answer = Some("  PARIS ".to_string());
        assert!(e.check_answer(&a));

        a.written_answer = Some("London".to_string());
        assert!(!e.check_answer(&a));
    }

    #[test]
    fn flashcard_rejects_blank_answer() {
        let e = exercise(ExerciseKind::Flashcard {
            answer: "oxygen".to_string(),
            time_in_seconds: 30,
        });

        let mut a = answer();
        a.written_answer = Some("   ".to_string());
        assert!(!e.check_answer(&a));

        a.written_answer = Some("Oxygen".to_string());
        assert!(e.check_answer(&a));
    }

    #[test]
    fn association_pairs_by_index() {
        let e = exercise(ExerciseKind::Association {
            first_answers: vec!["a".to_string(), "b".to_string()],
            second_answers: vec!["1".to_string(), "2".to_string()],
        });

        let mut a = answer();
        a.selected_option_index = Some(1);
        a.associated_pair_id = Some(1);
        assert!(e.check_answer(&a));

        a.associated_pair_id = Some(0);
        assert!(!e.check_answer(&a));

        a.associated_pair_id = None;
        assert!(!e.check_answer(&a));
    }

    #[test]
    fn flashcard_default_time_scales_with_difficulty() {
        assert_eq!(ExerciseKind::default_flashcard_seconds(Difficulty::Easy), 15);
        assert_eq!(
            ExerciseKind::default_flashcard_seconds(Difficulty::Normal),
            30
        );
        assert_eq!(ExerciseKind::default_flashcard_seconds(Difficulty::Hard), 45);
    }
}
