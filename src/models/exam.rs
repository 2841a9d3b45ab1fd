// src/models/exam.rs

use sqlx::prelude::FromRow;
use std::fmt;

use crate::models::exercise::Exercise;

/// A section's final exam. At most one exam is attached to a section.
#[derive(Debug, Clone)]
pub struct Exam {
    pub id: i64,
    pub section_id: Option<i64>,
    pub exercises: Vec<Exercise>,
}

impl fmt::Display for Exam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exam ID: {}, Exercises Count: {}",
            self.id,
            self.exercises.len()
        )
    }
}

/// Row shape of the 'exams' table.
#[derive(Debug, Clone, FromRow)]
pub struct ExamRow {
    pub id: i64,
    pub section_id: Option<i64>,
}

impl ExamRow {
    pub fn into_exam(self, exercises: Vec<Exercise>) -> Exam {
        Exam {
            id: self.id,
            section_id: self.section_id,
            exercises,
        }
    }
}
