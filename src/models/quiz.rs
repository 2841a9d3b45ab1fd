// src/models/quiz.rs

use chrono::{DateTime, Utc};
use sqlx::prelude::FromRow;
use std::fmt;

use crate::models::exercise::Exercise;

/// A quiz: an ordered collection of exercises with an expiration instant.
/// The expiration is a single point in time, not a duration.
#[derive(Debug, Clone)]
pub struct Quiz {
    pub id: i64,
    pub section_id: Option<i64>,
    pub order_number: Option<i32>,
    pub expiration_time: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
}

impl fmt::Display for Quiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quiz ID: {}, Exercises Count: {}",
            self.id,
            self.exercises.len()
        )
    }
}

/// Row shape of the 'quizzes' table; exercises are loaded separately
/// through the 'quiz_exercises' join table.
#[derive(Debug, Clone, FromRow)]
pub struct QuizRow {
    pub id: i64,
    pub section_id: Option<i64>,
    pub order_number: Option<i32>,
    pub expiration_time: DateTime<Utc>,
}

impl QuizRow {
    pub fn into_quiz(self, exercises: Vec<Exercise>) -> Quiz {
        Quiz {
            id: self.id,
            section_id: self.section_id,
            order_number: self.order_number,
            expiration_time: self.expiration_time,
            exercises,
        }
    }
}
