// src/models/section.rs

use sqlx::prelude::FromRow;
use std::fmt;

use crate::models::exam::Exam;
use crate::models::quiz::Quiz;

/// A roadmap unit grouping quizzes and optionally one exam.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: i64,
    pub subject_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub roadmap_id: i64,
    pub order_number: Option<i32>,
    pub quizzes: Vec<Quiz>,
    pub exam: Option<Exam>,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Section: {}, Quizzes Count: {}, Exam: {}",
            self.title,
            self.quizzes.len(),
            if self.exam.is_some() { "Yes" } else { "No" }
        )
    }
}

/// Row shape of the 'sections' table; owned quizzes and the optional exam
/// are loaded separately.
#[derive(Debug, Clone, FromRow)]
pub struct SectionRow {
    pub id: i64,
    pub subject_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub roadmap_id: i64,
    pub order_number: Option<i32>,
}

impl SectionRow {
    pub fn into_section(self, quizzes: Vec<Quiz>, exam: Option<Exam>) -> Section {
        Section {
            id: self.id,
            subject_id: self.subject_id,
            title: self.title,
            description: self.description,
            roadmap_id: self.roadmap_id,
            order_number: self.order_number,
            quizzes,
            exam,
        }
    }
}
