// src/dto/exam.rs

use serde::Serialize;

use crate::models::exam::Exam;
use crate::models::exercise::Exercise;

/// Transport snapshot of an exam with its full exercise list.
/// `SectionId` is serialized even when null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExamDto {
    pub id: i64,
    pub section_id: Option<i64>,
    pub exercises: Vec<Exercise>,
}

impl ExamDto {
    pub fn from_exam(exam: &Exam) -> Self {
        ExamDto {
            id: exam.id,
            section_id: exam.section_id,
            exercises: exam.exercises.clone(),
        }
    }
}
