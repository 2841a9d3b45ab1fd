// src/dto/section.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::section::Section;

/// Transport snapshot of a section. `QuizIds` are the ids of the owned
/// quizzes in order (empty, never null, without quizzes); `ExamId` is the
/// owned exam's id when one is attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SectionDto {
    pub id: i64,
    pub subject_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub roadmap_id: i64,
    pub order_number: Option<i32>,
    pub quiz_ids: Vec<i64>,
    pub exam_id: Option<i64>,
}

impl SectionDto {
    /// Pure projection; shallow-copies the scalar fields and never
    /// mutates its input.
    pub fn from_section(section: &Section) -> Self {
        SectionDto {
            id: section.id,
            subject_id: section.subject_id,
            title: section.title.clone(),
            description: section.description.clone(),
            roadmap_id: section.roadmap_id,
            order_number: section.order_number,
            quiz_ids: section.quizzes.iter().map(|q| q.id).collect(),
            exam_id: section.exam.as_ref().map(|e| e.id),
        }
    }
}

/// Payload for creating a section.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct AddSectionRequest {
    pub subject_id: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(range(min = 1))]
    pub roadmap_id: i64,
    pub order_number: Option<i32>,
}

/// Field-wise optional update; absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSectionRequest {
    pub subject_id: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub roadmap_id: Option<i64>,
    pub order_number: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::Exam;
    use crate::models::quiz::Quiz;
    use chrono::Utc;

    fn quiz(id: i64) -> Quiz {
        Quiz {
            id,
            section_id: Some(1),
            order_number: None,
            expiration_time: Utc::now(),
            exercises: Vec::new(),
        }
    }

    #[test]
    fn maps_quiz_ids_in_order() {
        let section = Section {
            id: 1,
            subject_id: None,
            title: "Basics".to_string(),
            description: "Intro".to_string(),
            roadmap_id: 5,
            order_number: Some(1),
            quizzes: vec![quiz(10), quiz(11)],
            exam: None,
        };

        let dto = SectionDto::from_section(&section);
        assert_eq!(dto.id, 1);
        assert_eq!(dto.quiz_ids, vec![10, 11]);
        assert_eq!(dto.exam_id, None);

        // Input untouched.
        assert_eq!(section.quizzes.len(), 2);
        assert_eq!(section.title, "Basics");
    }

    #[test]
    fn maps_empty_quizzes_and_attached_exam() {
        let section = Section {
            id: 2,
            subject_id: Some(4),
            title: "Advanced".to_string(),
            description: "More".to_string(),
            roadmap_id: 5,
            order_number: None,
            quizzes: Vec::new(),
            exam: Some(Exam {
                id: 99,
                section_id: Some(2),
                exercises: Vec::new(),
            }),
        };

        let dto = SectionDto::from_section(&section);
        assert_eq!(dto.id, 2);
        assert!(dto.quiz_ids.is_empty());
        assert_eq!(dto.exam_id, Some(99));
    }

    #[test]
    fn quiz_ids_serialize_as_empty_array() {
        let section = Section {
            id: 3,
            subject_id: None,
            title: "t".to_string(),
            description: "d".to_string(),
            roadmap_id: 1,
            order_number: None,
            quizzes: Vec::new(),
            exam: None,
        };

        let value = serde_json::to_value(SectionDto::from_section(&section)).unwrap();
        assert_eq!(value["QuizIds"], serde_json::json!([]));
        assert_eq!(value["ExamId"], serde_json::Value::Null);
    }
}
