// src/dto/mod.rs
//
// Flat, serializable projections of the entities plus request payloads.
// Wire field names (PascalCase) are the contract; entities stay the
// source of truth and DTOs are rebuilt per request.

pub mod exam;
pub mod exercise;
pub mod module;
pub mod quiz;
pub mod section;

pub use exam::ExamDto;
pub use exercise::CreateExerciseDto;
pub use module::OpenModuleRequest;
pub use quiz::{AddQuizRequest, AnswerSubmission, QuizModel, QuizResult, QuizSubmission};
pub use section::{AddSectionRequest, SectionDto, UpdateSectionRequest};
