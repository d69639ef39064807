//! Domain models for the exam engine.
//!
//! Canonical definitions for the core entities:
//! - `Question`: A single bank question with its eligibility flags
//! - `Topic`: A syllabus topic with the number of questions an exam needs
//! - `Exam`: Composition parameters of one exam (certificate, language)
//! - `ExamEntry`: One `(topic, question)` slot of a composed selection

pub mod error;
pub mod exam;
pub mod question;
pub mod topic;

// Re-export main types and errors
pub use error::{ExamError, Result};
pub use exam::{Exam, ExamEntry};
pub use question::{
    Certificate, Language, PictureId, Question, QuestionId, RequirementId, DEFAULT_CERTIFICATE,
};
pub use topic::{Topic, TopicId};
