//! Storage trait definitions for the exam engine
//!
//! These traits define the two collaborators around the engine:
//! - `QuestionBank`: read-only snapshot of questions and topics
//! - `ExamLedger`: composed exams, their numbered sheets and recorded answers
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module; `json_store` persists to a file.

use async_trait::async_trait;
use exam_core::{Exam, ExamAnswer, ExamQuestion, ExamSheet, Question, Topic};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// QuestionBank
// ---------------------------------------------------------------------------

/// Source of the question pool and topic list.
///
/// Guarantees:
/// - Each call returns an owned snapshot; later writes never change it.
/// - `topics()` is ordered by ascending topic id.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Every question in the bank, ignored ones included.
    async fn questions(&self) -> StorageResult<Vec<Question>>;

    /// Every topic, ascending by id.
    async fn topics(&self) -> StorageResult<Vec<Topic>>;
}

// ---------------------------------------------------------------------------
// ExamLedger
// ---------------------------------------------------------------------------

/// Persistence of composed exams.
///
/// Guarantees:
/// - `next_exam_id` never hands out an id twice, deleted exams included.
/// - A sheet is stored exactly as numbered by `ExamSheet::from_selection`;
///   only `set_question` changes it afterwards.
/// - Deleting an exam removes its sheet and its recorded answers.
#[async_trait]
pub trait ExamLedger: Send + Sync {
    /// Reserve the id for the next exam.
    async fn next_exam_id(&self) -> StorageResult<u32>;

    /// Store a new exam with its sheet. Fails with `Conflict` if the id is taken.
    async fn save_exam(&self, exam: Exam, sheet: ExamSheet) -> StorageResult<()>;

    /// Retrieve exam parameters. Returns `StorageError::NotFound` if absent.
    async fn exam(&self, exam_id: u32) -> StorageResult<Exam>;

    /// Retrieve the numbered sheet of an exam.
    async fn sheet(&self, exam_id: u32) -> StorageResult<ExamSheet>;

    /// All stored exams, ascending by id.
    async fn list_exams(&self) -> StorageResult<Vec<Exam>>;

    /// Put `question` into slot `exam_question_id`, returning the updated slot.
    async fn set_question(
        &self,
        exam_question_id: u32,
        question: &Question,
    ) -> StorageResult<ExamQuestion>;

    /// Remove an exam, its sheet and its answers.
    async fn delete_exam(&self, exam_id: u32) -> StorageResult<()>;

    /// Record answers. Every answer must be valid and refer to a stored exam.
    async fn record_answers(&self, answers: Vec<ExamAnswer>) -> StorageResult<()>;

    /// Answers recorded for one exam, in recording order.
    async fn answers_for_exam(&self, exam_id: u32) -> StorageResult<Vec<ExamAnswer>>;
}
