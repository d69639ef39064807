//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryExamStore`, which satisfies both the `QuestionBank` and
//! the `ExamLedger` contracts without touching the filesystem.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use exam_core::{Exam, ExamAnswer, ExamQuestion, ExamSheet, Question, Topic};

use crate::error::StorageError;
use crate::snapshot::BankSnapshot;
use crate::storage_traits::*;

/// In-memory bank and ledger backed by a single `BankSnapshot`.
#[derive(Debug, Default)]
pub struct MemoryExamStore {
    state: Mutex<BankSnapshot>,
}

impl MemoryExamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a bank of topics and questions with no exams.
    pub fn with_bank(topics: Vec<Topic>, questions: Vec<Question>) -> Self {
        Self::from_snapshot(BankSnapshot::new(topics, questions))
    }

    pub fn from_snapshot(snapshot: BankSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StorageResult<BankSnapshot> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, BankSnapshot>> {
        self.state
            .lock()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl QuestionBank for MemoryExamStore {
    async fn questions(&self) -> StorageResult<Vec<Question>> {
        Ok(self.lock()?.questions.clone())
    }

    async fn topics(&self) -> StorageResult<Vec<Topic>> {
        Ok(self.lock()?.sorted_topics())
    }
}

#[async_trait]
impl ExamLedger for MemoryExamStore {
    async fn next_exam_id(&self) -> StorageResult<u32> {
        Ok(self.lock()?.next_exam_id())
    }

    async fn save_exam(&self, exam: Exam, sheet: ExamSheet) -> StorageResult<()> {
        self.lock()?.save_exam(exam, sheet)
    }

    async fn exam(&self, exam_id: u32) -> StorageResult<Exam> {
        Ok(self.lock()?.record(exam_id)?.exam.clone())
    }

    async fn sheet(&self, exam_id: u32) -> StorageResult<ExamSheet> {
        Ok(self.lock()?.record(exam_id)?.sheet.clone())
    }

    async fn list_exams(&self) -> StorageResult<Vec<Exam>> {
        Ok(self.lock()?.list_exams())
    }

    async fn set_question(
        &self,
        exam_question_id: u32,
        question: &Question,
    ) -> StorageResult<ExamQuestion> {
        self.lock()?.set_question(exam_question_id, question)
    }

    async fn delete_exam(&self, exam_id: u32) -> StorageResult<()> {
        self.lock()?.delete_exam(exam_id)
    }

    async fn record_answers(&self, answers: Vec<ExamAnswer>) -> StorageResult<()> {
        self.lock()?.record_answers(answers)
    }

    async fn answers_for_exam(&self, exam_id: u32) -> StorageResult<Vec<ExamAnswer>> {
        self.lock()?.answers_for_exam(exam_id)
    }
}
