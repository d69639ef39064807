//! Whole-bank snapshot shared by the in-memory and file backends.
//!
//! Every ledger operation is a synchronous method here; backends only add
//! locking and, for the file store, persistence.

use exam_core::{Exam, ExamAnswer, ExamQuestion, ExamSheet, Question, Topic};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage_traits::StorageResult;

/// An exam together with its numbered sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub exam: Exam,
    pub sheet: ExamSheet,
}

/// Everything one bank file holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankSnapshot {
    pub topics: Vec<Topic>,
    pub questions: Vec<Question>,
    pub exams: Vec<ExamRecord>,
    pub answers: Vec<ExamAnswer>,
    /// Last exam id handed out; 0 when none was.
    pub last_exam_id: u32,
}

impl BankSnapshot {
    pub fn new(topics: Vec<Topic>, questions: Vec<Question>) -> Self {
        Self {
            topics,
            questions,
            ..Self::default()
        }
    }

    pub fn sorted_topics(&self) -> Vec<Topic> {
        let mut topics = self.topics.clone();
        topics.sort_by_key(|t| t.id);
        topics
    }

    pub fn next_exam_id(&mut self) -> u32 {
        let highest = self.exams.iter().map(|r| r.exam.id).max().unwrap_or(0);
        self.last_exam_id = self.last_exam_id.max(highest) + 1;
        self.last_exam_id
    }

    pub fn save_exam(&mut self, exam: Exam, sheet: ExamSheet) -> StorageResult<()> {
        if sheet.exam_id != exam.id {
            return Err(StorageError::InvalidRecord(format!(
                "sheet of exam {} filed under exam {}",
                sheet.exam_id, exam.id
            )));
        }
        if self.exams.iter().any(|r| r.exam.id == exam.id) {
            return Err(StorageError::Conflict { exam_id: exam.id });
        }
        self.last_exam_id = self.last_exam_id.max(exam.id);
        self.exams.push(ExamRecord { exam, sheet });
        Ok(())
    }

    pub fn record(&self, exam_id: u32) -> StorageResult<&ExamRecord> {
        self.exams
            .iter()
            .find(|r| r.exam.id == exam_id)
            .ok_or(StorageError::NotFound { exam_id })
    }

    pub fn list_exams(&self) -> Vec<Exam> {
        let mut exams: Vec<Exam> = self.exams.iter().map(|r| r.exam.clone()).collect();
        exams.sort_by_key(|e| e.id);
        exams
    }

    pub fn set_question(
        &mut self,
        exam_question_id: u32,
        question: &Question,
    ) -> StorageResult<ExamQuestion> {
        let exam_id = exam_core::exam_of(exam_question_id);
        let record = self
            .exams
            .iter_mut()
            .find(|r| r.exam.id == exam_id)
            .ok_or(StorageError::NotFound { exam_id })?;

        record.sheet.replace(exam_question_id, question)?;
        Ok(record.sheet.find(exam_question_id)?.clone())
    }

    pub fn delete_exam(&mut self, exam_id: u32) -> StorageResult<()> {
        let before = self.exams.len();
        self.exams.retain(|r| r.exam.id != exam_id);
        if self.exams.len() == before {
            return Err(StorageError::NotFound { exam_id });
        }
        self.answers.retain(|a| a.exam != exam_id);
        Ok(())
    }

    pub fn record_answers(&mut self, answers: Vec<ExamAnswer>) -> StorageResult<()> {
        for answer in &answers {
            answer.validate()?;
            self.record(answer.exam)?;
        }
        self.answers.extend(answers);
        Ok(())
    }

    pub fn answers_for_exam(&self, exam_id: u32) -> StorageResult<Vec<ExamAnswer>> {
        self.record(exam_id)?;
        Ok(self
            .answers
            .iter()
            .filter(|a| a.exam == exam_id)
            .cloned()
            .collect())
    }
}
