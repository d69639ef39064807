//! Exam sheets: a composed selection with stable numbering.
//!
//! Each slot gets a 0-based `question_index` (its position on the printed
//! exam) and an exam-question id of `exam_id * 1000 + question_index`. The
//! question's answer key is snapshotted when the slot is filled so later
//! edits to the bank do not change how a finished exam is marked.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ExamEntry, ExamError, Question, QuestionId, Result, TopicId};

/// Exam-question ids are `exam_id * ID_STRIDE + question_index`.
pub const ID_STRIDE: u32 = 1000;

/// One numbered slot on an exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamQuestion {
    pub id: u32,
    pub exam_id: u32,
    pub question_id: QuestionId,
    pub topic_id: TopicId,
    pub question_index: usize,
    pub answer_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSheet {
    pub exam_id: u32,
    pub questions: Vec<ExamQuestion>,
}

impl ExamSheet {
    /// Number a composed selection for `exam_id`, keeping its order.
    ///
    /// Fails with `SheetOverflow` when a slot id would spill into the next
    /// exam's range or past `u32::MAX`.
    pub fn from_selection(exam_id: u32, entries: &[ExamEntry<'_>]) -> Result<Self> {
        let overflow = || ExamError::SheetOverflow {
            exam: exam_id,
            slots: entries.len(),
        };
        if entries.len() > ID_STRIDE as usize {
            return Err(overflow());
        }

        let questions = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<ExamQuestion> {
                let id = exam_question_id(exam_id, index).ok_or_else(overflow)?;
                Ok(ExamQuestion {
                    id,
                    exam_id,
                    question_id: entry.question.id,
                    topic_id: entry.topic.id,
                    question_index: index,
                    answer_key: entry.question.answer.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { exam_id, questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Slots filed under `topic`, in exam order.
    pub fn in_topic(&self, topic: TopicId) -> impl Iterator<Item = &ExamQuestion> {
        self.questions.iter().filter(move |eq| eq.topic_id == topic)
    }

    /// The `number`-th (1-based) slot of `topic`.
    pub fn get(&self, topic: TopicId, number: usize) -> Result<&ExamQuestion> {
        number
            .checked_sub(1)
            .and_then(|n| self.in_topic(topic).nth(n))
            .ok_or(ExamError::UnknownExamQuestion {
                exam: self.exam_id,
                topic,
                number,
            })
    }

    pub fn find(&self, exam_question_id: u32) -> Result<&ExamQuestion> {
        self.questions
            .iter()
            .find(|eq| eq.id == exam_question_id)
            .ok_or(ExamError::UnknownExamQuestionId(exam_question_id))
    }

    /// Questions currently placed under `topic`, resolved against `index`.
    pub fn placed_in_topic<'p>(
        &self,
        topic: TopicId,
        index: &HashMap<QuestionId, &'p Question>,
    ) -> Result<Vec<&'p Question>> {
        self.in_topic(topic)
            .map(|eq| {
                index
                    .get(&eq.question_id)
                    .copied()
                    .ok_or(ExamError::UnknownQuestion(eq.question_id))
            })
            .collect()
    }

    /// Put `question` into an existing slot.
    ///
    /// The slot keeps its id, index and topic; its answer key follows the new
    /// question. The question must belong to the slot's topic.
    pub fn replace(&mut self, exam_question_id: u32, question: &Question) -> Result<()> {
        let slot = self
            .questions
            .iter_mut()
            .find(|eq| eq.id == exam_question_id)
            .ok_or(ExamError::UnknownExamQuestionId(exam_question_id))?;

        if question.topic != slot.topic_id {
            return Err(ExamError::TopicMismatch {
                question: question.id,
                topic: slot.topic_id,
            });
        }

        slot.question_id = question.id;
        slot.answer_key = question.answer.clone();
        Ok(())
    }
}

/// `None` when `question_index` is outside the stride or the id overflows.
pub fn exam_question_id(exam_id: u32, question_index: usize) -> Option<u32> {
    let index = u32::try_from(question_index).ok().filter(|&i| i < ID_STRIDE)?;
    exam_id.checked_mul(ID_STRIDE)?.checked_add(index)
}

/// The exam an exam-question id belongs to.
pub fn exam_of(exam_question_id: u32) -> u32 {
    exam_question_id / ID_STRIDE
}
