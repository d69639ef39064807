//! Exams and the selections composed for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::{Certificate, Language, Question};
use super::topic::Topic;

/// Composition parameters of one exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: u32,
    pub label: String,
    pub certificate: Certificate,
    pub language: Language,
    pub created_at: DateTime<Utc>,
}

impl Exam {
    pub fn new(id: u32, label: impl Into<String>, certificate: Certificate, language: Language) -> Self {
        Self {
            id,
            label: label.into(),
            certificate,
            language,
            created_at: Utc::now(),
        }
    }
}

/// One slot of a composed selection.
///
/// A selection is grouped by topic in ascending topic order; within a topic
/// entries keep the random draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExamEntry<'a> {
    pub topic: &'a Topic,
    pub question: &'a Question,
}
