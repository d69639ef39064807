//! Domain-level error taxonomy for the exam engine.

use super::{Certificate, QuestionId, TopicId};

/// Exam engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ExamError {
    /// Even the most relaxed strictness level could not fill the topic.
    #[error("not enough questions for topic {topic}, certificate {certificate}")]
    InsufficientQuestions {
        topic: TopicId,
        certificate: Certificate,
    },

    #[error("invalid certificate level: {0} (expected 2 or 3)")]
    InvalidCertificate(u8),

    #[error("invalid strictness level: {0} (expected 0..=3)")]
    InvalidStrictness(u8),

    #[error("invalid language: {0}")]
    InvalidLanguage(String),

    #[error("topic not found: {0}")]
    UnknownTopic(TopicId),

    #[error("question not found: {0}")]
    UnknownQuestion(QuestionId),

    #[error("question is not a practice question: {0}")]
    NotPracticeQuestion(QuestionId),

    #[error("no exam question {number} for topic {topic} in exam {exam}")]
    UnknownExamQuestion {
        exam: u32,
        topic: TopicId,
        number: usize,
    },

    #[error("exam question not found: {0}")]
    UnknownExamQuestionId(u32),

    /// The exam id or the number of slots does not fit the exam-question
    /// numbering scheme.
    #[error("exam {exam} cannot number {slots} questions")]
    SheetOverflow { exam: u32, slots: usize },

    #[error("question {question} does not belong to topic {topic}")]
    TopicMismatch { question: QuestionId, topic: TopicId },

    #[error("invalid exam answer: {0}")]
    InvalidAnswer(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for exam engine operations.
pub type Result<T> = std::result::Result<T, ExamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_questions_names_topic_and_certificate() {
        let err = ExamError::InsufficientQuestions {
            topic: 7,
            certificate: Certificate::B3,
        };
        let msg = err.to_string();
        assert!(msg.contains("topic 7"));
        assert!(msg.contains("B3"));
    }

    #[test]
    fn test_invalid_certificate_display() {
        let err = ExamError::InvalidCertificate(4);
        assert!(err.to_string().contains("invalid certificate level: 4"));
    }

    #[test]
    fn test_unknown_exam_question_display() {
        let err = ExamError::UnknownExamQuestion {
            exam: 12,
            topic: 3,
            number: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("exam 12"));
        assert!(msg.contains("topic 3"));
        assert!(msg.contains("question 9"));
    }
}
