//! Error types for exam-state

use exam_core::ExamError;
use thiserror::Error;

/// Errors raised by question bank and exam ledger backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No exam with this id is stored
    #[error("Exam not found: {exam_id}")]
    NotFound { exam_id: u32 },

    /// An exam with this id already exists
    #[error("Exam already exists: {exam_id}")]
    Conflict { exam_id: u32 },

    /// A record that contradicts itself, e.g. a sheet filed under another exam
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Domain rule rejected the change
    #[error(transparent)]
    Exam(#[from] ExamError),

    /// Reading or writing the backing file failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding a snapshot failed
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
