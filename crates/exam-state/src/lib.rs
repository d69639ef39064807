//! Exam-State: storage collaborators for exam-core
//!
//! The engine in `exam-core` is pure; this crate supplies the question pool
//! it draws from and keeps the exams it composes.
//!
//! ## Key Components
//!
//! - `QuestionBank`: snapshot of questions and topics
//! - `ExamLedger`: exams, numbered sheets and recorded answers
//! - `MemoryExamStore`: in-memory implementation of both, for tests
//! - `JsonBankStore`: both, persisted to a single JSON file

mod error;
pub mod fakes;
pub mod json_store;
pub mod snapshot;
pub mod storage_traits;

pub use error::StorageError;
pub use fakes::MemoryExamStore;
pub use json_store::JsonBankStore;
pub use snapshot::{BankSnapshot, ExamRecord};
pub use storage_traits::{ExamLedger, QuestionBank, StorageResult};
