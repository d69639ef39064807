//! Exam Core Library
//!
//! Composes certification exams from a question bank and proposes ranked
//! alternative questions, under picture, exam-group and requirement
//! uniqueness rules that are relaxed automatically when the bank is tight.
//!
//! The engine is synchronous and stateless: every call takes a read-only
//! snapshot of the bank plus a [`DrawSource`] and returns a fresh result.

pub mod alternatives;
pub mod compose;
pub mod config;
pub mod domain;
pub mod draw;
pub mod metrics;
pub mod obs;
pub mod pool;
pub mod practice;
pub mod scoring;
pub mod sheet;
pub mod similarity;
pub mod telemetry;

pub use domain::{
    Certificate, Exam, ExamEntry, ExamError, Language, PictureId, Question, QuestionId,
    RequirementId, Result, Topic, TopicId, DEFAULT_CERTIFICATE,
};

pub use alternatives::{
    alternatives_for, find_alternatives, rank_alternatives, relax_alternatives,
    surviving_alternatives,
};
pub use compose::{
    compose_exam, compose_topic, compose_with_plan, draw_topic, CompositionPlan, DrawAttempt,
    QuestionScope,
};
pub use config::{EngineConfig, ScoringThresholds, DEFAULT_ALTERNATIVES_FLOOR};
pub use draw::DrawSource;
pub use pool::{eligible, find_topic, index_by_id, is_eligible};
pub use practice::{compose_practice, practice_question};
pub use scoring::{ExamAnswer, ExamScores, PassCriteria, QuestionStats};
pub use sheet::{exam_of, exam_question_id, ExamQuestion, ExamSheet, ID_STRIDE};
pub use similarity::{is_similar, without_similar, SimilarityRule, Strictness};

pub use metrics::METRICS;
pub use obs::{
    emit_alternatives_found, emit_exam_composed, emit_topic_composed, emit_topic_exhausted,
    emit_topic_relaxed, CompositionSpan,
};
pub use telemetry::init_tracing;

/// Exam core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
