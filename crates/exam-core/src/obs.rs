//! Structured observability hooks for composition lifecycle events.
//!
//! This module provides:
//! - A composition-scoped tracing span via the `CompositionSpan` RAII guard
//! - Emission functions for topic composition, relaxation, exhaustion,
//!   finished exams and alternative lookups
//!
//! Events go out at `info!`, except relaxation steps (`debug!`) and
//! exhausted topics (`warn!`).

use tracing::{debug, info, warn};

use crate::domain::{Certificate, Language, TopicId};
use crate::similarity::Strictness;

/// RAII guard that tags every event of one composition call.
///
/// ```ignore
/// let _span = CompositionSpan::enter("2026-spring", Certificate::B3, Language::En);
/// ```
pub struct CompositionSpan {
    _span: tracing::span::EnteredSpan,
}

impl CompositionSpan {
    pub fn enter(label: &str, certificate: Certificate, language: Language) -> Self {
        let span = tracing::info_span!(
            "exam.compose",
            label = %label,
            certificate = %certificate,
            language = %language,
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: one topic filled at the given strictness.
pub fn emit_topic_composed(topic: TopicId, drawn: usize, candidates: usize, strictness: Strictness) {
    info!(
        event = "topic.composed",
        topic = topic,
        drawn = drawn,
        candidates = candidates,
        strictness = strictness.level(),
    );
}

/// Emit event: a draw attempt ran dry and the topic is retried one level lower.
pub fn emit_topic_relaxed(topic: TopicId, from: Strictness, to: Strictness, drawn: usize) {
    debug!(
        event = "topic.relaxed",
        topic = topic,
        from = from.level(),
        to = to.level(),
        drawn_before_exhaustion = drawn,
    );
}

/// Emit event: no strictness level could fill the topic (warning level).
pub fn emit_topic_exhausted(topic: TopicId, certificate: Certificate, target: usize, candidates: usize) {
    warn!(
        event = "topic.exhausted",
        topic = topic,
        certificate = %certificate,
        target = target,
        candidates = candidates,
    );
}

/// Emit event: a full selection was composed.
pub fn emit_exam_composed(topics: usize, questions: usize) {
    info!(event = "exam.composed", topics = topics, questions = questions);
}

/// Emit event: alternatives ranked for a placed question.
pub fn emit_alternatives_found(question: u32, alternatives: usize, strictness: Strictness) {
    info!(
        event = "alternatives.found",
        question = question,
        alternatives = alternatives,
        strictness = strictness.level(),
    );
}
