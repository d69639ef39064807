//! Question pool filter.
//!
//! Narrows the full bank down to the questions that may appear on an exam
//! for a given topic, language and certificate. Pure function of its inputs.

use std::collections::HashMap;

use crate::domain::{Certificate, ExamError, Language, Question, QuestionId, Result, Topic, TopicId};

/// Whether `question` may be filed under `topic` on an exam in `language`
/// for `certificate`.
pub fn is_eligible(
    question: &Question,
    language: Language,
    certificate: Certificate,
    topic: &Topic,
) -> bool {
    !question.ignore
        && question.topic == topic.id
        && question.language == language
        && question.allows_certificate(certificate.level())
}

/// Eligible candidates for `topic`, in pool order.
pub fn eligible<'a>(
    pool: &'a [Question],
    language: Language,
    certificate: Certificate,
    topic: &Topic,
) -> Vec<&'a Question> {
    pool.iter()
        .filter(|q| is_eligible(q, language, certificate, topic))
        .collect()
}

/// Lookup table from question id to question.
pub fn index_by_id(pool: &[Question]) -> HashMap<QuestionId, &Question> {
    pool.iter().map(|q| (q.id, q)).collect()
}

/// Find a topic by id.
pub fn find_topic(topics: &[Topic], id: TopicId) -> Result<&Topic> {
    topics
        .iter()
        .find(|t| t.id == id)
        .ok_or(ExamError::UnknownTopic(id))
}
