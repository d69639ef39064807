//! Topic and exam composition.
//!
//! A topic is filled by drawing questions at random from its eligible
//! candidates. After every draw the remaining candidates are reduced by the
//! similarity rules of the current [`Strictness`]. When the candidates run
//! out before the topic is full, the partial draw is thrown away and the
//! whole topic is drawn again from scratch one strictness level lower. Only
//! when level 0 also runs dry does composition fail.
//!
//! An exam is the concatenation of its topics in ascending topic id order.
//! The first topic that cannot be filled aborts the whole exam.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Certificate, ExamEntry, ExamError, Language, Question, Result, Topic, TopicId,
};
use crate::draw::DrawSource;
use crate::metrics::METRICS;
use crate::obs;
use crate::pool;
use crate::similarity::{reduce_similar, Strictness};

/// Outcome of one draw sequence at a fixed strictness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawAttempt<'a> {
    /// All `target` questions were drawn, in draw order.
    Complete(Vec<&'a Question>),
    /// Candidates ran out after `drawn` questions; retry with fewer rules.
    Exhausted { drawn: usize },
}

/// Draw `target` questions from a private copy of `candidates`.
pub fn draw_topic<'a, D>(
    candidates: &[&'a Question],
    target: usize,
    strictness: Strictness,
    draws: &mut D,
) -> DrawAttempt<'a>
where
    D: DrawSource + ?Sized,
{
    let mut remaining = candidates.to_vec();
    let mut picked = Vec::with_capacity(target);

    for _ in 0..target {
        if remaining.is_empty() {
            return DrawAttempt::Exhausted {
                drawn: picked.len(),
            };
        }
        let chosen = remaining.remove(draws.draw_index(remaining.len()));
        reduce_similar(chosen, &mut remaining, strictness);
        picked.push(chosen);
    }

    DrawAttempt::Complete(picked)
}

/// Fill one topic with exactly `target` questions.
///
/// Starts at `max_strictness` and relaxes one level per failed attempt.
/// Returns the strictness that succeeded along with the draw.
pub fn compose_topic<'a, D>(
    topic: &Topic,
    candidates: &[&'a Question],
    target: usize,
    certificate: Certificate,
    max_strictness: Strictness,
    draws: &mut D,
) -> Result<(Vec<&'a Question>, Strictness)>
where
    D: DrawSource + ?Sized,
{
    let mut strictness = max_strictness;
    loop {
        match draw_topic(candidates, target, strictness, draws) {
            DrawAttempt::Complete(picked) => {
                obs::emit_topic_composed(topic.id, picked.len(), candidates.len(), strictness);
                return Ok((picked, strictness));
            }
            DrawAttempt::Exhausted { drawn } => match strictness.relaxed() {
                Some(lower) => {
                    METRICS.inc_relaxations();
                    obs::emit_topic_relaxed(topic.id, strictness, lower, drawn);
                    strictness = lower;
                }
                None => {
                    METRICS.inc_exhausted_topics();
                    obs::emit_topic_exhausted(topic.id, certificate, target, candidates.len());
                    return Err(ExamError::InsufficientQuestions {
                        topic: topic.id,
                        certificate,
                    });
                }
            },
        }
    }
}

/// Which questions of a topic's eligible pool may be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionScope {
    #[default]
    All,
    /// Only practice questions (even ids).
    Practice,
}

impl QuestionScope {
    fn admits(self, question: &Question) -> bool {
        match self {
            QuestionScope::All => true,
            QuestionScope::Practice => question.is_practice(),
        }
    }
}

/// Knobs narrowing a composition: which topics, which questions, how many.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionPlan {
    /// Compose only this topic; all topics when `None`.
    pub topic: Option<TopicId>,
    pub questions: QuestionScope,
    /// Questions per topic; each topic's `target_count` when `None`.
    pub count: Option<usize>,
}

impl CompositionPlan {
    /// Every topic, every eligible question, each topic's own target count.
    pub fn full_exam() -> Self {
        Self::default()
    }

    /// `count` practice questions from a single topic.
    pub fn practice(topic: TopicId, count: usize) -> Self {
        Self {
            topic: Some(topic),
            questions: QuestionScope::Practice,
            count: Some(count),
        }
    }

    fn includes(&self, topic: &Topic) -> bool {
        self.topic.map_or(true, |only| only == topic.id)
    }

    fn target_for(&self, topic: &Topic) -> usize {
        self.count.unwrap_or(topic.target_count)
    }
}

/// Compose a selection according to `plan`.
///
/// Topics are processed in ascending id order regardless of the order of
/// `topics`. Neither `topics` nor `pool` is modified.
pub fn compose_with_plan<'a, D>(
    topics: &'a [Topic],
    pool: &'a [Question],
    certificate: Certificate,
    language: Language,
    plan: &CompositionPlan,
    max_strictness: Strictness,
    draws: &mut D,
) -> Result<Vec<ExamEntry<'a>>>
where
    D: DrawSource + ?Sized,
{
    let mut ordered: Vec<&Topic> = topics.iter().filter(|t| plan.includes(t)).collect();
    ordered.sort_by_key(|t| t.id);

    let mut entries = Vec::new();
    for topic in ordered.iter().copied() {
        let candidates: Vec<&Question> = pool::eligible(pool, language, certificate, topic)
            .into_iter()
            .filter(|q| plan.questions.admits(q))
            .collect();

        let (picked, _) = compose_topic(
            topic,
            &candidates,
            plan.target_for(topic),
            certificate,
            max_strictness,
            draws,
        )?;
        entries.extend(picked.into_iter().map(|question| ExamEntry { topic, question }));
    }

    METRICS.inc_exams_composed();
    obs::emit_exam_composed(ordered.len(), entries.len());
    Ok(entries)
}

/// Compose a full exam: every topic, each with its own target count,
/// starting at the strictest level.
pub fn compose_exam<'a, D>(
    topics: &'a [Topic],
    pool: &'a [Question],
    certificate: Certificate,
    language: Language,
    draws: &mut D,
) -> Result<Vec<ExamEntry<'a>>>
where
    D: DrawSource + ?Sized,
{
    compose_with_plan(
        topics,
        pool,
        certificate,
        language,
        &CompositionPlan::full_exam(),
        Strictness::MAX,
        draws,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always draws the first remaining candidate.
    struct FirstPick;

    impl DrawSource for FirstPick {
        fn draw_index(&mut self, _len: usize) -> usize {
            0
        }
    }

    fn topic(id: u32, target: usize) -> Topic {
        Topic::new(id, format!("topic-{id}"), target)
    }

    fn ids(questions: &[&Question]) -> Vec<u32> {
        questions.iter().map(|q| q.id).collect()
    }

    #[test]
    fn test_draw_topic_reduces_after_each_pick() {
        let pool = [
            Question::new(1, 1, 10, Language::En),
            Question::new(2, 1, 10, Language::En),
            Question::new(3, 1, 11, Language::En),
        ];
        let candidates: Vec<&Question> = pool.iter().collect();

        match draw_topic(&candidates, 2, Strictness::MAX, &mut FirstPick) {
            DrawAttempt::Complete(picked) => assert_eq!(ids(&picked), vec![1, 3]),
            other => panic!("expected complete draw, got {other:?}"),
        }
    }

    #[test]
    fn test_draw_topic_reports_exhaustion() {
        let pool = [
            Question::new(1, 1, 10, Language::En),
            Question::new(2, 1, 10, Language::En),
        ];
        let candidates: Vec<&Question> = pool.iter().collect();

        assert_eq!(
            draw_topic(&candidates, 2, Strictness::MAX, &mut FirstPick),
            DrawAttempt::Exhausted { drawn: 1 }
        );
    }

    #[test]
    fn test_draw_topic_zero_target_is_complete() {
        assert_eq!(
            draw_topic(&[], 0, Strictness::MAX, &mut FirstPick),
            DrawAttempt::Complete(vec![])
        );
    }

    #[test]
    fn test_compose_topic_relaxes_until_feasible() {
        let pool = [
            Question::new(1, 1, 10, Language::En).with_exam_group("g"),
            Question::new(2, 1, 10, Language::En).with_exam_group("g"),
        ];
        let candidates: Vec<&Question> = pool.iter().collect();

        let (picked, strictness) = compose_topic(
            &topic(1, 2),
            &candidates,
            2,
            Certificate::B2,
            Strictness::MAX,
            &mut FirstPick,
        )
        .unwrap();
        assert_eq!(ids(&picked), vec![1, 2]);
        assert_eq!(strictness, Strictness::PICTURE);
    }

    #[test]
    fn test_compose_topic_tries_level_zero() {
        let pool = [
            Question::new(1, 1, 10, Language::En).with_picture(4),
            Question::new(2, 1, 10, Language::En).with_picture(4),
        ];
        let candidates: Vec<&Question> = pool.iter().collect();

        let (_, strictness) = compose_topic(
            &topic(1, 2),
            &candidates,
            2,
            Certificate::B2,
            Strictness::MAX,
            &mut FirstPick,
        )
        .unwrap();
        assert_eq!(strictness, Strictness::NONE);
    }

    #[test]
    fn test_compose_topic_insufficient() {
        let pool = [Question::new(1, 1, 10, Language::En)];
        let candidates: Vec<&Question> = pool.iter().collect();

        let err = compose_topic(
            &topic(4, 2),
            &candidates,
            2,
            Certificate::B3,
            Strictness::MAX,
            &mut FirstPick,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExamError::InsufficientQuestions {
                topic: 4,
                certificate: Certificate::B3
            }
        ));
    }

    #[test]
    fn test_compose_exam_orders_topics_by_id() {
        let topics = vec![topic(2, 1), topic(1, 1)];
        let pool = vec![
            Question::new(20, 2, 1, Language::En),
            Question::new(10, 1, 2, Language::En),
        ];

        let entries = compose_exam(&topics, &pool, Certificate::B2, Language::En, &mut FirstPick)
            .unwrap();
        let pairs: Vec<(u32, u32)> = entries.iter().map(|e| (e.topic.id, e.question.id)).collect();
        assert_eq!(pairs, vec![(1, 10), (2, 20)]);
    }

    #[test]
    fn test_practice_plan_draws_even_ids_from_one_topic() {
        let topics = vec![topic(1, 5), topic(2, 5)];
        let pool: Vec<Question> = (1..=6)
            .map(|id| Question::new(id, 1, id, Language::En))
            .chain((7..=12).map(|id| Question::new(id, 2, id, Language::En)))
            .collect();

        let entries = compose_with_plan(
            &topics,
            &pool,
            Certificate::B2,
            Language::En,
            &CompositionPlan::practice(1, 3),
            Strictness::MAX,
            &mut FirstPick,
        )
        .unwrap();
        let picked: Vec<u32> = entries.iter().map(|e| e.question.id).collect();
        assert_eq!(picked, vec![2, 4, 6]);
        assert!(entries.iter().all(|e| e.topic.id == 1));
    }
}
