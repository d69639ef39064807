//! Practice exams.
//!
//! Practice questions are the bank questions with an even id; the odd ones
//! are kept back for real exams. A practice exam is a single-topic
//! composition at the default certificate.

use crate::compose::{compose_with_plan, CompositionPlan};
use crate::domain::{
    ExamEntry, ExamError, Language, Question, QuestionId, Result, Topic, TopicId,
    DEFAULT_CERTIFICATE,
};
use crate::draw::DrawSource;
use crate::pool;
use crate::similarity::Strictness;

/// Look up a question that may be shown for practice.
pub fn practice_question(pool: &[Question], id: QuestionId) -> Result<&Question> {
    let question = pool
        .iter()
        .find(|q| q.id == id)
        .ok_or(ExamError::UnknownQuestion(id))?;
    if !question.is_practice() {
        return Err(ExamError::NotPracticeQuestion(id));
    }
    Ok(question)
}

/// Compose `count` practice questions from `topic`, starting at
/// `max_strictness` like any other composition.
pub fn compose_practice<'a, D>(
    topics: &'a [Topic],
    pool: &'a [Question],
    topic: TopicId,
    count: usize,
    language: Language,
    max_strictness: Strictness,
    draws: &mut D,
) -> Result<Vec<ExamEntry<'a>>>
where
    D: DrawSource + ?Sized,
{
    pool::find_topic(topics, topic)?;
    compose_with_plan(
        topics,
        pool,
        DEFAULT_CERTIFICATE,
        language,
        &CompositionPlan::practice(topic, count),
        max_strictness,
        draws,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank() -> (Vec<Topic>, Vec<Question>) {
        let topics = vec![Topic::new(1, "weather", 10), Topic::new(2, "rules", 10)];
        let pool = (1..=20)
            .map(|id| Question::new(id, 1 + id % 2, id, Language::En))
            .collect();
        (topics, pool)
    }

    #[test]
    fn test_practice_question_accepts_even_ids() {
        let (_, pool) = bank();
        assert_eq!(practice_question(&pool, 4).unwrap().id, 4);
    }

    #[test]
    fn test_practice_question_rejects_odd_and_unknown() {
        let (_, pool) = bank();
        assert!(matches!(
            practice_question(&pool, 5),
            Err(ExamError::NotPracticeQuestion(5))
        ));
        assert!(matches!(
            practice_question(&pool, 99),
            Err(ExamError::UnknownQuestion(99))
        ));
    }

    #[test]
    fn test_compose_practice_stays_in_topic() {
        let (topics, pool) = bank();
        let mut rng = StdRng::seed_from_u64(3);

        // Even ids live in topic 1.
        let entries = compose_practice(&topics, &pool, 1, 4, Language::En, Strictness::MAX, &mut rng).unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.topic.id == 1 && e.question.is_practice()));
    }

    #[test]
    fn test_compose_practice_unknown_topic() {
        let (topics, pool) = bank();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            compose_practice(&topics, &pool, 9, 1, Language::En, Strictness::MAX, &mut rng),
            Err(ExamError::UnknownTopic(9))
        ));
    }

    #[test]
    fn test_compose_practice_without_practice_questions_fails() {
        let (topics, pool) = bank();
        let mut rng = StdRng::seed_from_u64(3);
        // Topic 2 only holds odd ids.
        assert!(matches!(
            compose_practice(&topics, &pool, 2, 1, Language::En, Strictness::MAX, &mut rng),
            Err(ExamError::InsufficientQuestions { topic: 2, .. })
        ));
    }

    struct FirstPick;

    impl DrawSource for FirstPick {
        fn draw_index(&mut self, _len: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_compose_practice_honours_max_strictness() {
        let topics = vec![Topic::new(1, "weather", 2)];
        let pool = vec![
            Question::new(2, 1, 7, Language::En),
            Question::new(4, 1, 7, Language::En),
            Question::new(6, 1, 8, Language::En),
        ];
        let drawn = |strictness| -> Vec<QuestionId> {
            compose_practice(&topics, &pool, 1, 2, Language::En, strictness, &mut FirstPick)
                .unwrap()
                .iter()
                .map(|e| e.question.id)
                .collect()
        };

        assert_eq!(drawn(Strictness::MAX), vec![2, 6]);
        assert_eq!(drawn(Strictness::EXAM_GROUP), vec![2, 4]);
    }
}
