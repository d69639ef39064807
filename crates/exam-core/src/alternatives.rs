//! Alternative questions for a question already placed on an exam.
//!
//! Candidates come from the topic's eligible pool. Every question already
//! placed in that topic reduces the pool by the similarity rules, and the
//! placed questions themselves are removed. Rules are relaxed one level at a
//! time until enough candidates survive (the floor) or level 0 was tried.
//!
//! The ranked result always starts with the placed question itself, followed
//! by every unplaced pool question sharing its requirement, then the
//! survivors with another requirement. The requirement group is read from the
//! unreduced pool because the strictest level removes it from the survivors.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::domain::{Exam, ExamError, Question, QuestionId, Result, Topic};
use crate::obs;
use crate::pool;
use crate::sheet::ExamSheet;
use crate::similarity::{reduce_similar, Strictness};

/// Candidates left after reducing `topic_pool` by every placed question at
/// `strictness` and dropping the placed questions. Keeps pool order.
pub fn surviving_alternatives<'a>(
    placed_in_topic: &[&Question],
    topic_pool: &[&'a Question],
    strictness: Strictness,
) -> Vec<&'a Question> {
    let mut remaining = topic_pool.to_vec();
    for placed in placed_in_topic {
        reduce_similar(placed, &mut remaining, strictness);
    }
    let placed_ids: HashSet<QuestionId> = placed_in_topic.iter().map(|q| q.id).collect();
    remaining.retain(|q| !placed_ids.contains(&q.id));
    remaining
}

/// Relax from `max_strictness` until at least `floor` candidates survive.
///
/// Returns the survivors of the first level reaching the floor, or the
/// level-0 survivors when none does, together with that level.
pub fn relax_alternatives<'a>(
    placed_in_topic: &[&Question],
    topic_pool: &[&'a Question],
    floor: usize,
    max_strictness: Strictness,
) -> (Vec<&'a Question>, Strictness) {
    let mut strictness = max_strictness;
    loop {
        let survivors = surviving_alternatives(placed_in_topic, topic_pool, strictness);
        match strictness.relaxed() {
            Some(lower) if survivors.len() < floor => strictness = lower,
            _ => return (survivors, strictness),
        }
    }
}

/// Order candidates for review: `target` first, then every question of
/// `topic_pool` sharing its requirement that is not in `placed_in_topic`,
/// then the `survivors` with another requirement. Pool order is kept inside
/// each group.
pub fn rank_alternatives<'a>(
    target: &'a Question,
    placed_in_topic: &[&Question],
    topic_pool: &[&'a Question],
    survivors: &[&'a Question],
) -> Vec<&'a Question> {
    let placed_ids: HashSet<QuestionId> = placed_in_topic
        .iter()
        .map(|q| q.id)
        .chain(std::iter::once(target.id))
        .collect();

    let same = topic_pool
        .iter()
        .copied()
        .filter(|q| q.requirement == target.requirement && !placed_ids.contains(&q.id));
    let other = survivors
        .iter()
        .copied()
        .filter(|q| q.requirement != target.requirement && !placed_ids.contains(&q.id));

    let mut ranked = vec![target];
    ranked.extend(same);
    ranked.extend(other);
    ranked
}

/// Ranked substitutes for `target`.
///
/// `placed_in_topic` holds every question of the same exam and topic; the
/// target is treated as placed even when the caller left it out. Never
/// fails: with no survivors the result is just `[target]`.
pub fn find_alternatives<'a>(
    target: &'a Question,
    placed_in_topic: &[&Question],
    topic_pool: &[&'a Question],
    floor: usize,
    max_strictness: Strictness,
) -> Vec<&'a Question> {
    let mut placed: Vec<&Question> = placed_in_topic.to_vec();
    if !placed.iter().any(|q| q.id == target.id) {
        placed.push(target);
    }

    let (survivors, strictness) = relax_alternatives(&placed, topic_pool, floor, max_strictness);
    let ranked = rank_alternatives(target, &placed, topic_pool, &survivors);
    obs::emit_alternatives_found(target.id, ranked.len() - 1, strictness);
    ranked
}

/// Ranked substitutes for the question in slot `exam_question_id` of `sheet`.
///
/// The topic pool is the slot topic's eligible questions for the exam's
/// certificate and language, in ascending question id order.
pub fn alternatives_for<'a>(
    sheet: &ExamSheet,
    exam_question_id: u32,
    exam: &Exam,
    topics: &[Topic],
    questions: &'a [Question],
    config: &EngineConfig,
) -> Result<Vec<&'a Question>> {
    let slot = sheet.find(exam_question_id)?;
    let topic = pool::find_topic(topics, slot.topic_id)?;
    let index = pool::index_by_id(questions);
    let target = index
        .get(&slot.question_id)
        .copied()
        .ok_or(ExamError::UnknownQuestion(slot.question_id))?;

    let mut topic_pool = pool::eligible(questions, exam.language, exam.certificate, topic);
    topic_pool.sort_by_key(|q| q.id);
    let placed = sheet.placed_in_topic(topic.id, &index)?;

    Ok(find_alternatives(
        target,
        &placed,
        &topic_pool,
        config.alternatives_floor,
        config.max_strictness,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;

    fn q(id: u32, requirement: u32) -> Question {
        Question::new(id, 1, requirement, Language::En)
    }

    fn ids(questions: &[&Question]) -> Vec<u32> {
        questions.iter().map(|q| q.id).collect()
    }

    #[test]
    fn test_surviving_alternatives_drops_placed_questions() {
        let pool = [q(1, 10), q(2, 11), q(3, 12)];
        let topic_pool: Vec<&Question> = pool.iter().collect();
        let placed = vec![&pool[0], &pool[2]];

        let left = surviving_alternatives(&placed, &topic_pool, Strictness::NONE);
        assert_eq!(ids(&left), vec![2]);
    }

    #[test]
    fn test_every_placed_question_reduces_the_pool() {
        let pool = [q(1, 10), q(2, 20), q(3, 10), q(4, 20), q(5, 30)];
        let topic_pool: Vec<&Question> = pool.iter().collect();
        let placed = vec![&pool[0], &pool[1]];

        let left = surviving_alternatives(&placed, &topic_pool, Strictness::MAX);
        assert_eq!(ids(&left), vec![5]);
    }

    #[test]
    fn test_relax_stops_at_first_level_reaching_floor() {
        // Picture 9 is shared by the placed question and by 2 and 3.
        let pool = [
            q(1, 10).with_picture(9),
            q(2, 11).with_picture(9),
            q(3, 12).with_picture(9),
            q(4, 13),
        ];
        let topic_pool: Vec<&Question> = pool.iter().collect();
        let placed = vec![&pool[0]];

        let (left, strictness) = relax_alternatives(&placed, &topic_pool, 3, Strictness::MAX);
        assert_eq!(strictness, Strictness::NONE);
        assert_eq!(ids(&left), vec![2, 3, 4]);

        let (left, strictness) = relax_alternatives(&placed, &topic_pool, 1, Strictness::MAX);
        assert_eq!(strictness, Strictness::MAX);
        assert_eq!(ids(&left), vec![4]);
    }

    #[test]
    fn test_rank_puts_target_then_same_requirement() {
        let target = q(1, 10);
        let pool = [q(2, 11), q(3, 10), q(4, 12), q(5, 10)];
        let topic_pool: Vec<&Question> = pool.iter().collect();

        let ranked = rank_alternatives(&target, &[&target], &topic_pool, &topic_pool);
        assert_eq!(ids(&ranked), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_rank_reads_same_requirement_from_pool() {
        let target = q(1, 10);
        let pool = [q(2, 11), q(3, 10), q(4, 12), q(5, 10), q(6, 13)];
        let topic_pool: Vec<&Question> = pool.iter().collect();
        // Question 5 is placed elsewhere; 6 was reduced away.
        let placed = vec![&target, &pool[3]];
        let survivors = vec![&pool[0], &pool[2]];

        let ranked = rank_alternatives(&target, &placed, &topic_pool, &survivors);
        assert_eq!(ids(&ranked), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_find_alternatives_with_empty_pool_returns_target() {
        let target = q(1, 10);
        let ranked = find_alternatives(&target, &[], &[], 10, Strictness::MAX);
        assert_eq!(ids(&ranked), vec![1]);
    }

    #[test]
    fn test_find_alternatives_treats_target_as_placed() {
        let pool = [q(1, 10), q(2, 11)];
        let topic_pool: Vec<&Question> = pool.iter().collect();

        let ranked = find_alternatives(&pool[0], &[], &topic_pool, 10, Strictness::MAX);
        assert_eq!(ids(&ranked), vec![1, 2]);
    }
}
