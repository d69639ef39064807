//! Scoring of recorded exam answers.
//!
//! Percentages shown to people carry one decimal; pass/fail decisions use
//! whole, truncated percentages.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::ScoringThresholds;
use crate::domain::{ExamError, QuestionId, Result, TopicId};

/// One answer a student gave to one question of one exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamAnswer {
    pub student: String,
    pub exam: u32,
    pub question: QuestionId,
    pub topic: TopicId,
    /// Letters accepted as correct, e.g. `"B"` or `"AC"`.
    pub answers_correct: String,
    /// The single letter the student chose.
    pub answer_given: String,
}

impl ExamAnswer {
    pub fn new(
        student: impl Into<String>,
        exam: u32,
        question: QuestionId,
        topic: TopicId,
        answers_correct: impl Into<String>,
        answer_given: impl Into<String>,
    ) -> Result<Self> {
        let answer = Self {
            student: student.into(),
            exam,
            question,
            topic,
            answers_correct: answers_correct.into(),
            answer_given: answer_given.into(),
        };
        answer.validate()?;
        Ok(answer)
    }

    /// Check the invariants of a recorded answer.
    pub fn validate(&self) -> Result<()> {
        if self.student.trim().is_empty() {
            return Err(ExamError::InvalidAnswer("student cannot be blank".into()));
        }
        if self.answers_correct.trim().is_empty() {
            return Err(ExamError::InvalidAnswer(
                "answers_correct must not be blank".into(),
            ));
        }
        if self.answer_given.trim().is_empty() || self.answer_given.chars().count() != 1 {
            return Err(ExamError::InvalidAnswer(format!(
                "answer_given must be a single character, got {:?}",
                self.answer_given
            )));
        }
        Ok(())
    }

    pub fn is_correct(&self) -> bool {
        self.answers_correct.contains(self.answer_given.as_str())
    }
}

/// What a student needs to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassCriteria {
    /// Topics the student must have answered questions in.
    pub num_topics: usize,
    pub threshold_per_topic: u32,
    pub threshold_overall: u32,
}

impl PassCriteria {
    pub fn new(num_topics: usize, thresholds: ScoringThresholds) -> Self {
        Self {
            num_topics,
            threshold_per_topic: thresholds.per_topic,
            threshold_overall: thresholds.overall,
        }
    }
}

/// Answer statistics for a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionStats {
    pub num_answers: usize,
    /// Distinct exams the question was answered in.
    pub num_exams: usize,
    /// Whole percentage correct, or -1 when never answered.
    pub score_percentage: i32,
}

/// Aggregated answers across students, exams and questions.
#[derive(Debug, Clone, Default)]
pub struct ExamScores {
    answers: Vec<ExamAnswer>,
}

impl ExamScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_all(mut self, answers: impl IntoIterator<Item = ExamAnswer>) -> Self {
        self.answers.extend(answers);
        self
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Share of correct answers, one decimal; 0 without answers.
    pub fn score_percentage(&self) -> f64 {
        let correct = self.answers.iter().filter(|a| a.is_correct()).count();
        to_percentage(correct, self.answers.len())
    }

    /// Share of students who passed, one decimal; 0 without answers.
    pub fn percentage_passed(&self, criteria: &PassCriteria) -> f64 {
        let students = self.by_student();
        let passed = students
            .values()
            .filter(|answers| has_passed(answers, criteria))
            .count();
        to_percentage(passed, students.len())
    }

    /// Per-student pass verdicts, ordered by student.
    pub fn verdicts(&self, criteria: &PassCriteria) -> BTreeMap<String, bool> {
        self.by_student()
            .into_iter()
            .map(|(student, answers)| (student.to_string(), has_passed(&answers, criteria)))
            .collect()
    }

    pub fn for_question(&self, question: QuestionId) -> QuestionStats {
        let answers: Vec<&ExamAnswer> = self
            .answers
            .iter()
            .filter(|a| a.question == question)
            .collect();
        let num_exams = answers.iter().map(|a| a.exam).collect::<BTreeSet<_>>().len();
        let score_percentage = if answers.is_empty() {
            -1
        } else {
            let correct = answers.iter().filter(|a| a.is_correct()).count();
            (correct * 100 / answers.len()) as i32
        };
        QuestionStats {
            num_answers: answers.len(),
            num_exams,
            score_percentage,
        }
    }

    fn by_student(&self) -> BTreeMap<&str, Vec<&ExamAnswer>> {
        let mut grouped: BTreeMap<&str, Vec<&ExamAnswer>> = BTreeMap::new();
        for answer in &self.answers {
            grouped.entry(answer.student.as_str()).or_default().push(answer);
        }
        grouped
    }
}

fn has_passed(answers: &[&ExamAnswer], criteria: &PassCriteria) -> bool {
    let mut per_topic: HashMap<TopicId, Vec<&ExamAnswer>> = HashMap::new();
    for &answer in answers {
        per_topic.entry(answer.topic).or_default().push(answer);
    }

    per_topic.len() >= criteria.num_topics
        && meets(criteria.threshold_overall, answers)
        && per_topic
            .values()
            .all(|topic| meets(criteria.threshold_per_topic, topic))
}

fn meets(required: u32, answers: &[&ExamAnswer]) -> bool {
    if answers.is_empty() {
        return false;
    }
    let correct = answers.iter().filter(|a| a.is_correct()).count();
    correct * 100 / answers.len() >= required as usize
}

fn to_percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(student: &str, exam: u32, question: u32, topic: u32, given: &str) -> ExamAnswer {
        ExamAnswer::new(student, exam, question, topic, "A", given).unwrap()
    }

    fn criteria() -> PassCriteria {
        PassCriteria {
            num_topics: 2,
            threshold_per_topic: 50,
            threshold_overall: 60,
        }
    }

    #[test]
    fn test_answer_validation() {
        assert!(ExamAnswer::new(" ", 1, 1, 1, "A", "A").is_err());
        assert!(ExamAnswer::new("s1", 1, 1, 1, "", "A").is_err());
        assert!(ExamAnswer::new("s1", 1, 1, 1, "A", "AB").is_err());
        assert!(ExamAnswer::new("s1", 1, 1, 1, "A", "").is_err());
        assert!(ExamAnswer::new("s1", 1, 1, 1, "AC", "C").unwrap().is_correct());
    }

    #[test]
    fn test_score_percentage_one_decimal() {
        let scores = ExamScores::new().add_all(vec![
            answer("s1", 1, 1, 1, "A"),
            answer("s1", 1, 2, 1, "B"),
            answer("s1", 1, 3, 1, "B"),
        ]);
        assert_eq!(scores.score_percentage(), 33.3);
        assert_eq!(ExamScores::new().score_percentage(), 0.0);
    }

    #[test]
    fn test_pass_requires_every_topic_and_overall() {
        let scores = ExamScores::new().add_all(vec![
            // s1: topic 1 2/2, topic 2 1/2 -> 75% overall, passes
            answer("s1", 1, 1, 1, "A"),
            answer("s1", 1, 2, 1, "A"),
            answer("s1", 1, 3, 2, "A"),
            answer("s1", 1, 4, 2, "B"),
            // s2: topic 1 2/2, topic 2 0/2 -> fails per topic
            answer("s2", 1, 1, 1, "A"),
            answer("s2", 1, 2, 1, "A"),
            answer("s2", 1, 3, 2, "B"),
            answer("s2", 1, 4, 2, "B"),
            // s3: only one topic answered
            answer("s3", 1, 1, 1, "A"),
        ]);

        let verdicts = scores.verdicts(&criteria());
        assert_eq!(verdicts.get("s1"), Some(&true));
        assert_eq!(verdicts.get("s2"), Some(&false));
        assert_eq!(verdicts.get("s3"), Some(&false));
        assert_eq!(scores.percentage_passed(&criteria()), 33.3);
    }

    #[test]
    fn test_question_stats() {
        let scores = ExamScores::new().add_all(vec![
            answer("s1", 1, 7, 1, "A"),
            answer("s2", 1, 7, 1, "B"),
            answer("s3", 2, 7, 1, "B"),
        ]);

        let stats = scores.for_question(7);
        assert_eq!(stats.num_answers, 3);
        assert_eq!(stats.num_exams, 2);
        assert_eq!(stats.score_percentage, 33);
        assert_eq!(scores.for_question(8).score_percentage, -1);
    }
}
