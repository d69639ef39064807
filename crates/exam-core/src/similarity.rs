//! Similarity reduction.
//!
//! After a question is placed, candidates that are "too similar" to it are
//! dropped from the remaining pool. How much counts as too similar is
//! controlled by a [`Strictness`] level; each level adds one
//! [`SimilarityRule`] on top of the ones below it:
//!
//! | level | rules enforced                           |
//! |-------|------------------------------------------|
//! | 0     | none                                     |
//! | 1     | shared picture                           |
//! | 2     | shared picture, shared exam group        |
//! | 3     | shared picture, exam group, requirement  |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{ExamError, Question};

/// A single "too similar" test between a placed question and a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityRule {
    /// A picture must not appear twice in the same exam.
    SharedPicture,
    /// At most one question per exam group.
    SharedExamGroup,
    /// At most one question per requirement.
    SharedRequirement,
}

impl SimilarityRule {
    /// Whether `candidate` must be dropped because `chosen` was placed.
    pub fn matches(self, chosen: &Question, candidate: &Question) -> bool {
        match self {
            SimilarityRule::SharedPicture => {
                chosen.picture.is_some() && chosen.picture == candidate.picture
            }
            SimilarityRule::SharedExamGroup => match chosen.exam_group() {
                Some(group) => candidate.exam_group() == Some(group),
                None => false,
            },
            SimilarityRule::SharedRequirement => chosen.requirement == candidate.requirement,
        }
    }
}

const RULES: [SimilarityRule; 3] = [
    SimilarityRule::SharedPicture,
    SimilarityRule::SharedExamGroup,
    SimilarityRule::SharedRequirement,
];

/// How many similarity rules are enforced, 0 through 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Strictness(u8);

impl Strictness {
    /// No rule beyond pool eligibility and no-duplicates.
    pub const NONE: Strictness = Strictness(0);
    pub const PICTURE: Strictness = Strictness(1);
    pub const EXAM_GROUP: Strictness = Strictness(2);
    pub const REQUIREMENT: Strictness = Strictness(3);
    /// Every rule enforced.
    pub const MAX: Strictness = Strictness::REQUIREMENT;

    pub fn level(self) -> u8 {
        self.0
    }

    /// Rules enforced at this level.
    pub fn rules(self) -> &'static [SimilarityRule] {
        &RULES[..usize::from(self.0)]
    }

    /// The next lower level, or `None` at level 0.
    pub fn relaxed(self) -> Option<Strictness> {
        self.0.checked_sub(1).map(Strictness)
    }

    /// This level followed by every lower one, down to and including 0.
    pub fn relaxations(self) -> impl Iterator<Item = Strictness> {
        (0..=self.0).rev().map(Strictness)
    }
}

impl Default for Strictness {
    fn default() -> Self {
        Strictness::MAX
    }
}

impl TryFrom<u8> for Strictness {
    type Error = ExamError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level <= Strictness::MAX.0 {
            Ok(Strictness(level))
        } else {
            Err(ExamError::InvalidStrictness(level))
        }
    }
}

impl From<Strictness> for u8 {
    fn from(strictness: Strictness) -> Self {
        strictness.0
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether any rule enforced at `strictness` says `candidate` is too similar
/// to `chosen`.
pub fn is_similar(chosen: &Question, candidate: &Question, strictness: Strictness) -> bool {
    strictness
        .rules()
        .iter()
        .any(|rule| rule.matches(chosen, candidate))
}

/// Drop every candidate too similar to `chosen`, in place.
///
/// Only ever called on working copies owned by the composer or the
/// alternative finder.
pub(crate) fn reduce_similar(
    chosen: &Question,
    candidates: &mut Vec<&Question>,
    strictness: Strictness,
) {
    if strictness == Strictness::NONE {
        return;
    }
    candidates.retain(|candidate| !is_similar(chosen, candidate, strictness));
}

/// Candidates that survive placing `chosen`, in their original order.
pub fn without_similar<'a>(
    chosen: &Question,
    candidates: &[&'a Question],
    strictness: Strictness,
) -> Vec<&'a Question> {
    let mut remaining = candidates.to_vec();
    reduce_similar(chosen, &mut remaining, strictness);
    remaining
}
