//! Syllabus topics.

use serde::{Deserialize, Serialize};

pub type TopicId = u32;

/// A topic and the number of questions every composed exam must hold for it.
///
/// Topics are always composed in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,

    #[serde(default)]
    pub label: String,

    /// Questions per exam for this topic.
    pub target_count: usize,
}

impl Topic {
    pub fn new(id: TopicId, label: impl Into<String>, target_count: usize) -> Self {
        Self {
            id,
            label: label.into(),
            target_count,
        }
    }
}
