//! Engine configuration.
//!
//! Read from an optional TOML file, then overridden from the environment:
//!
//! - `EXAM_ALTERNATIVES_FLOOR` (default: 10)
//! - `EXAM_MAX_STRICTNESS` (default: 3)
//! - `EXAM_THRESHOLD_PER_TOPIC` (default: 65)
//! - `EXAM_THRESHOLD_OVERALL` (default: 77)

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ExamError, Result};
use crate::similarity::Strictness;

/// Survivors the alternative finder wants before it stops relaxing.
pub const DEFAULT_ALTERNATIVES_FLOOR: usize = 10;

/// Minimum percentages a student needs to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    /// Percentage correct required in every topic.
    pub per_topic: u32,
    /// Percentage correct required over the whole exam.
    pub overall: u32,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            per_topic: 65,
            overall: 77,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stop relaxing alternatives once at least this many survive.
    pub alternatives_floor: usize,

    /// First strictness level composition tries.
    pub max_strictness: Strictness,

    pub thresholds: ScoringThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alternatives_floor: DEFAULT_ALTERNATIVES_FLOOR,
            max_strictness: Strictness::MAX,
            thresholds: ScoringThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| ExamError::Config(e.to_string()))
    }

    /// Load from `path` when given, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading engine config");
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(floor) = parse_var::<usize, _>(&lookup, "EXAM_ALTERNATIVES_FLOOR")? {
            self.alternatives_floor = floor;
        }
        if let Some(level) = parse_var::<u8, _>(&lookup, "EXAM_MAX_STRICTNESS")? {
            self.max_strictness = Strictness::try_from(level)?;
        }
        if let Some(per_topic) = parse_var::<u32, _>(&lookup, "EXAM_THRESHOLD_PER_TOPIC")? {
            self.thresholds.per_topic = per_topic;
        }
        if let Some(overall) = parse_var::<u32, _>(&lookup, "EXAM_THRESHOLD_OVERALL")? {
            self.thresholds.overall = overall;
        }
        Ok(self)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ExamError::Config(format!("{key} is not a valid number: {raw:?}"))),
        None => Ok(None),
    }
}
