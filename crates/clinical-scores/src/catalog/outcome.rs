use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primary result of a score: a point total, a measured quantity or a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreResult {
    Integer(i64),
    Number(f64),
    Label(String),
}

impl From<i64> for ScoreResult {
    fn from(value: i64) -> Self {
        ScoreResult::Integer(value)
    }
}

impl From<f64> for ScoreResult {
    fn from(value: f64) -> Self {
        ScoreResult::Number(value)
    }
}

impl From<&str> for ScoreResult {
    fn from(value: &str) -> Self {
        ScoreResult::Label(value.to_string())
    }
}

impl ScoreResult {
    /// Numeric view used for ordering checks; labels have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScoreResult::Integer(value) => Some(*value as f64),
            ScoreResult::Number(value) => Some(*value),
            ScoreResult::Label(_) => None,
        }
    }
}

/// Output record produced by a score function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub result: ScoreResult,
    pub unit: String,
    pub interpretation: String,
    pub stage: String,
    pub stage_description: String,
    /// Informational breakdowns; never feed back into `result`.
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

impl ScoreOutcome {
    pub fn new(
        result: impl Into<ScoreResult>,
        unit: &str,
        stage: &str,
        stage_description: &str,
        interpretation: impl Into<String>,
    ) -> Self {
        Self {
            result: result.into(),
            unit: unit.to_string(),
            interpretation: interpretation.into(),
            stage: stage.to_string(),
            stage_description: stage_description.to_string(),
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, name: &str, value: Value) -> Self {
        self.extras.insert(name.to_string(), value);
        self
    }
}
