use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Stable, machine-readable error kind placed in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ValidationError,
    ScoreNotFound,
    CalculationError,
    InternalServerError,
}

/// Wire shape of every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: ErrorKind, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            error,
            message: message.into(),
            details,
        }
    }
}

/// A score function could not read its input or place its result. Only
/// reachable when a definition and its function disagree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("input field '{0}' was not supplied")]
    Missing(String),
    #[error("input field '{field}' is not a {expected}")]
    WrongKind {
        field: String,
        expected: &'static str,
    },
    #[error("input field '{field}' has unexpected option '{value}'")]
    UnexpectedOption { field: String, value: String },
    #[error("result {value} falls outside every interpretation band")]
    Unbanded { value: f64 },
}

/// One constraint broken by one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Raw input did not satisfy the score's input definition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid parameters for {score_id}: {}", summarize(.violations))]
pub struct ValidationError {
    pub score_id: String,
    pub violations: Vec<FieldViolation>,
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{} {}", violation.field, violation.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Registry construction or lookup failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("score '{0}' is already registered")]
    DuplicateId(String),
    #[error("score '{0}' not found")]
    UnknownScore(String),
    #[error("score '{id}' has an invalid definition: {}", .defects.join("; "))]
    InvalidDefinition { id: String, defects: Vec<String> },
}

/// Failure of one pass through the dispatch pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    #[error("score '{score_id}' not found")]
    UnknownScore { score_id: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The function failed or broke its output contract. `reason` is for logs only.
    #[error("error calculating {score_id}")]
    Calculation {
        score_id: String,
        reason: String,
        parameters: Map<String, Value>,
    },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownScore { .. } => ErrorKind::ScoreNotFound,
            DispatchError::Validation(_) => ErrorKind::ValidationError,
            DispatchError::Calculation { .. } => ErrorKind::CalculationError,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let details = match self {
            DispatchError::UnknownScore { score_id } => json!({ "score_id": score_id }),
            DispatchError::Validation(error) => json!({ "violations": error.violations }),
            DispatchError::Calculation { parameters, .. } => json!({ "parameters": parameters }),
        };
        ErrorBody::new(self.kind(), self.to_string(), Some(details))
    }
}

impl From<RegistryError> for DispatchError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::UnknownScore(score_id) => DispatchError::UnknownScore { score_id },
            RegistryError::DuplicateId(id) | RegistryError::InvalidDefinition { id, .. } => {
                DispatchError::Calculation {
                    reason: format!("registry entry for '{id}' is unusable"),
                    score_id: id,
                    parameters: Map::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_each_field() {
        let error = ValidationError {
            score_id: "cha2ds2_vasc".to_string(),
            violations: vec![
                FieldViolation::new("age", "must be between 18 and 120"),
                FieldViolation::new("sex", "is required"),
            ],
        };
        assert_eq!(
            error.to_string(),
            "invalid parameters for cha2ds2_vasc: age must be between 18 and 120; sex is required"
        );
    }

    #[test]
    fn calculation_body_exposes_parameters_but_not_reason() {
        let mut parameters = Map::new();
        parameters.insert("age".to_string(), json!(72));
        let error = DispatchError::Calculation {
            score_id: "cha2ds2_vasc".to_string(),
            reason: "index out of bounds".to_string(),
            parameters,
        };
        let body = error.body();
        assert_eq!(body.error, ErrorKind::CalculationError);
        assert!(!body.message.contains("index out of bounds"));
        assert_eq!(body.details, Some(json!({ "parameters": { "age": 72 } })));
    }

    #[test]
    fn unknown_registry_entry_maps_to_not_found() {
        let error: DispatchError = RegistryError::UnknownScore("nope".to_string()).into();
        assert_eq!(error.kind(), ErrorKind::ScoreNotFound);
        let body = serde_json::to_value(error.body()).expect("body serializes");
        assert_eq!(body["error"], "ScoreNotFound");
    }
}
