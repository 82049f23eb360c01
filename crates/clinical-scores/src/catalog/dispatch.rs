use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::error::DispatchError;
use super::outcome::ScoreOutcome;
use super::registry::ScoreRegistry;
use super::validation::{validate_input, validate_output};

/// Runs one request through resolve, input validation, the score function
/// and output validation. Holds no per-call state.
#[derive(Debug, Clone)]
pub struct CalculatorDispatcher {
    registry: Arc<ScoreRegistry>,
}

impl CalculatorDispatcher {
    pub fn new(registry: Arc<ScoreRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ScoreRegistry {
        &self.registry
    }

    pub fn execute(
        &self,
        score_id: &str,
        raw: &Map<String, Value>,
    ) -> Result<ScoreOutcome, DispatchError> {
        tracing::debug!(score_id, fields = raw.len(), "dispatching calculation");

        let entry = self.registry.lookup(score_id)?;
        let definition = entry.definition.as_ref();

        let input = validate_input(definition, raw).map_err(|err| {
            tracing::warn!(score_id, violations = err.violations.len(), error = %err, "rejected input");
            DispatchError::from(err)
        })?;

        let function = entry.function;
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| function(&input))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => return Err(calculation_failure(score_id, err.to_string(), raw)),
            Err(payload) => return Err(calculation_failure(score_id, panic_message(payload), raw)),
        };

        if let Err(violations) = validate_output(definition, &outcome) {
            let reason = violations
                .iter()
                .map(|violation| format!("{} {}", violation.field, violation.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(calculation_failure(
                score_id,
                format!("output contract broken: {reason}"),
                raw,
            ));
        }

        tracing::info!(score_id, stage = %outcome.stage, "calculation complete");
        Ok(outcome)
    }
}

fn calculation_failure(score_id: &str, reason: String, raw: &Map<String, Value>) -> DispatchError {
    tracing::error!(score_id, %reason, "calculation failed");
    DispatchError::Calculation {
        score_id: score_id.to_string(),
        reason,
        parameters: raw.clone(),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "score function panicked".to_string()
    }
}
