//! Checks raw payloads against a score's input definition and score
//! function results against its output definition.

use serde_json::{Map, Value};

use super::definition::{InputField, InputKind, OutputKind, ScoreDefinition};
use super::error::{FieldViolation, ValidationError};
use super::input::{FieldValue, ScoreInput};
use super::outcome::ScoreOutcome;

/// Validate and normalise `raw` against the definition's input fields.
///
/// Every violation is collected so a caller sees all problems at once.
pub fn validate_input(
    definition: &ScoreDefinition,
    raw: &Map<String, Value>,
) -> Result<ScoreInput, ValidationError> {
    let mut input = ScoreInput::default();
    let mut violations = Vec::new();

    for field in &definition.input_fields {
        match raw.get(field.name) {
            None => violations.push(FieldViolation::new(field.name, "is required")),
            Some(value) => match normalize(field, value) {
                Ok(normalized) => input.insert(field.name, normalized),
                Err(message) => violations.push(FieldViolation::new(field.name, message)),
            },
        }
    }

    for name in raw.keys() {
        if definition.input_field(name).is_none() {
            violations.push(FieldViolation::new(
                name.as_str(),
                "is not a recognised parameter",
            ));
        }
    }

    if violations.is_empty() {
        Ok(input)
    } else {
        Err(ValidationError {
            score_id: definition.id.to_string(),
            violations,
        })
    }
}

fn normalize(field: &InputField, value: &Value) -> Result<FieldValue, String> {
    match &field.kind {
        InputKind::Integer { min, max } => {
            let number = value
                .as_i64()
                .ok_or_else(|| "must be an integer".to_string())?;
            if number < *min || number > *max {
                return Err(format!("must be between {min} and {max}"));
            }
            Ok(FieldValue::Integer(number))
        }
        InputKind::Number { min, max } => {
            let number = value
                .as_f64()
                .filter(|number| number.is_finite())
                .ok_or_else(|| "must be a number".to_string())?;
            if number < *min || number > *max {
                return Err(format!("must be between {min} and {max}"));
            }
            Ok(FieldValue::Number(number))
        }
        InputKind::Choice { options } => {
            let choice = value
                .as_str()
                .ok_or_else(|| "must be a string".to_string())?;
            if options.contains(&choice) {
                Ok(FieldValue::Choice(choice.to_string()))
            } else {
                Err(format!("must be one of: {}", options.join(", ")))
            }
        }
        InputKind::Flag => match value {
            Value::Bool(flag) => Ok(FieldValue::Flag(*flag)),
            Value::String(text) if text == "yes" => Ok(FieldValue::Flag(true)),
            Value::String(text) if text == "no" => Ok(FieldValue::Flag(false)),
            _ => Err("must be true/false or \"yes\"/\"no\"".to_string()),
        },
    }
}

/// Check a score function's output against the declared output fields.
///
/// Failures here are defects in the score function, so they are returned as
/// plain violations for the dispatcher to report as a calculation error.
pub fn validate_output(
    definition: &ScoreDefinition,
    outcome: &ScoreOutcome,
) -> Result<(), Vec<FieldViolation>> {
    let rendered = match serde_json::to_value(outcome) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(vec![FieldViolation::new("*", "did not render as an object")]),
        Err(err) => return Err(vec![FieldViolation::new("*", err.to_string())]),
    };

    let mut violations = Vec::new();
    for field in &definition.output_fields {
        match rendered.get(field.name) {
            None => violations.push(FieldViolation::new(field.name, "is missing")),
            Some(value) if !conforms(field.kind, value) => violations.push(FieldViolation::new(
                field.name,
                format!("is not a valid {:?} value", field.kind).to_lowercase(),
            )),
            Some(_) => {}
        }
    }

    for name in rendered.keys() {
        if definition.output_field(name).is_none() {
            violations.push(FieldViolation::new(name.as_str(), "is not declared"));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn conforms(kind: OutputKind, value: &Value) -> bool {
    match kind {
        OutputKind::Integer => value.is_i64() || value.is_u64(),
        // non-finite floats render as null
        OutputKind::Number => value.is_number(),
        OutputKind::Label => value.as_str().is_some_and(|text| !text.trim().is_empty()),
        OutputKind::Text => value.is_string(),
        OutputKind::Map => value.is_object(),
    }
}
