use std::collections::BTreeMap;

use serde::Serialize;

use super::error::InputError;

/// Normalised value of one validated input field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Choice(String),
    Flag(bool),
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "integer",
            FieldValue::Number(_) => "number",
            FieldValue::Choice(_) => "choice",
            FieldValue::Flag(_) => "flag",
        }
    }
}

/// Input record handed to a score function after validation. Every declared
/// field is present with its declared kind; `"yes"`/`"no"` are already `bool`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreInput {
    values: BTreeMap<String, FieldValue>,
}

impl ScoreInput {
    pub(crate) fn insert(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&FieldValue, InputError> {
        self.values
            .get(name)
            .ok_or_else(|| InputError::Missing(name.to_string()))
    }

    pub fn integer(&self, name: &str) -> Result<i64, InputError> {
        match self.get(name)? {
            FieldValue::Integer(value) => Ok(*value),
            other => Err(wrong_kind(name, "integer", other)),
        }
    }

    pub fn number(&self, name: &str) -> Result<f64, InputError> {
        match self.get(name)? {
            FieldValue::Number(value) => Ok(*value),
            other => Err(wrong_kind(name, "number", other)),
        }
    }

    pub fn choice(&self, name: &str) -> Result<&str, InputError> {
        match self.get(name)? {
            FieldValue::Choice(value) => Ok(value.as_str()),
            other => Err(wrong_kind(name, "choice", other)),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool, InputError> {
        match self.get(name)? {
            FieldValue::Flag(value) => Ok(*value),
            other => Err(wrong_kind(name, "flag", other)),
        }
    }

    /// `weight` when the flag is set, otherwise zero.
    pub fn points(&self, name: &str, weight: i64) -> Result<i64, InputError> {
        Ok(if self.flag(name)? { weight } else { 0 })
    }
}

fn wrong_kind(name: &str, expected: &'static str, actual: &FieldValue) -> InputError {
    tracing::debug!(field = name, expected, actual = actual.kind_name(), "input kind mismatch");
    InputError::WrongKind {
        field: name.to_string(),
        expected,
    }
}

impl<'a> FromIterator<(&'a str, FieldValue)> for ScoreInput {
    fn from_iter<T: IntoIterator<Item = (&'a str, FieldValue)>>(iter: T) -> Self {
        let mut input = ScoreInput::default();
        for (name, value) in iter {
            input.insert(name, value);
        }
        input
    }
}
