//! Batch calculation over CSV rows. Headers name input fields; each row goes
//! through the regular dispatch pipeline on its own.

use std::io::Read;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::definition::{InputKind, ScoreDefinition};
use super::dispatch::CalculatorDispatcher;
use super::error::{DispatchError, ErrorBody, FieldViolation, ValidationError};
use super::outcome::ScoreOutcome;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{column}' is not an input of this score")]
    UnknownColumn { column: String },
    #[error("score '{score_id}' not found")]
    UnknownScore { score_id: String },
}

/// Result of one CSV data row; `row` is 1-based and excludes the header.
#[derive(Debug)]
pub struct BatchRow {
    pub row: usize,
    pub outcome: Result<ScoreOutcome, DispatchError>,
}

#[derive(Debug, Serialize)]
pub struct BatchRowView {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ScoreOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub score_id: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub rows: Vec<BatchRowView>,
}

impl BatchReport {
    pub fn from_rows(score_id: &str, rows: Vec<BatchRow>) -> Self {
        let total = rows.len();
        let rows: Vec<BatchRowView> = rows
            .into_iter()
            .map(|row| match row.outcome {
                Ok(outcome) => BatchRowView {
                    row: row.row,
                    outcome: Some(outcome),
                    error: None,
                },
                Err(err) => BatchRowView {
                    row: row.row,
                    outcome: None,
                    error: Some(err.body()),
                },
            })
            .collect();
        let succeeded = rows.iter().filter(|row| row.outcome.is_some()).count();

        Self {
            score_id: score_id.to_string(),
            total,
            succeeded,
            failed: total - succeeded,
            rows,
        }
    }
}

/// Calculate `score_id` for every row of `reader`. A bad row is reported in
/// place and does not stop the rest of the batch.
pub fn run_batch<R: Read>(
    dispatcher: &CalculatorDispatcher,
    score_id: &str,
    reader: R,
) -> Result<Vec<BatchRow>, BatchError> {
    let entry = dispatcher
        .registry()
        .lookup(score_id)
        .map_err(|_| BatchError::UnknownScore {
            score_id: score_id.to_string(),
        })?;
    let definition = entry.definition.clone();

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    for column in headers.iter() {
        if definition.input_field(column).is_none() {
            return Err(BatchError::UnknownColumn {
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let outcome = match raw_row(&definition, &headers, &record) {
            Ok(raw) => dispatcher.execute(score_id, &raw),
            Err(violations) => Err(DispatchError::from(ValidationError {
                score_id: score_id.to_string(),
                violations,
            })),
        };
        rows.push(BatchRow {
            row: index + 1,
            outcome,
        });
    }

    tracing::info!(
        score_id,
        rows = rows.len(),
        failed = rows.iter().filter(|row| row.outcome.is_err()).count(),
        "batch complete"
    );
    Ok(rows)
}

/// Short rows leave fields absent for validation to report; cells past the
/// header are rejected outright.
fn raw_row(
    definition: &ScoreDefinition,
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
) -> Result<Map<String, Value>, Vec<FieldViolation>> {
    if record.len() > headers.len() {
        return Err((headers.len()..record.len())
            .map(|position| {
                FieldViolation::new(format!("column {}", position + 1), "has no header")
            })
            .collect());
    }

    let mut raw = Map::new();
    for (column, cell) in headers.iter().zip(record.iter()) {
        if cell.is_empty() {
            continue;
        }
        let value = match definition.input_field(column).map(|field| &field.kind) {
            Some(kind) => coerce(kind, cell),
            None => Value::String(cell.to_string()),
        };
        raw.insert(column.to_string(), value);
    }
    Ok(raw)
}

/// Best-effort conversion of cell text; anything unparseable stays a string
/// so validation reports it against the field.
fn coerce(kind: &InputKind, cell: &str) -> Value {
    match kind {
        InputKind::Integer { .. } => cell
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(cell.to_string())),
        InputKind::Number { .. } => cell
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(cell.to_string())),
        InputKind::Flag => match cell.to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(cell.to_string()),
        },
        InputKind::Choice { .. } => Value::String(cell.to_string()),
    }
}
