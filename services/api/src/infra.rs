use chrono::{DateTime, Utc};
use clinical_scores::catalog::{CalculatorDispatcher, ScoreRegistry};
use clinical_scores::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) scores_loaded: usize,
}

pub(crate) fn standard_dispatcher() -> Result<Arc<CalculatorDispatcher>, AppError> {
    let registry = ScoreRegistry::standard()?;
    Ok(Arc::new(CalculatorDispatcher::new(Arc::new(registry))))
}

/// Parse a calculation payload; anything but a JSON object is rejected.
pub(crate) fn parse_payload(raw: &str) -> Result<Map<String, Value>, AppError> {
    serde_json::from_str(raw).map_err(AppError::Json)
}

pub(crate) fn read_payload_file(path: &Path) -> Result<Map<String, Value>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_payload(&raw)
}
