//! Gillmore (UK National Amyloidosis Centre) staging for transthyretin
//! cardiac amyloidosis.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

/// Bands are indexed by the number of adverse biomarkers.
const BANDS: &[StageBand] = &[
    StageBand::new(
        Some(0.0),
        Some(0.0),
        "Stage I",
        "NT-proBNP ≤3000 ng/L and eGFR ≥45 mL/min/1.73m²",
    ),
    StageBand::new(Some(1.0), Some(1.0), "Stage II", "One adverse biomarker"),
    StageBand::new(
        Some(2.0),
        Some(2.0),
        "Stage III",
        "NT-proBNP >3000 ng/L and eGFR <45 mL/min/1.73m²",
    ),
];

const MEDIAN_SURVIVAL_MONTHS: [f64; 3] = [69.2, 46.7, 24.1];

const NT_PROBNP_CUTOFF: f64 = 3000.0;
const EGFR_CUTOFF: f64 = 45.0;

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "gillmore_staging",
        "Gillmore Staging System for ATTR Cardiac Amyloidosis",
        ScoreCategory::Cardiology,
        ScoreShape::Staging,
        OutputKind::Label,
    )
    .describe("Prognostic staging of transthyretin amyloid cardiomyopathy from NT-proBNP and eGFR.")
    .version("2018")
    .formula("Adverse markers: NT-proBNP >3000 ng/L, eGFR <45; Stage I none, Stage II one, Stage III both")
    .reference("Gillmore JD, Damy T, Fontana M, et al. A new staging system for cardiac transthyretin amyloidosis. Eur Heart J. 2018;39(30):2799-2806.")
    .input(InputField::number("nt_probnp", 0.0, 50000.0).unit("ng/L"))
    .input(InputField::number("egfr", 5.0, 150.0).unit("mL/min/1.73m²"))
    .extra("median_survival_months", OutputKind::Number, "Median overall survival of the stage")
    .extra("elevated_biomarkers", OutputKind::Integer, "Count of adverse biomarkers")
    .bands(BANDS)
    .example(json!({ "nt_probnp": 2500.0, "egfr": 55.0 }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let nt_probnp = input.number("nt_probnp")?;
    let egfr = input.number("egfr")?;

    let elevated = i64::from(nt_probnp > NT_PROBNP_CUTOFF) + i64::from(egfr < EGFR_CUTOFF);
    let band = banded(BANDS, elevated as f64)?;
    let survival = MEDIAN_SURVIVAL_MONTHS[elevated.clamp(0, 2) as usize];

    Ok(ScoreOutcome::new(
        band.stage,
        "stage",
        band.stage,
        band.description,
        format!("Gillmore {}: median survival {survival} months.", band.stage),
    )
    .with_extra("median_survival_months", json!(survival))
    .with_extra("elevated_biomarkers", json!(elevated)))
}
