use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(0.0), "Low Risk", "Low stroke risk"),
    StageBand::new(Some(1.0), Some(1.0), "Low-Intermediate Risk", "Low to intermediate stroke risk"),
    StageBand::new(Some(2.0), Some(2.0), "Intermediate Risk", "Intermediate stroke risk"),
    StageBand::new(Some(3.0), Some(4.0), "High Risk", "High stroke risk"),
    StageBand::new(Some(5.0), Some(6.0), "Very High Risk", "Very high stroke risk"),
];

/// Annual stroke rate (%) with its 95% confidence interval, indexed by score.
const STROKE_RATE: [(f64, &str); 7] = [
    (1.9, "1.2-3.0"),
    (2.8, "2.0-3.8"),
    (4.0, "3.1-5.1"),
    (5.9, "4.6-7.3"),
    (8.5, "6.3-11.1"),
    (12.5, "8.2-17.5"),
    (18.2, "10.5-27.4"),
];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "chads2",
        "CHADS₂ Score for Atrial Fibrillation Stroke Risk",
        ScoreCategory::Cardiology,
        ScoreShape::WeightedSum,
        OutputKind::Integer,
    )
    .describe("Estimates annual stroke risk in atrial fibrillation to guide anticoagulation therapy.")
    .version("2001")
    .formula("C(1) + H(1) + A(1) + D(1) + S2(2)")
    .reference("Gage BF, Waterman AD, Shannon W, Boechler M, Rich MW, Radford MJ. Validation of clinical classification schemes for predicting stroke: results from the National Registry of Atrial Fibrillation. JAMA. 2001;285(22):2864-70.")
    .note("CHA₂DS₂-VASc discriminates better at scores 0-1.")
    .input(InputField::flag("congestive_heart_failure"))
    .input(InputField::flag("hypertension"))
    .input(InputField::flag("age_75_or_older"))
    .input(InputField::flag("diabetes_mellitus"))
    .input(InputField::flag("stroke_tia_thromboembolism").describe("Scores 2 points"))
    .extra("annual_stroke_risk", OutputKind::Number, "Annual stroke rate in percent")
    .extra("confidence_interval", OutputKind::Text, "95% confidence interval of the rate")
    .bands(BANDS)
    .example(json!({
        "congestive_heart_failure": "yes",
        "hypertension": "yes",
        "age_75_or_older": "no",
        "diabetes_mellitus": "no",
        "stroke_tia_thromboembolism": "no"
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let total = input.points("congestive_heart_failure", 1)?
        + input.points("hypertension", 1)?
        + input.points("age_75_or_older", 1)?
        + input.points("diabetes_mellitus", 1)?
        + input.points("stroke_tia_thromboembolism", 2)?;

    let band = banded(BANDS, total as f64)?;
    let (rate, interval) = STROKE_RATE[total.clamp(0, 6) as usize];
    let advice = match total {
        0 => "Consider CHA₂DS₂-VASc for further stratification.",
        1 => "Consider anticoagulation or further risk stratification.",
        _ => "Anticoagulation recommended unless contraindicated.",
    };

    Ok(ScoreOutcome::new(
        total,
        "points",
        band.stage,
        band.description,
        format!("CHADS₂ {total}: {rate}% stroke risk per year (95% CI {interval}%). {advice}"),
    )
    .with_extra("annual_stroke_risk", json!(rate))
    .with_extra("confidence_interval", json!(interval)))
}
