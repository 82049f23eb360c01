//! ADHERE classification tree for in-hospital mortality in acute
//! decompensated heart failure.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(0.0), "Low Risk", "BUN below 43 mg/dL"),
    StageBand::new(
        Some(1.0),
        Some(1.0),
        "Intermediate Risk",
        "BUN 43 mg/dL or more with preserved systolic pressure",
    ),
    StageBand::new(
        Some(2.0),
        Some(2.0),
        "High Risk",
        "BUN 43 mg/dL or more, SBP below 115 mmHg, creatinine below 2.75 mg/dL",
    ),
    StageBand::new(
        Some(3.0),
        Some(3.0),
        "Very High Risk",
        "BUN 43 mg/dL or more, SBP below 115 mmHg, creatinine 2.75 mg/dL or more",
    ),
];

const BUN: &[&str] = &["under_43", "43_or_over"];
const SBP: &[&str] = &["115_or_over", "under_115"];
const CREATININE: &[&str] = &["under_2_75", "2_75_or_over"];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "adhere",
        "ADHERE Algorithm",
        ScoreCategory::Cardiology,
        ScoreShape::DecisionTree,
        OutputKind::Integer,
    )
    .describe("Stratifies in-hospital mortality for acute decompensated heart failure using BUN, systolic BP and creatinine.")
    .version("2005")
    .formula("BUN → systolic BP → creatinine classification tree")
    .reference("Fonarow GC, Adams KF Jr, Abraham WT, Yancy CW, Boscardin WJ. Risk stratification for in-hospital mortality in acutely decompensated heart failure: classification and regression tree analysis. JAMA. 2005;293(5):572-80.")
    .note("Systolic pressure and creatinine are only consulted once BUN is 43 mg/dL or more.")
    .input(InputField::choice("bun", BUN).unit("mg/dL"))
    .input(InputField::choice("sbp", SBP).unit("mmHg"))
    .input(InputField::choice("creatinine", CREATININE).unit("mg/dL"))
    .extra("in_hospital_mortality", OutputKind::Text, "Observed in-hospital mortality of the tier")
    .extra("decision_path", OutputKind::Text, "Branches taken through the tree")
    .bands(BANDS)
    .example(json!({
        "bun": "43_or_over",
        "sbp": "under_115",
        "creatinine": "under_2_75"
    }))
}

fn option<'a>(input: &'a ScoreInput, field: &str, options: &[&str]) -> Result<&'a str, InputError> {
    let value = input.choice(field)?;
    if options.contains(&value) {
        Ok(value)
    } else {
        Err(InputError::UnexpectedOption {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let (tier, mortality, path): (i64, &str, &str) = if option(input, "bun", BUN)? == "under_43" {
        (0, "2.1-5.5%", "BUN <43")
    } else if option(input, "sbp", SBP)? == "115_or_over" {
        (1, "6.4%", "BUN ≥43 → SBP ≥115")
    } else if option(input, "creatinine", CREATININE)? == "under_2_75" {
        (2, "12.4%", "BUN ≥43 → SBP <115 → creatinine <2.75")
    } else {
        (3, "21.9%", "BUN ≥43 → SBP <115 → creatinine ≥2.75")
    };

    let band = banded(BANDS, tier as f64)?;
    Ok(ScoreOutcome::new(
        tier,
        "risk_tier",
        band.stage,
        band.description,
        format!("{}: in-hospital mortality {mortality}.", band.stage),
    )
    .with_extra("in_hospital_mortality", json!(mortality))
    .with_extra("decision_path", json!(path)))
}
