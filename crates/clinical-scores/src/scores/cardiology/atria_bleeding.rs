//! ATRIA bleeding risk for patients on warfarin.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(3.0), "Low Risk", "0.76% annual hemorrhage rate"),
    StageBand::new(Some(4.0), Some(4.0), "Intermediate Risk", "2.6% annual hemorrhage rate"),
    StageBand::new(Some(5.0), Some(10.0), "High Risk", "5.8% annual hemorrhage rate"),
];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "atria_bleeding",
        "ATRIA Bleeding Risk Score",
        ScoreCategory::Cardiology,
        ScoreShape::WeightedSum,
        OutputKind::Integer,
    )
    .describe("Estimates hemorrhage risk in atrial fibrillation patients receiving warfarin.")
    .version("2011")
    .formula("Anemia(3) + Severe renal disease(3) + Age ≥75(2) + Prior hemorrhage(1) + Hypertension(1)")
    .reference("Fang MC, Go AS, Chang Y, et al. A new risk scheme to predict warfarin-associated hemorrhage: The ATRIA Study. J Am Coll Cardiol. 2011;58(4):395-401.")
    .input(InputField::flag("anemia").describe("Hemoglobin <13 g/dL (men) or <12 g/dL (women)"))
    .input(InputField::flag("severe_renal_disease").describe("eGFR <30 mL/min or dialysis"))
    .input(InputField::flag("age_75_or_older"))
    .input(InputField::flag("prior_hemorrhage"))
    .input(InputField::flag("hypertension"))
    .extra("annual_bleeding_risk", OutputKind::Number, "Annual major hemorrhage rate in percent")
    .bands(BANDS)
    .example(json!({
        "anemia": "no",
        "severe_renal_disease": "no",
        "age_75_or_older": "yes",
        "prior_hemorrhage": "no",
        "hypertension": "yes"
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let total = input.points("anemia", 3)?
        + input.points("severe_renal_disease", 3)?
        + input.points("age_75_or_older", 2)?
        + input.points("prior_hemorrhage", 1)?
        + input.points("hypertension", 1)?;

    let band = banded(BANDS, total as f64)?;
    let (rate, advice) = match total {
        0..=3 => (0.76, "Benefit of anticoagulation likely outweighs bleeding risk."),
        4 => (2.6, "Weigh bleeding risk carefully; address modifiable factors."),
        _ => (5.8, "High bleeding risk; consider alternatives or close monitoring."),
    };

    Ok(ScoreOutcome::new(
        total,
        "points",
        band.stage,
        band.description,
        format!("ATRIA {total}: {rate}% annual major hemorrhage risk. {advice}"),
    )
    .with_extra("annual_bleeding_risk", json!(rate)))
}
