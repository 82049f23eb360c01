//! AUB-HAS2 cardiovascular risk index for noncardiac surgery.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(1.0), "Low Risk", "Low perioperative cardiovascular risk"),
    StageBand::new(
        Some(2.0),
        Some(3.0),
        "Intermediate Risk",
        "Intermediate perioperative cardiovascular risk",
    ),
    StageBand::new(Some(4.0), Some(6.0), "High Risk", "High perioperative cardiovascular risk"),
];

const FACTORS: [&str; 6] = [
    "history_heart_disease",
    "age_75_or_older",
    "symptoms_angina_dyspnea",
    "anemia_hgb_less_12",
    "vascular_surgery",
    "emergency_surgery",
];

pub fn definition() -> ScoreDefinition {
    FACTORS
        .iter()
        .fold(
            ScoreDefinition::new(
                "aub_has2",
                "AUB-HAS2 Cardiovascular Risk Index",
                ScoreCategory::Cardiology,
                ScoreShape::WeightedSum,
                OutputKind::Integer,
            ),
            |definition, &name| definition.input(InputField::flag(name)),
        )
        .describe("Predicts death, myocardial infarction or stroke within 30 days of noncardiac surgery.")
        .version("2019")
        .formula("One point per factor: heart disease, age ≥75, angina/dyspnea, Hgb <12, vascular surgery, emergency surgery")
        .reference("Dakik HA, Chehab O, Eldirani M, et al. A New Index for Pre-Operative Cardiovascular Evaluation. J Am Coll Cardiol. 2019;73(24):3067-3078.")
        .extra("factors_present", OutputKind::Integer, "Number of risk factors present")
        .bands(BANDS)
        .example(json!({
            "history_heart_disease": "yes",
            "age_75_or_older": "no",
            "symptoms_angina_dyspnea": "no",
            "anemia_hgb_less_12": "yes",
            "vascular_surgery": "no",
            "emergency_surgery": "no"
        }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let mut total: i64 = 0;
    for name in FACTORS {
        total += input.points(name, 1)?;
    }

    let band = banded(BANDS, total as f64)?;
    let interpretation = match total {
        0 | 1 => "Low risk of 30-day death, MI or stroke; proceed with surgery.",
        2 | 3 => "Intermediate risk; consider further cardiac evaluation if it would change management.",
        _ => "High risk; cardiology consultation and risk optimisation are advised before elective surgery.",
    };

    Ok(
        ScoreOutcome::new(total, "points", band.stage, band.description, interpretation)
            .with_extra("factors_present", json!(total)),
    )
}
