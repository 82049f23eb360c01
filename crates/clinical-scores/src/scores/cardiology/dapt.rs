//! DAPT score: benefit versus bleeding risk of prolonging dual antiplatelet
//! therapy beyond 12 months after PCI.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(
        Some(-2.0),
        Some(1.0),
        "Unfavorable Benefit/Risk",
        "Prolonged DAPT not recommended",
    ),
    StageBand::new(
        Some(2.0),
        Some(10.0),
        "Favorable Benefit/Risk",
        "Prolonged DAPT may be considered",
    ),
];

const ONE_POINT: [&str; 6] = [
    "cigarette_smoking",
    "diabetes",
    "mi_at_presentation",
    "prior_pci_or_mi",
    "paclitaxel_eluting_stent",
    "stent_diameter_under_3mm",
];
const TWO_POINTS: [&str; 2] = ["chf_or_lvef_under_30", "vein_graft_stent"];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "dapt",
        "DAPT Score",
        ScoreCategory::Cardiology,
        ScoreShape::WeightedSum,
        OutputKind::Integer,
    )
    .describe("Identifies PCI patients who benefit from dual antiplatelet therapy beyond one year.")
    .version("2016")
    .formula("Age points (≥75: -2, 65-74: -1) + clinical and procedural factors")
    .reference("Yeh RW, Secemsky EA, Kereiakes DJ, et al. Development and Validation of a Prediction Rule for Benefit and Harm of Dual Antiplatelet Therapy Beyond 1 Year After Percutaneous Coronary Intervention. JAMA. 2016;315(16):1735-49.")
    .note("Only validated in patients free of major bleeding or ischemic events during the first 12 months.")
    .input(InputField::integer("age", 18, 120).unit("years"))
    .input(InputField::flag("cigarette_smoking"))
    .input(InputField::flag("diabetes"))
    .input(InputField::flag("mi_at_presentation"))
    .input(InputField::flag("prior_pci_or_mi"))
    .input(InputField::flag("paclitaxel_eluting_stent"))
    .input(InputField::flag("stent_diameter_under_3mm"))
    .input(InputField::flag("chf_or_lvef_under_30").describe("Scores 2 points"))
    .input(InputField::flag("vein_graft_stent").describe("Scores 2 points"))
    .bands(BANDS)
    .example(json!({
        "age": 68,
        "cigarette_smoking": "yes",
        "diabetes": "yes",
        "mi_at_presentation": "yes",
        "prior_pci_or_mi": "no",
        "paclitaxel_eluting_stent": "no",
        "stent_diameter_under_3mm": "no",
        "chf_or_lvef_under_30": "no",
        "vein_graft_stent": "no"
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let age = input.integer("age")?;
    let mut total: i64 = if age >= 75 {
        -2
    } else if age >= 65 {
        -1
    } else {
        0
    };
    for name in ONE_POINT {
        total += input.points(name, 1)?;
    }
    for name in TWO_POINTS {
        total += input.points(name, 2)?;
    }

    let band = banded(BANDS, total as f64)?;
    let interpretation = if total >= 2 {
        format!(
            "DAPT score {total}: ischemic benefit of continuing DAPT beyond 12 months likely outweighs bleeding risk."
        )
    } else {
        format!(
            "DAPT score {total}: bleeding risk of continuing DAPT beyond 12 months likely outweighs ischemic benefit."
        )
    };

    Ok(ScoreOutcome::new(
        total,
        "points",
        band.stage,
        band.description,
        interpretation,
    ))
}
