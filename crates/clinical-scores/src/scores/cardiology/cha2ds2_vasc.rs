//! CHA₂DS₂-VASc stroke risk in non-valvular atrial fibrillation.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(0.0), "Low Risk", "Low stroke risk"),
    StageBand::new(Some(1.0), Some(1.0), "Moderate Risk", "Moderate stroke risk"),
    StageBand::new(Some(2.0), Some(9.0), "High Risk", "High stroke risk"),
];

/// Adjusted annual stroke rate (%) indexed by score.
const ANNUAL_STROKE_RISK: [f64; 10] = [0.0, 1.3, 2.2, 3.2, 4.0, 6.7, 9.8, 9.6, 6.7, 15.2];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "cha2ds2_vasc",
        "CHA₂DS₂-VASc Score for Atrial Fibrillation Stroke Risk",
        ScoreCategory::Cardiology,
        ScoreShape::WeightedSum,
        OutputKind::Integer,
    )
    .describe("Estimates annual stroke risk in atrial fibrillation to guide anticoagulation.")
    .version("2010")
    .formula("C(1) + H(1) + A2(2) + D(1) + S2(2) + V(1) + A(1) + Sc(1)")
    .reference("Lip GY, Nieuwlaat R, Pisters R, Lane DA, Crijns HJ. Refining clinical risk stratification for predicting stroke and thromboembolism in atrial fibrillation using a novel risk factor-based approach. Chest. 2010;137(2):263-272.")
    .reference("Friberg L, Rosenqvist M, Lip GY. Evaluation of risk stratification schemes for ischaemic stroke and bleeding in 182 678 patients with atrial fibrillation. Eur Heart J. 2012;33(12):1500-1510.")
    .note("Female sex alone (score 1 in a woman) is not an indication for anticoagulation.")
    .input(
        InputField::integer("age", 18, 120)
            .unit("years")
            .describe("65-74 scores 1 point, 75 or older scores 2"),
    )
    .input(InputField::choice("sex", &["female", "male"]).describe("Female sex scores 1 point"))
    .input(InputField::flag("congestive_heart_failure").describe("History of CHF or LV dysfunction"))
    .input(InputField::flag("hypertension").describe("History of hypertension"))
    .input(
        InputField::flag("stroke_tia_thromboembolism")
            .describe("Prior stroke, TIA or thromboembolism; scores 2 points"),
    )
    .input(
        InputField::flag("vascular_disease")
            .describe("Prior MI, peripheral artery disease or aortic plaque"),
    )
    .input(InputField::flag("diabetes").describe("Diabetes mellitus"))
    .extra("annual_stroke_risk", OutputKind::Text, "Adjusted annual stroke rate")
    .extra("components", OutputKind::Map, "Points contributed by each factor")
    .bands(BANDS)
    .example(json!({
        "age": 72,
        "sex": "female",
        "congestive_heart_failure": "no",
        "hypertension": "yes",
        "stroke_tia_thromboembolism": "no",
        "vascular_disease": "yes",
        "diabetes": "yes"
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let age = input.integer("age")?;
    let age_points: i64 = if age >= 75 {
        2
    } else if age >= 65 {
        1
    } else {
        0
    };
    let sex_points: i64 = match input.choice("sex")? {
        "female" => 1,
        "male" => 0,
        other => {
            return Err(InputError::UnexpectedOption {
                field: "sex".to_string(),
                value: other.to_string(),
            })
        }
    };
    let chf = input.points("congestive_heart_failure", 1)?;
    let hypertension = input.points("hypertension", 1)?;
    let stroke = input.points("stroke_tia_thromboembolism", 2)?;
    let vascular = input.points("vascular_disease", 1)?;
    let diabetes = input.points("diabetes", 1)?;

    let total = age_points + sex_points + chf + hypertension + stroke + vascular + diabetes;
    let band = banded(BANDS, total as f64)?;
    let risk = ANNUAL_STROKE_RISK[total.clamp(0, 9) as usize];

    let interpretation = match total {
        0 => "Low risk. Anticoagulation is not recommended.".to_string(),
        1 => format!(
            "Moderate risk ({risk}% per year). Consider oral anticoagulation; weigh against bleeding risk."
        ),
        _ => format!(
            "High risk ({risk}% per year). Oral anticoagulation is recommended unless contraindicated."
        ),
    };

    Ok(
        ScoreOutcome::new(total, "points", band.stage, band.description, interpretation)
            .with_extra("annual_stroke_risk", json!(format!("{risk}%")))
            .with_extra(
                "components",
                json!({
                    "age": age_points,
                    "sex": sex_points,
                    "congestive_heart_failure": chf,
                    "hypertension": hypertension,
                    "stroke_tia_thromboembolism": stroke,
                    "vascular_disease": vascular,
                    "diabetes": diabetes,
                }),
            ),
    )
}
