//! CHA₂DS₂-VA: the sex-neutral variant adopted by the 2024 ESC AF guidelines.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(0.0), "Low Risk", "Very low stroke risk"),
    StageBand::new(Some(1.0), Some(1.0), "Moderate Risk", "Low to moderate stroke risk"),
    StageBand::new(Some(2.0), Some(8.0), "High Risk", "High stroke risk"),
];

/// Strokes per 100 patient-years indexed by score.
const STROKE_RATE: [f64; 9] = [0.5, 1.5, 2.9, 4.6, 6.7, 9.2, 11.9, 15.2, 19.5];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "cha2ds2_va",
        "CHA₂DS₂-VA Score for Atrial Fibrillation Stroke Risk",
        ScoreCategory::Cardiology,
        ScoreShape::WeightedSum,
        OutputKind::Integer,
    )
    .describe(
        "Sex-neutral stroke risk score for atrial fibrillation; CHA₂DS₂-VASc without the sex category.",
    )
    .version("2024")
    .formula("C(1) + H(1) + A2(2) + D(1) + S2(2) + V(1) + A(1)")
    .reference("Van Gelder IC, Rienstra M, Bunting KV, et al. 2024 ESC Guidelines for the management of atrial fibrillation. Eur Heart J. 2024;45(36):3314-3414.")
    .reference("Lip GYH, Keshishian A, Li X, et al. Effectiveness and Safety of Oral Anticoagulants Among Nonvalvular Atrial Fibrillation Patients. Stroke. 2018;49(12):2933-2944.")
    .input(InputField::integer("age", 18, 120).unit("years"))
    .input(InputField::flag("congestive_heart_failure"))
    .input(InputField::flag("hypertension"))
    .input(InputField::flag("diabetes_mellitus"))
    .input(InputField::flag("stroke_tia_thromboembolism").describe("Scores 2 points"))
    .input(InputField::flag("vascular_disease"))
    .extra(
        "stroke_rate",
        OutputKind::Number,
        "Strokes per 100 patient-years",
    )
    .extra("components", OutputKind::Map, "Points contributed by each factor")
    .bands(BANDS)
    .example(json!({
        "age": 70,
        "congestive_heart_failure": "no",
        "hypertension": "yes",
        "diabetes_mellitus": "no",
        "stroke_tia_thromboembolism": "no",
        "vascular_disease": "no"
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let age = input.integer("age")?;
    let age_points: i64 = match age {
        a if a >= 75 => 2,
        a if a >= 65 => 1,
        _ => 0,
    };
    let chf = input.points("congestive_heart_failure", 1)?;
    let hypertension = input.points("hypertension", 1)?;
    let diabetes = input.points("diabetes_mellitus", 1)?;
    let stroke = input.points("stroke_tia_thromboembolism", 2)?;
    let vascular = input.points("vascular_disease", 1)?;

    let total = age_points + chf + hypertension + diabetes + stroke + vascular;
    let band = banded(BANDS, total as f64)?;
    let rate = STROKE_RATE[total.clamp(0, 8) as usize];

    let advice = match total {
        0 => "Anticoagulation is not recommended.",
        1 => "Use clinical judgment; consider oral anticoagulation.",
        _ => "Oral anticoagulation is recommended unless contraindicated.",
    };
    let interpretation = format!(
        "CHA₂DS₂-VA {total}: {rate} strokes per 100 patient-years. {advice}"
    );

    Ok(
        ScoreOutcome::new(total, "points", band.stage, band.description, interpretation)
            .with_extra("stroke_rate", json!(rate))
            .with_extra(
                "components",
                json!({
                    "age": age_points,
                    "congestive_heart_failure": chf,
                    "hypertension": hypertension,
                    "diabetes_mellitus": diabetes,
                    "stroke_tia_thromboembolism": stroke,
                    "vascular_disease": vascular,
                }),
            ),
    )
}
