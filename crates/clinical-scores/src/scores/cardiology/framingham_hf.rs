//! Framingham clinical criteria for congestive heart failure.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(
        Some(0.0),
        Some(0.0),
        "Heart Failure Not Diagnosed",
        "Criteria for heart failure not met",
    ),
    StageBand::new(
        Some(1.0),
        Some(1.0),
        "Heart Failure Diagnosed",
        "Two major, or one major and two minor criteria",
    ),
];

const MAJOR: [&str; 7] = [
    "acute_pulmonary_edema",
    "cardiomegaly",
    "hepatojugular_reflex",
    "neck_vein_distention",
    "paroxysmal_nocturnal_dyspnea_orthopnea",
    "pulmonary_rales",
    "third_heart_sound",
];

const MINOR: [&str; 6] = [
    "ankle_edema",
    "dyspnea_on_exertion",
    "hepatomegaly",
    "nocturnal_cough",
    "pleural_effusion",
    "tachycardia",
];

pub fn definition() -> ScoreDefinition {
    let mut definition = ScoreDefinition::new(
        "framingham_hf",
        "Framingham Heart Failure Diagnostic Criteria",
        ScoreCategory::Cardiology,
        ScoreShape::Criteria,
        OutputKind::Integer,
    )
    .describe("Clinical diagnosis of congestive heart failure from major and minor criteria.")
    .version("1971")
    .formula("Diagnosis requires 2 major criteria, or 1 major and 2 minor criteria")
    .reference("McKee PA, Castelli WP, McNamara PM, Kannel WB. The natural history of congestive heart failure: the Framingham study. N Engl J Med. 1971;285(26):1441-6.")
    .note("Minor criteria count only when not attributable to another condition.");

    for name in MAJOR {
        definition = definition.input(InputField::flag(name).describe("Major criterion"));
    }
    for name in MINOR {
        definition = definition.input(InputField::flag(name).describe("Minor criterion"));
    }

    definition
        .extra("major_criteria_count", OutputKind::Integer, "Major criteria present")
        .extra("minor_criteria_count", OutputKind::Integer, "Minor criteria present")
        .bands(BANDS)
        .example(json!({
            "acute_pulmonary_edema": "no",
            "cardiomegaly": "yes",
            "hepatojugular_reflex": "no",
            "neck_vein_distention": "yes",
            "paroxysmal_nocturnal_dyspnea_orthopnea": "no",
            "pulmonary_rales": "no",
            "third_heart_sound": "no",
            "ankle_edema": "yes",
            "dyspnea_on_exertion": "no",
            "hepatomegaly": "no",
            "nocturnal_cough": "no",
            "pleural_effusion": "no",
            "tachycardia": "no"
        }))
}

fn count(input: &ScoreInput, names: &[&str]) -> Result<i64, InputError> {
    let mut present: i64 = 0;
    for name in names {
        present += input.points(name, 1)?;
    }
    Ok(present)
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let major = count(input, &MAJOR)?;
    let minor = count(input, &MINOR)?;

    let diagnosed = major >= 2 || (major >= 1 && minor >= 2);
    let result = i64::from(diagnosed);
    let band = banded(BANDS, result as f64)?;
    let interpretation = if diagnosed {
        format!("{major} major and {minor} minor criteria met: clinical heart failure diagnosed.")
    } else {
        format!("{major} major and {minor} minor criteria: heart failure criteria not met.")
    };

    Ok(
        ScoreOutcome::new(result, "diagnosis", band.stage, band.description, interpretation)
            .with_extra("major_criteria_count", json!(major))
            .with_extra("minor_criteria_count", json!(minor)),
    )
}
