//! CURB-65 severity score for community-acquired pneumonia.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(1.0), "Low Risk", "Consider outpatient treatment"),
    StageBand::new(Some(2.0), Some(2.0), "Moderate Risk", "Consider short inpatient stay or closely supervised outpatient care"),
    StageBand::new(Some(3.0), Some(5.0), "High Risk", "Hospitalize; assess for intensive care at 4-5"),
];

/// 30-day mortality (%) indexed by score.
const MORTALITY: [f64; 6] = [0.7, 3.2, 13.0, 17.0, 41.5, 57.0];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "curb_65",
        "CURB-65 Score for Pneumonia Severity",
        ScoreCategory::Pulmonology,
        ScoreShape::WeightedSum,
        OutputKind::Integer,
    )
    .describe("Estimates 30-day mortality in community-acquired pneumonia to guide site of care.")
    .version("2003")
    .formula("Confusion + BUN >19 mg/dL + RR ≥30 + (SBP <90 or DBP ≤60) + age ≥65, one point each")
    .reference("Lim WS, van der Eerden MM, Laing R, et al. Defining community acquired pneumonia severity on presentation to hospital: an international derivation and validation study. Thorax. 2003;58(5):377-82.")
    .input(InputField::flag("confusion").describe("New disorientation to person, place or time"))
    .input(InputField::number("bun", 0.0, 200.0).unit("mg/dL"))
    .input(InputField::integer("respiratory_rate", 0, 80).unit("breaths/min"))
    .input(InputField::integer("systolic_bp", 40, 300).unit("mmHg"))
    .input(InputField::integer("diastolic_bp", 20, 200).unit("mmHg"))
    .input(InputField::integer("age", 18, 120).unit("years"))
    .extra("mortality_30_day", OutputKind::Number, "30-day mortality in percent")
    .extra("components", OutputKind::Map, "Criteria met")
    .bands(BANDS)
    .example(json!({
        "confusion": "no",
        "bun": 22.0,
        "respiratory_rate": 24,
        "systolic_bp": 110,
        "diastolic_bp": 70,
        "age": 70
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let confusion = input.flag("confusion")?;
    let uremia = input.number("bun")? > 19.0;
    let tachypnea = input.integer("respiratory_rate")? >= 30;
    let hypotension = input.integer("systolic_bp")? < 90 || input.integer("diastolic_bp")? <= 60;
    let elderly = input.integer("age")? >= 65;

    let total = [confusion, uremia, tachypnea, hypotension, elderly]
        .into_iter()
        .map(i64::from)
        .sum::<i64>();
    let band = banded(BANDS, total as f64)?;
    let mortality = MORTALITY[total.clamp(0, 5) as usize];

    Ok(ScoreOutcome::new(
        total,
        "points",
        band.stage,
        band.description,
        format!("CURB-65 {total}: 30-day mortality {mortality}%. {}.", band.description),
    )
    .with_extra("mortality_30_day", json!(mortality))
    .with_extra(
        "components",
        json!({
            "confusion": confusion,
            "urea": uremia,
            "respiratory_rate": tachypnea,
            "blood_pressure": hypotension,
            "age_65_or_older": elderly,
        }),
    ))
}
