//! CKD-EPI 2021 race-free creatinine equation for eGFR.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::{banded, round_to};

// one-decimal results tile these bands
const BANDS: &[StageBand] = &[
    StageBand::new(Some(90.0), None, "G1", "Normal or high"),
    StageBand::new(Some(60.0), Some(89.9), "G2", "Mildly decreased"),
    StageBand::new(Some(45.0), Some(59.9), "G3a", "Mildly to moderately decreased"),
    StageBand::new(Some(30.0), Some(44.9), "G3b", "Moderately to severely decreased"),
    StageBand::new(Some(15.0), Some(29.9), "G4", "Severely decreased"),
    StageBand::new(None, Some(14.9), "G5", "Kidney failure"),
];

struct SexTerms {
    kappa: f64,
    alpha: f64,
    factor: f64,
}

const FEMALE: SexTerms = SexTerms {
    kappa: 0.7,
    alpha: -0.241,
    factor: 1.012,
};
const MALE: SexTerms = SexTerms {
    kappa: 0.9,
    alpha: -0.302,
    factor: 1.0,
};

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "ckd_epi_2021",
        "CKD-EPI Equations for Glomerular Filtration Rate (2021)",
        ScoreCategory::Nephrology,
        ScoreShape::Formula,
        OutputKind::Number,
    )
    .describe("Estimates glomerular filtration rate from serum creatinine without a race coefficient.")
    .version("2021")
    .formula("eGFR = 142 × min(Scr/κ, 1)^α × max(Scr/κ, 1)^-1.200 × 0.9938^age × 1.012 [if female]")
    .reference("Inker LA, Eneanya ND, Coresh J, et al. New Creatinine- and Cystatin C-Based Equations to Estimate GFR without Race. N Engl J Med. 2021;385(19):1737-1749.")
    .note("Not validated in acute kidney injury or at extremes of muscle mass.")
    .input(InputField::choice("sex", &["female", "male"]))
    .input(InputField::integer("age", 18, 120).unit("years"))
    .input(InputField::number("serum_creatinine", 0.1, 20.0).unit("mg/dL"))
    .bands(BANDS)
    .example(json!({ "sex": "male", "age": 50, "serum_creatinine": 1.0 }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let terms = match input.choice("sex")? {
        "female" => &FEMALE,
        "male" => &MALE,
        other => {
            return Err(InputError::UnexpectedOption {
                field: "sex".to_string(),
                value: other.to_string(),
            })
        }
    };
    let age = input.integer("age")? as f64;
    let creatinine = input.number("serum_creatinine")?;

    let ratio = creatinine / terms.kappa;
    let egfr = 142.0
        * ratio.min(1.0).powf(terms.alpha)
        * ratio.max(1.0).powf(-1.200)
        * 0.9938_f64.powf(age)
        * terms.factor;
    let egfr = round_to(egfr, 1);

    let band = banded(BANDS, egfr)?;
    Ok(ScoreOutcome::new(
        egfr,
        "mL/min/1.73m²",
        band.stage,
        band.description,
        format!(
            "eGFR {egfr:.1} mL/min/1.73m², CKD stage {}: {}.",
            band.stage,
            band.description.to_lowercase()
        ),
    ))
}
