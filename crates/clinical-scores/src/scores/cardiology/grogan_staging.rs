//! Grogan (Mayo Clinic) staging for wild-type transthyretin cardiac amyloidosis.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(0.0), "Stage I", "Both biomarkers below cutoff"),
    StageBand::new(Some(1.0), Some(1.0), "Stage II", "One biomarker above cutoff"),
    StageBand::new(Some(2.0), Some(2.0), "Stage III", "Both biomarkers above cutoff"),
];

struct Survival {
    median_months: i64,
    four_year: &'static str,
}

const SURVIVAL: [Survival; 3] = [
    Survival {
        median_months: 66,
        four_year: "57%",
    },
    Survival {
        median_months: 40,
        four_year: "42%",
    },
    Survival {
        median_months: 20,
        four_year: "18%",
    },
];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "grogan_staging",
        "Grogan Staging System for Wild-Type ATTR Amyloidosis",
        ScoreCategory::Cardiology,
        ScoreShape::Staging,
        OutputKind::Label,
    )
    .describe("Prognostic staging of wild-type transthyretin cardiac amyloidosis from NT-proBNP and troponin T.")
    .version("2016")
    .formula("Adverse markers: NT-proBNP >3000 pg/mL, troponin T >0.05 ng/mL")
    .reference("Grogan M, Scott CG, Kyle RA, et al. Natural History of Wild-Type Transthyretin Cardiac Amyloidosis and Risk Stratification Using a Novel Staging System. J Am Coll Cardiol. 2016;68(10):1014-20.")
    .input(InputField::number("nt_probnp", 0.0, 50000.0).unit("pg/mL"))
    .input(InputField::number("troponin_t", 0.0, 5.0).unit("ng/mL"))
    .extra("median_survival_months", OutputKind::Integer, "Median survival of the stage")
    .extra("four_year_survival", OutputKind::Text, "Four-year overall survival")
    .bands(BANDS)
    .example(json!({ "nt_probnp": 3500.0, "troponin_t": 0.03 }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let nt_probnp = input.number("nt_probnp")?;
    let troponin_t = input.number("troponin_t")?;

    let elevated = [nt_probnp > 3000.0, troponin_t > 0.05]
        .into_iter()
        .filter(|above| *above)
        .count();
    let band = banded(BANDS, elevated as f64)?;
    let survival = &SURVIVAL[elevated.min(2)];

    Ok(ScoreOutcome::new(
        band.stage,
        "stage",
        band.stage,
        band.description,
        format!(
            "Grogan {}: median survival {} months, four-year survival {}.",
            band.stage, survival.median_months, survival.four_year
        ),
    )
    .with_extra("median_survival_months", json!(survival.median_months))
    .with_extra("four_year_survival", json!(survival.four_year)))
}
