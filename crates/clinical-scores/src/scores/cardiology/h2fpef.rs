//! H2FPEF probability of heart failure with preserved ejection fraction,
//! using the continuous logistic model.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::{banded, round_to};

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(24.9), "Low Probability", "HFpEF unlikely"),
    StageBand::new(
        Some(25.0),
        Some(75.0),
        "Intermediate Probability",
        "Further testing needed",
    ),
    StageBand::new(Some(75.1), Some(100.0), "High Probability", "HFpEF likely"),
];

const INTERCEPT: f64 = -9.1917;
const AGE: f64 = 0.0451;
const BMI: f64 = 0.1307;
const E_E_PRIME: f64 = 0.0859;
const PASP: f64 = 0.0520;
const ATRIAL_FIBRILLATION: f64 = 1.6997;

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "h2fpef",
        "H2FPEF Score for Heart Failure with Preserved Ejection Fraction",
        ScoreCategory::Cardiology,
        ScoreShape::Formula,
        OutputKind::Number,
    )
    .describe("Estimates the probability of HFpEF in patients with unexplained dyspnea.")
    .version("2018")
    .formula("y = -9.1917 + 0.0451·age + 0.1307·BMI + 0.0859·E/e′ + 0.0520·PASP + 1.6997·AF; probability = 100·eʸ/(1+eʸ)")
    .reference("Reddy YNV, Carter RE, Obokata M, Redfield MM, Borlaug BA. A Simple, Evidence-Based Approach to Help Guide Diagnosis of Heart Failure With Preserved Ejection Fraction. Circulation. 2018;138(9):861-870.")
    .note("Intended for euvolemic patients with an echocardiogram and preserved ejection fraction.")
    .input(InputField::integer("age", 18, 120).unit("years"))
    .input(InputField::number("bmi", 10.0, 80.0).unit("kg/m²"))
    .input(
        InputField::number("e_e_prime_ratio", 1.0, 50.0)
            .describe("Early mitral inflow velocity over early diastolic annular velocity"),
    )
    .input(
        InputField::integer("pasp", 15, 120)
            .unit("mmHg")
            .describe("Pulmonary artery systolic pressure by echocardiography"),
    )
    .input(InputField::flag("atrial_fibrillation"))
    .extra("logit", OutputKind::Number, "Linear predictor y before the logistic transform")
    .bands(BANDS)
    .example(json!({
        "age": 68,
        "bmi": 32.5,
        "e_e_prime_ratio": 12.5,
        "pasp": 42,
        "atrial_fibrillation": "yes"
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let age = input.integer("age")? as f64;
    let bmi = input.number("bmi")?;
    let ratio = input.number("e_e_prime_ratio")?;
    let pasp = input.integer("pasp")? as f64;
    let af = if input.flag("atrial_fibrillation")? { 1.0 } else { 0.0 };

    let y = INTERCEPT + AGE * age + BMI * bmi + E_E_PRIME * ratio + PASP * pasp + ATRIAL_FIBRILLATION * af;
    let probability = round_to(100.0 * y.exp() / (1.0 + y.exp()), 1);

    let band = banded(BANDS, probability)?;
    let advice = match band.stage {
        "Low Probability" => "Consider alternative causes of dyspnea.",
        "Intermediate Probability" => {
            "Consider invasive hemodynamic exercise testing or natriuretic peptide assessment."
        }
        _ => "Empiric HFpEF treatment should be considered.",
    };

    Ok(ScoreOutcome::new(
        probability,
        "%",
        band.stage,
        band.description,
        format!("HFpEF probability {probability:.1}%. {advice}"),
    )
    .with_extra("logit", json!(round_to(y, 4))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::testing::evaluate;

    #[test]
    fn example_follows_the_published_model() {
        let outcome = evaluate(&definition(), calculate, definition().example);
        assert_eq!(outcome.result.as_f64(), Some(95.6));
        assert_eq!(outcome.stage, "High Probability");
    }

    #[test]
    fn young_lean_patient_is_low_probability() {
        let outcome = evaluate(
            &definition(),
            calculate,
            json!({
                "age": 40,
                "bmi": 22.0,
                "e_e_prime_ratio": 6.0,
                "pasp": 25,
                "atrial_fibrillation": "no"
            }),
        );
        assert_eq!(outcome.result.as_f64(), Some(6.3));
        assert_eq!(outcome.stage, "Low Probability");
    }

    #[test]
    fn middle_of_the_range_is_intermediate() {
        let outcome = evaluate(
            &definition(),
            calculate,
            json!({
                "age": 55,
                "bmi": 30.0,
                "e_e_prime_ratio": 10.0,
                "pasp": 35,
                "atrial_fibrillation": false
            }),
        );
        assert_eq!(outcome.result.as_f64(), Some(47.2));
        assert_eq!(outcome.stage, "Intermediate Probability");
    }
}
