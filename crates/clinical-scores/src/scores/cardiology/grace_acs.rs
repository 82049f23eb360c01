//! GRACE in-hospital mortality score for acute coronary syndrome.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::banded;

const BANDS: &[StageBand] = &[
    StageBand::new(Some(0.0), Some(108.0), "Low Risk", "In-hospital mortality below 1%"),
    StageBand::new(Some(109.0), Some(140.0), "Intermediate Risk", "In-hospital mortality 1-3%"),
    StageBand::new(Some(141.0), None, "High Risk", "In-hospital mortality above 3%"),
];

const KILLIP_CLASSES: &[&str] = &["class_1", "class_2", "class_3", "class_4"];

/// `(upper bound exclusive, points)`; the last row catches everything above.
type Brackets = &'static [(f64, i64)];

const AGE: Brackets = &[
    (30.0, 0),
    (40.0, 8),
    (50.0, 25),
    (60.0, 41),
    (70.0, 58),
    (80.0, 75),
    (90.0, 91),
    (f64::INFINITY, 100),
];
const HEART_RATE: Brackets = &[
    (50.0, 0),
    (70.0, 3),
    (90.0, 9),
    (110.0, 15),
    (150.0, 24),
    (200.0, 38),
    (f64::INFINITY, 46),
];
const SYSTOLIC_BP: Brackets = &[
    (80.0, 58),
    (100.0, 53),
    (120.0, 43),
    (140.0, 34),
    (160.0, 24),
    (200.0, 10),
    (f64::INFINITY, 0),
];
const CREATININE: Brackets = &[
    (0.4, 1),
    (0.8, 4),
    (1.2, 7),
    (1.6, 10),
    (2.0, 13),
    (4.0, 21),
    (f64::INFINITY, 28),
];

fn bracket_points(brackets: Brackets, value: f64) -> i64 {
    brackets
        .iter()
        .find(|(upper, _)| value < *upper)
        .map_or(0, |(_, points)| *points)
}

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "grace_acs",
        "GRACE ACS Risk and Mortality Calculator",
        ScoreCategory::Cardiology,
        ScoreShape::WeightedSum,
        OutputKind::Integer,
    )
    .describe("Estimates in-hospital mortality after acute coronary syndrome.")
    .version("2003")
    .formula("Sum of points for age, heart rate, systolic BP, creatinine, Killip class, cardiac arrest, ST deviation and cardiac biomarkers")
    .reference("Granger CB, Goldberg RJ, Dabbous O, et al. Predictors of hospital mortality in the global registry of acute coronary events. Arch Intern Med. 2003;163(19):2345-53.")
    .reference("Fox KA, Dabbous OH, Goldberg RJ, et al. Prediction of risk of death and myocardial infarction in the six months after presentation with acute coronary syndrome: prospective multinational observational study (GRACE). BMJ. 2006;333(7578):1091.")
    .note("Points follow the published Granger 2003 in-hospital brackets. Some calculators report 142 (Intermediate Risk) for the bundled example instead of 153.")
    .input(InputField::integer("age", 18, 110).unit("years"))
    .input(InputField::integer("heart_rate", 30, 250).unit("beats/min"))
    .input(InputField::integer("systolic_bp", 50, 300).unit("mmHg"))
    .input(InputField::number("creatinine", 0.3, 15.0).unit("mg/dL"))
    .input(
        InputField::choice("killip_class", KILLIP_CLASSES)
            .describe("class_1 no CHF, class_2 rales/JVD, class_3 pulmonary edema, class_4 cardiogenic shock"),
    )
    .input(InputField::flag("cardiac_arrest").describe("Cardiac arrest at admission"))
    .input(InputField::flag("st_deviation"))
    .input(InputField::flag("elevated_biomarkers").describe("Elevated troponin or CK-MB"))
    .extra("components", OutputKind::Map, "Points contributed by each variable")
    .bands(BANDS)
    .example(json!({
        "age": 65,
        "heart_rate": 85,
        "systolic_bp": 130,
        "creatinine": 1.2,
        "killip_class": "class_1",
        "cardiac_arrest": "no",
        "st_deviation": "yes",
        "elevated_biomarkers": "yes"
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let age = bracket_points(AGE, input.integer("age")? as f64);
    let heart_rate = bracket_points(HEART_RATE, input.integer("heart_rate")? as f64);
    let systolic_bp = bracket_points(SYSTOLIC_BP, input.integer("systolic_bp")? as f64);
    let creatinine = bracket_points(CREATININE, input.number("creatinine")?);
    let killip: i64 = match input.choice("killip_class")? {
        "class_1" => 0,
        "class_2" => 20,
        "class_3" => 39,
        "class_4" => 59,
        other => {
            return Err(InputError::UnexpectedOption {
                field: "killip_class".to_string(),
                value: other.to_string(),
            })
        }
    };
    let arrest = input.points("cardiac_arrest", 39)?;
    let st_deviation = input.points("st_deviation", 28)?;
    let biomarkers = input.points("elevated_biomarkers", 14)?;

    let total = age + heart_rate + systolic_bp + creatinine + killip + arrest + st_deviation + biomarkers;
    let band = banded(BANDS, total as f64)?;
    let advice = match band.stage {
        "Low Risk" => "Conservative management may be appropriate.",
        "Intermediate Risk" => "Consider an early invasive strategy within 24-72 hours.",
        _ => "An early invasive strategy within 24 hours is recommended.",
    };

    Ok(ScoreOutcome::new(
        total,
        "points",
        band.stage,
        band.description,
        format!("GRACE score {total}. {advice}"),
    )
    .with_extra(
        "components",
        json!({
            "age": age,
            "heart_rate": heart_rate,
            "systolic_bp": systolic_bp,
            "creatinine": creatinine,
            "killip_class": killip,
            "cardiac_arrest": arrest,
            "st_deviation": st_deviation,
            "elevated_biomarkers": biomarkers,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::testing::evaluate;

    #[test]
    fn brackets_use_exclusive_upper_bounds() {
        assert_eq!(bracket_points(AGE, 29.0), 0);
        assert_eq!(bracket_points(AGE, 30.0), 8);
        assert_eq!(bracket_points(AGE, 90.0), 100);
        assert_eq!(bracket_points(SYSTOLIC_BP, 79.0), 58);
        assert_eq!(bracket_points(SYSTOLIC_BP, 200.0), 0);
        assert_eq!(bracket_points(CREATININE, 1.19), 7);
        assert_eq!(bracket_points(CREATININE, 1.2), 10);
    }

    #[test]
    fn example_is_high_risk() {
        let outcome = evaluate(&definition(), calculate, definition().example);
        assert_eq!(outcome.result.as_f64(), Some(153.0));
        assert_eq!(outcome.stage, "High Risk");
        assert_eq!(outcome.extras["components"]["age"], 58);
    }

    fn grace(
        age: i64,
        heart_rate: i64,
        systolic_bp: i64,
        creatinine: f64,
        biomarkers: bool,
    ) -> ScoreOutcome {
        evaluate(
            &definition(),
            calculate,
            json!({
                "age": age,
                "heart_rate": heart_rate,
                "systolic_bp": systolic_bp,
                "creatinine": creatinine,
                "killip_class": "class_1",
                "cardiac_arrest": "no",
                "st_deviation": "yes",
                "elevated_biomarkers": biomarkers
            }),
        )
    }

    #[test]
    fn stage_cut_points_sit_between_108_and_109_then_140_and_141() {
        let cases = [
            // 8 + 24 + 24 + 10 + 28 + 14
            (grace(35, 120, 145, 1.4, true), 108, "Low Risk"),
            // 8 + 3 + 43 + 13 + 28 + 14
            (grace(35, 60, 110, 1.8, true), 109, "Intermediate Risk"),
            // 41 + 15 + 43 + 13 + 28
            (grace(55, 100, 110, 1.8, false), 140, "Intermediate Risk"),
            // 25 + 24 + 43 + 7 + 28 + 14
            (grace(45, 120, 110, 0.9, true), 141, "High Risk"),
        ];
        for (outcome, total, stage) in cases {
            assert_eq!(outcome.result.as_f64(), Some(total as f64));
            assert_eq!(outcome.stage, stage, "{total}");
        }
    }

    #[test]
    fn metadata_explains_the_bracket_source() {
        assert!(definition()
            .notes
            .iter()
            .any(|note| note.contains("Granger 2003") && note.contains("142")));
    }

    #[test]
    fn young_stable_patient_is_low_risk() {
        let outcome = evaluate(
            &definition(),
            calculate,
            json!({
                "age": 45,
                "heart_rate": 72,
                "systolic_bp": 145,
                "creatinine": 0.9,
                "killip_class": "class_1",
                "cardiac_arrest": false,
                "st_deviation": false,
                "elevated_biomarkers": true
            }),
        );
        // 25 + 9 + 24 + 7 + 14
        assert_eq!(outcome.result.as_f64(), Some(79.0));
        assert_eq!(outcome.stage, "Low Risk");
    }
}
