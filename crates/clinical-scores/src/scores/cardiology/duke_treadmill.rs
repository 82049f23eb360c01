//! Duke Treadmill Score.

use serde_json::json;

use crate::catalog::{
    InputError, InputField, OutputKind, ScoreCategory, ScoreDefinition, ScoreInput, ScoreOutcome,
    ScoreShape, StageBand,
};
use crate::scores::{banded, round_to};

// results carry one decimal, so the bands tile the range
const BANDS: &[StageBand] = &[
    StageBand::new(Some(5.0), None, "Low Risk", "Annual mortality about 0.25%"),
    StageBand::new(Some(-10.9), Some(4.9), "Moderate Risk", "Annual mortality about 1.25%"),
    StageBand::new(None, Some(-11.0), "High Risk", "Annual mortality about 5%"),
];

pub fn definition() -> ScoreDefinition {
    ScoreDefinition::new(
        "duke_treadmill",
        "Duke Treadmill Score",
        ScoreCategory::Cardiology,
        ScoreShape::Formula,
        OutputKind::Number,
    )
    .describe("Prognosis after a Bruce protocol exercise treadmill test.")
    .version("1991")
    .formula("Exercise time − (5 × ST deviation) − (4 × angina index)")
    .reference("Mark DB, Shaw L, Harrell FE Jr, et al. Prognostic value of a treadmill exercise score in outpatients with suspected coronary artery disease. N Engl J Med. 1991;325(12):849-53.")
    .note("Angina index: 0 none, 1 non-limiting angina, 2 exercise-limiting angina.")
    .input(InputField::number("exercise_time", 0.0, 30.0).unit("minutes"))
    .input(InputField::number("st_deviation", 0.0, 10.0).unit("mm"))
    .input(InputField::integer("angina_index", 0, 2))
    .bands(BANDS)
    .example(json!({
        "exercise_time": 9.0,
        "st_deviation": 2.0,
        "angina_index": 0
    }))
}

pub fn calculate(input: &ScoreInput) -> Result<ScoreOutcome, InputError> {
    let exercise_time = input.number("exercise_time")?;
    let st_deviation = input.number("st_deviation")?;
    let angina_index = input.integer("angina_index")?;

    let score = round_to(
        exercise_time - 5.0 * st_deviation - 4.0 * angina_index as f64,
        1,
    );
    let band = banded(BANDS, score)?;
    let advice = match band.stage {
        "Low Risk" => "Medical therapy is usually sufficient.",
        "High Risk" => "Refer for coronary angiography.",
        _ => "Consider further testing such as stress imaging or angiography.",
    };

    Ok(ScoreOutcome::new(
        score,
        "points",
        band.stage,
        band.description,
        format!("Duke Treadmill Score {score:.1}. {advice}"),
    ))
}
