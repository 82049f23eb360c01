//! Properties every bundled score must hold when driven through the public
//! dispatcher: determinism, totality on documented examples, lossless wire
//! form, monotonic additive scores and bounded point totals.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use clinical_scores::catalog::{
    CalculatorDispatcher, InputKind, ScoreDefinition, ScoreOutcome, ScoreRegistry,
};

fn dispatcher() -> CalculatorDispatcher {
    let registry = ScoreRegistry::standard().expect("bundled scores register");
    CalculatorDispatcher::new(Arc::new(registry))
}

fn example_of(definition: &ScoreDefinition) -> Map<String, Value> {
    definition
        .example
        .as_object()
        .cloned()
        .unwrap_or_else(|| panic!("{} example is an object", definition.id))
}

fn flag_names(definition: &ScoreDefinition) -> Vec<&'static str> {
    definition
        .input_fields
        .iter()
        .filter(|field| field.kind == InputKind::Flag)
        .map(|field| field.name)
        .collect()
}

fn is_absent(value: &Value) -> bool {
    matches!(value, Value::Bool(false)) || value.as_str() == Some("no")
}

fn run(
    dispatcher: &CalculatorDispatcher,
    definition: &ScoreDefinition,
    raw: &Map<String, Value>,
) -> ScoreOutcome {
    dispatcher
        .execute(definition.id, raw)
        .unwrap_or_else(|err| panic!("{} failed on {raw:?}: {err}", definition.id))
}

#[test]
fn every_documented_example_calculates() {
    let dispatcher = dispatcher();
    for definition in dispatcher.registry().list() {
        let outcome = run(&dispatcher, definition, &example_of(definition));
        assert!(
            definition.stage_rank(&outcome.stage).is_some(),
            "{} produced stage '{}' outside its bands",
            definition.id,
            outcome.stage
        );
        assert!(!outcome.interpretation.is_empty(), "{}", definition.id);
    }
}

#[test]
fn repeated_calls_are_identical() {
    let dispatcher = dispatcher();
    for definition in dispatcher.registry().list() {
        let raw = example_of(definition);
        let first = run(&dispatcher, definition, &raw);
        let second = run(&dispatcher, definition, &raw);
        assert_eq!(first, second, "{} is not deterministic", definition.id);
    }
}

#[test]
fn outcomes_survive_the_wire_unchanged() {
    let dispatcher = dispatcher();
    for definition in dispatcher.registry().list() {
        let outcome = run(&dispatcher, definition, &example_of(definition));
        let wire = serde_json::to_string(&outcome).expect("outcome serializes");
        let parsed: ScoreOutcome = serde_json::from_str(&wire).expect("outcome parses");
        assert_eq!(parsed, outcome, "{} lost data on the wire", definition.id);
    }
}

#[test]
fn adding_a_factor_never_lowers_an_additive_score() {
    let dispatcher = dispatcher();
    let additive = dispatcher
        .registry()
        .list()
        .filter(|definition| definition.shape.is_additive())
        .collect::<Vec<_>>();
    assert!(additive.len() >= 9);

    for definition in additive {
        let base = example_of(definition);
        let baseline = run(&dispatcher, definition, &base);
        let base_value = baseline.result.as_f64().expect("additive scores are numeric");
        let base_rank = definition.stage_rank(&baseline.stage).expect("ranked stage");

        for name in flag_names(definition) {
            if !base.get(name).map_or(false, is_absent) {
                continue;
            }
            let mut raised = base.clone();
            raised.insert(name.to_string(), json!(true));
            let outcome = run(&dispatcher, definition, &raised);

            let value = outcome.result.as_f64().expect("numeric result");
            assert!(
                value >= base_value,
                "{}: setting {name} moved result {base_value} -> {value}",
                definition.id
            );
            let rank = definition.stage_rank(&outcome.stage).expect("ranked stage");
            assert!(
                rank >= base_rank,
                "{}: setting {name} lowered stage {} -> {}",
                definition.id,
                baseline.stage,
                outcome.stage
            );
        }
    }
}

#[test]
fn point_totals_stay_within_published_ranges() {
    let bounds: &[(&str, f64, f64)] = &[
        ("cha2ds2_vasc", 0.0, 9.0),
        ("cha2ds2_va", 0.0, 8.0),
        ("chads2", 0.0, 6.0),
        ("atria_bleeding", 0.0, 10.0),
        ("aub_has2", 0.0, 6.0),
        ("dapt", -2.0, 10.0),
        ("curb_65", 0.0, 5.0),
        ("framingham_hf", 0.0, 1.0),
    ];
    let dispatcher = dispatcher();

    for (id, min, max) in bounds {
        let definition = dispatcher
            .registry()
            .lookup(id)
            .unwrap_or_else(|_| panic!("{id} is registered"))
            .definition
            .clone();
        let flags = flag_names(&definition);

        for present in [false, true] {
            let mut raw = example_of(&definition);
            for name in &flags {
                raw.insert(name.to_string(), json!(present));
            }
            let value = run(&dispatcher, &definition, &raw)
                .result
                .as_f64()
                .expect("numeric result");
            assert!(
                (*min..=*max).contains(&value),
                "{id} produced {value} outside [{min}, {max}]"
            );
        }
    }
}

#[test]
fn input_failures_never_reach_the_score_function() {
    let dispatcher = dispatcher();
    for definition in dispatcher.registry().list() {
        let err = dispatcher
            .execute(definition.id, &Map::new())
            .expect_err("empty input is rejected");
        let body = err.body();
        let violations = body.details.expect("details")["violations"]
            .as_array()
            .map(Vec::len)
            .unwrap_or_default();
        assert_eq!(
            violations,
            definition.input_fields.len(),
            "{} must report every missing field",
            definition.id
        );
    }
}
