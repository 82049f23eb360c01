//! End-to-end calculations through the HTTP catalog router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use clinical_scores::catalog::{catalog_router, CalculatorDispatcher, ScoreRegistry};

fn app() -> Router {
    let registry = ScoreRegistry::standard().expect("bundled scores register");
    catalog_router(Arc::new(CalculatorDispatcher::new(Arc::new(registry))))
}

async fn calculate(score_id: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::post(format!("/api/scores/{score_id}/calculate"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds");
    let response = app().oneshot(request).await.expect("router responds");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&body).expect("json payload"))
}

#[tokio::test]
async fn cha2ds2_vasc_for_a_72_year_old_woman_scores_five() {
    let (status, body) = calculate(
        "cha2ds2_vasc",
        json!({
            "age": 72,
            "sex": "female",
            "congestive_heart_failure": false,
            "hypertension": true,
            "stroke_tia_thromboembolism": false,
            "vascular_disease": true,
            "diabetes": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 5);
    assert_eq!(body["unit"], "points");
    assert_eq!(body["stage"], "High Risk");
}

#[tokio::test]
async fn adhere_stops_at_low_bun() {
    let (status, body) = calculate(
        "adhere",
        json!({ "bun": "under_43", "sbp": "under_115", "creatinine": "2_75_or_over" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 0);
    assert_eq!(body["stage"], "Low Risk");
}

#[tokio::test]
async fn aub_has2_without_factors_is_low_risk() {
    let (status, body) = calculate(
        "aub_has2",
        json!({
            "history_heart_disease": "no",
            "age_75_or_older": "no",
            "symptoms_angina_dyspnea": "no",
            "anemia_hgb_less_12": "no",
            "vascular_surgery": "no",
            "emergency_surgery": "no"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 0);
    assert_eq!(body["stage"], "Low Risk");
}

#[tokio::test]
async fn gillmore_with_favourable_biomarkers_is_stage_one() {
    let (status, body) =
        calculate("gillmore_staging", json!({ "nt_probnp": 2500.0, "egfr": 55.0 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "Stage I");
    assert_eq!(body["elevated_biomarkers"], 0);
}

#[tokio::test]
async fn duke_treadmill_follows_the_published_equation() {
    let (status, body) = calculate(
        "duke_treadmill",
        json!({ "exercise_time": 9.0, "st_deviation": 2.0, "angina_index": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], -1.0);
    assert_eq!(body["stage"], "Moderate Risk");
}

#[tokio::test]
async fn framingham_two_major_criteria_diagnose_heart_failure() {
    let mut payload = json!({});
    for name in [
        "acute_pulmonary_edema",
        "cardiomegaly",
        "hepatojugular_reflex",
        "neck_vein_distention",
        "paroxysmal_nocturnal_dyspnea_orthopnea",
        "pulmonary_rales",
        "third_heart_sound",
        "ankle_edema",
        "dyspnea_on_exertion",
        "hepatomegaly",
        "nocturnal_cough",
        "pleural_effusion",
        "tachycardia",
    ] {
        payload[name] = json!(matches!(name, "cardiomegaly" | "third_heart_sound"));
    }

    let (status, body) = calculate("framingham_hf", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 1);
    assert_eq!(body["major_criteria_count"], 2);
    assert_eq!(body["minor_criteria_count"], 0);
}

#[tokio::test]
async fn out_of_range_input_is_a_validation_error() {
    let (status, body) = calculate(
        "curb_65",
        json!({
            "confusion": "maybe",
            "bun": 22.0,
            "respiratory_rate": 24,
            "systolic_bp": 110,
            "diastolic_bp": 70,
            "age": 7
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "ValidationError");
    let fields: Vec<&str> = body["details"]["violations"]
        .as_array()
        .expect("violations listed")
        .iter()
        .filter_map(|violation| violation["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["confusion", "age"]);
}

#[tokio::test]
async fn unknown_score_is_not_found() {
    let (status, body) = calculate("apache_ii", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ScoreNotFound");
    assert_eq!(body["details"]["score_id"], "apache_ii");
}
