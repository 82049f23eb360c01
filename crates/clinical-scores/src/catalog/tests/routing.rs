use super::common::*;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::catalog::router::{list_handler, metadata_handler, validate_handler};
use crate::catalog::ScoreQuery;

#[tokio::test]
async fn calculate_route_returns_the_output_record() {
    let response = router()
        .oneshot(post_json(
            "/api/scores/cha2ds2_vasc/calculate",
            json!({
                "age": 72,
                "sex": "female",
                "congestive_heart_failure": "no",
                "hypertension": "yes",
                "stroke_tia_thromboembolism": "no",
                "vascular_disease": "yes",
                "diabetes": "yes"
            })
            .to_string(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result"], 5);
    assert_eq!(payload["unit"], "points");
    assert_eq!(payload["stage"], "High Risk");
    assert!(payload["components"].is_object());
}

#[tokio::test]
async fn calculate_route_reports_every_violation() {
    let response = router()
        .oneshot(post_json(
            "/api/scores/cha2ds2_vasc/calculate",
            json!({ "age": 130, "sex": "unknown" }).to_string(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "ValidationError");
    let violations = payload["details"]["violations"]
        .as_array()
        .expect("violations listed");
    assert_eq!(violations.len(), 7);
    assert_eq!(violations[0]["field"], "age");
}

#[tokio::test]
async fn calculate_route_rejects_unreadable_bodies() {
    for body in ["not json", "[1, 2, 3]"] {
        let response = router()
            .oneshot(post_json("/api/scores/chads2/calculate", body))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"], "ValidationError");
    }
}

#[tokio::test]
async fn oversized_bodies_hit_the_transport_limit() {
    let response = router()
        .layer(DefaultBodyLimit::max(16))
        .oneshot(post_json(
            "/api/scores/gillmore_staging/calculate",
            json!({ "nt_probnp": 2500.0, "egfr": 55.0 }).to_string(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unknown_scores_are_not_found_on_every_route() {
    let router = router();
    let requests = [
        get("/api/scores/not_a_score"),
        get("/api/scores/not_a_score/validate"),
        post_json("/api/scores/not_a_score/calculate", "{}"),
        post_json("/api/scores/not_a_score/calculate", "garbage"),
        post_csv("/api/scores/not_a_score/batch", "a\n1\n"),
    ];
    for request in requests {
        let uri = request.uri().to_string();
        let response = router.clone().oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"], "ScoreNotFound", "{uri}");
    }
}

#[tokio::test]
async fn list_handler_filters_by_search_then_category() {
    let all = read_json_body(
        list_handler(State(dispatcher()), Query(ScoreQuery::default())).await,
    )
    .await;
    assert_eq!(all["total"], 15);

    let nephrology = read_json_body(
        list_handler(
            State(dispatcher()),
            Query(ScoreQuery {
                category: Some("Nephrology".to_string()),
                search: None,
            }),
        )
        .await,
    )
    .await;
    assert_eq!(nephrology["total"], 1);
    assert_eq!(nephrology["scores"][0]["id"], "ckd_epi_2021");

    let searched = read_json_body(
        list_handler(
            State(dispatcher()),
            Query(ScoreQuery {
                category: Some("nephrology".to_string()),
                search: Some("pneumonia".to_string()),
            }),
        )
        .await,
    )
    .await;
    assert_eq!(searched["total"], 1);
    assert_eq!(searched["scores"][0]["id"], "curb_65");
}

#[tokio::test]
async fn metadata_handler_serves_the_full_definition() {
    let response = metadata_handler(State(dispatcher()), Path("gillmore_staging".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], "gillmore_staging");
    assert_eq!(payload["category"], "cardiology");
    assert_eq!(payload["shape"], "staging");
    assert_eq!(payload["input_fields"][0]["name"], "nt_probnp");
    assert_eq!(payload["interpretation"].as_array().map(Vec::len), Some(3));
    assert!(payload["example"].is_object());
}

#[tokio::test]
async fn validate_handler_confirms_registered_calculators() {
    let response = validate_handler(State(dispatcher()), Path("adhere".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload,
        json!({
            "score_id": "adhere",
            "score_exists": true,
            "calculator_available": true,
            "status": "ready",
        })
    );
}

#[tokio::test]
async fn categories_route_lists_specialties() {
    let response = router()
        .oneshot(get("/api/categories"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload,
        json!({
            "categories": ["cardiology", "nephrology", "pulmonology"],
            "total": 3,
        })
    );
}

#[tokio::test]
async fn batch_route_answers_undecodable_csv_with_a_json_error() {
    let request = Request::post("/api/scores/gillmore_staging/batch")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(vec![b'n', b't', 0xff, b'\n']))
        .expect("request builds");
    let response = router().oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "ValidationError");
}

#[tokio::test]
async fn batch_route_reports_each_row() {
    let response = router()
        .oneshot(post_csv(
            "/api/scores/framingham_hf/batch",
            "acute_pulmonary_edema,cardiomegaly,hepatojugular_reflex,neck_vein_distention,paroxysmal_nocturnal_dyspnea_orthopnea,pulmonary_rales,third_heart_sound,ankle_edema,dyspnea_on_exertion,hepatomegaly,nocturnal_cough,pleural_effusion,tachycardia\n\
             yes,yes,no,no,no,no,no,no,no,no,no,no,no\n\
             no,no,no,no,no,no,no,no,no,no,no,no,no\n\
             no,no,no,no,no,no,no,no,no,no,no,no\n",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["succeeded"], 2);
    assert_eq!(payload["rows"][2]["error"]["error"], "ValidationError");
    assert_eq!(
        payload["rows"][2]["error"]["details"]["violations"][0]["field"],
        "tachycardia"
    );

    let response = router()
        .oneshot(post_csv(
            "/api/scores/framingham_hf/batch",
            "acute_pulmonary_edema,cardiomegaly,hepatojugular_reflex,neck_vein_distention,paroxysmal_nocturnal_dyspnea_orthopnea,pulmonary_rales,third_heart_sound,ankle_edema,dyspnea_on_exertion,hepatomegaly,nocturnal_cough,pleural_effusion,tachycardia\n\
             yes,yes,no,no,no,no,no,no,no,no,no,no,no\n\
             no,no,no,no,no,no,no,no,no,no,no,no,no\n\
             no,no,no,no,no,no,no,no,no,no,no,no,maybe\n",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 3);
    assert_eq!(payload["succeeded"], 2);
    assert_eq!(payload["rows"][0]["outcome"]["result"], 1);
    assert_eq!(payload["rows"][1]["outcome"]["result"], 0);
    assert_eq!(payload["rows"][2]["error"]["error"], "ValidationError");
}
