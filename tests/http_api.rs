use std::path::Path;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use diabetescare::adapters::model::TrainedModelBundle;
use diabetescare::application::AssessmentService;
use diabetescare::domain::{ClinicalThresholds, IntakePolicy};
use diabetescare::http::router;

fn app_with_models(dir: &Path, policy: IntakePolicy) -> Router {
    let bundle = Arc::new(TrainedModelBundle::load(dir));
    let service = AssessmentService::from_thresholds(&ClinicalThresholds::default(), policy, bundle);
    router(Arc::new(service))
}

fn app() -> Router {
    app_with_models(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("models"),
        IntakePolicy::Strict,
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, headers, body)
}

async fn post_json(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request");
    let (status, _, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let (status, _, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn full_body() -> Value {
    json!({
        "Age": "62",
        "BMI": "33.5",
        "HbA1c": "8.1",
        "Gender": "Male",
        "Hypertension": "1",
        "HeartDisease": 0,
        "SmokingHistory": "former"
    })
}

#[tokio::test]
async fn test_health_reports_bundle() {
    let (status, body) = get_json(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rule_strategy"], "available");
    assert_eq!(body["model"]["model_loaded"], true);
    assert_eq!(body["model"]["scaler_loaded"], true);
    assert_eq!(body["model"]["label_encoders_loaded"], true);
    assert_eq!(body["model"]["feature_names_loaded"], true);
}

#[tokio::test]
async fn test_rule_prediction() {
    let (status, body) = post_json(
        app(),
        "/api/predict",
        json!({"Age": 25, "BMI": 28.5, "HbA1c": 6.8}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["diabetes_type"], "Type 1 Diabetes");
    assert_eq!(body["risk_level"], "High Risk");
    assert_eq!(body["alert"], "danger");
    assert_eq!(body["explanation"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["focus"], json!(["medical", "monitoring"]));
    assert!(body.get("prediction_probability").is_none());
    assert!(body["timestamp"].as_str().is_some_and(|t| t.contains('T')));
    assert!(!body["recommendations"]["immediate"]
        .as_array()
        .expect("immediate advice")
        .is_empty());
    assert_eq!(
        body["summary"],
        "Diabetes detected. Type: Type 1 Diabetes. Risk Level: High Risk."
    );
}

#[tokio::test]
async fn test_rule_prediction_low_risk() {
    let (status, body) = post_json(
        app(),
        "/api/predict",
        json!({"Age": "35", "BMI": "22.0", "HbA1c": "5.2"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 0);
    assert_eq!(body["risk_level"], "Low Risk");
    assert_eq!(body["alert"], "success");
    assert_eq!(body["recommendations"]["immediate"], json!([]));
}

#[tokio::test]
async fn test_empty_and_malformed_bodies() {
    for body in ["", "   ", "{}", "not json", "[1, 2]"] {
        let (status, json) = post_json(app(), "/api/predict", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(json["error"], "No data provided", "body {body:?}");
    }
}

#[tokio::test]
async fn test_strict_intake_rejects_out_of_range() {
    let (status, body) = post_json(
        app(),
        "/api/predict",
        json!({"Age": 150, "BMI": 22, "HbA1c": 5.0}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Age")));
}

#[tokio::test]
async fn test_lenient_intake_requires_positive_values() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
    let (status, body) = post_json(
        app_with_models(&dir, IntakePolicy::Lenient),
        "/api/predict",
        json!({"Age": "", "BMI": 22, "HbA1c": 5.0}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Please fill in all required fields (Age, BMI, HbA1c) with valid numbers."
    );
}

#[tokio::test]
async fn test_model_prediction() {
    let (status, body) = post_json(app(), "/api/predict/model", full_body().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["diabetes_type"], "Type 2 Diabetes");
    let p = body["prediction_probability"].as_f64().expect("probability");
    assert!((0.5..=1.0).contains(&p));
    assert!(body["risk_description"].is_string());
    assert!(body.get("explanation").is_none());
}

#[tokio::test]
async fn test_model_prediction_requires_all_fields() {
    let (status, body) = post_json(
        app(),
        "/api/predict/model",
        json!({"Age": 50, "BMI": 30, "HbA1c": 6.0}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Gender is required");
}

#[tokio::test]
async fn test_model_unavailable_without_bundle() {
    let temp = tempfile::tempdir().expect("tempdir");
    let app = app_with_models(temp.path(), IntakePolicy::Strict);

    let (status, body) = post_json(app.clone(), "/api/predict/model", full_body().to_string()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("unavailable")));

    // Rule strategy keeps working.
    let (status, _) = post_json(
        app.clone(),
        "/api/predict",
        json!({"Age": 45, "BMI": 32.0, "HbA1c": 7.2}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, health) = get_json(app, "/health").await;
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["model"]["model_loaded"], false);
}

#[tokio::test]
async fn test_education() {
    let (status, body) = get_json(app(), "/api/education?diabetes_type=Type%202%20Diabetes").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["general"].as_array().expect("general").is_empty());
    assert!(!body["specific"].as_array().expect("specific").is_empty());

    let (_, body) = get_json(app(), "/api/education").await;
    assert_eq!(body["specific"], json!([]));
}

#[tokio::test]
async fn test_model_artifacts_inventory() {
    let (status, body) = get_json(app(), "/api/model/artifacts").await;
    assert_eq!(status, StatusCode::OK);
    let artifacts = body["artifacts"].as_array().expect("artifacts");
    assert_eq!(artifacts.len(), 4);
    assert_eq!(artifacts[0]["file_name"], "model.json");
    assert!(artifacts.iter().all(|a| a["loaded"] == true));
    assert!(artifacts
        .iter()
        .all(|a| a["sha256"].as_str().is_some_and(|s| s.len() == 64)));
}

#[tokio::test]
async fn test_export_report() {
    let request = Request::post("/export-report")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "Age": 45,
                "BMI": 32.0,
                "HbA1c": 7.2,
                "prediction": 1,
                "risk_level": "High Risk",
                "diabetes_type": "Type 2 Diabetes",
                "recommendations": {"immediate": ["See your doctor"]}
            })
            .to_string(),
        ))
        .expect("request");
    let (status, headers, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("text/csv; charset=utf-8")
    );
    let disposition = headers
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .expect("disposition");
    assert!(disposition.starts_with("attachment; filename=\"diabetes_prediction_report_anonymous_"));
    assert!(disposition.ends_with(".csv\""));

    let text = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(text.starts_with("Diabetes Prediction Report\r\n"));
    assert!(text.contains("Prediction,Diabetes\r\n"));
    assert!(text.contains("Immediate\r\n,See your doctor\r\n"));
}

#[tokio::test]
async fn test_export_report_requires_data() {
    let (status, body) = post_json(app(), "/export-report", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided for export");
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = get_json(app(), "/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Page not found");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let request = Request::options("/api/predict")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .expect("request");
    let (status, headers, _) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    let header_value = |name| headers.get(name).and_then(|v| v.to_str().ok());
    assert_eq!(header_value(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    assert_eq!(header_value(header::ACCESS_CONTROL_ALLOW_HEADERS), Some("*"));
    assert!(header_value(header::ACCESS_CONTROL_ALLOW_METHODS).is_some_and(|m| m.contains("POST")));
}

#[test]
fn test_shipped_bundle_is_marked_as_demonstration() {
    let readme = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("models").join("README.md"),
    )
    .expect("models/README.md");
    assert!(readme.contains("demonstration weights"));
    assert!(readme.contains("not exported from a training run"));
}
