//! HTTP surface: axum routes over the assessment service.
//!
//! Request bodies are read as raw bytes and parsed by the intake layer, so
//! an empty or non-JSON body gets the same 400 as an empty object instead of
//! axum's extractor rejection.

mod error;

use std::any::Any;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{error_response, GENERIC_FAILURE};

use crate::adapters::model::{ArtifactReport, BundleStatus};
use crate::adapters::report::ReportRequest;
use crate::application::{Assessment, AssessmentService};
use crate::domain::{
    AlertClass, DiabetesType, EducationalContent, RawIntake, RecommendationCategory,
    RecommendationSet, RiskLevel, Strategy,
};
use crate::DiabetesCareError;

type SharedService = Arc<AssessmentService>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    rule_strategy: &'static str,
    model: BundleStatus,
}

#[derive(Debug, Serialize)]
struct PredictionResponse {
    prediction: u8,
    risk_level: RiskLevel,
    diabetes_type: DiabetesType,
    recommendations: RecommendationSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction_probability: Option<f64>,
    summary: String,
    alert: AlertClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    risk_description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    focus: Option<Vec<RecommendationCategory>>,
    timestamp: String,
}

impl From<Assessment> for PredictionResponse {
    fn from(a: Assessment) -> Self {
        let result = a.result;
        let summary = result.summary();
        let alert = result.alert();
        let (explanation, focus, prediction_probability, risk_description) = match result.strategy
        {
            Strategy::Rule => (Some(result.explanation), Some(result.focus), None, None),
            Strategy::Model => (
                None,
                None,
                result.probability,
                Some(result.risk_level.description()),
            ),
        };

        Self {
            prediction: result.prediction,
            risk_level: result.risk_level,
            diabetes_type: result.diabetes_type,
            recommendations: a.recommendations,
            explanation,
            prediction_probability,
            summary,
            alert,
            risk_description,
            focus,
            timestamp: a.assessed_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EducationQuery {
    #[serde(default)]
    diabetes_type: String,
}

#[derive(Debug, Serialize)]
struct ArtifactsResponse {
    model_dir: Option<String>,
    artifacts: Vec<ArtifactReport>,
}

/// Build the application router.
pub fn router(service: SharedService) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(cors::Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/predict", post(predict_rule))
        .route("/api/predict/model", post(predict_model))
        .route("/api/education", get(education))
        .route("/api/model/artifacts", get(model_artifacts))
        .route("/export-report", post(export_report))
        .fallback(not_found)
        .with_state(service)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
}

async fn health(State(service): State<SharedService>) -> Json<HealthResponse> {
    let model = service.model_status();
    Json(HealthResponse {
        status: if model.is_complete() { "ok" } else { "degraded" },
        rule_strategy: "available",
        model,
    })
}

fn assess(
    service: &AssessmentService,
    strategy: Strategy,
    body: &[u8],
) -> Result<Json<PredictionResponse>, DiabetesCareError> {
    let raw = RawIntake::from_json_bytes(body)?;
    let assessment = service.assess(strategy, &raw)?;
    Ok(Json(assessment.into()))
}

async fn predict_rule(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, DiabetesCareError> {
    assess(&service, Strategy::Rule, &body)
}

async fn predict_model(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, DiabetesCareError> {
    assess(&service, Strategy::Model, &body)
}

async fn education(
    State(service): State<SharedService>,
    Query(query): Query<EducationQuery>,
) -> Json<EducationalContent> {
    Json(service.education(&query.diabetes_type))
}

async fn model_artifacts(State(service): State<SharedService>) -> Json<ArtifactsResponse> {
    Json(ArtifactsResponse {
        model_dir: service.model_dir().map(|d| d.display().to_string()),
        artifacts: service.model_artifacts().to_vec(),
    })
}

async fn export_report(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<Response, DiabetesCareError> {
    let request = ReportRequest::from_json_bytes(&body)?;
    let report = service.export_report(&request);
    let disposition = format!("attachment; filename=\"{}\"", report.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.content,
    )
        .into_response())
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Page not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {detail}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
}
