//! # DiabetesCare
//!
//! Diabetes risk screening service.
//!
//! This crate provides:
//! - A rule-based threshold cascade over age, BMI and HbA1c
//! - A model-based classifier driven by a pre-trained bundle loaded from disk
//! - Treatment recommendations, educational content and CSV reports
//! - A JSON HTTP surface for local or containerized deployment
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (clinical record, classification, recommendations)
//! - `ports`: Trait definitions for the classifier seams
//! - `adapters`: Concrete implementations (rule table, model bundle, CSV, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `http`: axum routes and error mapping

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod ports;

pub use domain::{ClassificationResult, ClinicalRecord, DiabetesType, RiskLevel};

/// Result type for DiabetesCare operations
pub type Result<T> = std::result::Result<T, DiabetesCareError>;

/// Main error type for DiabetesCare
#[derive(Debug, thiserror::Error)]
pub enum DiabetesCareError {
    #[error("{0}")]
    Validation(#[from] domain::IntakeError),

    #[error("{0}")]
    Report(#[from] adapters::report::ReportError),

    #[error("{component} unavailable: {reason}")]
    ComponentUnavailable {
        component: adapters::model::BundleComponent,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
