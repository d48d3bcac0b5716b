//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with the classifier ports to
//! implement the screening use cases.

mod assessment;

pub use assessment::{Assessment, AssessmentService, ExportedReport};
