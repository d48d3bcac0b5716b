//! Adapters layer: Concrete implementations of ports.
//!
//! - `rules`: threshold cascade classifier
//! - `model`: pre-trained bundle loader and classifier
//! - `report`: CSV report rendering
//! - `sanitize`: PII filtering for logs

pub mod model;
pub mod report;
pub mod rules;
pub mod sanitize;
