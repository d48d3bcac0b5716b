//! Ports layer: Trait definitions for classification.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the concrete classifiers (rule table,
//! trained model bundle).

mod classifier;

pub use classifier::{BinaryClassifier, RiskClassifier};
