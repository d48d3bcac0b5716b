//! Trained model bundle: the four artifacts exported by the training
//! pipeline, loaded once at startup.
//!
//! Each artifact is resolved by a fixed file name inside the model
//! directory and loaded independently. A missing, unreadable, malformed or
//! inconsistent artifact becomes [`Artifact::Unavailable`] with the reason;
//! loading itself never fails, so the process keeps serving the rule
//! strategy while the model strategy reports the gap.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::classifier::LinearClassifier;
use super::preprocess::{LabelEncoders, MinMaxScaler};
use crate::domain::FEATURE_NAMES;
use crate::DiabetesCareError;

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const LABEL_ENCODERS_FILE: &str = "label_encoders.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// Encoder keys the model strategy reads.
pub const GENDER_ENCODER: &str = "gender";
pub const SMOKING_ENCODER: &str = "smoking_history";

/// One artifact of the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleComponent {
    Classifier,
    Scaler,
    LabelEncoders,
    FeatureNames,
}

impl BundleComponent {
    pub const ALL: [Self; 4] = [
        Self::Classifier,
        Self::Scaler,
        Self::LabelEncoders,
        Self::FeatureNames,
    ];

    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Classifier => MODEL_FILE,
            Self::Scaler => SCALER_FILE,
            Self::LabelEncoders => LABEL_ENCODERS_FILE,
            Self::FeatureNames => FEATURE_NAMES_FILE,
        }
    }
}

impl std::fmt::Display for BundleComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classifier => write!(f, "Model"),
            Self::Scaler => write!(f, "Scaler"),
            Self::LabelEncoders => write!(f, "Label encoders"),
            Self::FeatureNames => write!(f, "Feature names"),
        }
    }
}

/// A loaded artifact, or the reason it is not available.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact<T> {
    Loaded(T),
    Unavailable(String),
}

impl<T> Artifact<T> {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Borrow the artifact or fail with a component-specific error.
    ///
    /// # Errors
    /// Returns `DiabetesCareError::ComponentUnavailable` if not loaded.
    pub fn require(&self, component: BundleComponent) -> Result<&T, DiabetesCareError> {
        match self {
            Self::Loaded(value) => Ok(value),
            Self::Unavailable(reason) => Err(DiabetesCareError::ComponentUnavailable {
                component,
                reason: reason.clone(),
            }),
        }
    }

    fn error(&self) -> Option<String> {
        match self {
            Self::Loaded(_) => None,
            Self::Unavailable(reason) => Some(reason.clone()),
        }
    }
}

/// What was found on disk for one artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactReport {
    pub component: BundleComponent,
    pub file_name: &'static str,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    /// SHA-256 of the file contents, lowercase hex
    pub sha256: Option<String>,
    pub loaded: bool,
    pub error: Option<String>,
}

/// Load flags, one per artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BundleStatus {
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub label_encoders_loaded: bool,
    pub feature_names_loaded: bool,
}

impl BundleStatus {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.model_loaded && self.scaler_loaded && self.label_encoders_loaded && self.feature_names_loaded
    }
}

/// Immutable model bundle. Shared read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct TrainedModelBundle {
    dir: Option<PathBuf>,
    classifier: Artifact<LinearClassifier>,
    scaler: Artifact<MinMaxScaler>,
    encoders: Artifact<LabelEncoders>,
    feature_names: Artifact<Vec<String>>,
    reports: Vec<ArtifactReport>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn load_artifact<T, F>(dir: &Path, component: BundleComponent, check: F) -> (Artifact<T>, ArtifactReport)
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> Result<(), String>,
{
    let file_name = component.file_name();
    let path = dir.join(file_name);
    let mut report = ArtifactReport {
        component,
        file_name,
        exists: false,
        size_bytes: None,
        sha256: None,
        loaded: false,
        error: None,
    };

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            report.exists = e.kind() != ErrorKind::NotFound && path.exists();
            let reason = if e.kind() == ErrorKind::NotFound {
                format!("{file_name} not found in {}", dir.display())
            } else {
                format!("failed to read {file_name}: {e}")
            };
            tracing::warn!("{component} unavailable: {reason}");
            report.error = Some(reason.clone());
            return (Artifact::Unavailable(reason), report);
        }
    };

    report.exists = true;
    report.size_bytes = Some(bytes.len() as u64);
    report.sha256 = Some(sha256_hex(&bytes));

    let artifact = match serde_json::from_slice::<T>(&bytes) {
        Ok(value) => match check(&value) {
            Ok(()) => Artifact::Loaded(value),
            Err(reason) => Artifact::Unavailable(format!("{file_name}: {reason}")),
        },
        Err(e) => Artifact::Unavailable(format!("failed to parse {file_name}: {e}")),
    };

    match &artifact {
        Artifact::Loaded(_) => tracing::info!("Loaded {file_name} ({} bytes)", bytes.len()),
        Artifact::Unavailable(reason) => tracing::warn!("{component} unavailable: {reason}"),
    }
    report.loaded = artifact.is_loaded();
    report.error = artifact.error();
    (artifact, report)
}

fn check_feature_names(names: &Vec<String>) -> Result<(), String> {
    if names.iter().map(String::as_str).eq(FEATURE_NAMES.iter().copied()) {
        Ok(())
    } else {
        Err(format!(
            "feature order {names:?} does not match expected {FEATURE_NAMES:?}"
        ))
    }
}

impl TrainedModelBundle {
    /// Load all four artifacts from `dir`.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        tracing::info!("Loading model bundle from {:?}", dir);
        let n = FEATURE_NAMES.len();

        let (classifier, r1) =
            load_artifact(dir, BundleComponent::Classifier, |m: &LinearClassifier| m.check(n));
        let (scaler, r2) =
            load_artifact(dir, BundleComponent::Scaler, |s: &MinMaxScaler| s.check(n));
        let (encoders, r3) = load_artifact(dir, BundleComponent::LabelEncoders, |e: &LabelEncoders| {
            e.check(&[GENDER_ENCODER, SMOKING_ENCODER])
        });
        let (feature_names, r4) =
            load_artifact(dir, BundleComponent::FeatureNames, check_feature_names);

        let bundle = Self {
            dir: Some(dir.to_path_buf()),
            classifier,
            scaler,
            encoders,
            feature_names,
            reports: vec![r1, r2, r3, r4],
        };

        if bundle.status().is_complete() {
            tracing::info!("Model bundle complete");
        } else {
            tracing::warn!("Model bundle incomplete; model strategy will report unavailable");
        }
        bundle
    }

    /// Assemble a bundle from in-memory artifacts.
    #[must_use]
    pub fn from_parts(
        classifier: Artifact<LinearClassifier>,
        scaler: Artifact<MinMaxScaler>,
        encoders: Artifact<LabelEncoders>,
        feature_names: Artifact<Vec<String>>,
    ) -> Self {
        let flags = [
            (BundleComponent::Classifier, classifier.error()),
            (BundleComponent::Scaler, scaler.error()),
            (BundleComponent::LabelEncoders, encoders.error()),
            (BundleComponent::FeatureNames, feature_names.error()),
        ];
        let reports = flags
            .into_iter()
            .map(|(component, error)| ArtifactReport {
                component,
                file_name: component.file_name(),
                exists: error.is_none(),
                size_bytes: None,
                sha256: None,
                loaded: error.is_none(),
                error,
            })
            .collect();

        Self {
            dir: None,
            classifier,
            scaler,
            encoders,
            feature_names,
            reports,
        }
    }

    /// Directory the bundle was loaded from, if any.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> BundleStatus {
        BundleStatus {
            model_loaded: self.classifier.is_loaded(),
            scaler_loaded: self.scaler.is_loaded(),
            label_encoders_loaded: self.encoders.is_loaded(),
            feature_names_loaded: self.feature_names.is_loaded(),
        }
    }

    /// Per-artifact inventory in bundle order.
    #[must_use]
    pub fn reports(&self) -> &[ArtifactReport] {
        &self.reports
    }

    /// # Errors
    /// `ComponentUnavailable` if the classifier did not load.
    pub fn classifier(&self) -> Result<&LinearClassifier, DiabetesCareError> {
        self.classifier.require(BundleComponent::Classifier)
    }

    /// # Errors
    /// `ComponentUnavailable` if the scaler did not load.
    pub fn scaler(&self) -> Result<&MinMaxScaler, DiabetesCareError> {
        self.scaler.require(BundleComponent::Scaler)
    }

    /// # Errors
    /// `ComponentUnavailable` if the encoders did not load.
    pub fn encoders(&self) -> Result<&LabelEncoders, DiabetesCareError> {
        self.encoders.require(BundleComponent::LabelEncoders)
    }

    /// # Errors
    /// `ComponentUnavailable` if the feature names did not load.
    pub fn feature_names(&self) -> Result<&[String], DiabetesCareError> {
        self.feature_names
            .require(BundleComponent::FeatureNames)
            .map(Vec::as_slice)
    }
}
