//! Process configuration read from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::{ClinicalThresholds, IntakePolicy};
use crate::DiabetesCareError;

pub const HOST_ENV: &str = "DIABETESCARE_HOST";
pub const PORT_ENV: &str = "DIABETESCARE_PORT";
/// Platform-provided port; takes precedence over `DIABETESCARE_PORT`.
pub const PLATFORM_PORT_ENV: &str = "PORT";
pub const MODEL_DIR_ENV: &str = "DIABETESCARE_MODEL_DIR";
pub const INTAKE_POLICY_ENV: &str = "DIABETESCARE_INTAKE_POLICY";
pub const THRESHOLDS_FILE_ENV: &str = "DIABETESCARE_THRESHOLDS_FILE";
pub const REQUIRE_MODEL_ENV: &str = "DIABETESCARE_REQUIRE_MODEL";
pub const LOG_MODE_ENV: &str = "DIABETESCARE_LOG_MODE";
pub const LOG_FILE_ENV: &str = "DIABETESCARE_LOG_FILE";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5050;
const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_LOG_FILE: &str = "logs/diabetescare.log";

/// Where formatted logs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// Append-mode file
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_dir: PathBuf,
    pub intake_policy: IntakePolicy,
    pub thresholds_file: Option<PathBuf>,
    /// Refuse to start unless every model artifact loads
    pub require_model: bool,
    pub log_target: LogTarget,
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns `DiabetesCareError::Config` for unparseable values.
    pub fn from_env() -> Result<Self, DiabetesCareError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `DiabetesCareError::Config` for unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DiabetesCareError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match var(PLATFORM_PORT_ENV).or_else(|| var(PORT_ENV)) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| DiabetesCareError::Config(format!("invalid port {raw:?}")))?,
            None => DEFAULT_PORT,
        };

        let intake_policy = match var(INTAKE_POLICY_ENV) {
            Some(raw) => raw.parse::<IntakePolicy>().map_err(DiabetesCareError::Config)?,
            None => IntakePolicy::default(),
        };

        let log_target = match var(LOG_MODE_ENV).as_deref() {
            None | Some("stdout") => LogTarget::Stdout,
            Some("file") => LogTarget::File(
                var(LOG_FILE_ENV).map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
            ),
            Some(other) => {
                return Err(DiabetesCareError::Config(format!(
                    "invalid log mode {other:?} (expected stdout or file)"
                )))
            }
        };

        Ok(Self {
            host,
            port,
            model_dir: var(MODEL_DIR_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR), PathBuf::from),
            intake_policy,
            thresholds_file: var(THRESHOLDS_FILE_ENV).map(PathBuf::from),
            require_model: var(REQUIRE_MODEL_ENV).is_some_and(|v| is_truthy(&v)),
            log_target,
        })
    }

    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns `DiabetesCareError::Config` if host and port do not form an address.
    pub fn bind_addr(&self) -> Result<SocketAddr, DiabetesCareError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| DiabetesCareError::Config(format!("invalid bind address: {e}")))
    }

    /// Thresholds from the override file, or the defaults.
    ///
    /// # Errors
    /// Propagates read, parse and consistency errors from the override file.
    pub fn thresholds(&self) -> Result<ClinicalThresholds, DiabetesCareError> {
        match &self.thresholds_file {
            Some(path) => ClinicalThresholds::from_file(path),
            None => Ok(ClinicalThresholds::default()),
        }
    }
}
