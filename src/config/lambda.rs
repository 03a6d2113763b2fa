use crate::config::{validate_backend_settings, AnalyzerKind, BackendSettings};
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::Validate;
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings read from the function's environment:
/// `ANALYZER`, `ANALYSIS_ENDPOINT`, `ANALYSIS_TIMEOUT_SECS`.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub analyzer: AnalyzerKind,
    pub analysis_endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let analyzer = match lookup("ANALYZER") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => AnalyzerKind::default(),
        };

        let timeout_secs = match lookup("ANALYSIS_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                GatewayError::InvalidConfigValueError {
                    field: "ANALYSIS_TIMEOUT_SECS".to_string(),
                    value: value.clone(),
                    reason: "must be a whole number of seconds".to_string(),
                }
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            analyzer,
            analysis_endpoint: lookup("ANALYSIS_ENDPOINT").filter(|v| !v.trim().is_empty()),
            timeout_secs,
        })
    }
}

impl BackendSettings for LambdaConfig {
    fn analyzer(&self) -> AnalyzerKind {
        self.analyzer
    }

    fn analysis_endpoint(&self) -> Option<&str> {
        self.analysis_endpoint.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_backend_settings(self)?;
        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
