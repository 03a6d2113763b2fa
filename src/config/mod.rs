#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;

use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{validate_range, validate_required_field, validate_url};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const MAX_TIMEOUT_SECS: u64 = 900;

/// Which analyzer backs the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// In-process flow summary
    #[default]
    Summary,
    /// HTTP analysis service
    Remote,
}

impl FromStr for AnalyzerKind {
    type Err = GatewayError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(AnalyzerKind::Summary),
            "remote" => Ok(AnalyzerKind::Remote),
            other => Err(GatewayError::InvalidConfigValueError {
                field: "analyzer".to_string(),
                value: other.to_string(),
                reason: "expected 'summary' or 'remote'".to_string(),
            }),
        }
    }
}

pub trait BackendSettings: Send + Sync {
    fn analyzer(&self) -> AnalyzerKind;
    fn analysis_endpoint(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
}

/// Checks shared by every settings source.
pub fn validate_backend_settings<S: BackendSettings + ?Sized>(settings: &S) -> Result<()> {
    validate_range(
        "analysis_timeout_secs",
        settings.request_timeout().as_secs(),
        1,
        MAX_TIMEOUT_SECS,
    )?;

    if settings.analyzer() == AnalyzerKind::Remote {
        let endpoint = settings.analysis_endpoint();
        let endpoint = validate_required_field("analysis_endpoint", &endpoint)?;
        validate_url("analysis_endpoint", endpoint)?;
    }

    Ok(())
}
