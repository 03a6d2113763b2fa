// Adapters layer: concrete collaborators behind the domain ports, plus host integration.

pub mod csv_parser;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod remote;
pub mod summary;

use crate::config::{AnalyzerKind, BackendSettings};
use crate::core::{BackendGateway, RequestHandler};
use crate::domain::model::{DetectionResult, Transaction};
use crate::domain::ports::{AnalysisError, Analyzer};
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use async_trait::async_trait;

pub use csv_parser::CsvTransactionParser;
pub use remote::RemoteAnalyzer;
pub use summary::FlowSummaryAnalyzer;

pub type GatewayHandler = RequestHandler<CsvTransactionParser, ConfiguredAnalyzer>;

/// The analyzer selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredAnalyzer {
    Summary(FlowSummaryAnalyzer),
    Remote(RemoteAnalyzer),
}

#[async_trait]
impl Analyzer for ConfiguredAnalyzer {
    async fn analyze(
        &self,
        records: &[Transaction],
    ) -> std::result::Result<DetectionResult, AnalysisError> {
        match self {
            ConfiguredAnalyzer::Summary(analyzer) => analyzer.analyze(records).await,
            ConfiguredAnalyzer::Remote(analyzer) => analyzer.analyze(records).await,
        }
    }
}

pub fn build_analyzer<S: BackendSettings + Validate>(settings: &S) -> Result<ConfiguredAnalyzer> {
    settings.validate()?;

    match settings.analyzer() {
        AnalyzerKind::Summary => Ok(ConfiguredAnalyzer::Summary(FlowSummaryAnalyzer::new())),
        AnalyzerKind::Remote => {
            let endpoint = settings.analysis_endpoint();
            let endpoint = validate_required_field("analysis_endpoint", &endpoint)?;
            let analyzer = RemoteAnalyzer::new(*endpoint, settings.request_timeout())?;
            Ok(ConfiguredAnalyzer::Remote(analyzer))
        }
    }
}

/// Wires the CSV parser and the configured analyzer into a handler. A
/// backend that cannot be built leaves the handler in the unavailable state
/// so that requests still get an answer.
pub fn build_handler<S: BackendSettings + Validate>(settings: &S) -> GatewayHandler {
    match build_analyzer(settings) {
        Ok(analyzer) => {
            match &analyzer {
                ConfiguredAnalyzer::Summary(_) => tracing::info!("Using in-process flow summary"),
                ConfiguredAnalyzer::Remote(remote) => {
                    tracing::info!("Using analysis service at {}", remote.endpoint())
                }
            }
            RequestHandler::new(BackendGateway::new(CsvTransactionParser::new(), analyzer))
        }
        Err(e) => {
            tracing::error!("❌ Backend initialisation failed: {}", e);
            RequestHandler::unavailable()
        }
    }
}
