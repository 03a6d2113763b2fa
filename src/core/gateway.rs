use crate::domain::model::{DetectionResult, Transaction};
use crate::domain::ports::{AnalysisError, Analyzer, ParseError, RecordParser};
use std::sync::Arc;

/// Narrow pass-through to the record parser and the analyzer. One call each
/// per request, no retries.
pub struct BackendGateway<P: RecordParser, A: Analyzer> {
    parser: Arc<P>,
    analyzer: Arc<A>,
}

impl<P: RecordParser, A: Analyzer> BackendGateway<P, A> {
    pub fn new(parser: P, analyzer: A) -> Self {
        Self {
            parser: Arc::new(parser),
            analyzer: Arc::new(analyzer),
        }
    }

    pub fn parse_records(&self, text: &str) -> Result<Vec<Transaction>, ParseError> {
        self.parser.parse_records(text)
    }

    pub async fn analyze(&self, records: &[Transaction]) -> Result<DetectionResult, AnalysisError> {
        self.analyzer.analyze(records).await
    }
}

impl<P: RecordParser, A: Analyzer> Clone for BackendGateway<P, A> {
    fn clone(&self) -> Self {
        Self {
            parser: Arc::clone(&self.parser),
            analyzer: Arc::clone(&self.analyzer),
        }
    }
}
