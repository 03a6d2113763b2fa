use crate::domain::model::{DetectionResult, Transaction};
use async_trait::async_trait;
use thiserror::Error;

/// The uploaded text could not be turned into transactions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The analysis backend failed while processing a transaction set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AnalysisError {
    pub message: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait RecordParser: Send + Sync {
    /// Must be deterministic for a given input.
    fn parse_records(&self, text: &str) -> Result<Vec<Transaction>, ParseError>;
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, records: &[Transaction]) -> Result<DetectionResult, AnalysisError>;
}
