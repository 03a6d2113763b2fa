use crate::domain::model::{DetectionResult, Transaction};
use crate::domain::ports::{AnalysisError, Analyzer};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Forwards the parsed transaction set to an HTTP analysis service and
/// returns its JSON answer unchanged. Single attempt per request.
#[derive(Debug, Clone)]
pub struct RemoteAnalyzer {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    transactions: &'a [Transaction],
}

impl RemoteAnalyzer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Analyzer for RemoteAnalyzer {
    async fn analyze(&self, records: &[Transaction]) -> std::result::Result<DetectionResult, AnalysisError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            records = records.len(),
            "sending transactions to analysis service"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnalysisRequest {
                transactions: records,
            })
            .send()
            .await
            .map_err(|e| AnalysisError::new(format!("analysis service unreachable: {}", e)))?;

        let status = response.status();
        tracing::debug!("analysis service status: {}", status);

        if !status.is_success() {
            return Err(AnalysisError::new(format!(
                "analysis service returned {}",
                status
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AnalysisError::new(format!("analysis service sent an invalid body: {}", e))
        })?;

        Ok(DetectionResult::new(body))
    }
}
