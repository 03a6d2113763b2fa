use crate::domain::model::{DetectionResult, Transaction};
use crate::domain::ports::{AnalysisError, Analyzer};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// In-process analyzer that reports money flow per account. Used when no
/// remote analysis service is configured.
#[derive(Debug, Clone, Default)]
pub struct FlowSummaryAnalyzer;

impl FlowSummaryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, records: &[Transaction]) -> FlowSummary {
        let mut accounts: BTreeMap<&str, FlowAccumulator> = BTreeMap::new();

        for tx in records {
            let sender = accounts.entry(tx.sender_id.as_str()).or_default();
            sender.sent += tx.amount;
            sender.outgoing += 1;
            sender.counterparties.insert(tx.receiver_id.as_str());

            let receiver = accounts.entry(tx.receiver_id.as_str()).or_default();
            receiver.received += tx.amount;
            receiver.incoming += 1;
            receiver.counterparties.insert(tx.sender_id.as_str());
        }

        let accounts: Vec<AccountFlow> = accounts
            .into_iter()
            .map(|(account_id, acc)| AccountFlow {
                account_id: account_id.to_string(),
                sent: acc.sent,
                received: acc.received,
                net_flow: acc.received - acc.sent,
                outgoing: acc.outgoing,
                incoming: acc.incoming,
                counterparties: acc.counterparties.len(),
            })
            .collect();

        FlowSummary {
            total_transactions: records.len(),
            total_accounts: accounts.len(),
            total_amount: records.iter().map(|tx| tx.amount).sum(),
            accounts,
        }
    }
}

#[async_trait]
impl Analyzer for FlowSummaryAnalyzer {
    async fn analyze(&self, records: &[Transaction]) -> Result<DetectionResult, AnalysisError> {
        let summary = self.summarize(records);
        if !summary.total_amount.is_finite() {
            return Err(AnalysisError::new("transaction volume overflowed"));
        }

        DetectionResult::from_serializable(&summary)
            .map_err(|e| AnalysisError::new(format!("failed to encode summary: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSummary {
    pub total_transactions: usize,
    pub total_accounts: usize,
    pub total_amount: f64,
    pub accounts: Vec<AccountFlow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountFlow {
    pub account_id: String,
    pub sent: f64,
    pub received: f64,
    pub net_flow: f64,
    pub outgoing: usize,
    pub incoming: usize,
    pub counterparties: usize,
}

#[derive(Default)]
struct FlowAccumulator<'a> {
    sent: f64,
    received: f64,
    outgoing: usize,
    incoming: usize,
    counterparties: BTreeSet<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(id: &str, from: &str, to: &str, amount: f64) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            sender_id: from.to_string(),
            receiver_id: to.to_string(),
            amount,
            timestamp: None,
        }
    }

    #[test]
    fn test_summarize_pass_through_account() {
        let records = vec![
            tx("1", "A", "M", 100.0),
            tx("2", "B", "M", 50.0),
            tx("3", "M", "C", 140.0),
        ];

        let summary = FlowSummaryAnalyzer::new().summarize(&records);

        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.total_accounts, 4);
        assert_eq!(summary.total_amount, 290.0);

        let ids: Vec<&str> = summary.accounts.iter().map(|a| a.account_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "M"]);

        let mule = &summary.accounts[3];
        assert_eq!(mule.received, 150.0);
        assert_eq!(mule.sent, 140.0);
        assert_eq!(mule.net_flow, 10.0);
        assert_eq!(mule.incoming, 2);
        assert_eq!(mule.outgoing, 1);
        assert_eq!(mule.counterparties, 3);
    }

    #[tokio::test]
    async fn test_analyze_produces_json() {
        let result = FlowSummaryAnalyzer::new()
            .analyze(&[tx("1", "A", "B", 10.0)])
            .await
            .unwrap();

        assert_eq!(
            result.as_value(),
            &json!({
                "total_transactions": 1,
                "total_accounts": 2,
                "total_amount": 10.0,
                "accounts": [
                    {"account_id": "A", "sent": 10.0, "received": 0.0, "net_flow": -10.0,
                     "outgoing": 1, "incoming": 0, "counterparties": 1},
                    {"account_id": "B", "sent": 0.0, "received": 10.0, "net_flow": 10.0,
                     "outgoing": 0, "incoming": 1, "counterparties": 1}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_analyze_rejects_overflowing_volume() {
        let records = vec![tx("1", "A", "B", f64::MAX), tx("2", "B", "A", f64::MAX)];

        let err = FlowSummaryAnalyzer::new().analyze(&records).await.unwrap_err();

        assert_eq!(err.message, "transaction volume overflowed");
    }
}
