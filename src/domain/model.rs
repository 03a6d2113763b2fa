use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of an uploaded transaction file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}

/// Analysis output. The gateway never looks inside it; it is written out
/// verbatim as the body of a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionResult(serde_json::Value);

impl DetectionResult {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn from_serializable<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Self)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}
