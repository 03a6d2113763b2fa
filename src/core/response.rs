use crate::domain::model::DetectionResult;
use crate::domain::ports::{AnalysisError, ParseError};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

pub const HEALTH_MESSAGE: &str = "Money Muling Detection Engine API";
pub const WRONG_CONTENT_TYPE: &str = "Content-Type must be multipart/form-data";
pub const NO_FILE_FOUND: &str = "No file found in request";
pub const NO_TRANSACTIONS: &str = "No transactions found in CSV";
pub const BACKEND_UNAVAILABLE: &str =
    "Backend modules not available. Please deploy backend separately.";

/// Successful outcomes of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Health,
    Detection(DetectionResult),
}

/// Every way a request can fail. The display text becomes the `detail`
/// field of the error body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(String),

    #[error("{}", BACKEND_UNAVAILABLE)]
    BackendUnavailable,
}

impl Rejection {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest(detail.into())
    }

    pub fn unexpected(detail: impl std::fmt::Display) -> Self {
        Self::Internal(format!("Unexpected error: {}", detail))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Rejection::BadRequest(_) => 400,
            Rejection::MethodNotAllowed => 405,
            Rejection::Internal(_) | Rejection::BackendUnavailable => 500,
        }
    }
}

impl From<ParseError> for Rejection {
    fn from(err: ParseError) -> Self {
        Self::BadRequest(format!("CSV parsing error: {}", err))
    }
}

impl From<AnalysisError> for Rejection {
    fn from(err: AnalysisError) -> Self {
        Self::Internal(format!("Detection error: {}", err))
    }
}

/// The single response produced for a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: serde_json::Value,
}

impl ResponseEnvelope {
    pub fn json(status_code: u16, body: serde_json::Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn from_result(result: Result<Outcome, Rejection>) -> Self {
        match result {
            Ok(outcome) => Self::from(outcome),
            Err(rejection) => Self::from(rejection),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Serialized body, as written on the wire.
    pub fn body_string(&self) -> String {
        self.body.to_string()
    }
}

impl From<Outcome> for ResponseEnvelope {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Health => Self::json(200, json!({ "status": "ok", "message": HEALTH_MESSAGE })),
            Outcome::Detection(result) => Self::json(200, result.into_value()),
        }
    }
}

impl From<Rejection> for ResponseEnvelope {
    fn from(rejection: Rejection) -> Self {
        Self::json(
            rejection.status_code(),
            json!({ "detail": rejection.to_string() }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_envelope() {
        let envelope = ResponseEnvelope::from(Outcome::Health);

        assert_eq!(envelope.status_code, 200);
        assert_eq!(
            envelope.body,
            json!({ "status": "ok", "message": "Money Muling Detection Engine API" })
        );
        assert_eq!(
            envelope.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_detection_body_is_passed_through() {
        let result = DetectionResult::new(json!({ "suspicious_accounts": ["A"], "score": 0.9 }));

        let envelope = ResponseEnvelope::from(Outcome::Detection(result));

        assert_eq!(envelope.status_code, 200);
        assert_eq!(
            envelope.body,
            json!({ "suspicious_accounts": ["A"], "score": 0.9 })
        );
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(Rejection::bad_request(NO_FILE_FOUND).status_code(), 400);
        assert_eq!(Rejection::MethodNotAllowed.status_code(), 405);
        assert_eq!(Rejection::unexpected("boom").status_code(), 500);
        assert_eq!(Rejection::BackendUnavailable.status_code(), 500);
    }

    #[test]
    fn test_rejection_bodies_use_detail() {
        let cases = [
            (Rejection::bad_request(WRONG_CONTENT_TYPE), WRONG_CONTENT_TYPE),
            (Rejection::MethodNotAllowed, "Method not allowed"),
            (Rejection::BackendUnavailable, BACKEND_UNAVAILABLE),
            (Rejection::unexpected("boom"), "Unexpected error: boom"),
        ];

        for (rejection, detail) in cases {
            let envelope = ResponseEnvelope::from(rejection);
            assert_eq!(envelope.body, json!({ "detail": detail }));
            assert!(envelope.headers.contains_key("Content-Type"));
        }
    }

    #[test]
    fn test_collaborator_errors_are_prefixed() {
        let parse: Rejection = ParseError::new("row 2: amount 'x' is not a number").into();
        let analysis: Rejection = AnalysisError::new("backend returned 503").into();

        assert_eq!(
            parse,
            Rejection::BadRequest("CSV parsing error: row 2: amount 'x' is not a number".into())
        );
        assert_eq!(
            analysis,
            Rejection::Internal("Detection error: backend returned 503".into())
        );
    }

    #[test]
    fn test_envelope_serializes_with_camel_case() {
        let envelope = ResponseEnvelope::from(Rejection::MethodNotAllowed);

        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["statusCode"], 405);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        assert_eq!(value["body"]["detail"], "Method not allowed");
    }
}
