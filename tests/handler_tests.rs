use mule_gateway::adapters::{CsvTransactionParser, FlowSummaryAnalyzer};
use mule_gateway::core::multipart::extract_file;
use mule_gateway::core::{BackendGateway, InboundRequest, Method, RecordParser, RequestHandler};
use serde_json::json;

const UPLOAD_BODY: &[u8] = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"t.csv\"\r\n\
\r\n\
from,to,amount\nA,B,10\n\r\n\
--XYZ--\r\n";

fn handler() -> RequestHandler<CsvTransactionParser, FlowSummaryAnalyzer> {
    RequestHandler::new(BackendGateway::new(
        CsvTransactionParser::new(),
        FlowSummaryAnalyzer::new(),
    ))
}

fn multipart(body: &[u8]) -> InboundRequest {
    InboundRequest::new(Method::Post, body.to_vec())
        .with_header("Content-Type", "multipart/form-data; boundary=XYZ")
}

#[test]
fn test_extractor_returns_bytes_between_separator_and_boundary() {
    let file = extract_file(UPLOAD_BODY, "XYZ").unwrap();

    assert_eq!(file.content, "from,to,amount\nA,B,10\n");
}

#[tokio::test]
async fn test_get_is_health_check_regardless_of_input() {
    let handler = handler();

    for request in [
        InboundRequest::new(Method::Get, Vec::new()),
        InboundRequest::new(Method::Get, UPLOAD_BODY.to_vec())
            .with_header("Content-Type", "multipart/form-data; boundary=XYZ"),
        InboundRequest::new(Method::Get, b"junk".to_vec()).with_header("X-Anything", "1"),
    ] {
        let response = handler.handle(&request).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body,
            json!({"status": "ok", "message": "Money Muling Detection Engine API"})
        );
    }
}

#[tokio::test]
async fn test_post_json_is_rejected() {
    let request = InboundRequest::new(Method::Post, b"{\"transactions\": []}".to_vec())
        .with_header("Content-Type", "application/json");

    let response = handler().handle(&request).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body,
        json!({"detail": "Content-Type must be multipart/form-data"})
    );
}

#[tokio::test]
async fn test_plain_form_field_is_not_a_file() {
    let body = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"notes\"\r\n\
\r\n\
from,to,amount\nA,B,10\n\r\n\
--XYZ--\r\n";

    let response = handler().handle(&multipart(body)).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(response.body, json!({"detail": "No file found in request"}));
}

#[tokio::test]
async fn test_boundary_mismatch_means_no_file() {
    let request = InboundRequest::new(Method::Post, UPLOAD_BODY.to_vec())
        .with_header("Content-Type", "multipart/form-data; boundary=OTHER");

    let response = handler().handle(&request).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(response.body["detail"], "No file found in request");
}

#[tokio::test]
async fn test_header_only_csv_has_no_transactions() {
    let body = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"t.csv\"\r\n\
\r\n\
from,to,amount\n\r\n\
--XYZ--\r\n";

    let response = handler().handle(&multipart(body)).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(response.body, json!({"detail": "No transactions found in CSV"}));
}

#[tokio::test]
async fn test_malformed_csv_is_bad_request() {
    let body = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"t.csv\"\r\n\
\r\n\
from,to,amount\nA,B,lots\n\r\n\
--XYZ--\r\n";

    let response = handler().handle(&multipart(body)).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body["detail"],
        "CSV parsing error: row 1: amount 'lots' is not a number"
    );
}

#[tokio::test]
async fn test_end_to_end_success() {
    let response = handler().handle(&multipart(UPLOAD_BODY)).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );

    let records = CsvTransactionParser::new()
        .parse_records("from,to,amount\nA,B,10\n")
        .unwrap();
    let expected = serde_json::to_value(FlowSummaryAnalyzer::new().summarize(&records)).unwrap();
    assert_eq!(response.body, expected);
    assert_eq!(response.body["total_transactions"], 1);
}

#[tokio::test]
async fn test_unsupported_methods_are_405_for_any_content_type() {
    let handler = handler();

    for method in ["PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"] {
        for content_type in [
            "multipart/form-data; boundary=XYZ",
            "application/json",
            "text/plain",
        ] {
            let request = InboundRequest::new(Method::parse(method), UPLOAD_BODY.to_vec())
                .with_header("Content-Type", content_type);

            let response = handler.handle(&request).await;

            assert_eq!(response.status_code, 405, "{} {}", method, content_type);
            assert_eq!(response.body, json!({"detail": "Method not allowed"}));
        }
    }
}

#[tokio::test]
async fn test_repeated_requests_are_byte_identical() {
    let handler = handler();

    let first = handler.handle(&multipart(UPLOAD_BODY)).await;
    let second = handler.handle(&multipart(UPLOAD_BODY)).await;

    assert_eq!(first.status_code, 200);
    assert_eq!(first.body_string(), second.body_string());
}
