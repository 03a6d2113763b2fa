use crate::core::{InboundRequest, Method, ResponseEnvelope};
use lambda_http::http;
use lambda_http::{Body, Request, Response};

/// Copies method, headers and the already-decoded body out of a Lambda
/// HTTP event. Header values that are not visible ASCII are dropped.
pub fn inbound_from_lambda(request: &Request) -> InboundRequest {
    let method = Method::parse(request.method().as_str());
    let mut inbound = InboundRequest::new(method, request.body().to_vec());

    for (name, value) in request.headers() {
        match value.to_str() {
            Ok(value) => inbound = inbound.with_header(name.as_str(), value),
            Err(_) => tracing::debug!("Skipping non-ASCII header {}", name),
        }
    }

    inbound
}

pub fn lambda_response(envelope: &ResponseEnvelope) -> Result<Response<Body>, http::Error> {
    let mut builder = Response::builder().status(envelope.status_code);
    for (name, value) in &envelope.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(Body::Text(envelope.body_string()))
}
