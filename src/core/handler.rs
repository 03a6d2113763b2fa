use crate::core::gateway::BackendGateway;
use crate::core::multipart::{boundary_from_content_type, extract_file};
use crate::core::response::{
    Outcome, Rejection, ResponseEnvelope, NO_FILE_FOUND, NO_TRANSACTIONS, WRONG_CONTENT_TYPE,
};
use crate::domain::model::DetectionResult;
use crate::domain::ports::{Analyzer, RecordParser};
use std::collections::HashMap;
use std::fmt;
use tokio::task::JoinError;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A request as received from the hosting platform. Header names are
/// matched case-insensitively.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    method: Method,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl InboundRequest {
    pub fn new(method: Method, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Empty when the header is missing.
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or("")
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Entry point for one request. Built either around an initialised backend
/// or in the unavailable state, in which case every request is answered
/// with a 500.
pub struct RequestHandler<P: RecordParser, A: Analyzer> {
    backend: Option<BackendGateway<P, A>>,
}

impl<P, A> RequestHandler<P, A>
where
    P: RecordParser + 'static,
    A: Analyzer + 'static,
{
    pub fn new(backend: BackendGateway<P, A>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn handle(&self, request: &InboundRequest) -> ResponseEnvelope {
        tracing::info!(
            method = %request.method(),
            body_bytes = request.body().len(),
            "handling request"
        );

        let result = self.classify(request).await;

        match &result {
            Ok(_) => tracing::debug!("request succeeded"),
            Err(rejection) if rejection.status_code() >= 500 => {
                tracing::error!(status = rejection.status_code(), %rejection, "request failed")
            }
            Err(rejection) => {
                tracing::warn!(status = rejection.status_code(), %rejection, "request rejected")
            }
        }

        ResponseEnvelope::from_result(result)
    }

    async fn classify(&self, request: &InboundRequest) -> Result<Outcome, Rejection> {
        let backend = self.backend.as_ref().ok_or(Rejection::BackendUnavailable)?;

        match request.method() {
            Method::Get => Ok(Outcome::Health),
            Method::Post => submit(backend, request).await.map(Outcome::Detection),
            Method::Other(_) => Err(Rejection::MethodNotAllowed),
        }
    }
}

async fn submit<P, A>(
    backend: &BackendGateway<P, A>,
    request: &InboundRequest,
) -> Result<DetectionResult, Rejection>
where
    P: RecordParser + 'static,
    A: Analyzer + 'static,
{
    let content_type = request.content_type();
    if !content_type.contains(MULTIPART_FORM_DATA) {
        return Err(Rejection::bad_request(WRONG_CONTENT_TYPE));
    }

    let boundary = boundary_from_content_type(content_type);
    let file = extract_file(request.body(), boundary)
        .ok_or_else(|| Rejection::bad_request(NO_FILE_FOUND))?;

    tracing::debug!(
        part_index = file.part_index,
        filename = file.filename.as_deref().unwrap_or("<none>"),
        bytes = file.content.len(),
        "extracted file part"
    );

    // the spawned task is the panic boundary for the collaborators
    let backend = backend.clone();
    tokio::spawn(async move { process(backend, file.content).await })
        .await
        .unwrap_or_else(|err| Err(Rejection::unexpected(join_failure(err))))
}

async fn process<P, A>(
    backend: BackendGateway<P, A>,
    content: String,
) -> Result<DetectionResult, Rejection>
where
    P: RecordParser,
    A: Analyzer,
{
    let records = backend.parse_records(&content)?;
    if records.is_empty() {
        return Err(Rejection::bad_request(NO_TRANSACTIONS));
    }

    tracing::debug!(records = records.len(), "parsed transactions");

    let result = backend.analyze(&records).await?;
    Ok(result)
}

fn join_failure(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }

    let payload = err.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "backend task panicked".to_string()
    }
}
