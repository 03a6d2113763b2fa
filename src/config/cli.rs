use crate::config::{validate_backend_settings, AnalyzerKind, BackendSettings};
use crate::core::multipart::encode_file_upload;
use crate::core::{InboundRequest, Method};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const REPLAY_BOUNDARY: &str = "----mule-gateway-replay";

#[derive(Debug, Clone, Parser)]
#[command(name = "mule-gateway")]
#[command(about = "Replay a transaction upload against the detection gateway")]
pub struct CliConfig {
    /// CSV file to send as a multipart upload
    #[arg(long, conflicts_with = "body")]
    pub csv: Option<PathBuf>,

    /// Raw request body captured from a client
    #[arg(long, requires = "content_type")]
    pub body: Option<PathBuf>,

    /// Content-Type header to send with --body
    #[arg(long)]
    pub content_type: Option<String>,

    #[arg(long, default_value = "POST")]
    pub method: String,

    #[arg(long, value_enum, default_value = "summary")]
    pub analyzer: AnalyzerKind,

    #[arg(long)]
    pub analysis_endpoint: Option<String>,

    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Builds the request to replay from the file flags.
    pub fn load_request(&self) -> Result<InboundRequest> {
        let method = Method::parse(&self.method);

        if let Some(path) = &self.csv {
            let content = fs::read(path)?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.csv".to_string());

            tracing::debug!("Wrapping {} ({} bytes) as multipart", filename, content.len());

            let body = encode_file_upload(REPLAY_BOUNDARY, "file", &filename, &content);
            return Ok(InboundRequest::new(method, body).with_header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", REPLAY_BOUNDARY),
            ));
        }

        let body = match &self.body {
            Some(path) => fs::read(path)?,
            None => Vec::new(),
        };

        let request = InboundRequest::new(method, body);
        Ok(match &self.content_type {
            Some(content_type) => request.with_header("Content-Type", content_type.clone()),
            None => request,
        })
    }
}

impl BackendSettings for CliConfig {
    fn analyzer(&self) -> AnalyzerKind {
        self.analyzer
    }

    fn analysis_endpoint(&self) -> Option<&str> {
        self.analysis_endpoint.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_backend_settings(self)
    }
}
