pub mod gateway;
pub mod handler;
pub mod multipart;
pub mod response;

pub use crate::domain::model::{DetectionResult, Transaction};
pub use crate::domain::ports::{AnalysisError, Analyzer, ParseError, RecordParser};
pub use gateway::BackendGateway;
pub use handler::{InboundRequest, Method, RequestHandler};
pub use response::{Outcome, Rejection, ResponseEnvelope};
