pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{build_handler, GatewayHandler};
pub use config::lambda::LambdaConfig;
pub use crate::core::{InboundRequest, Method, RequestHandler, ResponseEnvelope};
pub use utils::error::{GatewayError, Result};
