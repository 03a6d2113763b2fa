use lambda_http::{run, service_fn, Body, Error, Request, Response};
use mule_gateway::adapters::lambda::{inbound_from_lambda, lambda_response};
use mule_gateway::utils::logger;
use mule_gateway::{build_handler, GatewayHandler, LambdaConfig, RequestHandler};
use std::sync::Arc;

async fn function_handler(handler: &GatewayHandler, event: Request) -> Result<Response<Body>, Error> {
    let request = inbound_from_lambda(&event);
    let envelope = handler.handle(&request).await;
    Ok(lambda_response(&envelope)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    tracing::info!("Starting mule-gateway Lambda function");

    let handler: GatewayHandler = match LambdaConfig::from_env() {
        Ok(config) => build_handler(&config),
        Err(e) => {
            tracing::error!("❌ Invalid Lambda configuration: {}", e);
            RequestHandler::unavailable()
        }
    };
    let handler = Arc::new(handler);

    run(service_fn(move |event: Request| {
        let handler = Arc::clone(&handler);
        async move { function_handler(&handler, event).await }
    }))
    .await
}
