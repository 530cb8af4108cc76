use contact_relay::adapters::lambda::{ProxyRequest, ProxyResponse};
use contact_relay::utils::{logger, validation::Validate};
use contact_relay::{ContactRelay, RelayConfig, ResendClient};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

type Relay = ContactRelay<ResendClient, RelayConfig>;

async fn function_handler(
    relay: &Relay,
    event: LambdaEvent<ProxyRequest>,
) -> Result<ProxyResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "Handling contact request");

    let request = event.payload.into_relay_request();
    let response = relay.handle(request).await;

    Ok(ProxyResponse::from_relay_response(response)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時建立一次，之後的呼叫共用
    let config = RelayConfig::from_env()?;
    config.validate()?;
    tracing::info!(config = ?config, "Contact relay Lambda initialised");

    let client = ResendClient::from_config(&config);
    let relay: Arc<Relay> = Arc::new(ContactRelay::new(client, config));

    run(service_fn(move |event: LambdaEvent<ProxyRequest>| {
        let relay = Arc::clone(&relay);
        async move { function_handler(&relay, event).await }
    }))
    .await
}
