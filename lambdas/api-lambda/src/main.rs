use cosmoscope_shared::{telemetry, AppState};
use lambda_http::{run, service_fn, Error, Request};
use std::sync::Arc;

mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_tracing();

    let state = Arc::new(AppState::from_env().await?);

    run(service_fn(move |event: Request| {
        let state = state.clone();
        async move { function_handler(event, state).await }
    }))
    .await
}
