//! Loads the demo catalog into the configured table. Safe to run repeatedly.

use cosmoscope_shared::catalog::seed_demo_catalog;
use cosmoscope_shared::{telemetry, AppState};
use lambda_http::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_tracing();

    let state = AppState::from_env().await?;
    tracing::info!(table = %state.table_name(), "seeding demo catalog");

    let report = seed_demo_catalog(&state.dynamo_client, state.table_name()).await?;
    tracing::info!(created = report.created, skipped = report.skipped, "done");
    Ok(())
}
