use crate::config::Settings;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoClient;

/// Clients and settings built once per lambda container.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub settings: Settings,
}

impl AppState {
    pub fn new(dynamo_client: DynamoClient, settings: Settings) -> Self {
        Self {
            dynamo_client,
            settings,
        }
    }

    pub async fn from_env() -> Result<Self, lambda_http::Error> {
        let settings = Settings::from_env()?;
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config);
        if let Some(endpoint) = &settings.dynamodb_endpoint {
            tracing::info!(endpoint = %endpoint, "using DynamoDB endpoint override");
            dynamo_config = dynamo_config.endpoint_url(endpoint);
        }

        tracing::info!(table = %settings.table_name, "state initialised");
        Ok(Self::new(DynamoClient::from_conf(dynamo_config.build()), settings))
    }

    pub fn table_name(&self) -> &str {
        &self.settings.table_name
    }
}
