use super::model::CreateLabelPayload;
use super::service;
use crate::respond;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

pub async fn create_label_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateLabelPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => return respond::error_message(StatusCode::BAD_REQUEST, &format!("Invalid request body: {}", e)),
    };

    respond::result(StatusCode::CREATED, service::create_label(client, table_name, payload).await)
}

pub async fn list_asset_labels_handler(
    client: &DynamoClient,
    table_name: &str,
    asset_id: &str,
) -> Result<Response<Body>, Error> {
    respond::result(StatusCode::OK, service::list_labels(client, table_name, asset_id).await)
}
