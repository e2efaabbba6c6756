use super::model::CreateCategoryPayload;
use super::service;
use crate::respond;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

pub async fn list_categories_handler(client: &DynamoClient, table_name: &str) -> Result<Response<Body>, Error> {
    respond::result(StatusCode::OK, service::list_categories(client, table_name).await)
}

pub async fn create_category_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateCategoryPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => return respond::error_message(StatusCode::BAD_REQUEST, &format!("Invalid request body: {}", e)),
    };

    respond::result(StatusCode::CREATED, service::upsert_category(client, table_name, payload).await)
}
