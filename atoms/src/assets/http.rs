use super::model::SearchResponse;
use super::service;
use crate::respond;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

// GET /assets/{id}
pub async fn get_asset_handler(client: &DynamoClient, table_name: &str, asset_id: &str) -> Result<Response<Body>, Error> {
    respond::result(StatusCode::OK, service::load_asset_detail(client, table_name, asset_id).await)
}

// GET /search?q=
pub async fn search_handler(
    client: &DynamoClient,
    table_name: &str,
    query: Option<&str>,
    page_size: usize,
) -> Result<Response<Body>, Error> {
    let outcome = service::search_assets(client, table_name, query, page_size)
        .await
        .map(|items| SearchResponse { items });
    respond::result(StatusCode::OK, outcome)
}
