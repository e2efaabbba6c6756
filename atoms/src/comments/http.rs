use super::model::{CommentScope, CreateCommentPayload, NewComment};
use super::service;
use crate::respond;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

// GET /comments?assetId=...|labelId=...
pub async fn list_comments_handler(
    client: &DynamoClient,
    table_name: &str,
    asset_id: Option<&str>,
    label_id: Option<&str>,
) -> Result<Response<Body>, Error> {
    let scope = match CommentScope::from_keys(asset_id, label_id) {
        Ok(scope) => scope,
        Err(e) => return respond::error(&e),
    };

    respond::result(StatusCode::OK, service::list_comments(client, table_name, &scope).await)
}

// POST /comments
pub async fn create_comment_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateCommentPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => return respond::error_message(StatusCode::BAD_REQUEST, &format!("Invalid request body: {}", e)),
    };

    // Validation happens before the store is touched.
    let new_comment = match NewComment::try_from(payload) {
        Ok(new_comment) => new_comment,
        Err(e) => return respond::error(&e),
    };

    respond::result(StatusCode::CREATED, service::create_comment(client, table_name, new_comment).await)
}
