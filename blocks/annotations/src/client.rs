//! Seams between the viewer components and the catalog API.

use crate::error::FetchError;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use cosmoscope_atoms::assets::service::load_asset_detail;
use cosmoscope_atoms::assets::AssetDetail;
use cosmoscope_atoms::comments::service::{create_comment, list_comments};
use cosmoscope_atoms::comments::{Comment, CommentScope, NewComment};
use cosmoscope_atoms::labels::service::create_label;
use cosmoscope_atoms::labels::{CreateLabelPayload, Label};
use std::future::Future;
use std::time::Duration;

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_asset(&self, asset_id: &str) -> Result<AssetDetail, FetchError>;
    async fn create_label(&self, payload: CreateLabelPayload) -> Result<Label, FetchError>;
}

#[async_trait]
pub trait CommentClient: Send + Sync {
    /// Comments of one scope, oldest first.
    async fn fetch_comments(&self, scope: &CommentScope) -> Result<Vec<Comment>, FetchError>;
    async fn post_comment(&self, comment: NewComment) -> Result<Comment, FetchError>;
}

/// Talks to the table directly, for in-process use alongside the lambda.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: DynamoClient,
    table_name: String,
}

impl StoreClient {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl CatalogClient for StoreClient {
    async fn fetch_asset(&self, asset_id: &str) -> Result<AssetDetail, FetchError> {
        Ok(load_asset_detail(&self.client, &self.table_name, asset_id).await?)
    }

    async fn create_label(&self, payload: CreateLabelPayload) -> Result<Label, FetchError> {
        Ok(create_label(&self.client, &self.table_name, payload).await?)
    }
}

#[async_trait]
impl CommentClient for StoreClient {
    async fn fetch_comments(&self, scope: &CommentScope) -> Result<Vec<Comment>, FetchError> {
        Ok(list_comments(&self.client, &self.table_name, scope).await?)
    }

    async fn post_comment(&self, comment: NewComment) -> Result<Comment, FetchError> {
        Ok(create_comment(&self.client, &self.table_name, comment).await?)
    }
}

/// Bounds a request; expiry surfaces as [`FetchError::TimedOut`].
pub async fn with_timeout<T, F>(limit: Duration, request: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::TimedOut(limit)),
    }
}
