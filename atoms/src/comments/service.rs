use super::model::{Comment, CommentScope, NewComment};
use crate::error::{AtomError, AtomResult};
use crate::item::{self, Item};
use aws_sdk_dynamodb::Client as DynamoClient;

const SK_PREFIX: &str = "COMMENT#";

/// Sort key embeds the timestamp so a forward query is creation order.
pub fn comment_sort_key(created_at: &str, comment_id: &str) -> String {
    format!("{}{}#{}", SK_PREFIX, created_at, comment_id)
}

pub fn comment_from_item(scope: &CommentScope, item: &Item) -> Option<Comment> {
    item::sort_key_id(item, SK_PREFIX)?;
    Some(Comment {
        id: item::string(item, "comment_id")?,
        asset_id: scope.asset_id().map(str::to_string),
        label_id: scope.label_id().map(str::to_string),
        username: item::string_or_default(item, "username"),
        content: item::string_or_default(item, "content"),
        created_at: item::string_or_default(item, "created_at"),
    })
}

/// Comments for one thread, oldest first
pub async fn list_comments(client: &DynamoClient, table_name: &str, scope: &CommentScope) -> AtomResult<Vec<Comment>> {
    let items = item::query_prefix(client, table_name, &scope.partition_key(), SK_PREFIX).await?;

    let mut comments: Vec<Comment> = items
        .iter()
        .filter_map(|raw| comment_from_item(scope, raw))
        .collect();
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(comments)
}

pub async fn create_comment(client: &DynamoClient, table_name: &str, new_comment: NewComment) -> AtomResult<Comment> {
    let comment_id = uuid::Uuid::new_v4().to_string();
    let now = crate::now_timestamp();
    put_comment_at(client, table_name, new_comment, comment_id, now).await
}

/// Writes a comment with a caller-chosen id and timestamp (seeding uses fixed ones).
pub async fn put_comment_at(
    client: &DynamoClient,
    table_name: &str,
    new_comment: NewComment,
    comment_id: String,
    created_at: String,
) -> AtomResult<Comment> {
    let NewComment { scope, username, content } = new_comment;

    client
        .put_item()
        .table_name(table_name)
        .item("PK", item::s(scope.partition_key()))
        .item("SK", item::s(comment_sort_key(&created_at, &comment_id)))
        .item("comment_id", item::s(comment_id.clone()))
        .item("username", item::s(username.clone()))
        .item("content", item::s(content.clone()))
        .item("created_at", item::s(created_at.clone()))
        .condition_expression("attribute_not_exists(PK)")
        .send()
        .await
        .map_err(|e| AtomError::from_put(e, "Comment", &comment_id))?;

    tracing::info!(comment_id = %comment_id, scope = %scope, "comment created");

    Ok(Comment {
        id: comment_id,
        asset_id: scope.asset_id().map(str::to_string),
        label_id: scope.label_id().map(str::to_string),
        username,
        content,
        created_at,
    })
}
