use super::model::{Category, CreateCategoryPayload, SpaceCategory};
use crate::error::{AtomError, AtomResult};
use crate::item::{self, Item};
use aws_sdk_dynamodb::Client as DynamoClient;

const PK: &str = "CATEGORY";
const SK_PREFIX: &str = "CATEGORY#";

pub fn category_from_item(item: &Item) -> Option<Category> {
    let kind = SpaceCategory::parse(item::sort_key_id(item, SK_PREFIX)?);
    if kind == SpaceCategory::Unknown {
        return None;
    }
    Some(Category::new(
        kind,
        item::string(item, "name"),
        item::string(item, "description"),
    ))
}

/// List taxonomy entries ordered by display name
pub async fn list_categories(client: &DynamoClient, table_name: &str) -> AtomResult<Vec<Category>> {
    let items = item::query_prefix(client, table_name, PK, SK_PREFIX).await?;

    let mut categories: Vec<Category> = items.iter().filter_map(category_from_item).collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
}

/// Create or replace the taxonomy entry for a kind
pub async fn upsert_category(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateCategoryPayload,
) -> AtomResult<Category> {
    if payload.kind == SpaceCategory::Unknown {
        return Err(AtomError::validation("Unrecognized category kind"));
    }

    let category = Category::new(payload.kind, payload.name, payload.description);

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", item::s(PK))
        .item("SK", item::s(format!("{}{}", SK_PREFIX, category.kind)))
        .item("name", item::s(category.name.clone()));

    if let Some(description) = &category.description {
        builder = builder.item("description", item::s(description.clone()));
    }

    builder
        .send()
        .await
        .map_err(|e| AtomError::store(format!("DynamoDB put_item error: {}", e)))?;

    tracing::info!(kind = %category.kind, "category stored");
    Ok(category)
}
