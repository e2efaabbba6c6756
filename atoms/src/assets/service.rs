use super::model::{Asset, AssetDetail, AssetSummary, CaptureInfo};
use crate::error::{AtomError, AtomResult};
use crate::item::{self, Item};
use crate::labels::service::list_labels;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

const PK: &str = "ASSET";
const SK_PREFIX: &str = "ASSET#";

fn asset_key(asset_id: &str) -> (AttributeValue, AttributeValue) {
    (item::s(PK), item::s(format!("{}{}", SK_PREFIX, asset_id)))
}

pub fn asset_from_item(item: &Item) -> Option<Asset> {
    let asset_id = item::sort_key_id(item, SK_PREFIX)?;
    Some(Asset {
        id: asset_id.to_string(),
        title: item::string_or_default(item, "title"),
        image_descriptor_path: item::string_or_default(item, "image_descriptor_path"),
        thumbnail_path: item::string_or_default(item, "thumbnail_path"),
        capture: CaptureInfo {
            instrument: item::string(item, "instrument"),
            filter: item::string(item, "filter"),
            captured_at: item::string(item, "captured_at"),
            width: item::number(item, "width"),
            height: item::number(item, "height"),
        },
        meta: item::json(item, "meta"),
        created_at: item::string_or_default(item, "created_at"),
    })
}

/// Filter by case-insensitive title substring, newest first, capped at `limit`.
/// A blank query matches everything.
pub fn rank_search(mut assets: Vec<Asset>, query: Option<&str>, limit: usize) -> Vec<AssetSummary> {
    let needle = query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase);

    if let Some(needle) = &needle {
        assets.retain(|a| a.title.to_lowercase().contains(needle.as_str()));
    }

    assets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    assets.iter().take(limit).map(AssetSummary::from).collect()
}

pub async fn get_asset(client: &DynamoClient, table_name: &str, asset_id: &str) -> AtomResult<Asset> {
    let (pk, sk) = asset_key(asset_id);
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", pk)
        .key("SK", sk)
        .send()
        .await
        .map_err(|e| AtomError::store(format!("DynamoDB get_item error: {}", e)))?;

    result
        .item()
        .and_then(asset_from_item)
        .ok_or_else(|| AtomError::not_found("Asset", asset_id))
}

pub async fn asset_exists(client: &DynamoClient, table_name: &str, asset_id: &str) -> AtomResult<bool> {
    match get_asset(client, table_name, asset_id).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Asset plus its labels, fetched in parallel
pub async fn load_asset_detail(client: &DynamoClient, table_name: &str, asset_id: &str) -> AtomResult<AssetDetail> {
    let (asset_result, labels_result) = tokio::join!(
        get_asset(client, table_name, asset_id),
        list_labels(client, table_name, asset_id)
    );

    Ok(AssetDetail {
        asset: asset_result?,
        labels: labels_result?,
    })
}

/// Every asset in the catalog, following DynamoDB pagination.
pub async fn load_all_assets(client: &DynamoClient, table_name: &str) -> AtomResult<Vec<Asset>> {
    let items = item::query_prefix(client, table_name, PK, SK_PREFIX).await?;
    Ok(items.iter().filter_map(asset_from_item).collect())
}

pub async fn search_assets(
    client: &DynamoClient,
    table_name: &str,
    query: Option<&str>,
    limit: usize,
) -> AtomResult<Vec<AssetSummary>> {
    let assets = load_all_assets(client, table_name).await?;
    let total = assets.len();
    let items = rank_search(assets, query, limit);
    tracing::info!(query = ?query, total, returned = items.len(), "asset search");
    Ok(items)
}

/// Store a new asset. Assets come from ingestion or seeding only.
pub async fn put_asset(client: &DynamoClient, table_name: &str, asset: &Asset) -> AtomResult<()> {
    let (pk, sk) = asset_key(&asset.id);
    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", pk)
        .item("SK", sk)
        .item("title", item::s(asset.title.clone()))
        .item("image_descriptor_path", item::s(asset.image_descriptor_path.clone()))
        .item("thumbnail_path", item::s(asset.thumbnail_path.clone()))
        .item("created_at", item::s(asset.created_at.clone()))
        .condition_expression("attribute_not_exists(PK)");

    let capture = &asset.capture;
    if let Some(instrument) = &capture.instrument {
        builder = builder.item("instrument", item::s(instrument.clone()));
    }
    if let Some(filter) = &capture.filter {
        builder = builder.item("filter", item::s(filter.clone()));
    }
    if let Some(captured_at) = &capture.captured_at {
        builder = builder.item("captured_at", item::s(captured_at.clone()));
    }
    if let Some(width) = capture.width {
        builder = builder.item("width", item::n(width));
    }
    if let Some(height) = capture.height {
        builder = builder.item("height", item::n(height));
    }
    if let Some(meta) = &asset.meta {
        builder = builder.item("meta", item::s(serde_json::to_string(meta)?));
    }

    builder
        .send()
        .await
        .map_err(|e| AtomError::from_put(e, "Asset", &asset.id))?;

    tracing::info!(asset_id = %asset.id, "asset stored");
    Ok(())
}
