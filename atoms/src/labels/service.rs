use super::model::{CreateLabelPayload, Label, NormRect, DEFAULT_CONFIDENCE};
use crate::assets::service::asset_exists;
use crate::categories::SpaceCategory;
use crate::error::{AtomError, AtomResult};
use crate::item::{self, Item};
use aws_sdk_dynamodb::Client as DynamoClient;

pub(crate) const SK_PREFIX: &str = "LABEL#";

pub fn asset_partition(asset_id: &str) -> String {
    format!("ASSET#{}", asset_id)
}

/// Reject anything that would store a label outside its asset's image.
pub fn validate_new_label(payload: &CreateLabelPayload) -> AtomResult<()> {
    if payload.asset_id.trim().is_empty() {
        return Err(AtomError::validation("Asset ID required"));
    }
    if payload.title.trim().is_empty() {
        return Err(AtomError::validation("Title required"));
    }
    let rect = &payload.rect;
    if !rect.is_finite() || rect.w <= 0.0 || rect.h <= 0.0 {
        return Err(AtomError::validation("Rectangle must have a positive width and height"));
    }
    if !rect.is_within_unit_square() {
        return Err(AtomError::validation("Rectangle must lie within the image"));
    }
    if let Some(confidence) = payload.confidence {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(AtomError::validation("Confidence must be between 0 and 1"));
        }
    }
    Ok(())
}

pub fn label_from_item(asset_id: &str, item: &Item) -> Option<Label> {
    let label_id = item::sort_key_id(item, SK_PREFIX)?;
    Some(Label {
        id: label_id.to_string(),
        asset_id: asset_id.to_string(),
        rect: NormRect::new(
            item::number(item, "x")?,
            item::number(item, "y")?,
            item::number(item, "w")?,
            item::number(item, "h")?,
        ),
        title: item::string_or_default(item, "title"),
        note: item::string(item, "note"),
        category: item::string(item, "category")
            .map(|c| SpaceCategory::parse(&c))
            .unwrap_or_default(),
        confidence: item::number(item, "confidence").unwrap_or(DEFAULT_CONFIDENCE),
        created_at: item::string_or_default(item, "created_at"),
    })
}

/// Newest first, ties broken by id so the order is stable.
pub fn sort_newest_first(labels: &mut [Label]) {
    labels.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

/// List labels for an asset (pure domain logic, no HTTP)
pub async fn list_labels(client: &DynamoClient, table_name: &str, asset_id: &str) -> AtomResult<Vec<Label>> {
    let items = item::query_prefix(client, table_name, &asset_partition(asset_id), SK_PREFIX).await?;

    let mut labels = Vec::new();
    for raw in &items {
        match label_from_item(asset_id, raw) {
            Some(label) => labels.push(label),
            None => tracing::warn!(asset_id, "skipping malformed label item"),
        }
    }

    sort_newest_first(&mut labels);
    Ok(labels)
}

/// Create a new label on an existing asset
pub async fn create_label(client: &DynamoClient, table_name: &str, payload: CreateLabelPayload) -> AtomResult<Label> {
    validate_new_label(&payload)?;

    if !asset_exists(client, table_name, &payload.asset_id).await? {
        return Err(AtomError::not_found("Asset", payload.asset_id));
    }

    let label = Label {
        id: uuid::Uuid::new_v4().to_string(),
        asset_id: payload.asset_id,
        rect: payload.rect,
        title: payload.title.trim().to_string(),
        note: payload.note.filter(|n| !n.trim().is_empty()),
        category: payload.category,
        confidence: payload.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        created_at: crate::now_timestamp(),
    };

    put_label(client, table_name, &label).await?;

    tracing::info!(label_id = %label.id, asset_id = %label.asset_id, category = %label.category, "label created");
    Ok(label)
}

/// Writes one label item. The condition keeps an existing id from being overwritten.
pub async fn put_label(client: &DynamoClient, table_name: &str, label: &Label) -> AtomResult<()> {
    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", item::s(asset_partition(&label.asset_id)))
        .item("SK", item::s(format!("{}{}", SK_PREFIX, label.id)))
        .item("x", item::n(label.rect.x))
        .item("y", item::n(label.rect.y))
        .item("w", item::n(label.rect.w))
        .item("h", item::n(label.rect.h))
        .item("title", item::s(label.title.clone()))
        .item("category", item::s(label.category.as_str()))
        .item("confidence", item::n(label.confidence))
        .item("created_at", item::s(label.created_at.clone()))
        .condition_expression("attribute_not_exists(PK)");

    if let Some(note) = &label.note {
        builder = builder.item("note", item::s(note.clone()));
    }

    builder
        .send()
        .await
        .map_err(|e| AtomError::from_put(e, "Label", &label.id))?;

    Ok(())
}
