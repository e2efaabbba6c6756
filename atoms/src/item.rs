//! Readers for raw DynamoDB items.

use crate::error::{AtomError, AtomResult};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;
use std::str::FromStr;

pub type Item = HashMap<String, AttributeValue>;

pub fn string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

pub fn string_or_default(item: &Item, key: &str) -> String {
    string(item, key).unwrap_or_default()
}

/// Numbers are stored as DynamoDB `N` strings; anything unparsable reads as `None`.
pub fn number<T: FromStr>(item: &Item, key: &str) -> Option<T> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
}

/// JSON blobs are stored as `S` attributes.
pub fn json(item: &Item, key: &str) -> Option<serde_json::Value> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| serde_json::from_str(s).ok())
}

/// Returns the id portion of the sort key when it carries `prefix`.
pub fn sort_key_id<'a>(item: &'a Item, prefix: &str) -> Option<&'a str> {
    item.get("SK")
        .and_then(|v| v.as_s().ok())
        .and_then(|sk| sk.strip_prefix(prefix))
}

pub fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

pub fn n(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// Start key for the next query page; an absent or empty `LastEvaluatedKey` ends the scan.
pub fn next_start_key(last_evaluated: Option<&Item>) -> Option<Item> {
    match last_evaluated {
        Some(key) if !key.is_empty() => Some(key.clone()),
        _ => None,
    }
}

/// Every item under `pk` whose sort key starts with `sk_prefix`, following pagination.
pub async fn query_prefix(
    client: &DynamoClient,
    table_name: &str,
    pk: &str,
    sk_prefix: &str,
) -> AtomResult<Vec<Item>> {
    let mut items = Vec::new();
    let mut start_key: Option<Item> = None;

    loop {
        let result = client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", s(pk))
            .expression_attribute_values(":sk_prefix", s(sk_prefix))
            .set_exclusive_start_key(start_key.take())
            .send()
            .await
            .map_err(|e| AtomError::store(format!("DynamoDB query error: {}", e)))?;

        items.extend(result.items().iter().cloned());

        match next_start_key(result.last_evaluated_key()) {
            Some(key) => start_key = Some(key),
            None => break,
        }
    }

    Ok(items)
}
