use crate::labels::Label;
use serde::{Deserialize, Serialize};

/// How and when an image was captured. Every field is optional; seeded
/// demo assets fill them in, ad-hoc ingests often do not.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureInfo {
    pub instrument: Option<String>,
    pub filter: Option<String>,
    pub captured_at: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub title: String,
    /// Path of the deep-zoom image descriptor consumed by the tile viewer.
    #[serde(rename = "image_descriptor_path")]
    pub image_descriptor_path: String,
    #[serde(rename = "thumbnail_path")]
    pub thumbnail_path: String,
    #[serde(flatten)]
    pub capture: CaptureInfo,
    pub meta: Option<serde_json::Value>,
    pub created_at: String,
}

/// Asset with its labels, as returned by `GET /assets/{id}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "thumbnail_path")]
    pub thumbnail_path: String,
}

impl From<&Asset> for AssetSummary {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            title: asset.title.clone(),
            thumbnail_path: asset.thumbnail_path.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchResponse {
    pub items: Vec<AssetSummary>,
}
