use crate::error::{AtomError, AtomResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity a discussion thread hangs off. Exactly one per comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommentScope {
    Asset(String),
    Label(String),
}

impl CommentScope {
    /// Builds a scope from the two optional request keys; exactly one must be non-empty.
    pub fn from_keys(asset_id: Option<&str>, label_id: Option<&str>) -> AtomResult<Self> {
        let asset_id = asset_id.map(str::trim).filter(|s| !s.is_empty());
        let label_id = label_id.map(str::trim).filter(|s| !s.is_empty());
        match (asset_id, label_id) {
            (Some(asset_id), None) => Ok(Self::Asset(asset_id.to_string())),
            (None, Some(label_id)) => Ok(Self::Label(label_id.to_string())),
            (None, None) => Err(AtomError::validation("Asset ID or Label ID required")),
            (Some(_), Some(_)) => Err(AtomError::validation("Provide either Asset ID or Label ID, not both")),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Asset(id) | Self::Label(id) => id,
        }
    }

    /// Partition holding this thread. Asset and label threads never share one.
    pub fn partition_key(&self) -> String {
        match self {
            Self::Asset(id) => format!("THREAD#ASSET#{}", id),
            Self::Label(id) => format!("THREAD#LABEL#{}", id),
        }
    }

    pub fn asset_id(&self) -> Option<&str> {
        match self {
            Self::Asset(id) => Some(id),
            Self::Label(_) => None,
        }
    }

    pub fn label_id(&self) -> Option<&str> {
        match self {
            Self::Label(id) => Some(id),
            Self::Asset(_) => None,
        }
    }
}

impl fmt::Display for CommentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(id) => write!(f, "asset:{}", id),
            Self::Label(id) => write!(f, "label:{}", id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub asset_id: Option<String>,
    pub label_id: Option<String>,
    pub username: String,
    pub content: String,
    pub created_at: String,
}

impl Comment {
    pub fn scope(&self) -> Option<CommentScope> {
        CommentScope::from_keys(self.asset_id.as_deref(), self.label_id.as_deref()).ok()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    pub asset_id: Option<String>,
    pub label_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub content: String,
}

/// A comment that passed validation and is ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub scope: CommentScope,
    pub username: String,
    pub content: String,
}

impl NewComment {
    pub fn new(scope: CommentScope, username: &str, content: &str) -> AtomResult<Self> {
        let username = username.trim();
        let content = content.trim();
        if username.is_empty() || content.is_empty() {
            return Err(AtomError::validation("Username and content required"));
        }
        Ok(Self {
            scope,
            username: username.to_string(),
            content: content.to_string(),
        })
    }
}

impl TryFrom<CreateCommentPayload> for NewComment {
    type Error = AtomError;

    fn try_from(payload: CreateCommentPayload) -> AtomResult<Self> {
        let scope = CommentScope::from_keys(payload.asset_id.as_deref(), payload.label_id.as_deref())?;
        NewComment::new(scope, &payload.username, &payload.content)
    }
}
