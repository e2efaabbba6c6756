use std::env;
use thiserror::Error;

pub const DEFAULT_TABLE_NAME: &str = "cosmoscope";
pub const DEFAULT_SEARCH_PAGE_SIZE: usize = 20;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Runtime settings, read from the lambda environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub table_name: String,
    /// Overrides the DynamoDB endpoint, e.g. for DynamoDB Local.
    pub dynamodb_endpoint: Option<String>,
    pub search_page_size: usize,
    pub cors_allow_origin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            dynamodb_endpoint: None,
            search_page_size: DEFAULT_SEARCH_PAGE_SIZE,
            cors_allow_origin: "*".to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let search_page_size = match non_empty("SEARCH_PAGE_SIZE") {
            None => defaults.search_page_size,
            Some(value) => match value.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "SEARCH_PAGE_SIZE",
                        value,
                    })
                }
            },
        };

        Ok(Self {
            table_name: non_empty("TABLE_NAME").unwrap_or(defaults.table_name),
            dynamodb_endpoint: non_empty("DYNAMODB_ENDPOINT"),
            search_page_size,
            cors_allow_origin: non_empty("CORS_ALLOW_ORIGIN").unwrap_or(defaults.cors_allow_origin),
        })
    }
}
