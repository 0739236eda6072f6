use std::time::Duration;

use crate::parser::Variant;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("dictionary variant '{requested}' not found on page ({available} variant regions present)")]
    VariantNotFound { requested: Variant, available: usize },
    #[error("invalid request header '{name}'")]
    InvalidHeader { name: String },
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to load settings: {0}")]
    Config(#[from] config::ConfigError),
}
