use std::collections::BTreeMap;
use std::time::Duration;

use config::Config;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_ORIGIN: &str = "https://dictionary.cambridge.org";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64)";
const DEFAULT_TIMEOUT_SECS: f64 = 5.0;
const DEFAULT_CONCURRENCY: usize = 4;

/// Lookup settings. Loaded from an optional `cambridge.toml` and then from
/// `CAMBRIDGE_*` environment variables (nested keys split on `__`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub origin: String,
    pub timeout_secs: f64,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
    pub concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            origin: DEFAULT_ORIGIN.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(config::File::with_name("cambridge").required(false))
            .add_source(
                config::Environment::with_prefix("CAMBRIDGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Non-positive or non-finite values fall back to the default.
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs.is_finite() && self.timeout_secs > 0.0 {
            Duration::from_secs_f64(self.timeout_secs)
        } else {
            Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS)
        }
    }

    /// Parse a `Name: value` header argument into the extra header map.
    pub fn push_header(&mut self, raw: &str) -> Result<()> {
        let invalid = || Error::InvalidHeader { name: raw.trim().to_string() };
        let (name, value) = raw.split_once(':').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        self.headers.insert(name.to_string(), value.trim().to_string());
        Ok(())
    }
}
