//! Access layer configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! patron_namespace = "patron:"
//!
//! [cache]
//! max_entries = 5000
//! ttl_secs = 300
//!
//! [properties]
//! acl.globalRoles.canManage = "repo_admins, curators"
//! ```
//!
//! Everything under `[properties]` is flattened into dotted `key -> value`
//! strings, so nested TOML tables and quoted flat keys are interchangeable.

use crate::core::model::{PrincipalClassifier, DEFAULT_PATRON_NAMESPACE};
use crate::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Bounds for the direct ACL record cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached objects
    pub max_entries: usize,
    /// Seconds before a cached record is refetched
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        CacheConfig {
            max_entries,
            ttl_secs: ttl.as_secs(),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_entries: 5000,
            ttl_secs: 300,
        }
    }
}

/// Top-level access configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Prefix that marks a principal as a named patron group
    pub patron_namespace: String,

    pub cache: CacheConfig,

    /// Free-form properties, including global role grants
    pub properties: toml::Table,
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig {
            patron_namespace: DEFAULT_PATRON_NAMESPACE.to_string(),
            cache: CacheConfig::default(),
            properties: toml::Table::new(),
        }
    }
}

impl AccessConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: AccessConfig = toml::from_str(toml)?;
        if config.cache.max_entries == 0 {
            return Err(AccessError::Config(
                "cache.max_entries must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading access configuration from {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn classifier(&self) -> PrincipalClassifier {
        PrincipalClassifier::new(self.patron_namespace.clone())
    }

    /// Properties flattened to dotted keys with string values
    pub fn flat_properties(&self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        flatten_table("", &self.properties, &mut flat);
        flat
    }
}

fn flatten_table(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(inner) => flatten_table(&full_key, inner, out),
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            toml::Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(|item| match item {
                        toml::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                out.insert(full_key, joined);
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}
