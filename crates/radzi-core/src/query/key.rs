//! Hierarchical cache keys.
//!
//! A key is `[domain, subdomain, params]`. Parameters live in a `BTreeMap`,
//! so equality and hashing never depend on the order in which filters were
//! added. Absent optional filters are not stored at all: a query without a
//! confidence filter and one with `confidence_level = None` share an entry.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{BoundingBox, ConfidenceLevel};

/// A single filter value inside a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyParam {
    /// Free-form text (share codes, canonical bbox text)
    Text(String),
    /// Integer filter (thresholds, identifiers)
    Int(i64),
}

impl fmt::Display for KeyParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<String> for KeyParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for KeyParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for KeyParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for KeyParam {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<BoundingBox> for KeyParam {
    fn from(value: BoundingBox) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<ConfidenceLevel> for KeyParam {
    fn from(value: ConfidenceLevel) -> Self {
        Self::Text(value.as_str().to_string())
    }
}

/// Deterministic identity of one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    domain: String,
    subdomain: String,
    params: BTreeMap<String, KeyParam>,
}

impl CacheKey {
    /// Start a key with no parameters.
    pub fn new(domain: impl Into<String>, subdomain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            subdomain: subdomain.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter. A repeated name keeps the last value.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<KeyParam>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Add a parameter only when a value is present.
    #[must_use]
    pub fn with_optional_param<V: Into<KeyParam>>(
        self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.with_param(name, value),
            None => self,
        }
    }

    /// Top-level domain (`feedback`, `road_sections`, `clubs`).
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Second level (`global`, `personal`, `community`, `share_code`).
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// All parameters in canonical order.
    pub fn params(&self) -> &BTreeMap<String, KeyParam> {
        &self.params
    }

    /// Look up one parameter.
    pub fn param(&self, name: &str) -> Option<&KeyParam> {
        self.params.get(name)
    }

    /// Whether this key belongs to the family `[domain, subdomain?]`.
    pub fn matches_prefix(&self, domain: &str, subdomain: Option<&str>) -> bool {
        self.domain == domain && subdomain.map_or(true, |s| self.subdomain == s)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.subdomain)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}
