//! Engine limits and knobs.
//!
//! Layering is defaults, then an optional JSON file, then `AXQUERY_*`
//! environment variables; the CLI applies its flags last.

use crate::errors::AutomationError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MAX_SEARCH_DEPTH: usize = 20;
pub const DEFAULT_MAX_COLLECT_ELEMENTS: usize = 200;
pub const DEFAULT_MAX_TEXT_NODES: usize = 5000;
pub const DEFAULT_ATTRIBUTE_RETRY_COUNT: u32 = 3;
pub const DEFAULT_ATTRIBUTE_RETRY_DELAY: Duration = Duration::from_millis(50);
pub const DEFAULT_COLLECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxConfig {
    /// Deepest level the single-match search descends to (root is depth 0).
    pub max_search_depth: usize,
    /// Deepest level the collector descends to.
    pub max_collect_depth: usize,
    /// Default cap on elements returned by `collectAll`.
    pub max_collect_elements: usize,
    /// Reads of lazily populated attributes before they count as empty.
    pub attribute_retry_count: u32,
    #[serde(with = "duration_ms")]
    pub attribute_retry_delay: Duration,
    /// Wall-clock guard for one collection; `None` disables it.
    #[serde(with = "optional_duration_ms")]
    pub collect_timeout: Option<Duration>,
    /// Cap on characters returned by `extractText`.
    pub max_text_length: Option<usize>,
    /// Elements `extractText` reads text from per extracted subtree.
    pub max_text_nodes: usize,
    /// Attach the per-command reasoning log to every response.
    pub debug_logging: bool,
}

impl Default for AxConfig {
    fn default() -> Self {
        Self {
            max_search_depth: DEFAULT_MAX_SEARCH_DEPTH,
            max_collect_depth: DEFAULT_MAX_SEARCH_DEPTH,
            max_collect_elements: DEFAULT_MAX_COLLECT_ELEMENTS,
            attribute_retry_count: DEFAULT_ATTRIBUTE_RETRY_COUNT,
            attribute_retry_delay: DEFAULT_ATTRIBUTE_RETRY_DELAY,
            collect_timeout: Some(DEFAULT_COLLECT_TIMEOUT),
            max_text_length: None,
            max_text_nodes: DEFAULT_MAX_TEXT_NODES,
            debug_logging: false,
        }
    }
}

impl AxConfig {
    /// Defaults overlaid with `AXQUERY_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Read a JSON config file, then overlay the environment.
    pub fn load(path: &Path) -> Result<Self, AutomationError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AutomationError::InvalidArgument(format!("cannot read config {}: {e}", path.display()))
        })?;
        let mut config: AxConfig = serde_json::from_str(&text).map_err(|e| {
            AutomationError::InvalidArgument(format!("invalid config {}: {e}", path.display()))
        })?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from an environment-like lookup. Unparseable values are
    /// ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var::<usize>(&lookup, "AXQUERY_MAX_DEPTH") {
            self.max_search_depth = v;
            self.max_collect_depth = v;
        }
        if let Some(v) = parse_var::<usize>(&lookup, "AXQUERY_MAX_ELEMENTS") {
            self.max_collect_elements = v;
        }
        if let Some(v) = parse_var::<usize>(&lookup, "AXQUERY_MAX_TEXT_NODES") {
            self.max_text_nodes = v;
        }
        if let Some(v) = parse_var::<u32>(&lookup, "AXQUERY_RETRY_COUNT") {
            self.attribute_retry_count = v;
        }
        if let Some(v) = parse_var::<u64>(&lookup, "AXQUERY_RETRY_DELAY_MS") {
            self.attribute_retry_delay = Duration::from_millis(v);
        }
        if let Some(v) = parse_var::<u64>(&lookup, "AXQUERY_COLLECT_TIMEOUT_MS") {
            self.collect_timeout = if v == 0 {
                None
            } else {
                Some(Duration::from_millis(v))
            };
        }
        if let Some(v) = lookup("AXQUERY_DEBUG") {
            self.debug_logging = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

mod optional_duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AxConfig::default();
        assert_eq!(config.max_search_depth, 20);
        assert_eq!(config.max_collect_elements, 200);
        assert_eq!(config.attribute_retry_count, 3);
        assert_eq!(config.max_text_nodes, DEFAULT_MAX_TEXT_NODES);
    }

    #[test]
    fn test_env_overlay() {
        let env: HashMap<&str, &str> = [
            ("AXQUERY_MAX_DEPTH", "7"),
            ("AXQUERY_MAX_ELEMENTS", "not-a-number"),
            ("AXQUERY_COLLECT_TIMEOUT_MS", "0"),
            ("AXQUERY_DEBUG", "true"),
            ("AXQUERY_MAX_TEXT_NODES", "12000"),
        ]
        .into_iter()
        .collect();

        let mut config = AxConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.max_search_depth, 7);
        assert_eq!(config.max_collect_depth, 7);
        assert_eq!(config.max_collect_elements, 200);
        assert_eq!(config.collect_timeout, None);
        assert!(config.debug_logging);
        assert_eq!(config.max_text_nodes, 12000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AxConfig =
            serde_json::from_str(r#"{"max_collect_elements": 50, "attribute_retry_delay": 5}"#)
                .unwrap();
        assert_eq!(config.max_collect_elements, 50);
        assert_eq!(config.attribute_retry_delay, Duration::from_millis(5));
        assert_eq!(config.max_search_depth, DEFAULT_MAX_SEARCH_DEPTH);
    }
}
