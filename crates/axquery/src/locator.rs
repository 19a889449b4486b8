//! Declarative element description carried by commands.

use crate::attributes::{normalize_key, AX_ROLE};
use crate::selector::{is_wildcard_role, MatchRule};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Matching criteria plus optional path and action constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locator {
    /// Attribute key to expected value. The role key is matched first.
    #[serde(default, deserialize_with = "deserialize_criteria")]
    pub criteria: BTreeMap<String, String>,
    #[serde(default = "default_match_all")]
    pub match_all: bool,
    /// `role[index]` steps walked from the application before searching.
    #[serde(
        default,
        alias = "root_path_hint",
        skip_serializing_if = "Option::is_none"
    )]
    pub root_element_path_hint: Option<Vec<String>>,
    /// Action a match must support to count as a full match.
    #[serde(
        default,
        alias = "required_action",
        skip_serializing_if = "Option::is_none"
    )]
    pub require_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_name_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_name_equals: Option<String>,
}

fn default_match_all() -> bool {
    true
}

impl Default for Locator {
    fn default() -> Self {
        Self {
            criteria: BTreeMap::new(),
            match_all: true,
            root_element_path_hint: None,
            require_action: None,
            computed_name_contains: None,
            computed_name_equals: None,
        }
    }
}

impl Locator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(role: &str) -> Self {
        Self::new().with(AX_ROLE, role)
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.criteria.insert(key.to_string(), value.to_string());
        self
    }

    pub fn requiring_action(mut self, action: &str) -> Self {
        self.require_action = Some(action.to_string());
        self
    }

    pub fn match_any(mut self) -> Self {
        self.match_all = false;
        self
    }

    pub fn under_path(mut self, path: &[&str]) -> Self {
        self.root_element_path_hint = Some(path.iter().map(|s| s.to_string()).collect());
        self
    }

    /// The role criterion, `None` when absent or a wildcard.
    pub fn role_criterion(&self) -> Option<&str> {
        self.criteria
            .iter()
            .find(|(k, _)| normalize_key(k) == AX_ROLE)
            .map(|(_, v)| v.as_str())
            .filter(|v| !is_wildcard_role(v))
    }

    /// Every non-role criterion, keys normalized, rules parsed.
    pub fn attribute_rules(&self) -> Vec<(&str, MatchRule)> {
        self.criteria
            .iter()
            .filter(|(k, _)| normalize_key(k) != AX_ROLE)
            .map(|(k, v)| (normalize_key(k), MatchRule::from(v.as_str())))
            .collect()
    }

    pub fn required_action(&self) -> Option<&str> {
        self.require_action
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// True when every element matches: no role, criteria or filters.
    pub fn is_trivial(&self) -> bool {
        self.role_criterion().is_none()
            && self.attribute_rules().is_empty()
            && self.required_action().is_none()
            && self.computed_name_contains.is_none()
            && self.computed_name_equals.is_none()
    }
}

/// Accept JSON scalars as criterion values; `{"AXEnabled": true}` reads the
/// same as `{"AXEnabled": "true"}`.
fn deserialize_criteria<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(D::Error::custom(format!(
                        "criterion '{k}' must be a string, number or boolean, got {other}"
                    )))
                }
            };
            Ok((k, v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_and_defaults() {
        let locator: Locator = serde_json::from_str(
            r#"{"criteria": {"role": "AXButton", "AXEnabled": true},
                "root_path_hint": ["window[1]"],
                "required_action": "AXPress"}"#,
        )
        .unwrap();
        assert!(locator.match_all);
        assert_eq!(locator.role_criterion(), Some("AXButton"));
        assert_eq!(locator.criteria.get("AXEnabled").map(String::as_str), Some("true"));
        assert_eq!(
            locator.root_element_path_hint,
            Some(vec!["window[1]".to_string()])
        );
        assert_eq!(locator.required_action(), Some("AXPress"));
    }

    #[test]
    fn test_wildcard_role_is_ignored() {
        let locator = Locator::role("*");
        assert_eq!(locator.role_criterion(), None);
        assert!(locator.is_trivial());
    }

    #[test]
    fn test_nested_object_criterion_is_rejected() {
        let result: Result<Locator, _> =
            serde_json::from_str(r#"{"criteria": {"AXTitle": {"nested": 1}}}"#);
        assert!(result.is_err());
    }
}
