//! Locator evaluation against a single element.

use crate::attributes::{
    AX_ACTION_NAMES, COMPUTED_NAME_CONTAINS, COMPUTED_NAME_EQUALS, LAZY_ATTRIBUTES,
    SUBSET_MATCH_ATTRIBUTES,
};
use crate::config::AxConfig;
use crate::context::DebugLog;
use crate::dlog;
use crate::element::UIElement;
use crate::formatter::computed_name;
use crate::locator::Locator;
use crate::selector::MatchRule;
use crate::utils::{contains_normalized, normalize};
use crate::value::{parse_bool, AxValue};
use std::collections::BTreeSet;

const FLOAT_TOLERANCE: f64 = 1e-9;

/// Result of evaluating a locator against one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    FullMatch,
    NoMatch,
    /// Role and criteria hold but the required action is not offered.
    MatchedButActionMissing,
}

impl MatchOutcome {
    pub fn is_full(&self) -> bool {
        matches!(self, MatchOutcome::FullMatch)
    }
}

/// Evaluate `locator` against `element`.
pub fn evaluate(
    element: &UIElement,
    locator: &Locator,
    config: &AxConfig,
    log: &mut DebugLog,
) -> MatchOutcome {
    if let Some(expected_role) = locator.role_criterion() {
        let role = element.role();
        if role.as_deref() != Some(expected_role) {
            return MatchOutcome::NoMatch;
        }
    }

    let rules = locator.attribute_rules();
    if !rules.is_empty() {
        let passed = if locator.match_all {
            rules
                .iter()
                .all(|(key, rule)| criterion_matches(element, key, rule, config, log))
        } else {
            rules
                .iter()
                .any(|(key, rule)| criterion_matches(element, key, rule, config, log))
        };
        if !passed {
            return MatchOutcome::NoMatch;
        }
    }

    // The locator's computed-name fields narrow the match regardless of
    // `match_all`.
    let name_filters = [
        locator
            .computed_name_contains
            .as_deref()
            .map(|needle| (COMPUTED_NAME_CONTAINS, MatchRule::Contains(needle.to_string()))),
        locator
            .computed_name_equals
            .as_deref()
            .map(|expected| (COMPUTED_NAME_EQUALS, MatchRule::Equals(expected.to_string()))),
    ];
    for (key, rule) in name_filters.iter().flatten() {
        if !criterion_matches(element, key, rule, config, log) {
            return MatchOutcome::NoMatch;
        }
    }

    match locator.required_action() {
        None => MatchOutcome::FullMatch,
        Some(action) if element.supports_action(action) => MatchOutcome::FullMatch,
        Some(action) => {
            dlog!(
                log,
                "{} matches but lacks required action {}",
                element.brief_description(),
                action
            );
            MatchOutcome::MatchedButActionMissing
        }
    }
}

/// Whether one `key`/`rule` criterion holds for `element`.
pub fn criterion_matches(
    element: &UIElement,
    key: &str,
    rule: &MatchRule,
    config: &AxConfig,
    log: &mut DebugLog,
) -> bool {
    if key == COMPUTED_NAME_CONTAINS || key == COMPUTED_NAME_EQUALS {
        let name = computed_name(element);
        let ok = computed_name_matches(name.as_deref(), key == COMPUTED_NAME_CONTAINS, rule);
        dlog!(log, "computed name {:?} {} -> {}", name, rule, ok);
        return ok;
    }

    let actual = if key == AX_ACTION_NAMES {
        element
            .supported_actions()
            .map(|actions| AxValue::Array(actions.into_iter().map(AxValue::String).collect()))
    } else {
        read_with_retry(element, key, config, log)
    };

    let ok = match (rule, actual.as_ref()) {
        (MatchRule::Exists, value) => value.is_some(),
        (MatchRule::Not(_), None) => true,
        (MatchRule::Not(expected), Some(value)) => !value_equals(key, value, expected),
        (MatchRule::Contains(_), None) | (MatchRule::Equals(_), None) => false,
        (MatchRule::Contains(needle), Some(value)) => {
            contains_normalized(&value.to_display_string(), needle)
        }
        (MatchRule::Equals(expected), Some(value)) => value_equals(key, value, expected),
    };

    if !ok {
        dlog!(
            log,
            "{}: {} {} failed (actual {})",
            element.brief_description(),
            key,
            rule,
            actual
                .as_ref()
                .map(|v| v.to_display_string())
                .unwrap_or_else(|| "<none>".to_string())
        );
    }
    ok
}

/// Read an attribute, retrying the lazily populated ones until they carry a
/// non-empty value or the retry budget runs out.
pub fn read_with_retry(
    element: &UIElement,
    key: &str,
    config: &AxConfig,
    log: &mut DebugLog,
) -> Option<AxValue> {
    let first = element.attribute(key);
    if !LAZY_ATTRIBUTES.contains(&key) || first.as_ref().is_some_and(|v| !v.is_empty()) {
        return first;
    }

    for attempt in 1..=config.attribute_retry_count {
        if !config.attribute_retry_delay.is_zero() {
            std::thread::sleep(config.attribute_retry_delay);
        }
        let value = element.attribute(key);
        if value.as_ref().is_some_and(|v| !v.is_empty()) {
            dlog!(log, "{} populated after {} retries", key, attempt);
            return value;
        }
    }
    dlog!(
        log,
        "{} still empty after {} retries",
        key,
        config.attribute_retry_count
    );
    first
}

/// Typed equality between an attribute value and the expected string.
pub fn value_equals(key: &str, actual: &AxValue, expected: &str) -> bool {
    match actual {
        AxValue::String(s) => {
            if s == expected {
                return true;
            }
            if let (Some(want), Some(have)) = (parse_literal_bool(expected), actual.as_bool()) {
                return want == have;
            }
            match (expected.trim().parse::<f64>(), actual.as_f64()) {
                (Ok(want), Some(have)) => (want - have).abs() < FLOAT_TOLERANCE,
                _ => false,
            }
        }
        AxValue::Bool(b) => parse_bool(expected) == Some(*b),
        AxValue::Int(_) | AxValue::Float(_) => {
            if let Some(want) = parse_literal_bool(expected) {
                return actual.as_bool() == Some(want);
            }
            match (expected.trim().parse::<f64>(), actual.as_f64()) {
                (Ok(want), Some(have)) => (want - have).abs() < FLOAT_TOLERANCE,
                _ => false,
            }
        }
        AxValue::Array(items) => {
            let have: BTreeSet<String> = items.iter().map(AxValue::to_display_string).collect();
            let subset = SUBSET_MATCH_ATTRIBUTES.contains(&key);
            let want = split_list(expected, subset);
            if subset {
                want.is_subset(&have)
            } else {
                want == have
            }
        }
        other => other.to_display_string() == expected,
    }
}

/// Only the words, not the digits: "1" against a number is numeric.
fn parse_literal_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Expected list syntax: a JSON array of strings, or comma separated items.
/// Class-list style attributes also split on whitespace.
fn split_list(expected: &str, split_whitespace: bool) -> BTreeSet<String> {
    let trimmed = expected.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items.into_iter().collect();
        }
    }
    trimmed
        .split(|c: char| c == ',' || (split_whitespace && c.is_whitespace()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn computed_name_matches(name: Option<&str>, contains_key: bool, rule: &MatchRule) -> bool {
    let Some(name) = name else {
        return matches!(rule, MatchRule::Not(_));
    };
    let compare = |expected: &str, contains: bool| {
        if contains {
            contains_normalized(name, expected)
        } else {
            normalize(name.trim()) == normalize(expected.trim())
        }
    };
    match rule {
        MatchRule::Exists => true,
        MatchRule::Not(expected) => !compare(expected, contains_key),
        MatchRule::Contains(expected) => compare(expected, true),
        MatchRule::Equals(expected) => compare(expected, contains_key),
    }
}
