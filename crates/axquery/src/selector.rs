//! Expected-value rules inside locator criteria.
//!
//! A criterion value is a short string with an optional prefix:
//!
//! | value       | meaning                                        |
//! |-------------|------------------------------------------------|
//! | `exists`    | attribute present with any value               |
//! | `!Cancel`   | attribute present and not equal to `Cancel`    |
//! | `~save`     | case-insensitive substring (`*` and `%` too)   |
//! | `Save`      | equality, typed against the attribute's value  |

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    Exists,
    Not(String),
    Contains(String),
    Equals(String),
}

impl MatchRule {
    /// The literal the rule compares against, if any.
    pub fn operand(&self) -> Option<&str> {
        match self {
            MatchRule::Exists => None,
            MatchRule::Not(s) | MatchRule::Contains(s) | MatchRule::Equals(s) => Some(s),
        }
    }
}

impl From<&str> for MatchRule {
    fn from(s: &str) -> Self {
        match s {
            _ if s.eq_ignore_ascii_case("exists") => MatchRule::Exists,
            _ if s.starts_with('!') => MatchRule::Not(s[1..].to_string()),
            _ if s.starts_with(['~', '*', '%']) && s.len() > 1 => {
                MatchRule::Contains(s[1..].to_string())
            }
            _ => MatchRule::Equals(s.to_string()),
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRule::Exists => write!(f, "exists"),
            MatchRule::Not(s) => write!(f, "!= {s:?}"),
            MatchRule::Contains(s) => write!(f, "contains {s:?}"),
            MatchRule::Equals(s) => write!(f, "== {s:?}"),
        }
    }
}

/// The role criterion matches everything when empty or `*`.
pub fn is_wildcard_role(role: &str) -> bool {
    let role = role.trim();
    role.is_empty() || role == "*"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_prefixes() {
        assert_eq!(MatchRule::from("exists"), MatchRule::Exists);
        assert_eq!(MatchRule::from("!Cancel"), MatchRule::Not("Cancel".into()));
        assert_eq!(MatchRule::from("~Save"), MatchRule::Contains("Save".into()));
        assert_eq!(MatchRule::from("*Save"), MatchRule::Contains("Save".into()));
        assert_eq!(MatchRule::from("%Save"), MatchRule::Contains("Save".into()));
        assert_eq!(MatchRule::from("Save"), MatchRule::Equals("Save".into()));
    }

    #[test]
    fn test_lone_prefix_is_literal() {
        assert_eq!(MatchRule::from("*"), MatchRule::Equals("*".into()));
        assert_eq!(MatchRule::from("!"), MatchRule::Not(String::new()));
    }

    #[test]
    fn test_wildcard_role() {
        assert!(is_wildcard_role(""));
        assert!(is_wildcard_role(" * "));
        assert!(!is_wildcard_role("AXButton"));
    }
}
