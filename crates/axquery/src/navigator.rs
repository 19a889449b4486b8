//! Deterministic `role[index]` path navigation.

use crate::context::DebugLog;
use crate::dlog;
use crate::element::UIElement;
use crate::errors::AutomationError;
use std::fmt;
use std::str::FromStr;

/// One `role[index]` step; `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathComponent {
    pub role: String,
    pub index: usize,
}

impl PathComponent {
    /// `window` or `AXWindow` addresses the application's window list.
    pub fn is_window(&self) -> bool {
        self.role.eq_ignore_ascii_case("window") || self.role.eq_ignore_ascii_case("AXWindow")
    }
}

impl FromStr for PathComponent {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            AutomationError::InvalidArgument(format!(
                "invalid path component '{s}', expected role[index]"
            ))
        };
        let s = s.trim();
        let open = s.find('[').ok_or_else(invalid)?;
        if !s.ends_with(']') {
            return Err(invalid());
        }
        let role = s[..open].trim();
        let index = s[open + 1..s.len() - 1]
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid())?;
        if role.is_empty() || index == 0 {
            return Err(invalid());
        }
        Ok(Self {
            role: role.to_string(),
            index,
        })
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.role, self.index)
    }
}

/// Walk `path` from `root`. Any unparseable step, empty candidate list or
/// out-of-range index yields `PathNotFound`; no partial result is returned.
pub fn navigate(
    root: &UIElement,
    path: &[String],
    log: &mut DebugLog,
) -> Result<UIElement, AutomationError> {
    let mut current = root.clone();
    for (step, raw) in path.iter().enumerate() {
        let component: PathComponent = raw.parse().map_err(|e: AutomationError| {
            AutomationError::PathNotFound(format!("step {}: {e}", step + 1))
        })?;

        let candidates = if component.is_window() {
            let windows = current.windows();
            if windows.is_empty() {
                filter_by_role(current.children(), "AXWindow")
            } else {
                windows
            }
        } else {
            filter_by_role(current.children(), &component.role)
        };

        let next = candidates.into_iter().nth(component.index - 1).ok_or_else(|| {
            AutomationError::PathNotFound(format!(
                "step {} '{}' not found under {}",
                step + 1,
                component,
                current.brief_description()
            ))
        })?;
        dlog!(log, "path {} -> {}", component, next.brief_description());
        current = next;
    }
    Ok(current)
}

fn filter_by_role(children: Vec<UIElement>, role: &str) -> Vec<UIElement> {
    children
        .into_iter()
        .filter(|child| {
            child
                .role()
                .map(|r| r.eq_ignore_ascii_case(role))
                .unwrap_or(false)
        })
        .collect()
}
