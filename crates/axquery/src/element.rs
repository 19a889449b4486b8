//! Element handle and the per-platform element seam

use crate::attributes::{
    ALTERNATE_CHILD_ATTRIBUTES, AX_ACTIONS, AX_CHILDREN, AX_DESCRIPTION, AX_FOCUSED_UI_ELEMENT,
    AX_HELP, AX_IDENTIFIER, AX_PARENT, AX_PLACEHOLDER_VALUE, AX_ROLE, AX_ROLE_DESCRIPTION,
    AX_SUBROLE, AX_TITLE, AX_VALUE, AX_WINDOWS, ROLE_APPLICATION,
};
use crate::errors::AutomationError;
use crate::utils::truncate_chars;
use crate::value::{AxValue, RawValue};
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, warn};

/// Upper bound on parent hops when walking towards the root.
const MAX_ANCESTRY_DEPTH: usize = 50;
/// Upper bound for the log-only path string.
const MAX_PATH_STRING_DEPTH: usize = 25;

/// Platform-specific element behaviour.
///
/// Implementations are thin wrappers around a live platform reference; every
/// call is a round trip into the owning application and may fail once the
/// element disappears.
pub trait UIElementImpl: fmt::Debug {
    /// Hash of the underlying node. Two handles to the same node must report
    /// the same id even when obtained separately; distinct nodes may collide.
    fn object_id(&self) -> usize;
    /// Exact identity test against another handle of the same backend.
    fn same_node(&self, other: &dyn UIElementImpl) -> bool;
    fn attribute_names(&self) -> Result<Vec<String>, AutomationError>;
    /// `Ok(None)` when the attribute exists but carries no value.
    fn raw_attribute(&self, name: &str) -> Result<Option<RawValue>, AutomationError>;
    fn action_names(&self) -> Result<Vec<String>, AutomationError>;
    fn perform_action(&self, action: &str) -> Result<(), AutomationError>;
    fn is_attribute_settable(&self, name: &str) -> Result<bool, AutomationError>;
    fn set_attribute(&self, name: &str, value: &AxValue) -> Result<(), AutomationError>;
    fn process_id(&self) -> Option<i32>;
    fn clone_box(&self) -> Box<dyn UIElementImpl>;
    fn as_any(&self) -> &dyn Any;
}

/// Handle to one node of a live accessibility tree.
///
/// Equality uses node identity, never attribute content; hashing uses the
/// node's id, so colliding ids only cost a bucket.
pub struct UIElement {
    inner: Box<dyn UIElementImpl>,
}

impl UIElement {
    pub fn new(inner: Box<dyn UIElementImpl>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> usize {
        self.inner.object_id()
    }

    pub fn process_id(&self) -> Option<i32> {
        self.inner.process_id()
    }

    /// Read and unwrap one attribute.
    ///
    /// Absent, unsupported and empty attributes all come back as `None`;
    /// only anomalous platform failures are logged.
    pub fn attribute(&self, name: &str) -> Option<AxValue> {
        match self.inner.raw_attribute(name) {
            Ok(Some(raw)) => AxValue::from_raw(raw),
            Ok(None) => None,
            Err(e) if e.is_absence() => None,
            Err(e) => {
                warn!("Failed to read {} on element {}: {}", name, self.id(), e);
                None
            }
        }
    }

    /// Non-empty string view of an attribute.
    pub fn string_attribute(&self, name: &str) -> Option<String> {
        match self.attribute(name)? {
            AxValue::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn attribute_names(&self) -> Vec<String> {
        match self.inner.attribute_names() {
            Ok(names) => names,
            Err(e) => {
                if !e.is_absence() {
                    warn!("Failed to list attributes on element {}: {}", self.id(), e);
                }
                Vec::new()
            }
        }
    }

    pub fn role(&self) -> Option<String> {
        self.string_attribute(AX_ROLE)
    }

    pub fn subrole(&self) -> Option<String> {
        self.string_attribute(AX_SUBROLE)
    }

    pub fn role_description(&self) -> Option<String> {
        self.string_attribute(AX_ROLE_DESCRIPTION)
    }

    pub fn title(&self) -> Option<String> {
        self.string_attribute(AX_TITLE)
    }

    /// `AXValue` rendered as text, whatever its type.
    pub fn value_text(&self) -> Option<String> {
        self.attribute(AX_VALUE)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_display_string())
    }

    pub fn description(&self) -> Option<String> {
        self.string_attribute(AX_DESCRIPTION)
    }

    pub fn help(&self) -> Option<String> {
        self.string_attribute(AX_HELP)
    }

    pub fn placeholder(&self) -> Option<String> {
        self.string_attribute(AX_PLACEHOLDER_VALUE)
    }

    pub fn identifier(&self) -> Option<String> {
        self.string_attribute(AX_IDENTIFIER)
    }

    pub fn parent(&self) -> Option<UIElement> {
        self.attribute(AX_PARENT)
            .and_then(|v| v.as_element().cloned())
    }

    pub fn windows(&self) -> Vec<UIElement> {
        self.attribute(AX_WINDOWS)
            .map(|v| v.elements())
            .unwrap_or_default()
    }

    pub fn focused_element(&self) -> Option<UIElement> {
        self.attribute(AX_FOCUSED_UI_ELEMENT)
            .and_then(|v| v.as_element().cloned())
    }

    pub fn is_application(&self) -> bool {
        self.role().as_deref() == Some(ROLE_APPLICATION)
    }

    /// Children from `AXChildren` only.
    pub fn direct_children(&self) -> Vec<UIElement> {
        self.attribute(AX_CHILDREN)
            .map(|v| v.elements())
            .unwrap_or_default()
    }

    /// All children: `AXChildren`, every alternate container attribute and,
    /// for an application, its windows. Deduplicated by identity, first
    /// occurrence wins.
    pub fn children(&self) -> Vec<UIElement> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        let mut absorb = |candidates: Vec<UIElement>| {
            for child in candidates {
                if seen.insert(child.clone()) {
                    result.push(child);
                }
            }
        };

        absorb(self.direct_children());
        for attr in ALTERNATE_CHILD_ATTRIBUTES {
            if let Some(value) = self.attribute(attr) {
                absorb(value.elements());
            }
        }
        if self.is_application() {
            absorb(self.windows());
        }

        result
    }

    /// Supported action names: the platform's direct list, else the
    /// alternate `AXActions` attribute, else `None`.
    pub fn supported_actions(&self) -> Option<Vec<String>> {
        match self.inner.action_names() {
            Ok(names) if !names.is_empty() => return Some(names),
            Ok(_) => {}
            Err(e) => {
                if !e.is_absence() {
                    debug!("Action names unavailable on element {}: {}", self.id(), e);
                }
            }
        }

        let fallback: Vec<String> = self
            .attribute(AX_ACTIONS)?
            .as_array()?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        if fallback.is_empty() {
            None
        } else {
            Some(fallback)
        }
    }

    pub fn supports_action(&self, action: &str) -> bool {
        self.supported_actions()
            .map(|actions| actions.iter().any(|a| a == action))
            .unwrap_or(false)
    }

    pub fn perform_action(&self, action: &str) -> Result<(), AutomationError> {
        debug!("Performing {} on {}", action, self.brief_description());
        self.inner.perform_action(action)
    }

    pub fn is_attribute_settable(&self, name: &str) -> bool {
        self.inner.is_attribute_settable(name).unwrap_or(false)
    }

    pub fn set_attribute(&self, name: &str, value: &AxValue) -> Result<(), AutomationError> {
        if !self.is_attribute_settable(name) {
            return Err(AutomationError::UnsupportedOperation(format!(
                "attribute '{name}' is not settable on {}",
                self.brief_description()
            )));
        }
        self.inner.set_attribute(name, value)
    }

    /// One-line summary: `AXButton "Save" #save-button`.
    ///
    /// Reads only string attributes, so it is safe to call while formatting
    /// any other attribute.
    pub fn brief_description(&self) -> String {
        let role = self.role().unwrap_or_else(|| "AXUnknown".to_string());
        let mut out = role;

        let label = self
            .title()
            .or_else(|| self.string_attribute(AX_VALUE))
            .or_else(|| self.description());
        if let Some(label) = label {
            out.push_str(&format!(" \"{}\"", truncate_chars(&label, 40)));
        }
        if let Some(id) = self.identifier() {
            out.push_str(&format!(" #{id}"));
        }
        out
    }

    /// Root-to-element string for logs, e.g.
    /// `AXApplication[TextEdit] > AXWindow[Untitled] > AXButton`.
    pub fn path_string(&self) -> String {
        let mut parts = Vec::new();
        let mut current = Some(self.clone());
        let mut hops = 0;
        while let Some(element) = current {
            if hops >= MAX_PATH_STRING_DEPTH {
                parts.push("...".to_string());
                break;
            }
            let role = element.role().unwrap_or_else(|| "AXUnknown".to_string());
            match element.title() {
                Some(title) => parts.push(format!("{role}[{}]", truncate_chars(&title, 30))),
                None => parts.push(role),
            }
            current = element.parent();
            hops += 1;
        }
        parts.reverse();
        parts.join(" > ")
    }

    /// Brief descriptions from this element upwards, ending with the
    /// enclosing application or with `stop_at` (both included, nothing
    /// beyond them).
    pub fn ancestry(&self, stop_at: Option<&UIElement>) -> Vec<String> {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(self.clone());

        while let Some(element) = current {
            if path.len() >= MAX_ANCESTRY_DEPTH || !visited.insert(element.clone()) {
                break;
            }
            path.push(element.brief_description());
            if stop_at == Some(&element) || element.is_application() {
                break;
            }
            current = element.parent();
        }
        path
    }
}

impl Clone for UIElement {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl PartialEq for UIElement {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.inner.same_node(other.inner.as_ref())
    }
}

impl Eq for UIElement {}

impl Hash for UIElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for UIElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UIElement")
            .field("id", &self.id())
            .field("inner", &self.inner)
            .finish()
    }
}
