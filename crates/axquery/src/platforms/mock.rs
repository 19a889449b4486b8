//! In-memory accessibility tree.
//!
//! Builds deterministic trees for tests and for embedders that want to run the
//! query engine without a live desktop. Nodes behave like platform handles:
//! identity is stable, reads can fail, some attributes populate lazily and
//! actions are recorded instead of executed.
//!
//! ```
//! use axquery::platforms::mock::MockElement;
//!
//! let app = MockElement::new("AXApplication").title("TextEdit");
//! let window = MockElement::new("AXWindow").title("Untitled");
//! window.add_child(MockElement::new("AXButton").title("Save").action("AXPress"));
//! app.add_window(window);
//! assert_eq!(app.handle().windows().len(), 1);
//! ```

use crate::attributes::{AX_CHILDREN, AX_PARENT, AX_ROLE, AX_WINDOWS};
use crate::element::{UIElement, UIElementImpl};
use crate::errors::AutomationError;
use crate::platforms::{AccessibilityEngine, FOCUSED_APPLICATION};
use crate::value::{AxValue, RawValue};
use std::any::Any;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
const DEFAULT_PID: i32 = 4242;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct LazyAttribute {
    value: RawValue,
    reads_before_ready: usize,
}

#[derive(Default)]
struct NodeState {
    attributes: BTreeMap<String, RawValue>,
    lazy: HashMap<String, LazyAttribute>,
    failing: HashMap<String, AutomationError>,
    settable: HashSet<String>,
    actions: Vec<String>,
    performed: Vec<String>,
    read_counts: HashMap<String, usize>,
    parent: Option<Weak<MockNode>>,
    pid: i32,
    invalid: bool,
}

struct MockNode {
    id: usize,
    state: Mutex<NodeState>,
}

/// Builder and live handle for one in-memory node.
#[derive(Clone)]
pub struct MockElement {
    node: Arc<MockNode>,
}

impl MockElement {
    pub fn new(role: &str) -> Self {
        Self::with_id(role, NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// A distinct node reporting the same object id as `other`, as two
    /// platform references with equal hashes would.
    pub fn colliding_with(role: &str, other: &MockElement) -> Self {
        Self::with_id(role, other.id())
    }

    fn with_id(role: &str, id: usize) -> Self {
        let element = Self {
            node: Arc::new(MockNode {
                id,
                state: Mutex::new(NodeState {
                    pid: DEFAULT_PID,
                    ..NodeState::default()
                }),
            }),
        };
        element.set(AX_ROLE, RawValue::String(role.to_string()));
        element
    }

    /// The platform-neutral handle for this node.
    pub fn handle(&self) -> UIElement {
        UIElement::new(Box::new(self.clone()))
    }

    pub fn id(&self) -> usize {
        self.node.id
    }

    /// Store an attribute value, replacing any previous one.
    pub fn set(&self, key: &str, value: impl Into<RawValue>) {
        lock(&self.node.state)
            .attributes
            .insert(key.to_string(), value.into());
    }

    pub fn attr(self, key: &str, value: impl Into<RawValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn title(self, title: &str) -> Self {
        self.attr("AXTitle", title)
    }

    pub fn value(self, value: impl Into<RawValue>) -> Self {
        self.attr("AXValue", value)
    }

    pub fn identifier(self, identifier: &str) -> Self {
        self.attr("AXIdentifier", identifier)
    }

    pub fn description(self, description: &str) -> Self {
        self.attr("AXDescription", description)
    }

    pub fn pid(self, pid: i32) -> Self {
        lock(&self.node.state).pid = pid;
        self
    }

    fn process(&self) -> i32 {
        lock(&self.node.state).pid
    }

    pub fn action(self, action: &str) -> Self {
        lock(&self.node.state).actions.push(action.to_string());
        self
    }

    pub fn settable(self, key: &str) -> Self {
        lock(&self.node.state).settable.insert(key.to_string());
        self
    }

    /// Attribute that reads as absent for the first `reads_before_ready` reads.
    pub fn lazy_attr(self, key: &str, value: impl Into<RawValue>, reads_before_ready: usize) -> Self {
        lock(&self.node.state).lazy.insert(
            key.to_string(),
            LazyAttribute {
                value: value.into(),
                reads_before_ready,
            },
        );
        self
    }

    /// Attribute whose every read fails with `error`.
    pub fn failing_attr(self, key: &str, error: AutomationError) -> Self {
        lock(&self.node.state).failing.insert(key.to_string(), error);
        self
    }

    /// Append `child` to `AXChildren` and make this node its parent.
    pub fn add_child(&self, child: MockElement) -> &Self {
        child.set_parent(self);
        self.append_to(AX_CHILDREN, &child);
        self
    }

    pub fn with_child(self, child: MockElement) -> Self {
        self.add_child(child);
        self
    }

    /// Append `window` to `AXWindows` and make this node its parent.
    pub fn add_window(&self, window: MockElement) -> &Self {
        window.set_parent(self);
        self.append_to(AX_WINDOWS, &window);
        self
    }

    /// Expose `element` under an additional container attribute without
    /// reparenting it.
    pub fn add_to_container(&self, attribute: &str, element: &MockElement) -> &Self {
        self.append_to(attribute, element);
        self
    }

    /// Make every subsequent read on this node fail as a stale handle would.
    pub fn invalidate(&self) {
        lock(&self.node.state).invalid = true;
    }

    pub fn performed_actions(&self) -> Vec<String> {
        lock(&self.node.state).performed.clone()
    }

    pub fn read_count(&self, key: &str) -> usize {
        lock(&self.node.state)
            .read_counts
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn stored(&self, key: &str) -> Option<AxValue> {
        let raw = lock(&self.node.state).attributes.get(key).cloned()?;
        AxValue::from_raw(raw)
    }

    fn set_parent(&self, parent: &MockElement) {
        lock(&self.node.state).parent = Some(Arc::downgrade(&parent.node));
    }

    fn append_to(&self, attribute: &str, element: &MockElement) {
        let mut state = lock(&self.node.state);
        let entry = state
            .attributes
            .entry(attribute.to_string())
            .or_insert_with(|| RawValue::Array(Vec::new()));
        match entry {
            RawValue::Array(items) => items.push(RawValue::Element(element.handle())),
            other => *other = RawValue::Array(vec![RawValue::Element(element.handle())]),
        }
    }

    fn stale() -> AutomationError {
        AutomationError::ElementNotFound("element no longer exists".to_string())
    }
}

impl fmt::Debug for MockElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match lock(&self.node.state).attributes.get(AX_ROLE) {
            Some(RawValue::String(role)) => role.clone(),
            _ => "AXUnknown".to_string(),
        };
        f.debug_struct("MockElement")
            .field("id", &self.node.id)
            .field("role", &role)
            .finish()
    }
}

impl UIElementImpl for MockElement {
    fn object_id(&self) -> usize {
        self.node.id
    }

    fn same_node(&self, other: &dyn UIElementImpl) -> bool {
        other
            .as_any()
            .downcast_ref::<MockElement>()
            .is_some_and(|other| Arc::ptr_eq(&self.node, &other.node))
    }

    fn attribute_names(&self) -> Result<Vec<String>, AutomationError> {
        let state = lock(&self.node.state);
        if state.invalid {
            return Err(Self::stale());
        }
        let mut names: Vec<String> = state.attributes.keys().cloned().collect();
        names.extend(state.lazy.keys().cloned());
        if state.parent.is_some() {
            names.push(AX_PARENT.to_string());
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn raw_attribute(&self, name: &str) -> Result<Option<RawValue>, AutomationError> {
        let mut state = lock(&self.node.state);
        if state.invalid {
            return Err(Self::stale());
        }
        *state.read_counts.entry(name.to_string()).or_insert(0) += 1;

        if let Some(error) = state.failing.get(name) {
            return Err(error.clone());
        }
        if name == AX_PARENT {
            let parent = state
                .parent
                .as_ref()
                .and_then(Weak::upgrade)
                .map(|node| RawValue::Element(MockElement { node }.handle()));
            return Ok(parent);
        }
        if let Some(lazy) = state.lazy.get_mut(name) {
            if lazy.reads_before_ready > 0 {
                lazy.reads_before_ready -= 1;
                return Ok(None);
            }
            return Ok(Some(lazy.value.clone()));
        }
        match state.attributes.get(name) {
            Some(value) => Ok(Some(value.clone())),
            None => Err(AutomationError::UnsupportedOperation(format!(
                "attribute {name} not supported"
            ))),
        }
    }

    fn action_names(&self) -> Result<Vec<String>, AutomationError> {
        let state = lock(&self.node.state);
        if state.invalid {
            return Err(Self::stale());
        }
        Ok(state.actions.clone())
    }

    fn perform_action(&self, action: &str) -> Result<(), AutomationError> {
        let mut state = lock(&self.node.state);
        if state.invalid {
            return Err(Self::stale());
        }
        if !state.actions.iter().any(|a| a == action) {
            return Err(AutomationError::UnsupportedOperation(format!(
                "action {action} not supported"
            )));
        }
        state.performed.push(action.to_string());
        Ok(())
    }

    fn is_attribute_settable(&self, name: &str) -> Result<bool, AutomationError> {
        let state = lock(&self.node.state);
        if state.invalid {
            return Err(Self::stale());
        }
        Ok(state.settable.contains(name))
    }

    fn set_attribute(&self, name: &str, value: &AxValue) -> Result<(), AutomationError> {
        let mut state = lock(&self.node.state);
        if state.invalid {
            return Err(Self::stale());
        }
        state
            .attributes
            .insert(name.to_string(), raw_from_value(value));
        Ok(())
    }

    fn process_id(&self) -> Option<i32> {
        Some(self.process())
    }

    fn clone_box(&self) -> Box<dyn UIElementImpl> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn raw_from_value(value: &AxValue) -> RawValue {
    use crate::value::BoxedValue;
    match value {
        AxValue::String(s) => RawValue::String(s.clone()),
        AxValue::Bool(b) => RawValue::Boolean(*b),
        AxValue::Int(i) => RawValue::Integer(*i),
        AxValue::Float(f) => RawValue::Float(*f),
        AxValue::Point(p) => RawValue::Boxed(BoxedValue::Point(*p)),
        AxValue::Size(s) => RawValue::Boxed(BoxedValue::Size(*s)),
        AxValue::Rect(r) => RawValue::Boxed(BoxedValue::Rect(*r)),
        AxValue::Range(r) => RawValue::Boxed(BoxedValue::Range(*r)),
        AxValue::Element(e) => RawValue::Element(e.clone()),
        AxValue::Array(items) => RawValue::Array(items.iter().map(raw_from_value).collect()),
        AxValue::Map(entries) => RawValue::Dictionary(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), raw_from_value(v)))
                .collect(),
        ),
        AxValue::Error(code) => RawValue::Boxed(BoxedValue::Error(*code)),
        AxValue::Opaque(description) => RawValue::Other(description.clone()),
    }
}

/// Engine over a fixed set of in-memory applications.
pub struct MockEngine {
    applications: Vec<(Vec<String>, MockElement)>,
    focused: Option<usize>,
    system_wide: MockElement,
    permissions: bool,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            applications: Vec::new(),
            focused: None,
            system_wide: MockElement::new("AXSystemWide"),
            permissions: true,
        }
    }

    /// Register an application reachable by any of `identifiers` (and by its
    /// process id). The first registered application is the focused one
    /// unless [`MockEngine::focus`] says otherwise.
    pub fn with_application(mut self, identifiers: &[&str], app: MockElement) -> Self {
        self.applications
            .push((identifiers.iter().map(|s| s.to_string()).collect(), app));
        self
    }

    pub fn focus(mut self, identifier: &str) -> Self {
        self.focused = self
            .applications
            .iter()
            .position(|(ids, _)| ids.iter().any(|id| id == identifier));
        self
    }

    pub fn without_permissions(mut self) -> Self {
        self.permissions = false;
        self
    }

    fn focused_application(&self) -> Option<&MockElement> {
        match self.focused {
            Some(index) => self.applications.get(index).map(|(_, app)| app),
            None => self.applications.first().map(|(_, app)| app),
        }
    }
}

impl AccessibilityEngine for MockEngine {
    fn application(&self, identifier: &str) -> Result<UIElement, AutomationError> {
        if identifier == FOCUSED_APPLICATION {
            return self
                .focused_application()
                .map(MockElement::handle)
                .ok_or_else(|| {
                    AutomationError::ApplicationNotFound("no focused application".to_string())
                });
        }

        let pid = identifier.parse::<i32>().ok();
        self.applications
            .iter()
            .find(|(ids, app)| {
                ids.iter().any(|id| id.eq_ignore_ascii_case(identifier))
                    || (pid.is_some() && pid == Some(app.process()))
            })
            .map(|(_, app)| app.handle())
            .ok_or_else(|| AutomationError::ApplicationNotFound(identifier.to_string()))
    }

    fn system_wide(&self) -> Result<UIElement, AutomationError> {
        Ok(self.system_wide.handle())
    }

    fn has_permissions(&self) -> bool {
        self.permissions
    }

    fn process_name(&self, pid: i32) -> Option<String> {
        self.applications
            .iter()
            .find(|(_, app)| app.process() == pid)
            .and_then(|(ids, _)| ids.first().cloned())
    }
}
