//! Attribute rendering for responses
//!
//! Turns live attribute values into the JSON map carried by a
//! `ResultElement`. Four presentation modes are supported:
//!
//! - `smart`: concise; empty and unavailable entries are dropped
//! - `verbose`: everything requested, structured, nothing dropped
//! - `text_content`: every value as a plain string
//! - `json_string`: the verbose map, pretty-printed into one string entry

use crate::attributes::{
    normalize_key, AX_ACTION_NAMES, AX_CHILDREN, AX_FOCUSED_UI_ELEMENT, AX_PARENT, CLICKABLE_ROLES,
    COMPUTED_NAME, COMPUTED_PATH, IS_CLICKABLE, MULTI_ELEMENT_DEFAULT_ATTRIBUTES, ACTION_PRESS,
    TEXT_ELEMENT_DEFAULT_ATTRIBUTES, TEXT_ONLY_ROLES,
};
use crate::element::UIElement;
use crate::value::AxValue;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Marker for a requested entry the element cannot provide.
pub const UNAVAILABLE: &str = "n/a";

const JSON_REPRESENTATION: &str = "json_representation";
const JSON_ERROR: &str = "json_error";

/// Formatted attributes keyed by attribute name.
pub type AttributeMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Smart,
    Verbose,
    TextContent,
    JsonString,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Smart => "smart",
            OutputFormat::Verbose => "verbose",
            OutputFormat::TextContent => "text_content",
            OutputFormat::JsonString => "json_string",
        };
        f.write_str(name)
    }
}

/// Which keys to render and how.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions<'a> {
    /// Explicitly requested keys; empty means "all" (or the multi default).
    pub keys: &'a [String],
    /// Use the small default key set of multi-element responses.
    pub multi_default: bool,
    /// Role used to trim the multi default; read from the element if `None`.
    pub target_role: Option<&'a str>,
    pub format: OutputFormat,
}

impl<'a> FormatOptions<'a> {
    pub fn single(keys: &'a [String], format: OutputFormat) -> Self {
        Self {
            keys,
            multi_default: false,
            target_role: None,
            format,
        }
    }

    pub fn multi(keys: &'a [String], format: OutputFormat) -> Self {
        Self {
            keys,
            multi_default: keys.is_empty(),
            target_role: None,
            format,
        }
    }
}

/// Render the attributes of `element` according to `options`.
pub fn format_attributes(element: &UIElement, options: &FormatOptions<'_>) -> AttributeMap {
    // json_string wraps what verbose would have produced
    let mode = match options.format {
        OutputFormat::JsonString => OutputFormat::Verbose,
        other => other,
    };

    let keys = resolve_keys(element, options);
    let mut map = AttributeMap::new();
    for key in &keys {
        if let Some(rendered) = render_key(element, key, mode) {
            map.insert(key.clone(), rendered);
        }
    }

    if !options.multi_default {
        if !map.contains_key(COMPUTED_NAME) {
            if let Some(name) = computed_name(element) {
                map.insert(COMPUTED_NAME.to_string(), text_or_json(mode, Value::String(name)));
            }
        }
        if !map.contains_key(IS_CLICKABLE) {
            map.insert(
                IS_CLICKABLE.to_string(),
                text_or_json(mode, Value::Bool(is_clickable(element))),
            );
        }
        if mode == OutputFormat::Verbose && !map.contains_key(COMPUTED_PATH) {
            map.insert(
                COMPUTED_PATH.to_string(),
                Value::String(element.path_string()),
            );
        }
    }

    match options.format {
        OutputFormat::JsonString => wrap_as_json_string(&map),
        _ => map,
    }
}

/// Replace a map by its pretty-printed JSON encoding.
pub fn wrap_as_json_string(map: &AttributeMap) -> AttributeMap {
    let mut wrapped = AttributeMap::new();
    match serde_json::to_string_pretty(map) {
        Ok(encoded) => wrapped.insert(JSON_REPRESENTATION.to_string(), Value::String(encoded)),
        Err(e) => wrapped.insert(JSON_ERROR.to_string(), Value::String(e.to_string())),
    };
    wrapped
}

fn resolve_keys(element: &UIElement, options: &FormatOptions<'_>) -> Vec<String> {
    if !options.keys.is_empty() {
        return options
            .keys
            .iter()
            .map(|k| normalize_key(k).to_string())
            .collect();
    }

    if options.multi_default {
        let role = options
            .target_role
            .map(str::to_string)
            .or_else(|| element.role());
        let defaults = match role.as_deref() {
            Some(role) if TEXT_ONLY_ROLES.contains(&role) => TEXT_ELEMENT_DEFAULT_ATTRIBUTES,
            _ => MULTI_ELEMENT_DEFAULT_ATTRIBUTES,
        };
        return defaults.iter().map(|k| k.to_string()).collect();
    }

    let mut keys = element.attribute_names();
    if !keys.iter().any(|k| k == AX_ACTION_NAMES) {
        keys.push(AX_ACTION_NAMES.to_string());
    }
    keys
}

fn render_key(element: &UIElement, key: &str, mode: OutputFormat) -> Option<Value> {
    let rendered = match key {
        AX_PARENT => render_parent(element, mode),
        AX_CHILDREN => render_children(element, mode),
        AX_FOCUSED_UI_ELEMENT => element
            .focused_element()
            .map(|focused| Value::String(focused.brief_description())),
        // Action names always report, with the marker when unavailable
        AX_ACTION_NAMES => {
            return Some(match element.supported_actions() {
                Some(actions) => match mode {
                    OutputFormat::TextContent => Value::String(actions.join(", ")),
                    _ => json!(actions),
                },
                None => Value::String(UNAVAILABLE.to_string()),
            });
        }
        COMPUTED_NAME => computed_name(element).map(Value::String),
        IS_CLICKABLE => Some(text_or_json(mode, Value::Bool(is_clickable(element)))),
        COMPUTED_PATH => Some(Value::String(element.path_string())),
        _ => match element.attribute(key) {
            Some(value) if mode == OutputFormat::Smart && is_useless(&value) => return None,
            value => value.map(|value| render_value(&value, mode)),
        },
    };

    match (rendered, mode) {
        (Some(value), OutputFormat::Smart) if is_blank(&value) => None,
        (Some(value), _) => Some(value),
        (None, OutputFormat::Smart) => None,
        (None, _) => Some(Value::String(UNAVAILABLE.to_string())),
    }
}

fn render_parent(element: &UIElement, mode: OutputFormat) -> Option<Value> {
    let parent = element.parent()?;
    Some(Value::String(match mode {
        OutputFormat::TextContent => parent.role().unwrap_or_else(|| "AXUnknown".to_string()),
        _ => parent.brief_description(),
    }))
}

fn render_children(element: &UIElement, mode: OutputFormat) -> Option<Value> {
    let children = element.children();
    Some(match mode {
        OutputFormat::Verbose => Value::Array(
            children
                .iter()
                .map(|child| Value::String(child.brief_description()))
                .collect(),
        ),
        OutputFormat::TextContent => Value::String(format!("{} children", children.len())),
        _ => {
            if children.is_empty() {
                return None;
            }
            Value::String(format!("[{} children]", children.len()))
        }
    })
}

/// Render one typed value for the given mode.
pub fn render_value(value: &AxValue, mode: OutputFormat) -> Value {
    if mode == OutputFormat::TextContent {
        return Value::String(value.to_display_string());
    }
    let structured = mode == OutputFormat::Verbose;
    match value {
        AxValue::String(s) => Value::String(s.clone()),
        AxValue::Bool(b) => Value::Bool(*b),
        AxValue::Int(i) => json!(i),
        AxValue::Float(f) => json!(f),
        AxValue::Point(p) if structured => json!(p),
        AxValue::Size(s) if structured => json!(s),
        AxValue::Rect(r) if structured => json!(r),
        AxValue::Range(r) if structured => json!(r),
        AxValue::Point(_) | AxValue::Size(_) | AxValue::Rect(_) | AxValue::Range(_) => {
            Value::String(value.to_display_string())
        }
        AxValue::Element(element) => Value::String(element.brief_description()),
        AxValue::Array(items) => Value::Array(items.iter().map(|v| render_value(v, mode)).collect()),
        AxValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), render_value(v, mode)))
                .collect(),
        ),
        AxValue::Error(code) => json!({ "ax_error": code }),
        AxValue::Opaque(_) => Value::String(value.to_display_string()),
    }
}

/// Values smart mode leaves out: empty, failed reads and opaque handles.
fn is_useless(value: &AxValue) -> bool {
    match value {
        AxValue::Error(_) | AxValue::Opaque(_) => true,
        other => other.is_empty(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    }
}

fn text_or_json(mode: OutputFormat, value: Value) -> Value {
    match (mode, value) {
        (OutputFormat::TextContent, Value::Bool(b)) => Value::String(b.to_string()),
        (_, value) => value,
    }
}

/// Heuristic display name: title, value, description, help, placeholder,
/// else `"<role description> (<role>)"`.
pub fn computed_name(element: &UIElement) -> Option<String> {
    let named = element
        .title()
        .or_else(|| element.value_text().filter(|v| !v.trim().is_empty()))
        .or_else(|| element.description())
        .or_else(|| element.help())
        .or_else(|| element.placeholder());
    if named.is_some() {
        return named;
    }

    let role = element.role()?;
    Some(match element.role_description() {
        Some(description) => format!("{description} ({role})"),
        None => role,
    })
}

/// Button-like role, or the element offers a press action.
pub fn is_clickable(element: &UIElement) -> bool {
    let role_clickable = element
        .role()
        .map(|role| CLICKABLE_ROLES.contains(&role.as_str()))
        .unwrap_or(false);
    role_clickable || element.supports_action(ACTION_PRESS)
}
