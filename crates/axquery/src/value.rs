//! Typed attribute values.
//!
//! Platform backends report attribute values as [`RawValue`], a close mirror of
//! what the accessibility API hands back (styled text, boxed geometry, generic
//! numbers). [`AxValue::from_raw`] turns those into the portable [`AxValue`]
//! that the matcher and formatter dispatch on.

use crate::element::UIElement;
use crate::types::{Point, Rect, Size, TextRange};
use std::collections::BTreeMap;

/// Subtypes of the platform's generic boxed value.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxedValue {
    Point(Point),
    Size(Size),
    Rect(Rect),
    Range(TextRange),
    /// A boxed platform error code
    Error(i32),
    /// A subtype this crate does not decode
    Unknown(u32),
}

/// Attribute value as produced by a backend, before unwrapping.
#[derive(Debug, Clone)]
pub enum RawValue {
    String(String),
    /// Styled text; only the plain characters are carried.
    AttributedString(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Boxed(BoxedValue),
    Url(String),
    Array(Vec<RawValue>),
    Dictionary(Vec<(String, RawValue)>),
    Element(UIElement),
    Null,
    /// Any other platform type, described by its type name.
    Other(String),
}

/// Portable attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AxValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Point(Point),
    Size(Size),
    Rect(Rect),
    Range(TextRange),
    Element(UIElement),
    Array(Vec<AxValue>),
    Map(BTreeMap<String, AxValue>),
    Error(i32),
    Opaque(String),
}

impl AxValue {
    /// Unwrap a raw backend value. `Null` means "no value"; nulls nested
    /// inside lists and maps are dropped.
    pub fn from_raw(raw: RawValue) -> Option<AxValue> {
        match raw {
            RawValue::String(s) | RawValue::AttributedString(s) | RawValue::Url(s) => {
                Some(AxValue::String(s))
            }
            RawValue::Boolean(b) => Some(AxValue::Bool(b)),
            RawValue::Integer(i) => Some(AxValue::Int(i)),
            RawValue::Float(f) => Some(AxValue::Float(f)),
            RawValue::Boxed(boxed) => Some(match boxed {
                BoxedValue::Point(p) => AxValue::Point(p),
                BoxedValue::Size(s) => AxValue::Size(s),
                BoxedValue::Rect(r) => AxValue::Rect(r),
                BoxedValue::Range(r) => AxValue::Range(r),
                BoxedValue::Error(code) => AxValue::Error(code),
                BoxedValue::Unknown(subtype) => AxValue::Opaque(format!("AXValue subtype {subtype}")),
            }),
            RawValue::Array(items) => Some(AxValue::Array(
                items.into_iter().filter_map(AxValue::from_raw).collect(),
            )),
            RawValue::Dictionary(entries) => Some(AxValue::Map(
                entries
                    .into_iter()
                    .filter_map(|(k, v)| AxValue::from_raw(v).map(|v| (k, v)))
                    .collect(),
            )),
            RawValue::Element(element) => Some(AxValue::Element(element)),
            RawValue::Null => None,
            RawValue::Other(type_name) => Some(AxValue::Opaque(type_name)),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AxValue::String(_) => "string",
            AxValue::Bool(_) => "bool",
            AxValue::Int(_) => "int",
            AxValue::Float(_) => "float",
            AxValue::Point(_) => "point",
            AxValue::Size(_) => "size",
            AxValue::Rect(_) => "rect",
            AxValue::Range(_) => "range",
            AxValue::Element(_) => "element",
            AxValue::Array(_) => "array",
            AxValue::Map(_) => "map",
            AxValue::Error(_) => "error",
            AxValue::Opaque(_) => "opaque",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AxValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Boolean view. Numbers 0/1 and the strings "true"/"false"/"1"/"0"
    /// coerce; everything else is `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AxValue::Bool(b) => Some(*b),
            AxValue::Int(0) => Some(false),
            AxValue::Int(1) => Some(true),
            AxValue::Float(f) if *f == 0.0 => Some(false),
            AxValue::Float(f) if *f == 1.0 => Some(true),
            AxValue::String(s) => parse_bool(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AxValue::Int(i) => Some(*i as f64),
            AxValue::Float(f) => Some(*f),
            AxValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AxValue]> {
        match self {
            AxValue::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&UIElement> {
        match self {
            AxValue::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Elements contained in this value: the element itself, or every element
    /// of a list.
    pub fn elements(&self) -> Vec<UIElement> {
        match self {
            AxValue::Element(element) => vec![element.clone()],
            AxValue::Array(items) => items
                .iter()
                .filter_map(|item| item.as_element().cloned())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AxValue::String(s) => s.trim().is_empty(),
            AxValue::Array(items) => items.is_empty(),
            AxValue::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// Plain-text rendering, used for string comparison and `text_content`
    /// output. Elements render as their brief description.
    pub fn to_display_string(&self) -> String {
        match self {
            AxValue::String(s) => s.clone(),
            AxValue::Bool(b) => b.to_string(),
            AxValue::Int(i) => i.to_string(),
            AxValue::Float(f) => format_float(*f),
            AxValue::Point(p) => p.to_string(),
            AxValue::Size(s) => s.to_string(),
            AxValue::Rect(r) => r.to_string(),
            AxValue::Range(r) => r.to_string(),
            AxValue::Element(element) => element.brief_description(),
            AxValue::Array(items) => items
                .iter()
                .map(AxValue::to_display_string)
                .collect::<Vec<_>>()
                .join(", "),
            AxValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| format!("{k}: {}", v.to_display_string()))
                .collect::<Vec<_>>()
                .join(", "),
            AxValue::Error(code) => format!("AXError {code}"),
            AxValue::Opaque(description) => format!("<{description}>"),
        }
    }
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

impl From<&str> for AxValue {
    fn from(s: &str) -> Self {
        AxValue::String(s.to_string())
    }
}

impl From<String> for AxValue {
    fn from(s: String) -> Self {
        AxValue::String(s)
    }
}

impl From<bool> for AxValue {
    fn from(b: bool) -> Self {
        AxValue::Bool(b)
    }
}

impl From<i64> for AxValue {
    fn from(i: i64) -> Self {
        AxValue::Int(i)
    }
}

impl From<f64> for AxValue {
    fn from(f: f64) -> Self {
        AxValue::Float(f)
    }
}

impl From<Point> for AxValue {
    fn from(p: Point) -> Self {
        AxValue::Point(p)
    }
}

impl From<Size> for AxValue {
    fn from(s: Size) -> Self {
        AxValue::Size(s)
    }
}

impl From<UIElement> for AxValue {
    fn from(element: UIElement) -> Self {
        AxValue::Element(element)
    }
}

impl<T: Into<AxValue>> From<Vec<T>> for AxValue {
    fn from(items: Vec<T>) -> Self {
        AxValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Boolean(b)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Integer(i)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<BoxedValue> for RawValue {
    fn from(boxed: BoxedValue) -> Self {
        RawValue::Boxed(boxed)
    }
}

impl From<Point> for RawValue {
    fn from(p: Point) -> Self {
        RawValue::Boxed(BoxedValue::Point(p))
    }
}

impl From<Size> for RawValue {
    fn from(s: Size) -> Self {
        RawValue::Boxed(BoxedValue::Size(s))
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(items: Vec<&str>) -> Self {
        RawValue::Array(items.into_iter().map(RawValue::from).collect())
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(items: Vec<RawValue>) -> Self {
        RawValue::Array(items)
    }
}
