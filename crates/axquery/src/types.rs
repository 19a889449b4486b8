//! Geometry types carried inside accessibility attribute values

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2-D point in screen coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A 2-D extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Origin plus extent, as reported for frame-style attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Half-open character range `[location, location + length)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TextRange {
    pub location: i64,
    pub length: i64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl TextRange {
    pub fn new(location: i64, length: i64) -> Self {
        Self { location, length }
    }

    pub fn end(&self) -> i64 {
        self.location + self.length
    }

    pub fn contains(&self, index: i64) -> bool {
        index >= self.location && index < self.end()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={:.0} y={:.0}", self.x, self.y)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w={:.0} h={:.0}", self.width, self.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.0},{:.0},{:.0},{:.0}]",
            self.x, self.y, self.width, self.height
        )
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pos={} len={}", self.location, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_half_open() {
        let range = TextRange::new(2, 3);
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert_eq!(range.end(), 5);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(Point::new(10.4, 20.6).to_string(), "x=10 y=21");
        assert_eq!(Size::new(300.0, 40.0).to_string(), "w=300 h=40");
        assert_eq!(TextRange::new(0, 7).to_string(), "pos=0 len=7");
    }
}
