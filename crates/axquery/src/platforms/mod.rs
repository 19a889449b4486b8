//! Platform backends.
//!
//! The engine trait is the boundary to everything this crate consumes but does
//! not implement: turning an application identifier into a root handle, the
//! permission check, and process-name lookups for diagnostics.

use crate::element::UIElement;
use crate::errors::AutomationError;

pub mod mock;

#[cfg(target_os = "macos")]
pub mod macos;

/// Identifier meaning "whatever application currently has focus".
pub const FOCUSED_APPLICATION: &str = "focused";

pub trait AccessibilityEngine {
    /// Root handle for an application given a bundle identifier, display
    /// name, numeric process id, executable path or [`FOCUSED_APPLICATION`].
    fn application(&self, identifier: &str) -> Result<UIElement, AutomationError>;

    /// The system-wide element, root of focus queries.
    fn system_wide(&self) -> Result<UIElement, AutomationError>;

    /// Whether this process is trusted for accessibility access.
    fn has_permissions(&self) -> bool;

    /// Process name for diagnostics; never used for resolution decisions.
    fn process_name(&self, pid: i32) -> Option<String> {
        crate::utils::process_name_for_pid(pid)
    }
}

/// Engine for the current platform.
#[cfg(target_os = "macos")]
pub fn create_engine() -> Result<Box<dyn AccessibilityEngine>, AutomationError> {
    Ok(Box::new(macos::MacOSEngine::new()))
}

/// Engine for the current platform.
#[cfg(not(target_os = "macos"))]
pub fn create_engine() -> Result<Box<dyn AccessibilityEngine>, AutomationError> {
    Err(AutomationError::UnsupportedOperation(format!(
        "no accessibility backend for {}; only macOS is supported",
        std::env::consts::OS
    )))
}
