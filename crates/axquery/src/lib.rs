//! Accessibility element resolution and queries
//!
//! This crate resolves declarative locators against the live accessibility
//! tree of running desktop applications and answers JSON commands about the
//! elements it finds: read attributes, perform actions, extract text and
//! enumerate matches.
//!
//! ```
//! use axquery::platforms::mock::{MockElement, MockEngine};
//! use axquery::protocol::{CommandEnvelope, CommandType, Locator};
//! use axquery::{AxConfig, Dispatcher};
//!
//! let app = MockElement::new("AXApplication").title("TextEdit");
//! let window = MockElement::new("AXWindow").title("Untitled");
//! window.add_child(MockElement::new("AXButton").title("Save").action("AXPress"));
//! app.add_window(window);
//!
//! let engine = MockEngine::new().with_application(&["com.apple.TextEdit"], app);
//! let dispatcher = Dispatcher::new(Box::new(engine), AxConfig::default());
//! let command = CommandEnvelope::new("1", CommandType::Query)
//!     .application("com.apple.TextEdit")
//!     .locator(Locator::role("AXButton").with("AXTitle", "Save"));
//!
//! let response = dispatcher.dispatch(&command);
//! assert!(response.success);
//! ```

pub mod attributes;
pub mod collector;
pub mod config;
pub mod context;
pub mod element;
pub mod errors;
pub mod executor;
pub mod formatter;
pub mod handlers;
pub mod locator;
pub mod matcher;
pub mod navigator;
pub mod platforms;
pub mod protocol;
pub mod search;
pub mod selector;
#[cfg(test)]
mod tests;
pub mod types;
pub mod utils;
pub mod value;

pub use collector::{collect_all, CollectLimits, CollectStop, Collection};
pub use config::AxConfig;
pub use context::DebugLog;
pub use element::{UIElement, UIElementImpl};
pub use errors::{AutomationError, ErrorKind};
pub use executor::AxThread;
pub use formatter::{format_attributes, FormatOptions, OutputFormat};
pub use handlers::Dispatcher;
pub use locator::Locator;
pub use matcher::{evaluate, MatchOutcome};
pub use navigator::{navigate, PathComponent};
pub use platforms::{create_engine, AccessibilityEngine};
pub use protocol::{CommandEnvelope, CommandResponse, CommandType, ResponseData, ResultElement};
pub use search::find_element;
pub use types::{Point, Rect, Size, TextRange};
pub use utils::find_pid_for_process;
pub use value::{AxValue, BoxedValue, RawValue};

/// Dispatcher over the current platform's accessibility engine.
pub fn platform_dispatcher(config: AxConfig) -> Result<Dispatcher, AutomationError> {
    Ok(Dispatcher::new(create_engine()?, config))
}
