//! macOS backend over the AXUIElement API.

mod element;
mod engine;
mod values;

pub use element::MacOSUIElement;
pub use engine::MacOSEngine;

use crate::errors::AutomationError;
use accessibility_sys::{
    kAXErrorAPIDisabled, kAXErrorActionUnsupported, kAXErrorAttributeUnsupported,
    kAXErrorCannotComplete, kAXErrorIllegalArgument, kAXErrorInvalidUIElement, kAXErrorNoValue,
    kAXErrorNotImplemented, kAXErrorSuccess, AXError,
};

/// Map an AX status code to the crate error taxonomy. `context` names the
/// attribute or action involved.
pub(crate) fn ax_error(code: AXError, context: &str) -> Option<AutomationError> {
    #[allow(non_upper_case_globals)]
    let error = match code {
        kAXErrorSuccess => return None,
        kAXErrorNoValue => AutomationError::NoValue(context.to_string()),
        kAXErrorAttributeUnsupported | kAXErrorActionUnsupported | kAXErrorNotImplemented => {
            AutomationError::UnsupportedOperation(context.to_string())
        }
        kAXErrorInvalidUIElement => {
            AutomationError::ElementNotFound(format!("element no longer exists ({context})"))
        }
        kAXErrorAPIDisabled => AutomationError::PermissionDenied(
            "accessibility API is disabled for this process".to_string(),
        ),
        kAXErrorIllegalArgument => {
            AutomationError::InvalidArgument(format!("illegal argument for {context}"))
        }
        kAXErrorCannotComplete => {
            AutomationError::PlatformError(format!("{context}: application did not respond"))
        }
        other => AutomationError::PlatformError(format!("{context}: AXError {other}")),
    };
    Some(error)
}
