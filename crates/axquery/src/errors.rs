use thiserror::Error;

/// Errors produced while resolving or driving accessibility elements.
///
/// None of these are fatal to the process: the dispatcher turns every one of
/// them into the `error` string of a single command response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutomationError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    #[error("Path hint could not be resolved: {0}")]
    PathNotFound(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Attribute has no value: {0}")]
    NoValue(String),

    #[error("Platform error: {0}")]
    PlatformError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Accessibility permission denied: {0}")]
    PermissionDenied(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse failure classes used for logging and for the `error_kind` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unsupported,
    NoValue,
    Platform,
    MalformedRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::NoValue => "no_value",
            ErrorKind::Platform => "platform",
            ErrorKind::MalformedRequest => "malformed_request",
        }
    }
}

impl AutomationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AutomationError::ElementNotFound(_)
            | AutomationError::ApplicationNotFound(_)
            | AutomationError::PathNotFound(_) => ErrorKind::NotFound,
            AutomationError::UnsupportedOperation(_) => ErrorKind::Unsupported,
            AutomationError::NoValue(_) => ErrorKind::NoValue,
            AutomationError::InvalidRequest(_) | AutomationError::InvalidArgument(_) => {
                ErrorKind::MalformedRequest
            }
            AutomationError::ActionFailed(_)
            | AutomationError::PlatformError(_)
            | AutomationError::PermissionDenied(_)
            | AutomationError::Timeout(_)
            | AutomationError::Internal(_) => ErrorKind::Platform,
        }
    }

    /// Absent, unsupported and empty attributes are all "no value" to callers
    /// reading attributes; only the remaining platform failures are worth a warning.
    pub fn is_absence(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotFound | ErrorKind::Unsupported | ErrorKind::NoValue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            AutomationError::PathNotFound("window[3]".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AutomationError::InvalidRequest("nested batch".into()).kind(),
            ErrorKind::MalformedRequest
        );
        assert_eq!(
            AutomationError::PlatformError("cannot complete".into()).kind(),
            ErrorKind::Platform
        );
        assert!(AutomationError::NoValue("AXValue".into()).is_absence());
        assert!(!AutomationError::Timeout("collect".into()).is_absence());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = AutomationError::ApplicationNotFound("com.apple.TextEdit".into());
        assert_eq!(err.to_string(), "Application not found: com.apple.TextEdit");
    }
}
