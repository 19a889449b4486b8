//! Per-command reasoning log.
//!
//! A `DebugLog` is created for each command and handed down the call chain by
//! `&mut`. Entries are always mirrored to `tracing` at debug level; they are
//! only retained for the response when the caller asked for them.

use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct DebugLog {
    enabled: bool,
    entries: Vec<String>,
}

impl DebugLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{}", message);
        if self.enabled {
            self.entries.push(message);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries for the response, `None` when logging was not requested.
    pub fn into_entries(self) -> Option<Vec<String>> {
        if self.enabled {
            Some(self.entries)
        } else {
            None
        }
    }
}

/// Push a formatted entry without building the string when disabled.
#[macro_export]
macro_rules! dlog {
    ($log:expr, $($arg:tt)*) => {{
        let log: &mut $crate::context::DebugLog = $log;
        if log.is_enabled() || ::tracing::enabled!(::tracing::Level::DEBUG) {
            log.push(format!($($arg)*));
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_log_keeps_nothing() {
        let mut log = DebugLog::disabled();
        log.push("ignored");
        assert!(log.entries().is_empty());
        assert_eq!(log.into_entries(), None);
    }

    #[test]
    fn test_macro_formats_when_enabled() {
        let mut log = DebugLog::new(true);
        crate::dlog!(&mut log, "depth {} of {}", 2, 20);
        assert_eq!(log.entries(), ["depth 2 of 20"]);
    }
}
