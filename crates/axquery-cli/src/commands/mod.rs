pub mod run;
pub mod serve;

use axquery::protocol::CommandResponse;
use serde_json::Value;

/// Best-effort `command_id` of a line that failed to decode, so the client
/// can still correlate the error.
pub fn command_id_hint(line: &str) -> String {
    serde_json::from_str::<Value>(line)
        .ok()
        .and_then(|value| value.get("command_id")?.as_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn render(response: &CommandResponse, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_json())
    } else {
        response.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axquery::AutomationError;

    #[test]
    fn test_command_id_hint() {
        assert_eq!(command_id_hint(r#"{"command_id":"x1","command":"teleport"}"#), "x1");
        assert_eq!(command_id_hint(r#"{"command_id":7}"#), "");
        assert_eq!(command_id_hint("garbage"), "");
    }

    #[test]
    fn test_render_compact_is_single_line() {
        let response = CommandResponse::failure(
            "r1",
            &AutomationError::InvalidRequest("bad".to_string()),
        );
        let line = render(&response, false);
        assert!(!line.contains('\n'));
        assert!(render(&response, true).contains('\n'));
    }
}
