use super::resolve::{requested_keys, resolve_element, result_element};
use super::Dispatcher;
use crate::attributes::{canonical_action, normalize_key};
use crate::context::DebugLog;
use crate::dlog;
use crate::element::UIElement;
use crate::errors::{AutomationError, ErrorKind};
use crate::formatter::{FormatOptions, OutputFormat};
use crate::protocol::{CommandEnvelope, ResponseData};
use crate::value::AxValue;
use serde_json::Value;
use tracing::{info, instrument};

/// `performAction`: a canonical alias, an advertised `AX` action, or an
/// attribute set when a value is supplied. Responds with the element's
/// attributes after the change.
#[instrument(level = "debug", skip_all)]
pub(crate) fn handle_perform_action(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<ResponseData, AutomationError> {
    let name = envelope
        .action_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            AutomationError::InvalidRequest("performAction requires action_name".to_string())
        })?;

    let resolved = resolve_element(dispatcher, envelope, log)?;
    let element = &resolved.element;

    if let Some(action) = canonical_action(name) {
        perform(element, action, log)?;
    } else if name.starts_with("AX") && element.supports_action(name) {
        perform(element, name, log)?;
    } else if let Some(raw) = &envelope.action_value {
        let attribute = normalize_key(name);
        let value = native_value(raw)?;
        dlog!(
            log,
            "setting {} = {} on {}",
            attribute,
            value.to_display_string(),
            element.brief_description()
        );
        element.set_attribute(attribute, &value)?;
        info!("Set {} on {}", attribute, element.brief_description());
    } else {
        let available = element
            .supported_actions()
            .map(|a| a.join(", "))
            .unwrap_or_else(|| "none".to_string());
        return Err(AutomationError::UnsupportedOperation(format!(
            "action '{name}' is not offered by {} (available: {available}) and no action_value was given",
            element.brief_description()
        )));
    }

    let keys = requested_keys(envelope);
    let options = FormatOptions::single(
        &keys,
        envelope.output_format.unwrap_or(OutputFormat::Smart),
    );
    Ok(ResponseData::Element(result_element(
        element,
        Some(&resolved.root),
        &options,
    )))
}

fn perform(element: &UIElement, action: &str, log: &mut DebugLog) -> Result<(), AutomationError> {
    dlog!(log, "performing {} on {}", action, element.brief_description());
    element.perform_action(action).map_err(|e| match e.kind() {
        ErrorKind::Unsupported | ErrorKind::NotFound => e,
        _ => AutomationError::ActionFailed(format!(
            "{action} on {}: {e}",
            element.brief_description()
        )),
    })?;
    info!("Performed {} on {}", action, element.brief_description());
    Ok(())
}

/// Value kind follows the JSON type: string, bool, integer or double.
fn native_value(raw: &Value) -> Result<AxValue, AutomationError> {
    match raw {
        Value::String(s) => Ok(AxValue::String(s.clone())),
        Value::Bool(b) => Ok(AxValue::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(AxValue::Int(i)),
            None => n.as_f64().map(AxValue::Float).ok_or_else(|| {
                AutomationError::InvalidArgument(format!("unrepresentable number {n}"))
            }),
        },
        other => Err(AutomationError::InvalidArgument(format!(
            "action_value must be a string, bool or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_native_value_kinds() {
        assert_eq!(native_value(&json!("abc")).unwrap(), AxValue::String("abc".into()));
        assert_eq!(native_value(&json!(true)).unwrap(), AxValue::Bool(true));
        assert_eq!(native_value(&json!(7)).unwrap(), AxValue::Int(7));
        assert_eq!(native_value(&json!(0.5)).unwrap(), AxValue::Float(0.5));
        assert!(native_value(&json!([1])).is_err());
    }
}
