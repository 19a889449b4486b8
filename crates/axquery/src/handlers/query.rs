use super::resolve::{application, requested_keys, resolve_element, result_element};
use super::Dispatcher;
use crate::context::DebugLog;
use crate::dlog;
use crate::errors::AutomationError;
use crate::formatter::{FormatOptions, OutputFormat};
use crate::protocol::{CommandEnvelope, ResponseData};
use tracing::instrument;

/// `query` and `getAttributes`: one element, requested keys (all when none).
#[instrument(level = "debug", skip_all)]
pub(crate) fn handle_query(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<ResponseData, AutomationError> {
    let resolved = resolve_element(dispatcher, envelope, log)?;
    let keys = requested_keys(envelope);
    let options = FormatOptions::single(
        &keys,
        envelope.output_format.unwrap_or(OutputFormat::Smart),
    );
    Ok(ResponseData::Element(result_element(
        &resolved.element,
        Some(&resolved.root),
        &options,
    )))
}

/// `describeElement`: one element, every attribute, verbose by default.
#[instrument(level = "debug", skip_all)]
pub(crate) fn handle_describe(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<ResponseData, AutomationError> {
    let resolved = resolve_element(dispatcher, envelope, log)?;
    let keys = requested_keys(envelope);
    let options = FormatOptions::single(
        &keys,
        envelope.output_format.unwrap_or(OutputFormat::Verbose),
    );
    Ok(ResponseData::Element(result_element(
        &resolved.element,
        Some(&resolved.root),
        &options,
    )))
}

/// `getFocusedElement`: the application's focused descendant.
#[instrument(level = "debug", skip_all)]
pub(crate) fn handle_focused(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<ResponseData, AutomationError> {
    if envelope.locator.is_some() {
        return Err(AutomationError::InvalidRequest(
            "getFocusedElement takes no locator".to_string(),
        ));
    }

    let app = application(dispatcher, envelope, log)?;
    let focused = app
        .focused_element()
        .or_else(|| {
            dispatcher
                .engine()
                .system_wide()
                .ok()
                .and_then(|system| system.focused_element())
                .filter(|f| f.process_id() == app.process_id())
        })
        .ok_or_else(|| {
            AutomationError::ElementNotFound(format!(
                "no focused element in {}",
                app.brief_description()
            ))
        })?;
    dlog!(log, "focused element is {}", focused.brief_description());

    let keys = requested_keys(envelope);
    let options = FormatOptions::single(
        &keys,
        envelope.output_format.unwrap_or(OutputFormat::Smart),
    );
    Ok(ResponseData::Element(result_element(&focused, None, &options)))
}
