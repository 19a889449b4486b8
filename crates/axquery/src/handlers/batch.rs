use super::Dispatcher;
use crate::context::DebugLog;
use crate::dlog;
use crate::errors::AutomationError;
use crate::protocol::{CommandEnvelope, CommandResponse, CommandType, ResponseData};
use tracing::instrument;

/// `batch`: run sub-commands in order, each isolated in its own response.
#[instrument(level = "debug", skip_all)]
pub(crate) fn handle_batch(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<ResponseData, AutomationError> {
    if envelope.locator.is_some() {
        return Err(AutomationError::InvalidRequest(
            "batch takes no locator; put locators on its sub_commands".to_string(),
        ));
    }
    let sub_commands = envelope.sub_commands.as_deref().ok_or_else(|| {
        AutomationError::InvalidRequest("batch requires sub_commands".to_string())
    })?;

    let mut results = Vec::with_capacity(sub_commands.len());
    for (index, sub) in sub_commands.iter().enumerate() {
        let sub = inherit(envelope, sub, index);
        let response = match sub.command {
            CommandType::Batch => CommandResponse::failure(
                &sub.command_id,
                &AutomationError::InvalidRequest("batch commands cannot be nested".to_string()),
            ),
            CommandType::CollectAll => CommandResponse::failure(
                &sub.command_id,
                &AutomationError::UnsupportedOperation(
                    "collectAll is not supported inside a batch; send it on its own".to_string(),
                ),
            ),
            _ => dispatcher.dispatch(&sub),
        };
        dlog!(
            log,
            "batch item {} ({}) {}",
            sub.command_id,
            sub.command,
            if response.success { "succeeded" } else { "failed" }
        );
        results.push(response);
    }

    Ok(ResponseData::Batch { results })
}

/// Sub-commands default their id to `<parent>.<index>` (1-based) and their
/// application and logging flag to the batch's.
fn inherit(parent: &CommandEnvelope, sub: &CommandEnvelope, index: usize) -> CommandEnvelope {
    let mut sub = sub.clone();
    if sub.command_id.trim().is_empty() {
        sub.command_id = format!("{}.{}", parent.command_id, index + 1);
    }
    if sub.application.is_none() {
        sub.application = parent.application.clone();
    }
    if sub.debug_logging.is_none() {
        sub.debug_logging = parent.debug_logging;
    }
    sub
}
