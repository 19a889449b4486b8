use super::resolve::{locator_for, requested_keys, result_element, search_root};
use super::Dispatcher;
use crate::collector::{collect_all, CollectLimits, CollectStop};
use crate::context::DebugLog;
use crate::dlog;
use crate::errors::AutomationError;
use crate::formatter::{FormatOptions, OutputFormat};
use crate::protocol::{CommandEnvelope, ResponseData};
use tracing::instrument;

/// `collectAll`: every match under the search root, multi-element default
/// keys unless `attributes` names some.
#[instrument(level = "debug", skip_all)]
pub(crate) fn handle_collect_all(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<ResponseData, AutomationError> {
    let config = dispatcher.config();
    let locator = locator_for(envelope)?;
    let root = search_root(dispatcher, envelope, log)?;

    let mut limits = CollectLimits::from_config(config);
    if let Some(max_elements) = envelope.max_elements {
        limits.max_elements = max_elements;
    }
    if let Some(max_depth) = envelope.max_depth {
        limits.max_depth = max_depth;
    }

    let collection = collect_all(&root, &locator, limits, config, log);
    if collection.stop == CollectStop::TimedOut {
        dlog!(log, "returning partial results after timeout");
    }

    let keys = requested_keys(envelope);
    let options = FormatOptions::multi(
        &keys,
        envelope.output_format.unwrap_or(OutputFormat::Smart),
    );
    let elements: Vec<_> = collection
        .elements
        .iter()
        .map(|element| result_element(element, Some(&root), &options))
        .collect();

    Ok(ResponseData::Elements {
        count: elements.len(),
        elements,
    })
}
