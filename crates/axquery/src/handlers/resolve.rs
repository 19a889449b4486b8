//! Shared resolution steps: application, path hints, search, result shape.

use super::Dispatcher;
use crate::context::DebugLog;
use crate::dlog;
use crate::element::UIElement;
use crate::errors::AutomationError;
use crate::formatter::{format_attributes, FormatOptions};
use crate::locator::Locator;
use crate::navigator::navigate;
use crate::platforms::FOCUSED_APPLICATION;
use crate::protocol::{CommandEnvelope, ResultElement};
use crate::search::find_element;

/// Where a command's search starts and what it found.
pub(crate) struct Resolved {
    pub root: UIElement,
    pub element: UIElement,
}

pub(crate) fn application(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<UIElement, AutomationError> {
    let identifier = envelope
        .application
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FOCUSED_APPLICATION);
    let app = dispatcher.engine().application(identifier)?;
    let process = app
        .process_id()
        .and_then(|pid| dispatcher.engine().process_name(pid).map(|name| format!("{name} ({pid})")))
        .unwrap_or_else(|| "unknown process".to_string());
    dlog!(log, "application '{}' resolved to {}", identifier, process);
    Ok(app)
}

/// The application, narrowed by the envelope's `path_hint` and then by the
/// locator's own root path hint.
pub(crate) fn search_root(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<UIElement, AutomationError> {
    let mut root = application(dispatcher, envelope, log)?;
    if let Some(path) = envelope.path_hint.as_deref().filter(|p| !p.is_empty()) {
        root = navigate(&root, path, log)?;
    }
    let locator_path = envelope
        .locator
        .as_ref()
        .and_then(|l| l.root_element_path_hint.as_deref())
        .filter(|p| !p.is_empty());
    if let Some(path) = locator_path {
        root = navigate(&root, path, log)?;
    }
    Ok(root)
}

/// The locator to search with. Without one, a path hint alone addresses
/// the element; with neither the request is malformed.
pub(crate) fn locator_for(envelope: &CommandEnvelope) -> Result<Locator, AutomationError> {
    match (&envelope.locator, &envelope.path_hint) {
        (Some(locator), _) => Ok(locator.clone()),
        (None, Some(path)) if !path.is_empty() => Ok(Locator::default()),
        _ => Err(AutomationError::InvalidRequest(format!(
            "{} requires a locator or a path_hint",
            envelope.command
        ))),
    }
}

/// Resolve the single element a command targets.
pub(crate) fn resolve_element(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<Resolved, AutomationError> {
    let locator = locator_for(envelope)?;
    let root = search_root(dispatcher, envelope, log)?;
    let max_depth = envelope
        .max_depth
        .unwrap_or(dispatcher.config().max_search_depth);

    let element = find_element(&root, &locator, max_depth, dispatcher.config(), log)
        .ok_or_else(|| {
            AutomationError::ElementNotFound(format!(
                "no element matching {} under {} within depth {}",
                describe_locator(&locator),
                root.brief_description(),
                max_depth
            ))
        })?;
    Ok(Resolved { root, element })
}

pub(crate) fn result_element(
    element: &UIElement,
    stop_at: Option<&UIElement>,
    options: &FormatOptions<'_>,
) -> ResultElement {
    ResultElement {
        attributes: format_attributes(element, options),
        path: element.ancestry(stop_at),
    }
}

/// Requested keys of the envelope, empty when none.
pub(crate) fn requested_keys(envelope: &CommandEnvelope) -> Vec<String> {
    envelope.attributes.clone().unwrap_or_default()
}

fn describe_locator(locator: &Locator) -> String {
    let mut parts: Vec<String> = locator
        .criteria
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    if let Some(action) = locator.required_action() {
        parts.push(format!("action={action}"));
    }
    if let Some(name) = &locator.computed_name_contains {
        parts.push(format!("name~{name}"));
    }
    if let Some(name) = &locator.computed_name_equals {
        parts.push(format!("name={name}"));
    }
    if parts.is_empty() {
        "any element".to_string()
    } else {
        format!("{{{}}}", parts.join(", "))
    }
}
