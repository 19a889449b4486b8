use super::resolve::{locator_for, requested_keys, resolve_element, result_element, search_root};
use super::Dispatcher;
use crate::attributes::TEXT_ATTRIBUTES;
use crate::collector::{collect_all, CollectLimits};
use crate::context::DebugLog;
use crate::dlog;
use crate::element::UIElement;
use crate::errors::AutomationError;
use crate::formatter::{FormatOptions, OutputFormat};
use crate::protocol::{CommandEnvelope, ResponseData};
use crate::utils::truncate_chars;
use std::collections::HashSet;
use tracing::instrument;

/// `extractText`: text of the resolved element and its descendants. With
/// `max_elements` set, text of every collected match is concatenated.
#[instrument(level = "debug", skip_all)]
pub(crate) fn handle_extract_text(
    dispatcher: &Dispatcher,
    envelope: &CommandEnvelope,
    log: &mut DebugLog,
) -> Result<ResponseData, AutomationError> {
    let config = dispatcher.config();
    let depth = envelope.max_depth.unwrap_or(config.max_collect_depth);
    let node_budget = config.max_text_nodes;

    let (lines, element) = match envelope.max_elements {
        Some(max_elements) => {
            let locator = locator_for(envelope)?;
            let root = search_root(dispatcher, envelope, log)?;
            let limits = CollectLimits {
                max_depth: depth,
                max_elements,
            };
            let collection = collect_all(&root, &locator, limits, config, log);
            if collection.elements.is_empty() {
                return Err(AutomationError::ElementNotFound(
                    "no element matched for text extraction".to_string(),
                ));
            }
            let mut lines = Vec::new();
            for element in &collection.elements {
                lines.extend(harvest_text(element, depth, node_budget));
            }
            (lines, None)
        }
        None => {
            let resolved = resolve_element(dispatcher, envelope, log)?;
            let lines = harvest_text(&resolved.element, depth, node_budget);
            let keys = requested_keys(envelope);
            let options = FormatOptions::multi(
                &keys,
                envelope.output_format.unwrap_or(OutputFormat::Smart),
            );
            let summary = result_element(&resolved.element, Some(&resolved.root), &options);
            (lines, Some(summary))
        }
    };

    let mut text = collapse(lines).join("\n");
    if let Some(max) = config.max_text_length {
        if text.chars().count() > max {
            dlog!(log, "text truncated to {} characters", max);
            text = truncate_chars(&text, max);
        }
    }
    dlog!(log, "extracted {} characters", text.chars().count());
    Ok(ResponseData::Text { text, element })
}

/// Text-bearing attribute strings of `element` and its descendants, depth
/// first, bounded by `max_depth` levels and `max_nodes` visited elements.
pub fn harvest_text(element: &UIElement, max_depth: usize, max_nodes: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(element.clone(), 0usize)];

    while let Some((current, depth)) = stack.pop() {
        if visited.len() >= max_nodes || !visited.insert(current.clone()) {
            continue;
        }
        for attribute in TEXT_ATTRIBUTES {
            if let Some(text) = current.string_attribute(attribute) {
                lines.push(text.trim().to_string());
            }
        }
        if depth < max_depth {
            // Reversed so children pop in document order
            for child in current.children().into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    lines
}

/// Drop consecutive duplicates.
fn collapse(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if out.last() != Some(&line) {
            out.push(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_only_adjacent() {
        let lines = ["a", "a", "b", "a"].map(String::from).to_vec();
        assert_eq!(collapse(lines), ["a", "b", "a"]);
    }
}
