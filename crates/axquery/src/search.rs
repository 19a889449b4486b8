//! Depth-first single-match resolution.

use crate::config::AxConfig;
use crate::context::DebugLog;
use crate::dlog;
use crate::element::UIElement;
use crate::locator::Locator;
use crate::matcher::{evaluate, MatchOutcome};

/// Find the first element under (and including) `root` that fully matches
/// `locator`. The root is depth 0; nodes deeper than `max_depth` are never
/// evaluated. Siblings are explored in child order.
pub fn find_element(
    root: &UIElement,
    locator: &Locator,
    max_depth: usize,
    config: &AxConfig,
    log: &mut DebugLog,
) -> Option<UIElement> {
    dlog!(
        log,
        "search from {} (max depth {})",
        root.brief_description(),
        max_depth
    );
    let mut visiting = Vec::new();
    let found = search_node(root, locator, 0, max_depth, config, log, &mut visiting);
    match &found {
        Some(element) => dlog!(log, "search matched {}", element.brief_description()),
        None => dlog!(log, "search found no match"),
    }
    found
}

fn search_node(
    element: &UIElement,
    locator: &Locator,
    depth: usize,
    max_depth: usize,
    config: &AxConfig,
    log: &mut DebugLog,
    visiting: &mut Vec<UIElement>,
) -> Option<UIElement> {
    if depth > max_depth {
        return None;
    }
    // A node already on the current branch closes a cycle
    if visiting.contains(element) {
        return None;
    }

    match evaluate(element, locator, config, log) {
        MatchOutcome::FullMatch => return Some(element.clone()),
        MatchOutcome::MatchedButActionMissing => {
            dlog!(log, "keep searching below {} at depth {}", element.brief_description(), depth);
        }
        MatchOutcome::NoMatch => {}
    }

    if depth == max_depth {
        return None;
    }

    visiting.push(element.clone());
    let mut found = None;
    for child in element.children() {
        if let Some(hit) = search_node(&child, locator, depth + 1, max_depth, config, log, visiting) {
            found = Some(hit);
            break;
        }
    }
    visiting.pop();
    found
}
