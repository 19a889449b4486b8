//! Bounded enumeration of every match under a root.

use crate::config::AxConfig;
use crate::context::DebugLog;
use crate::dlog;
use crate::element::UIElement;
use crate::locator::Locator;
use crate::matcher::evaluate;
use std::collections::HashSet;
use std::time::Instant;
use tracing::warn;

/// Limits for one collection.
#[derive(Debug, Clone, Copy)]
pub struct CollectLimits {
    pub max_depth: usize,
    pub max_elements: usize,
}

impl CollectLimits {
    pub fn from_config(config: &AxConfig) -> Self {
        Self {
            max_depth: config.max_collect_depth,
            max_elements: config.max_collect_elements,
        }
    }
}

/// Why a collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectStop {
    Exhausted,
    ElementLimit,
    TimedOut,
}

#[derive(Debug)]
pub struct Collection {
    pub elements: Vec<UIElement>,
    pub stop: CollectStop,
    pub visited: usize,
}

struct Walk<'a> {
    locator: &'a Locator,
    limits: CollectLimits,
    config: &'a AxConfig,
    started: Instant,
    visited: HashSet<UIElement>,
    path: Vec<UIElement>,
    found: Vec<UIElement>,
    stop: Option<CollectStop>,
}

/// Every element under (and including) `root` that fully matches `locator`,
/// in depth-first order, up to `limits.max_elements`.
///
/// A node reachable through several container attributes is visited once.
/// Hitting the element cap or the configured wall-clock guard ends the walk
/// early without an error.
pub fn collect_all(
    root: &UIElement,
    locator: &Locator,
    limits: CollectLimits,
    config: &AxConfig,
    log: &mut DebugLog,
) -> Collection {
    let mut walk = Walk {
        locator,
        limits,
        config,
        started: Instant::now(),
        visited: HashSet::new(),
        path: Vec::new(),
        found: Vec::new(),
        stop: None,
    };

    if limits.max_elements > 0 {
        walk.visit(root, 0, log);
    } else {
        walk.stop = Some(CollectStop::ElementLimit);
    }

    let stop = walk.stop.unwrap_or(CollectStop::Exhausted);
    dlog!(
        log,
        "collected {} of {} visited elements ({:?})",
        walk.found.len(),
        walk.visited.len(),
        stop
    );
    Collection {
        visited: walk.visited.len(),
        elements: walk.found,
        stop,
    }
}

impl Walk<'_> {
    fn visit(&mut self, element: &UIElement, depth: usize, log: &mut DebugLog) {
        if self.stop.is_some() || depth > self.limits.max_depth {
            return;
        }
        if self.path.contains(element) || !self.visited.insert(element.clone()) {
            return;
        }
        if let Some(timeout) = self.config.collect_timeout {
            if self.started.elapsed() >= timeout {
                warn!(
                    "Collection stopped after {:?} with {} elements",
                    timeout,
                    self.found.len()
                );
                dlog!(log, "collect timeout of {:?} reached", timeout);
                self.stop = Some(CollectStop::TimedOut);
                return;
            }
        }

        if evaluate(element, self.locator, self.config, log).is_full() {
            self.found.push(element.clone());
            if self.found.len() >= self.limits.max_elements {
                dlog!(log, "element limit {} reached", self.limits.max_elements);
                self.stop = Some(CollectStop::ElementLimit);
                return;
            }
        }

        if depth == self.limits.max_depth {
            return;
        }
        self.path.push(element.clone());
        for child in element.children() {
            self.visit(&child, depth + 1, log);
            if self.stop.is_some() {
                break;
            }
        }
        self.path.pop();
    }
}
