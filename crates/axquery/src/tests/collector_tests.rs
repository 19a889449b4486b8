use super::{fast_config, Fixture};
use crate::collector::{collect_all, CollectLimits, CollectStop, Collection};
use crate::config::AxConfig;
use crate::context::DebugLog;
use crate::locator::Locator;
use crate::platforms::mock::MockElement;
use crate::search::find_element;
use std::time::Duration;

fn collect(root: &MockElement, locator: &Locator, limits: CollectLimits, config: &AxConfig) -> Collection {
    collect_all(&root.handle(), locator, limits, config, &mut DebugLog::disabled())
}

fn generous() -> CollectLimits {
    CollectLimits {
        max_depth: 20,
        max_elements: 100,
    }
}

fn ids(collection: &Collection) -> Vec<usize> {
    collection.elements.iter().map(|e| e.id()).collect()
}

#[test]
fn collects_every_button_in_tree_order() {
    let f = Fixture::new();
    let result = collect(&f.app, &Locator::role("AXButton"), generous(), &fast_config());
    assert_eq!(ids(&result), vec![f.save.id(), f.cancel.id()]);
    assert_eq!(result.stop, CollectStop::Exhausted);
}

#[test]
fn search_result_is_among_collected() {
    let f = Fixture::new();
    let config = fast_config();
    let locator = Locator::role("AXButton").with("AXTitle", "~a");
    let found = find_element(&f.app.handle(), &locator, 20, &config, &mut DebugLog::disabled())
        .map(|e| e.id());
    let result = collect(&f.app, &locator, generous(), &config);

    assert!(found.is_some());
    assert!(ids(&result).contains(&found.unwrap()));
    assert_eq!(result.elements.len(), 2);
}

#[test]
fn shared_node_is_visited_once() {
    let f = Fixture::new();
    // The same button also shows up as a selected child of the group
    f.group.add_to_container("AXSelectedChildren", &f.save);

    let result = collect(&f.app, &Locator::role("AXButton"), generous(), &fast_config());
    assert_eq!(ids(&result), vec![f.save.id(), f.cancel.id()]);
}

#[test]
fn colliding_ids_stay_distinct_nodes() {
    let list = MockElement::new("AXList");
    let first = MockElement::new("AXCell").title("first");
    let second = MockElement::colliding_with("AXCell", &first).title("second");
    list.add_child(first.clone()).add_child(second.clone());

    assert_eq!(first.handle().id(), second.handle().id());
    assert_ne!(first.handle(), second.handle());
    assert_eq!(first.handle(), first.handle().clone());

    let children = list.handle().children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].title().as_deref(), Some("second"));

    let result = collect(&list, &Locator::role("AXCell"), generous(), &fast_config());
    assert_eq!(result.elements.len(), 2);
    assert_eq!(result.visited, 3);

    let found = find_element(
        &list.handle(),
        &Locator::role("AXCell").with("AXTitle", "second"),
        5,
        &fast_config(),
        &mut DebugLog::disabled(),
    );
    assert_eq!(found, Some(second.handle()));
}

#[test]
fn element_cap_stops_early() {
    let f = Fixture::new();
    let limits = CollectLimits {
        max_depth: 20,
        max_elements: 1,
    };
    let result = collect(&f.app, &Locator::role("AXButton"), limits, &fast_config());
    assert_eq!(ids(&result), vec![f.save.id()]);
    assert_eq!(result.stop, CollectStop::ElementLimit);
}

#[test]
fn zero_cap_collects_nothing() {
    let f = Fixture::new();
    let limits = CollectLimits {
        max_depth: 20,
        max_elements: 0,
    };
    let result = collect(&f.app, &Locator::new(), limits, &fast_config());
    assert!(result.elements.is_empty());
    assert_eq!(result.visited, 0);
}

#[test]
fn depth_limit_bounds_collection() {
    let f = Fixture::new();
    let limits = CollectLimits {
        max_depth: 2,
        max_elements: 100,
    };
    let result = collect(&f.app, &Locator::role("AXButton"), limits, &fast_config());
    assert!(result.elements.is_empty());
    assert_eq!(result.stop, CollectStop::Exhausted);
}

#[test]
fn timeout_returns_partial_result() {
    let f = Fixture::new();
    let config = AxConfig {
        collect_timeout: Some(Duration::ZERO),
        ..fast_config()
    };
    let result = collect(&f.app, &Locator::role("AXButton"), generous(), &config);
    assert_eq!(result.stop, CollectStop::TimedOut);
    assert!(result.elements.is_empty());
}

#[test]
fn limits_come_from_config() {
    let config = AxConfig {
        max_collect_depth: 7,
        max_collect_elements: 9,
        ..AxConfig::default()
    };
    let limits = CollectLimits::from_config(&config);
    assert_eq!(limits.max_depth, 7);
    assert_eq!(limits.max_elements, 9);
}
