use super::{fast_config, Fixture};
use crate::context::DebugLog;
use crate::locator::Locator;
use crate::platforms::mock::MockElement;
use crate::search::find_element;

fn find(root: &MockElement, locator: &Locator, max_depth: usize) -> Option<usize> {
    find_element(
        &root.handle(),
        locator,
        max_depth,
        &fast_config(),
        &mut DebugLog::disabled(),
    )
    .map(|element| element.id())
}

#[test]
fn trivial_locator_returns_root() {
    let f = Fixture::new();
    assert_eq!(find(&f.app, &Locator::new(), 20), Some(f.app.id()));
}

#[test]
fn depth_limit_is_inclusive() {
    let f = Fixture::new();
    let locator = Locator::role("AXStaticText");
    // app > window > group > web area > static text
    assert_eq!(find(&f.app, &locator, 4), Some(f.welcome.id()));
    assert_eq!(find(&f.app, &locator, 3), None);
}

#[test]
fn first_match_follows_sibling_order() {
    let f = Fixture::new();
    assert_eq!(find(&f.app, &Locator::role("AXButton"), 20), Some(f.save.id()));
    let disabled = Locator::role("AXButton").with("AXEnabled", "false");
    assert_eq!(find(&f.app, &disabled, 20), Some(f.cancel.id()));
}

#[test]
fn search_descends_below_match_missing_action() {
    let outer = MockElement::new("AXGroup").title("Row");
    let inner = MockElement::new("AXGroup").title("Row").action("AXPress");
    outer.add_child(inner.clone());

    let locator = Locator::role("AXGroup")
        .with("AXTitle", "Row")
        .requiring_action("AXPress");
    assert_eq!(find(&outer, &locator, 5), Some(inner.id()));
}

#[test]
fn children_exposed_only_through_rows_are_searched() {
    let table = MockElement::new("AXTable");
    let row = MockElement::new("AXRow");
    let cell = MockElement::new("AXCell").value("42");
    row.add_child(cell.clone());
    table.add_to_container("AXRows", &row);

    let locator = Locator::role("AXCell").with("AXValue", "42");
    assert_eq!(find(&table, &locator, 5), Some(cell.id()));
}

#[test]
fn cyclic_containers_terminate() {
    let f = Fixture::new();
    // The web area claims the window as one of its visible children
    f.web_area.add_to_container("AXVisibleChildren", &f.window);

    let locator = Locator::role("AXSlider");
    assert_eq!(find(&f.app, &locator, 50), None);
}

#[test]
fn unmatched_search_is_logged() {
    let f = Fixture::new();
    let mut log = DebugLog::new(true);
    let found = find_element(
        &f.app.handle(),
        &Locator::role("AXSlider"),
        10,
        &fast_config(),
        &mut log,
    );
    assert!(found.is_none());
    assert!(log.entries().iter().any(|e| e.contains("no match")));
}

#[test]
fn stale_elements_are_skipped() {
    let f = Fixture::new();
    f.toolbar.invalidate();
    assert_eq!(
        find(&f.app, &Locator::role("AXTextArea"), 20),
        Some(f.text_area.id())
    );
    assert_eq!(find(&f.app, &Locator::role("AXButton"), 20), None);
}
