use super::{fast_config, Fixture};
use crate::context::DebugLog;
use crate::locator::Locator;
use crate::matcher::{evaluate, value_equals, MatchOutcome};
use crate::platforms::mock::MockElement;
use crate::value::AxValue;

fn outcome(element: &MockElement, locator: &Locator) -> MatchOutcome {
    evaluate(
        &element.handle(),
        locator,
        &fast_config(),
        &mut DebugLog::disabled(),
    )
}

#[test]
fn role_criterion_is_exact() {
    let f = Fixture::new();
    assert_eq!(
        outcome(&f.save, &Locator::new().with("AXRole", "AXButton")),
        MatchOutcome::FullMatch
    );
    assert_eq!(
        outcome(&f.save, &Locator::new().with("AXRole", "AXSlider")),
        MatchOutcome::NoMatch
    );
    assert_eq!(
        outcome(&f.save, &Locator::new().with("AXRole", "axbutton")),
        MatchOutcome::NoMatch
    );
}

#[test]
fn wildcard_and_missing_role_match_anything() {
    let f = Fixture::new();
    assert!(outcome(&f.group, &Locator::role("*")).is_full());
    assert!(outcome(&f.group, &Locator::role("")).is_full());
    assert!(outcome(&f.group, &Locator::new()).is_full());
}

#[test]
fn substring_prefixes_are_case_insensitive() {
    let f = Fixture::new();
    for value in ["~Save", "*save", "%SAVE AS"] {
        let locator = Locator::new().with("AXTitle", value);
        assert!(outcome(&f.save, &locator).is_full(), "{value}");
    }
    assert!(!outcome(&f.cancel, &Locator::new().with("AXTitle", "~Save")).is_full());
}

#[test]
fn boolean_expectation_uses_coerced_value() {
    let f = Fixture::new();
    let enabled = Locator::role("AXButton").with("AXEnabled", "true");
    assert_eq!(outcome(&f.cancel, &enabled), MatchOutcome::NoMatch);
    assert_eq!(outcome(&f.save, &enabled), MatchOutcome::FullMatch);

    let disabled = Locator::role("AXButton").with("enabled", "false");
    assert!(outcome(&f.cancel, &disabled).is_full());
}

#[test]
fn exists_and_negation() {
    let f = Fixture::new();
    assert!(outcome(&f.save, &Locator::new().with("AXIdentifier", "exists")).is_full());
    assert!(!outcome(&f.cancel, &Locator::new().with("AXIdentifier", "exists")).is_full());

    assert!(outcome(&f.save, &Locator::new().with("AXTitle", "!Cancel")).is_full());
    assert!(!outcome(&f.cancel, &Locator::new().with("AXTitle", "!Cancel")).is_full());
    // Absent attributes satisfy a negation
    assert!(outcome(&f.group, &Locator::new().with("AXTitle", "!Cancel")).is_full());
}

#[test]
fn numeric_values_compare_as_numbers() {
    let slider = MockElement::new("AXSlider").value(50i64);
    assert!(outcome(&slider, &Locator::new().with("AXValue", "50")).is_full());
    assert!(outcome(&slider, &Locator::new().with("AXValue", "50.0")).is_full());
    assert!(!outcome(&slider, &Locator::new().with("AXValue", "51")).is_full());

    let zoom = MockElement::new("AXSlider").value(1.5f64);
    assert!(outcome(&zoom, &Locator::new().with("AXValue", "1.5")).is_full());
}

#[test]
fn numeric_criterion_against_text_value() {
    let field = MockElement::new("AXTextField").value("3.0");
    assert!(outcome(&field, &Locator::new().with("AXValue", "3")).is_full());
    assert!(outcome(&field, &Locator::new().with("AXValue", " 3.000 ")).is_full());
    assert!(!outcome(&field, &Locator::new().with("AXValue", "4")).is_full());
    assert!(!outcome(&field, &Locator::new().with("AXValue", "three")).is_full());
}

#[test]
fn arrays_compare_as_sets_except_class_lists() {
    let f = Fixture::new();
    let actions = Locator::new().with("AXActionNames", "AXShowMenu, AXPress");
    assert!(outcome(&f.save, &actions).is_full());
    let partial = Locator::new().with("AXActionNames", "AXPress");
    assert!(!outcome(&f.save, &partial).is_full());

    let element = MockElement::new("AXGroup").attr("AXDOMClassList", vec!["btn", "primary", "large"]);
    assert!(outcome(&element, &Locator::new().with("AXDOMClassList", "primary btn")).is_full());
    assert!(outcome(&element, &Locator::new().with("AXDOMClassList", r#"["large"]"#)).is_full());
    assert!(!outcome(&element, &Locator::new().with("AXDOMClassList", "btn danger")).is_full());
}

#[test]
fn required_action_missing_is_distinguished() {
    let f = Fixture::new();
    let locator = Locator::role("AXButton").requiring_action("AXPress");
    assert_eq!(outcome(&f.save, &locator), MatchOutcome::FullMatch);
    assert_eq!(outcome(&f.cancel, &locator), MatchOutcome::MatchedButActionMissing);
    // Criteria failures win over the action check
    assert_eq!(
        outcome(&f.save, &locator.clone().with("AXTitle", "Nope")),
        MatchOutcome::NoMatch
    );
}

#[test]
fn computed_name_pseudo_keys() {
    let f = Fixture::new();
    assert!(outcome(&f.save, &Locator::new().with("computed_name_contains", "save")).is_full());
    assert!(outcome(&f.save, &Locator::new().with("computed_name_equals", "save as…")).is_full());
    assert!(!outcome(&f.save, &Locator::new().with("computed_name_equals", "Save")).is_full());

    // Falls back to role description for unnamed elements
    let mut locator = Locator::new();
    locator.computed_name_contains = Some("HTML content".to_string());
    assert!(outcome(&f.web_area, &locator).is_full());
}

#[test]
fn match_any_requires_role_and_one_criterion() {
    let f = Fixture::new();
    let locator = Locator::role("AXButton")
        .with("AXTitle", "Nope")
        .with("AXIdentifier", "save-button")
        .match_any();
    assert!(outcome(&f.save, &locator).is_full());
    assert!(!outcome(&f.cancel, &locator).is_full());
    assert!(!outcome(&f.text_area, &locator).is_full());
}

#[test]
fn computed_name_fields_narrow_match_any() {
    let f = Fixture::new();
    let mut locator = Locator::role("AXButton")
        .with("AXRoleDescription", "button")
        .match_any();
    locator.computed_name_contains = Some("Save".to_string());
    assert!(outcome(&f.save, &locator).is_full());
    assert_eq!(outcome(&f.cancel, &locator), MatchOutcome::NoMatch);

    locator.computed_name_contains = None;
    locator.computed_name_equals = Some("cancel".to_string());
    assert!(outcome(&f.cancel, &locator).is_full());
    assert_eq!(outcome(&f.save, &locator), MatchOutcome::NoMatch);
}

#[test]
fn lazy_class_list_is_retried() {
    let f = Fixture::new();
    let locator = Locator::new().with("AXDOMClassList", "main-content");
    assert!(outcome(&f.web_area, &locator).is_full());
    assert_eq!(f.web_area.read_count("AXDOMClassList"), 3);
}

#[test]
fn lazy_attribute_beyond_retry_budget_is_empty() {
    let element = MockElement::new("AXWebArea").lazy_attr("AXDOMClassList", vec!["late"], 10);
    let locator = Locator::new().with("AXDOMClassList", "late");
    assert_eq!(outcome(&element, &locator), MatchOutcome::NoMatch);
    // One read plus three retries
    assert_eq!(element.read_count("AXDOMClassList"), 4);
}

#[test]
fn typed_equality_on_strings() {
    assert!(value_equals("AXValue", &AxValue::from("1"), "1"));
    assert!(value_equals("AXValue", &AxValue::from("yes"), "true"));
    assert!(!value_equals("AXValue", &AxValue::from("hello"), "true"));
}

#[test]
fn debug_log_records_failed_criteria() {
    let f = Fixture::new();
    let mut log = DebugLog::new(true);
    let locator = Locator::role("AXButton").with("AXTitle", "OK");
    evaluate(&f.save.handle(), &locator, &fast_config(), &mut log);
    assert!(log
        .entries()
        .iter()
        .any(|e| e.contains("AXTitle") && e.contains("failed")));
}
