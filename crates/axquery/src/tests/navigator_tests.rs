use super::Fixture;
use crate::context::DebugLog;
use crate::errors::AutomationError;
use crate::navigator::navigate;
use crate::platforms::mock::MockElement;

fn walk(root: &MockElement, path: &[&str]) -> Result<usize, AutomationError> {
    let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
    navigate(&root.handle(), &path, &mut DebugLog::disabled()).map(|e| e.id())
}

#[test]
fn empty_path_is_the_root() {
    let f = Fixture::new();
    assert_eq!(walk(&f.app, &[]).unwrap(), f.app.id());
}

#[test]
fn window_steps_use_window_list() {
    let f = Fixture::new();
    assert_eq!(walk(&f.app, &["window[1]"]).unwrap(), f.window.id());
    assert_eq!(walk(&f.app, &["AXWindow[2]"]).unwrap(), f.preferences.id());
}

#[test]
fn window_step_without_windows_fails() {
    let app = MockElement::new("AXApplication");
    let err = walk(&app, &["window[1]"]).unwrap_err();
    assert!(matches!(err, AutomationError::PathNotFound(_)));
}

#[test]
fn window_step_falls_back_to_window_children() {
    let app = MockElement::new("AXApplication");
    let sheet_host = MockElement::new("AXWindow").title("Only");
    app.add_child(sheet_host.clone());
    assert_eq!(walk(&app, &["window[1]"]).unwrap(), sheet_host.id());
}

#[test]
fn role_steps_index_among_same_role_siblings() {
    let f = Fixture::new();
    let path = ["window[1]", "AXToolbar[1]", "AXButton[2]"];
    assert_eq!(walk(&f.app, &path).unwrap(), f.cancel.id());
}

#[test]
fn role_comparison_ignores_case() {
    let f = Fixture::new();
    let path = ["window[1]", "axgroup[1]", "AXWEBAREA[1]", "AXStaticText[1]"];
    assert_eq!(walk(&f.app, &path).unwrap(), f.welcome.id());
}

#[test]
fn out_of_range_index_names_the_step() {
    let f = Fixture::new();
    let err = walk(&f.app, &["window[1]", "AXToolbar[1]", "AXButton[3]"]).unwrap_err();
    assert!(matches!(err, AutomationError::PathNotFound(_)));
    assert!(err.to_string().contains("step 3"));
}

#[test]
fn malformed_step_is_path_not_found() {
    let f = Fixture::new();
    let err = walk(&f.app, &["window[1]", "AXToolbar"]).unwrap_err();
    assert!(matches!(err, AutomationError::PathNotFound(_)));
    assert!(err.to_string().contains("step 2"));
}
