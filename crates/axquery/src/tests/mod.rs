mod collector_tests;
mod matcher_tests;
mod navigator_tests;
mod search_tests;
mod value_tests;

use crate::config::AxConfig;
use crate::platforms::mock::MockElement;
use std::time::Duration;

/// A small TextEdit-like tree:
///
/// ```text
/// AXApplication "TextEdit"
///   AXWindow "Untitled"
///     AXToolbar
///       AXButton "Save As…" #save-button (AXPress)
///       AXButton "Cancel" (disabled)
///     AXTextArea "Hello world"
///     AXGroup
///       AXWebArea (lazy AXDOMClassList)
///         AXStaticText "Welcome"
///   AXWindow "Preferences"
/// ```
pub(crate) struct Fixture {
    pub app: MockElement,
    pub window: MockElement,
    pub preferences: MockElement,
    pub toolbar: MockElement,
    pub save: MockElement,
    pub cancel: MockElement,
    pub text_area: MockElement,
    pub group: MockElement,
    pub web_area: MockElement,
    pub welcome: MockElement,
}

impl Fixture {
    pub fn new() -> Self {
        let app = MockElement::new("AXApplication")
            .title("TextEdit")
            .pid(501);
        let window = MockElement::new("AXWindow").title("Untitled").pid(501);
        let preferences = MockElement::new("AXWindow").title("Preferences").pid(501);
        let toolbar = MockElement::new("AXToolbar");
        let save = MockElement::new("AXButton")
            .title("Save As…")
            .identifier("save-button")
            .attr("AXRoleDescription", "button")
            .attr("AXEnabled", true)
            .action("AXPress")
            .action("AXShowMenu");
        let cancel = MockElement::new("AXButton")
            .title("Cancel")
            .attr("AXRoleDescription", "button")
            .attr("AXEnabled", false);
        let text_area = MockElement::new("AXTextArea")
            .value("Hello world")
            .attr("AXRoleDescription", "text entry area")
            .settable("AXValue");
        let group = MockElement::new("AXGroup");
        let web_area = MockElement::new("AXWebArea")
            .attr("AXRoleDescription", "HTML content")
            .lazy_attr("AXDOMClassList", vec!["page", "main-content"], 2);
        let welcome = MockElement::new("AXStaticText").value("Welcome");

        toolbar.add_child(save.clone()).add_child(cancel.clone());
        web_area.add_child(welcome.clone());
        group.add_child(web_area.clone());
        window
            .add_child(toolbar.clone())
            .add_child(text_area.clone())
            .add_child(group.clone());
        app.add_window(window.clone()).add_window(preferences.clone());

        Self {
            app,
            window,
            preferences,
            toolbar,
            save,
            cancel,
            text_area,
            group,
            web_area,
            welcome,
        }
    }
}

/// Defaults without retry sleeps.
pub(crate) fn fast_config() -> AxConfig {
    AxConfig {
        attribute_retry_delay: Duration::ZERO,
        ..AxConfig::default()
    }
}
