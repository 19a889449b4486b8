//! Accessibility attribute, role and action names used by the engine.
//!
//! These are the platform's string keys; they are kept as plain `&str` so the
//! portable layers (matcher, formatter, mock backend) never depend on FFI
//! symbols.

pub const AX_ROLE: &str = "AXRole";
pub const AX_SUBROLE: &str = "AXSubrole";
pub const AX_ROLE_DESCRIPTION: &str = "AXRoleDescription";
pub const AX_TITLE: &str = "AXTitle";
pub const AX_VALUE: &str = "AXValue";
pub const AX_DESCRIPTION: &str = "AXDescription";
pub const AX_HELP: &str = "AXHelp";
pub const AX_PLACEHOLDER_VALUE: &str = "AXPlaceholderValue";
pub const AX_IDENTIFIER: &str = "AXIdentifier";
pub const AX_ENABLED: &str = "AXEnabled";
pub const AX_FOCUSED: &str = "AXFocused";
pub const AX_SELECTED_TEXT: &str = "AXSelectedText";
pub const AX_POSITION: &str = "AXPosition";
pub const AX_SIZE: &str = "AXSize";

pub const AX_PARENT: &str = "AXParent";
pub const AX_CHILDREN: &str = "AXChildren";
pub const AX_WINDOWS: &str = "AXWindows";
pub const AX_FOCUSED_UI_ELEMENT: &str = "AXFocusedUIElement";
pub const AX_FOCUSED_APPLICATION: &str = "AXFocusedApplication";

pub const AX_DOM_CLASS_LIST: &str = "AXDOMClassList";
pub const AX_DOM_IDENTIFIER: &str = "AXDOMIdentifier";

/// Pseudo attribute under which action names are reported.
pub const AX_ACTION_NAMES: &str = "AXActionNames";
/// Alternate attribute some elements use to expose their action list.
pub const AX_ACTIONS: &str = "AXActions";

/// Heuristic entries attached by the formatter.
pub const COMPUTED_NAME: &str = "ComputedName";
pub const IS_CLICKABLE: &str = "IsClickable";
pub const COMPUTED_PATH: &str = "ComputedPath";

/// Criteria keys evaluated against the computed name instead of an attribute.
pub const COMPUTED_NAME_EQUALS: &str = "computed_name_equals";
pub const COMPUTED_NAME_CONTAINS: &str = "computed_name_contains";

pub const ROLE_APPLICATION: &str = "AXApplication";
pub const ROLE_WINDOW: &str = "AXWindow";
pub const ROLE_BUTTON: &str = "AXButton";
pub const ROLE_STATIC_TEXT: &str = "AXStaticText";
pub const ROLE_LINK: &str = "AXLink";

pub const ACTION_PRESS: &str = "AXPress";
pub const ACTION_INCREMENT: &str = "AXIncrement";
pub const ACTION_DECREMENT: &str = "AXDecrement";
pub const ACTION_SHOW_MENU: &str = "AXShowMenu";
pub const ACTION_PICK: &str = "AXPick";
pub const ACTION_CANCEL: &str = "AXCancel";
pub const ACTION_CONFIRM: &str = "AXConfirm";
pub const ACTION_RAISE: &str = "AXRaise";

/// Container attributes consulted in addition to `AXChildren` when
/// enumerating descendants. Web views, tables, outlines and tab groups
/// frequently hang content off these instead of the primary list.
pub const ALTERNATE_CHILD_ATTRIBUTES: &[&str] = &[
    "AXVisibleChildren",
    "AXChildrenInNavigationOrder",
    "AXRows",
    "AXVisibleRows",
    "AXColumns",
    "AXVisibleColumns",
    "AXSelectedChildren",
    "AXTabs",
    "AXContents",
    "AXSplitGroupContents",
    "AXWebAreaContents",
    "AXLinkedUIElements",
];

/// Attributes that web content populates lazily; reads are retried before
/// an empty result is believed.
pub const LAZY_ATTRIBUTES: &[&str] = &[AX_DOM_CLASS_LIST, AX_DOM_IDENTIFIER];

/// Array attributes compared as "expected is a subset of actual".
pub const SUBSET_MATCH_ATTRIBUTES: &[&str] = &[AX_DOM_CLASS_LIST];

/// Roles whose elements count as clickable without consulting actions.
pub const CLICKABLE_ROLES: &[&str] = &[
    "AXButton",
    "AXLink",
    "AXMenuItem",
    "AXMenuBarItem",
    "AXMenuButton",
    "AXPopUpButton",
    "AXCheckBox",
    "AXRadioButton",
    "AXDisclosureTriangle",
    "AXTab",
];

/// Roles that only carry text; the multi-element default key set is trimmed
/// for these.
pub const TEXT_ONLY_ROLES: &[&str] = &[ROLE_STATIC_TEXT, "AXHeading"];

/// Attribute keys used for every element of a `collectAll` response when the
/// caller asked for no specific keys.
pub const MULTI_ELEMENT_DEFAULT_ATTRIBUTES: &[&str] = &[AX_ROLE, AX_VALUE, AX_TITLE, AX_IDENTIFIER];

/// Trimmed default for text-only roles.
pub const TEXT_ELEMENT_DEFAULT_ATTRIBUTES: &[&str] = &[AX_ROLE, AX_VALUE];

/// Text-bearing attributes harvested by `extractText`, in priority order.
pub const TEXT_ATTRIBUTES: &[&str] = &[AX_VALUE, AX_TITLE, AX_DESCRIPTION, AX_SELECTED_TEXT];

/// Map the short action names accepted on the wire to platform action names.
pub fn canonical_action(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "press" | "click" => Some(ACTION_PRESS),
        "increment" => Some(ACTION_INCREMENT),
        "decrement" => Some(ACTION_DECREMENT),
        "showmenu" | "show_menu" | "show-menu" => Some(ACTION_SHOW_MENU),
        "pick" => Some(ACTION_PICK),
        "cancel" => Some(ACTION_CANCEL),
        "confirm" => Some(ACTION_CONFIRM),
        "raise" => Some(ACTION_RAISE),
        _ => None,
    }
}

/// The attribute a criteria key refers to. Short lowercase spellings are
/// accepted for the handful of keys people type most.
pub fn normalize_key(key: &str) -> &str {
    match key {
        "role" => AX_ROLE,
        "subrole" => AX_SUBROLE,
        "title" => AX_TITLE,
        "value" => AX_VALUE,
        "description" => AX_DESCRIPTION,
        "identifier" | "id" => AX_IDENTIFIER,
        "help" => AX_HELP,
        "enabled" => AX_ENABLED,
        "focused" => AX_FOCUSED,
        "placeholder" => AX_PLACEHOLDER_VALUE,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_action_aliases() {
        assert_eq!(canonical_action("press"), Some(ACTION_PRESS));
        assert_eq!(canonical_action("Show_Menu"), Some(ACTION_SHOW_MENU));
        assert_eq!(canonical_action("AXPress"), None);
        assert_eq!(canonical_action("value"), None);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("role"), AX_ROLE);
        assert_eq!(normalize_key("AXRole"), AX_ROLE);
        assert_eq!(normalize_key("AXDOMClassList"), AX_DOM_CLASS_LIST);
    }
}
