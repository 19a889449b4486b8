use super::element::MacOSUIElement;
use crate::attributes::AX_FOCUSED_APPLICATION;
use crate::element::UIElement;
use crate::errors::AutomationError;
use crate::platforms::{AccessibilityEngine, FOCUSED_APPLICATION};
use crate::utils::find_pid_for_process;
use accessibility_sys::AXIsProcessTrusted;
use objc::runtime::Object;
use objc::{class, msg_send, sel, sel_impl};
use objc_foundation::{INSString, NSString};
use tracing::debug;

#[link(name = "AppKit", kind = "framework")]
extern "C" {}

/// Engine over the live macOS accessibility API.
#[derive(Debug, Default)]
pub struct MacOSEngine;

impl MacOSEngine {
    pub fn new() -> Self {
        Self
    }

    fn pid_for(&self, identifier: &str) -> Option<i32> {
        if let Ok(pid) = identifier.parse::<i32>() {
            return Some(pid);
        }
        if looks_like_bundle_id(identifier) {
            if let Some(pid) = pid_for_bundle_id(identifier) {
                return Some(pid);
            }
        }
        if let Some(pid) = pid_for_localized_name(identifier) {
            return Some(pid);
        }
        // Executable path or process name
        find_pid_for_process(identifier)
    }

    fn focused_pid(&self) -> Option<i32> {
        let system = UIElement::new(Box::new(MacOSUIElement::system_wide()));
        system
            .attribute(AX_FOCUSED_APPLICATION)
            .and_then(|app| app.as_element().and_then(UIElement::process_id))
            .or_else(frontmost_pid)
    }
}

impl AccessibilityEngine for MacOSEngine {
    fn application(&self, identifier: &str) -> Result<UIElement, AutomationError> {
        let pid = if identifier == FOCUSED_APPLICATION {
            self.focused_pid().ok_or_else(|| {
                AutomationError::ApplicationNotFound("no application has focus".to_string())
            })?
        } else {
            self.pid_for(identifier)
                .ok_or_else(|| AutomationError::ApplicationNotFound(identifier.to_string()))?
        };
        debug!("Application '{}' is pid {}", identifier, pid);

        let app = UIElement::new(Box::new(MacOSUIElement::application(pid)));
        // Any pid yields a handle; only a live app answers for its role
        if app.role().is_none() {
            return Err(AutomationError::ApplicationNotFound(format!(
                "{identifier} (pid {pid}) exposes no accessibility tree"
            )));
        }
        Ok(app)
    }

    fn system_wide(&self) -> Result<UIElement, AutomationError> {
        Ok(UIElement::new(Box::new(MacOSUIElement::system_wide())))
    }

    fn has_permissions(&self) -> bool {
        u8::from(unsafe { AXIsProcessTrusted() }) != 0
    }
}

fn looks_like_bundle_id(identifier: &str) -> bool {
    identifier.contains('.') && !identifier.contains('/') && !identifier.contains(' ')
}

fn pid_for_bundle_id(bundle_id: &str) -> Option<i32> {
    unsafe {
        let bundle = NSString::from_str(bundle_id);
        let apps: *mut Object = msg_send![
            class!(NSRunningApplication),
            runningApplicationsWithBundleIdentifier: &*bundle
        ];
        first_pid(apps)
    }
}

fn pid_for_localized_name(name: &str) -> Option<i32> {
    unsafe {
        let workspace: *mut Object = msg_send![class!(NSWorkspace), sharedWorkspace];
        if workspace.is_null() {
            return None;
        }
        let apps: *mut Object = msg_send![workspace, runningApplications];
        if apps.is_null() {
            return None;
        }
        let count: usize = msg_send![apps, count];
        for index in 0..count {
            let app: *mut Object = msg_send![apps, objectAtIndex: index];
            let localized: *mut NSString = msg_send![app, localizedName];
            if localized.is_null() {
                continue;
            }
            if (*localized).as_str().eq_ignore_ascii_case(name) {
                let pid: i32 = msg_send![app, processIdentifier];
                return Some(pid);
            }
        }
        None
    }
}

fn frontmost_pid() -> Option<i32> {
    unsafe {
        let workspace: *mut Object = msg_send![class!(NSWorkspace), sharedWorkspace];
        if workspace.is_null() {
            return None;
        }
        let app: *mut Object = msg_send![workspace, frontmostApplication];
        if app.is_null() {
            return None;
        }
        let pid: i32 = msg_send![app, processIdentifier];
        (pid > 0).then_some(pid)
    }
}

unsafe fn first_pid(apps: *mut Object) -> Option<i32> {
    if apps.is_null() {
        return None;
    }
    let count: usize = msg_send![apps, count];
    if count == 0 {
        return None;
    }
    let app: *mut Object = msg_send![apps, objectAtIndex: 0usize];
    let pid: i32 = msg_send![app, processIdentifier];
    (pid > 0).then_some(pid)
}
