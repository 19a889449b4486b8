use super::ax_error;
use super::values::{cf_from_value, raw_from_cf};
use crate::element::UIElementImpl;
use crate::errors::AutomationError;
use crate::value::{AxValue, RawValue};
use accessibility::AXUIElement;
use accessibility_sys::{
    AXUIElementCopyActionNames, AXUIElementCopyAttributeNames, AXUIElementCopyAttributeValue,
    AXUIElementGetPid, AXUIElementIsAttributeSettable, AXUIElementPerformAction,
    AXUIElementSetAttributeValue, AXUIElementSetMessagingTimeout,
};
use core_foundation::array::CFArray;
use core_foundation::base::{CFType, TCFType};
use core_foundation::string::CFString;
use core_foundation_sys::array::CFArrayRef;
use core_foundation_sys::base::{Boolean, CFEqual, CFHash, CFTypeRef};
use std::any::Any;
use std::fmt;
use std::ptr;

/// Upper bound for a single round trip into the target application.
const MESSAGING_TIMEOUT_SECS: f32 = 5.0;

/// One live `AXUIElementRef`, retained for the lifetime of the wrapper.
#[derive(Clone)]
pub struct MacOSUIElement {
    element: AXUIElement,
}

impl MacOSUIElement {
    pub fn new(element: AXUIElement) -> Self {
        Self { element }
    }

    /// Application root for `pid`, with a bounded messaging timeout.
    pub fn application(pid: i32) -> Self {
        let element = AXUIElement::application(pid);
        unsafe {
            AXUIElementSetMessagingTimeout(element.as_concrete_TypeRef(), MESSAGING_TIMEOUT_SECS);
        }
        Self { element }
    }

    pub fn system_wide() -> Self {
        Self {
            element: AXUIElement::system_wide(),
        }
    }

    fn copy_names(
        &self,
        what: &str,
        copy: unsafe extern "C" fn(
            accessibility_sys::AXUIElementRef,
            *mut CFArrayRef,
        ) -> accessibility_sys::AXError,
    ) -> Result<Vec<String>, AutomationError> {
        let mut names: CFArrayRef = ptr::null();
        let code = unsafe { copy(self.element.as_concrete_TypeRef(), &mut names) };
        if let Some(e) = ax_error(code, what) {
            return Err(e);
        }
        if names.is_null() {
            return Ok(Vec::new());
        }
        let names = unsafe { CFArray::<CFString>::wrap_under_create_rule(names) };
        Ok(names.iter().map(|name| name.to_string()).collect())
    }
}

impl fmt::Debug for MacOSUIElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacOSUIElement")
            .field("ref", &self.element.as_concrete_TypeRef())
            .finish()
    }
}

impl UIElementImpl for MacOSUIElement {
    fn object_id(&self) -> usize {
        // CFHash is consistent with CFEqual for AXUIElementRef
        unsafe { CFHash(self.element.as_CFTypeRef()) as usize }
    }

    fn same_node(&self, other: &dyn UIElementImpl) -> bool {
        match other.as_any().downcast_ref::<MacOSUIElement>() {
            Some(other) => unsafe {
                CFEqual(self.element.as_CFTypeRef(), other.element.as_CFTypeRef()) != 0
            },
            None => false,
        }
    }

    fn attribute_names(&self) -> Result<Vec<String>, AutomationError> {
        self.copy_names("attribute names", AXUIElementCopyAttributeNames)
    }

    fn raw_attribute(&self, name: &str) -> Result<Option<RawValue>, AutomationError> {
        let key = CFString::new(name);
        let mut value: CFTypeRef = ptr::null();
        let code = unsafe {
            AXUIElementCopyAttributeValue(
                self.element.as_concrete_TypeRef(),
                key.as_concrete_TypeRef(),
                &mut value,
            )
        };
        match ax_error(code, name) {
            Some(AutomationError::NoValue(_)) => return Ok(None),
            Some(e) => return Err(e),
            None => {}
        }
        if value.is_null() {
            return Ok(None);
        }
        // Owned under the create rule; conversion only borrows it
        let owned = unsafe { CFType::wrap_under_create_rule(value) };
        Ok(Some(unsafe { raw_from_cf(owned.as_CFTypeRef()) }))
    }

    fn action_names(&self) -> Result<Vec<String>, AutomationError> {
        self.copy_names("action names", AXUIElementCopyActionNames)
    }

    fn perform_action(&self, action: &str) -> Result<(), AutomationError> {
        let name = CFString::new(action);
        let code = unsafe {
            AXUIElementPerformAction(self.element.as_concrete_TypeRef(), name.as_concrete_TypeRef())
        };
        match ax_error(code, action) {
            None => Ok(()),
            Some(AutomationError::PlatformError(msg)) => Err(AutomationError::ActionFailed(msg)),
            Some(e) => Err(e),
        }
    }

    fn is_attribute_settable(&self, name: &str) -> Result<bool, AutomationError> {
        let key = CFString::new(name);
        let mut settable: Boolean = 0;
        let code = unsafe {
            AXUIElementIsAttributeSettable(
                self.element.as_concrete_TypeRef(),
                key.as_concrete_TypeRef(),
                &mut settable,
            )
        };
        match ax_error(code, name) {
            None => Ok(settable != 0),
            Some(e) => Err(e),
        }
    }

    fn set_attribute(&self, name: &str, value: &AxValue) -> Result<(), AutomationError> {
        let key = CFString::new(name);
        let native = cf_from_value(value)?;
        let code = unsafe {
            AXUIElementSetAttributeValue(
                self.element.as_concrete_TypeRef(),
                key.as_concrete_TypeRef(),
                native.as_CFTypeRef(),
            )
        };
        match ax_error(code, name) {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    fn process_id(&self) -> Option<i32> {
        let mut pid: i32 = 0;
        let code = unsafe { AXUIElementGetPid(self.element.as_concrete_TypeRef(), &mut pid) };
        if ax_error(code, "pid").is_none() && pid > 0 {
            Some(pid)
        } else {
            None
        }
    }

    fn clone_box(&self) -> Box<dyn UIElementImpl> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
