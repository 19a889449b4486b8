//! CoreFoundation values to and from the crate's value vocabulary.

use super::element::MacOSUIElement;
use crate::element::UIElement;
use crate::errors::AutomationError;
use crate::types::{Point, Rect, Size, TextRange};
use crate::value::{AxValue, BoxedValue, RawValue};
use accessibility::AXUIElement;
use accessibility_sys::{
    kAXValueTypeAXError, kAXValueTypeCFRange, kAXValueTypeCGPoint, kAXValueTypeCGRect,
    kAXValueTypeCGSize, AXUIElementGetTypeID, AXUIElementRef, AXValueCreate, AXValueGetType,
    AXValueGetTypeID, AXValueGetValue, AXValueRef,
};
use core_foundation::array::CFArray;
use core_foundation::base::{CFType, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use core_foundation_sys::attributed_string::{CFAttributedStringGetString, CFAttributedStringGetTypeID};
use core_foundation_sys::base::{
    CFCopyTypeIDDescription, CFGetTypeID, CFNullGetTypeID, CFRange, CFTypeRef,
};
use core_foundation_sys::number::{CFNumberIsFloatType, CFNumberRef};
use core_foundation_sys::string::{CFStringGetTypeID, CFStringRef};
use core_foundation_sys::url::{CFURLGetString, CFURLGetTypeID, CFURLRef};
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use std::ffi::c_void;

/// Convert a borrowed CoreFoundation value. The caller keeps ownership of
/// `value` for the duration of the call.
///
/// # Safety
/// `value` must be a valid, non-null CF object.
pub(crate) unsafe fn raw_from_cf(value: CFTypeRef) -> RawValue {
    let type_id = CFGetTypeID(value);

    if type_id == CFStringGetTypeID() {
        RawValue::String(CFString::wrap_under_get_rule(value as CFStringRef).to_string())
    } else if type_id == CFAttributedStringGetTypeID() {
        let plain = CFAttributedStringGetString(value as _);
        RawValue::AttributedString(CFString::wrap_under_get_rule(plain).to_string())
    } else if type_id == CFBoolean::type_id() {
        RawValue::Boolean(CFBoolean::wrap_under_get_rule(value as _).into())
    } else if type_id == CFNumber::type_id() {
        number_from_cf(value as CFNumberRef)
    } else if type_id == CFArray::<CFType>::type_id() {
        let array = CFArray::<*const c_void>::wrap_under_get_rule(value as _);
        RawValue::Array(
            array
                .get_all_values()
                .into_iter()
                .filter(|item| !item.is_null())
                .map(|item| raw_from_cf(item))
                .collect(),
        )
    } else if type_id == CFDictionary::<CFType, CFType>::type_id() {
        let dictionary = CFDictionary::<*const c_void, *const c_void>::wrap_under_get_rule(value as _);
        let (keys, values) = dictionary.get_keys_and_values();
        RawValue::Dictionary(
            keys.into_iter()
                .zip(values)
                .filter(|(k, v)| !k.is_null() && !v.is_null())
                .map(|(k, v)| (key_string(k), raw_from_cf(v)))
                .collect(),
        )
    } else if type_id == AXUIElementGetTypeID() {
        let element = AXUIElement::wrap_under_get_rule(value as AXUIElementRef);
        RawValue::Element(UIElement::new(Box::new(MacOSUIElement::new(element))))
    } else if type_id == AXValueGetTypeID() {
        RawValue::Boxed(boxed_from_ax(value as AXValueRef))
    } else if type_id == CFURLGetTypeID() {
        let string = CFURLGetString(value as CFURLRef);
        RawValue::Url(CFString::wrap_under_get_rule(string).to_string())
    } else if type_id == CFNullGetTypeID() {
        RawValue::Null
    } else {
        let description = CFCopyTypeIDDescription(type_id);
        if description.is_null() {
            RawValue::Other(format!("CFTypeID {type_id}"))
        } else {
            RawValue::Other(CFString::wrap_under_create_rule(description).to_string())
        }
    }
}

unsafe fn number_from_cf(number: CFNumberRef) -> RawValue {
    let wrapped = CFNumber::wrap_under_get_rule(number);
    if CFNumberIsFloatType(number) != 0 {
        wrapped
            .to_f64()
            .map(RawValue::Float)
            .unwrap_or(RawValue::Null)
    } else {
        wrapped
            .to_i64()
            .map(RawValue::Integer)
            .or_else(|| wrapped.to_f64().map(RawValue::Float))
            .unwrap_or(RawValue::Null)
    }
}

unsafe fn key_string(key: *const c_void) -> String {
    match raw_from_cf(key) {
        RawValue::String(s) => s,
        other => AxValue::from_raw(other)
            .map(|v| v.to_display_string())
            .unwrap_or_default(),
    }
}

unsafe fn boxed_from_ax(value: AXValueRef) -> BoxedValue {
    let kind = AXValueGetType(value);

    #[allow(non_upper_case_globals)]
    match kind {
        kAXValueTypeCGPoint => {
            let mut point = CGPoint::new(0.0, 0.0);
            if decoded(value, kind as u32, &mut point as *mut _ as *mut c_void) {
                return BoxedValue::Point(Point::new(point.x, point.y));
            }
        }
        kAXValueTypeCGSize => {
            let mut size = CGSize::new(0.0, 0.0);
            if decoded(value, kind as u32, &mut size as *mut _ as *mut c_void) {
                return BoxedValue::Size(Size::new(size.width, size.height));
            }
        }
        kAXValueTypeCGRect => {
            let mut rect = CGRect::new(&CGPoint::new(0.0, 0.0), &CGSize::new(0.0, 0.0));
            if decoded(value, kind as u32, &mut rect as *mut _ as *mut c_void) {
                return BoxedValue::Rect(Rect::new(
                    rect.origin.x,
                    rect.origin.y,
                    rect.size.width,
                    rect.size.height,
                ));
            }
        }
        kAXValueTypeCFRange => {
            let mut range = CFRange {
                location: 0,
                length: 0,
            };
            if decoded(value, kind as u32, &mut range as *mut _ as *mut c_void) {
                return BoxedValue::Range(TextRange::new(range.location as i64, range.length as i64));
            }
        }
        kAXValueTypeAXError => {
            let mut code: i32 = 0;
            if decoded(value, kind as u32, &mut code as *mut _ as *mut c_void) {
                return BoxedValue::Error(code);
            }
        }
        _ => {}
    }
    BoxedValue::Unknown(kind as u32)
}

unsafe fn decoded(value: AXValueRef, kind: u32, out: *mut c_void) -> bool {
    u8::from(AXValueGetValue(value, kind as _, out)) != 0
}

/// Native CF value for an attribute write.
pub(crate) fn cf_from_value(value: &AxValue) -> Result<CFType, AutomationError> {
    let cf = match value {
        AxValue::String(s) => CFString::new(s).as_CFType(),
        AxValue::Bool(b) => {
            if *b {
                CFBoolean::true_value().as_CFType()
            } else {
                CFBoolean::false_value().as_CFType()
            }
        }
        AxValue::Int(i) => CFNumber::from(*i).as_CFType(),
        AxValue::Float(f) => CFNumber::from(*f).as_CFType(),
        AxValue::Point(p) => {
            let point = CGPoint::new(p.x, p.y);
            boxed(kAXValueTypeCGPoint as u32, &point as *const _ as *const c_void)?
        }
        AxValue::Size(s) => {
            let size = CGSize::new(s.width, s.height);
            boxed(kAXValueTypeCGSize as u32, &size as *const _ as *const c_void)?
        }
        other => {
            return Err(AutomationError::InvalidArgument(format!(
                "cannot write a {} value",
                other.type_name()
            )))
        }
    };
    Ok(cf)
}

fn boxed(kind: u32, data: *const c_void) -> Result<CFType, AutomationError> {
    let created = unsafe { AXValueCreate(kind as _, data) };
    if created.is_null() {
        return Err(AutomationError::PlatformError(
            "AXValueCreate returned null".to_string(),
        ));
    }
    Ok(unsafe { CFType::wrap_under_create_rule(created as CFTypeRef) })
}
