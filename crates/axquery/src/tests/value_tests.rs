use crate::platforms::mock::MockElement;
use crate::types::{Rect, TextRange};
use crate::value::{AxValue, BoxedValue, RawValue};

#[test]
fn styled_text_and_urls_become_strings() {
    assert_eq!(
        AxValue::from_raw(RawValue::AttributedString("Bold".into())),
        Some(AxValue::String("Bold".into()))
    );
    assert_eq!(
        AxValue::from_raw(RawValue::Url("file:///tmp/a.txt".into())),
        Some(AxValue::String("file:///tmp/a.txt".into()))
    );
}

#[test]
fn boxed_values_unwrap_to_geometry() {
    let frame = Rect::new(1.0, 2.0, 30.0, 40.0);
    assert_eq!(
        AxValue::from_raw(RawValue::Boxed(BoxedValue::Rect(frame))),
        Some(AxValue::Rect(frame))
    );
    let range = TextRange::new(3, 5);
    assert_eq!(
        AxValue::from_raw(BoxedValue::Range(range).into()),
        Some(AxValue::Range(range))
    );
    assert_eq!(
        AxValue::from_raw(RawValue::Boxed(BoxedValue::Error(-25212))),
        Some(AxValue::Error(-25212))
    );
}

#[test]
fn unknown_subtypes_stay_opaque() {
    let value = AxValue::from_raw(RawValue::Boxed(BoxedValue::Unknown(99))).unwrap();
    assert!(matches!(value, AxValue::Opaque(_)));
    assert_eq!(value.to_display_string(), "<AXValue subtype 99>");

    let other = AxValue::from_raw(RawValue::Other("CFDate".into())).unwrap();
    assert_eq!(other, AxValue::Opaque("CFDate".into()));
}

#[test]
fn nulls_are_absent_and_dropped_from_collections() {
    assert_eq!(AxValue::from_raw(RawValue::Null), None);

    let list = AxValue::from_raw(RawValue::Array(vec![
        RawValue::from("a"),
        RawValue::Null,
        RawValue::from("b"),
    ]));
    assert_eq!(list, Some(AxValue::Array(vec!["a".into(), "b".into()])));

    let map = AxValue::from_raw(RawValue::Dictionary(vec![
        ("kept".into(), RawValue::Integer(1)),
        ("gone".into(), RawValue::Null),
    ]))
    .unwrap();
    match map {
        AxValue::Map(entries) => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries["kept"], AxValue::Int(1));
        }
        other => panic!("expected map, got {other:?}"),
    }
}

#[test]
fn elements_keep_identity() {
    let button = MockElement::new("AXButton");
    let value = AxValue::from_raw(RawValue::Element(button.handle())).unwrap();
    assert_eq!(value.as_element().map(|e| e.id()), Some(button.id()));

    let list = AxValue::from_raw(RawValue::Array(vec![
        RawValue::Element(button.handle()),
        RawValue::from("not an element"),
    ]))
    .unwrap();
    assert_eq!(list.elements().len(), 1);
}

#[test]
fn boolean_coercions() {
    assert_eq!(AxValue::Int(1).as_bool(), Some(true));
    assert_eq!(AxValue::Int(0).as_bool(), Some(false));
    assert_eq!(AxValue::Int(2).as_bool(), None);
    assert_eq!(AxValue::Float(1.0).as_bool(), Some(true));
    assert_eq!(AxValue::from("FALSE").as_bool(), Some(false));
    assert_eq!(AxValue::from("maybe").as_bool(), None);
}

#[test]
fn display_strings() {
    assert_eq!(AxValue::Float(3.0).to_display_string(), "3");
    assert_eq!(AxValue::Float(2.5).to_display_string(), "2.5");
    assert_eq!(
        AxValue::Array(vec!["x".into(), AxValue::Int(7)]).to_display_string(),
        "x, 7"
    );
    assert!(AxValue::from("   ").is_empty());
    assert!(!AxValue::Int(0).is_empty());
}
