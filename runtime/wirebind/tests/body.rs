use std::collections::HashMap;

use wirebind::decoder::{BodyError, DecodeError};
use wirebind::literal::{LiteralError, RawNumber};
use wirebind::request::IncomingRequest;
use wirebind::request::path::PathParams;
use wirebind::{Decoder, Record};

fn with_body(body: &str) -> IncomingRequest {
    let (parts, _) = http::Request::post("/orders").body(()).unwrap().into_parts();
    IncomingRequest::from_parts(parts, PathParams::new(), body.to_owned())
}

#[derive(Debug, Default, Record)]
struct Order {
    id: u64,
    note: Option<String>,
    items: Vec<u16>,
    total: RawNumber,
    #[wire(body_only)]
    metadata: HashMap<String, String>,
    attributes: serde_json::Value,
}

fn order() -> Order {
    Order {
        id: 1,
        note: Some("fragile".into()),
        items: vec![1, 2],
        ..Default::default()
    }
}

#[test]
fn empty_bodies_are_skipped() {
    for body in ["", "   \n\t"] {
        let mut order = order();
        Decoder::new().decode(&with_body(body), &mut order).unwrap();
        assert_eq!(order.id, 1);
        assert_eq!(order.note.as_deref(), Some("fragile"));
    }
}

#[test]
fn a_null_document_is_a_no_op() {
    let mut order = order();
    Decoder::new().decode(&with_body("null"), &mut order).unwrap();
    assert_eq!(order.id, 1);
}

#[test]
fn only_present_keys_are_overwritten() {
    let body = r#"{
        "items": [7],
        "total": 12.50,
        "metadata": {"source": "web"},
        "attributes": {"gift": true},
        "unknown": "ignored"
    }"#;

    let mut order = order();
    Decoder::new().decode(&with_body(body), &mut order).unwrap();
    assert_eq!(order.id, 1);
    assert_eq!(order.note.as_deref(), Some("fragile"));
    assert_eq!(order.items, [7]);
    assert_eq!(order.total.as_f64(), Some(12.5));
    assert_eq!(order.metadata["source"], "web");
    assert_eq!(order.attributes, serde_json::json!({"gift": true}));
}

#[test]
fn null_values_reset_nullable_fields_only() {
    let body = r#"{"id": null, "note": null, "items": null}"#;

    let mut order = order();
    Decoder::new().decode(&with_body(body), &mut order).unwrap();
    assert_eq!(order.id, 1);
    assert_eq!(order.note, None);
    assert!(order.items.is_empty());
}

#[test]
fn body_only_fields_reject_tokens() {
    let (parts, _) = http::Request::get("/orders?metadata=x")
        .body(())
        .unwrap()
        .into_parts();
    let request = IncomingRequest::from_parts(parts, PathParams::new(), "");

    let err = Decoder::new()
        .decode(&request, &mut Order::default())
        .unwrap_err();
    let DecodeError::Token(token) = &err else {
        panic!("Expected a token error, got {err:?}");
    };
    assert_eq!(token.wire_name(), "metadata");
    assert!(matches!(
        token.kind(),
        LiteralError::UnsupportedShape { .. }
    ));
}

#[test]
fn syntax_errors_are_reported() {
    let err = Decoder::new()
        .decode(&with_body("{\"id\": "), &mut Order::default())
        .unwrap_err();
    assert!(matches!(err, DecodeError::Body(BodyError::Syntax(_))));
}

#[test]
fn the_body_must_be_an_object() {
    let err = Decoder::new()
        .decode(&with_body("[1, 2]"), &mut Order::default())
        .unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Body(BodyError::NotAnObject { found: "an array" })
    ));
    insta::assert_snapshot!(err, @"Expected the request body to be a JSON object, found an array");
}

#[test]
fn field_errors_point_at_the_offending_value() {
    let err = Decoder::new()
        .decode(&with_body(r#"{"items": [1, 2, 70000]}"#), &mut Order::default())
        .unwrap_err();
    let DecodeError::Body(BodyError::Field {
        wire_name,
        location,
        ..
    }) = &err
    else {
        panic!("Expected a field error, got {err:?}");
    };
    assert_eq!(*wire_name, "items");
    assert_eq!(location, "items[2]");

    let err = Decoder::new()
        .decode(&with_body(r#"{"id": "one"}"#), &mut Order::default())
        .unwrap_err();
    let DecodeError::Body(BodyError::Field { location, .. }) = &err else {
        panic!("Expected a field error, got {err:?}");
    };
    assert_eq!(location, "id");
}

#[derive(Debug, Default, Record)]
struct Readings {
    latest: f32,
    history: Vec<f32>,
}

#[test]
fn narrow_floats_never_overflow_to_infinity() {
    let mut readings = Readings {
        latest: 1.5,
        ..Default::default()
    };
    let err = Decoder::new()
        .decode(&with_body(r#"{"latest": 1e39}"#), &mut readings)
        .unwrap_err();
    let DecodeError::Body(BodyError::Field { location, .. }) = &err else {
        panic!("Expected a field error, got {err:?}");
    };
    assert_eq!(location, "latest");
    assert!(err.to_string().contains("`1e39` is out of range for a `f32`"));
    assert_eq!(readings.latest, 1.5);

    let err = Decoder::new()
        .decode(&with_body(r#"{"history": [1.0, 2.5, 1e39]}"#), &mut readings)
        .unwrap_err();
    let DecodeError::Body(BodyError::Field { location, .. }) = &err else {
        panic!("Expected a field error, got {err:?}");
    };
    assert_eq!(location, "history[2]");
}

#[test]
fn numeric_strings_keep_their_exact_text() {
    let mut order = order();
    Decoder::new()
        .decode(
            &with_body(r#"{"total": "12345678901234567890123.50"}"#),
            &mut order,
        )
        .unwrap();
    assert_eq!(order.total.as_str(), "12345678901234567890123.50");
}
