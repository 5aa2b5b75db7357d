use crate::test_utils::{object, runtime};
use crate::Value;

#[test]
fn object_display() {
    let rt = runtime();
    let peer = object(&rt, "peerUser", vec![("user_id", Value::Long(3))]);

    insta::assert_snapshot!(peer, @"peerUser#59511722");
}

#[test]
fn json_keeps_field_order() {
    let rt = runtime();
    let config = object(
        &rt,
        "config",
        vec![
            ("dc_options", Value::Vector(Vec::new())),
            ("date", Value::Int(5)),
        ],
    );

    let json = serde_json::to_string(&Value::from(config)).unwrap();

    insta::assert_snapshot!(json, @r#"{"$constructor":"config","date":5,"dc_options":[]}"#);
}

#[test]
fn accessors() {
    let v: Value = vec![1i64, 2].into();

    assert_eq!(v.as_vector().map(<[Value]>::len), Some(2));
    assert_eq!(v.as_vector().and_then(|items| items[0].as_long()), Some(1));
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert_eq!(Value::Int(4).as_int(), Some(4));
    assert_eq!(Value::Int(4).as_bool(), None);
    assert!(Value::Bool(true).as_object().is_none());
}
