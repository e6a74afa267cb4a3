//! `Json` inside serde data structures.

use gson::Json;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Envelope {
    kind: String,
    body: Json,
}

#[test]
fn lazy_body_in_a_struct() {
    let env: Envelope =
        serde_json::from_str(r#"{"kind": "event", "body": {"id": 9, "tags": ["a", "b"]}}"#)
            .unwrap();
    assert_eq!(env.kind, "event");
    assert_eq!(env.body.get("tags[1]").str_value(), "b");

    env.body.key("seen").set(&true).unwrap();
    let out = serde_json::to_string(&env).unwrap();
    assert_eq!(
        out,
        r#"{"kind":"event","body":{"id":9,"tags":["a", "b"],"seen":true}}"#
    );
}

#[test]
fn typed_extraction() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    let doc = Json::parse(r#"{"pts": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]}"#);
    let p: Point = doc.get("pts[1]").value().unwrap();
    assert_eq!(p, Point { x: 3, y: 4 });

    let all: Vec<Point> = doc.key("pts").value().unwrap();
    assert_eq!(all.len(), 2);

    let err = doc.key("pts").value::<Point>().unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn from_value_and_back() {
    let doc = Json::from_value(&serde_json::json!({"a": [1, 2]})).unwrap();
    doc.get("a[2]").set(&3).unwrap();
    let v: serde_json::Value = doc.value().unwrap();
    assert_eq!(v, serde_json::json!({"a": [1, 2, 3]}));
}
