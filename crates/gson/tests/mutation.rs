//! Writes through handles: set, set_raw, remove and structure creation.

use gson::{Error, Json, JsonType};
use serde_json::{json, Value};

fn value_of(doc: &Json) -> Value {
    serde_json::from_slice(&doc.to_bytes()).unwrap()
}

#[test]
fn insert_into_empty_document() {
    let doc = Json::new();
    doc.index(5).set(&123).unwrap();
    assert_eq!(doc.index(0).int_value(), 123);
    doc.index(0).set(&456).unwrap();
    assert_eq!(doc.index(0).int_value(), 456);
    assert_eq!(doc.len(), 1);
}

#[test]
fn set_key_on_empty_document() {
    let doc = Json::new();
    doc.key("a").set("123").unwrap();
    assert_eq!(doc.key("a").int_value(), 123);
    assert_eq!(doc.key("a").kind(), JsonType::String);
}

#[test]
fn remove_after_create() {
    let doc = Json::new();
    doc.get("a.b.c").set(&123).unwrap();
    assert_eq!(doc.get("a.b.c").int_value(), 123);
    assert!(doc.get("a.b.c").remove());
    assert_ne!(doc.get("a.b.c").int_value(), 123);
    assert_eq!(value_of(&doc), json!({"a": {"b": {}}}));
}

#[test]
fn path_appears_once_written() {
    let doc = Json::new();
    assert_eq!(doc.get("a.b.c").path(), "");
    doc.get("a.b.c").set("123").unwrap();
    assert_eq!(doc.get("a.b.c").path(), "a.b.c");
}

#[test]
fn deep_edit_reencodes_only_dirty_levels() {
    let doc = Json::parse(r#"{ "meta" : { "v" : 1 } , "items" : [ {"id": 1}, {"id": 2} ] }"#);
    doc.get("items[1].id").set(&20).unwrap();
    assert_eq!(
        doc.to_string(),
        r#"{"meta":{ "v" : 1 },"items":[{"id": 1},{"id":20}]}"#
    );
}

#[test]
fn new_keys_append_in_order() {
    let doc = Json::parse(r#"{"z": 0}"#);
    doc.key("b").set(&1).unwrap();
    doc.key("a").set(&2).unwrap();
    assert_eq!(doc.keys(), vec!["z", "b", "a"]);
    assert_eq!(doc.to_string(), r#"{"z":0,"b":1,"a":2}"#);
}

#[test]
fn remove_then_reinsert_goes_to_the_end() {
    let doc = Json::parse(r#"{"a": 1, "b": 2, "c": 3}"#);
    doc.key("a").remove();
    doc.key("a").set(&1).unwrap();
    assert_eq!(doc.keys(), vec!["b", "c", "a"]);
}

#[test]
fn removed_node_is_a_standalone_value() {
    let doc = Json::parse(r#"{"cfg": {"k": [1, 2]}}"#);
    let cfg = doc.key("cfg");
    cfg.remove();
    assert_eq!(doc.to_string(), "{}");
    assert_eq!(cfg.get("k[1]").int_value(), 2);
    assert_eq!(cfg.get("k[1]").path(), "k[1]");
    assert!(cfg.parent().is_none());

    cfg.key("extra").set(&true).unwrap();
    assert_eq!(cfg.to_string(), r#"{"k":[1, 2],"extra":true}"#);
    assert_eq!(doc.to_string(), "{}");
}

#[test]
fn writing_to_a_dead_end_leaves_the_document_alone() {
    let doc = Json::parse(r#"{"a": 5}"#);
    let dead = doc.get("a.b");
    assert!(dead.err().unwrap().is_type_mismatch());

    dead.set(&1).unwrap();
    assert_eq!(doc.to_string(), r#"{"a": 5}"#);
    assert_eq!(dead.int_value(), 1);
}

#[test]
fn list_built_top_down() {
    let doc = Json::new();
    for (i, name) in ["x", "y", "z"].iter().enumerate() {
        doc.get(&format!("items[{i}].name")).set(name).unwrap();
    }
    assert_eq!(
        value_of(&doc),
        json!({"items": [{"name": "x"}, {"name": "y"}, {"name": "z"}]})
    );
}

#[test]
fn set_structured_values() {
    #[derive(serde::Serialize)]
    struct User<'a> {
        name: &'a str,
        tags: Vec<&'a str>,
    }

    let doc = Json::parse("{}");
    doc.key("user")
        .set(&User {
            name: "ada",
            tags: vec!["admin"],
        })
        .unwrap();
    assert_eq!(doc.get("user.tags[0]").str_value(), "admin");
    assert_eq!(doc.to_string(), r#"{"user":{"name":"ada","tags":["admin"]}}"#);
}

#[test]
fn set_value_with_escapes() {
    let doc = Json::new();
    doc.key("q\"k").set("line\nbreak").unwrap();
    assert_eq!(doc.to_string(), r#"{"q\"k":"line\nbreak"}"#);
    assert_eq!(Json::parse(&doc.to_string()).key("q\"k").str_value(), "line\nbreak");
}

#[test]
fn edits_inside_string_wrapped_objects_stay_strings() {
    let doc = Json::parse(r#"{"payload": "{\"id\":7}"}"#);
    doc.get("payload.id").set(&8).unwrap();
    assert_eq!(doc.to_string(), r#"{"payload":"{\"id\":8}"}"#);
    assert_eq!(doc.key("payload").kind(), JsonType::String);
}

#[test]
fn object_text_with_invalid_utf8_keeps_last_good_bytes() {
    let doc = Json::parse(r#"{"payload": "{\"id\":7}"}"#);
    doc.get("payload.id").set_raw(vec![b'"', 0xff, b'"']);
    assert_eq!(doc.to_string(), r#"{"payload":"{\"id\":7}"}"#);
    assert!(matches!(doc.key("payload").err(), Some(Error::Encode { .. })));
}

#[test]
fn escaped_keys_survive_a_rewrite() {
    let doc = Json::parse(r#"{"quo\"te": 1, "line\nbreak": 2}"#);
    doc.key("new\u{1}").set(&3).unwrap();
    assert_eq!(
        doc.to_string(),
        r#"{"quo\"te":1,"line\nbreak":2,"new\u0001":3}"#
    );
    assert_eq!(value_of(&doc), json!({"quo\"te": 1, "line\nbreak": 2, "new\u{1}": 3}));
}

#[test]
fn set_clears_previous_read_errors() {
    let doc = Json::parse(r#"{"a": "x"}"#);
    let a = doc.key("a");
    assert_eq!(a.int_value(), 0);
    assert!(a.err().is_some());
    a.set(&1).unwrap();
    assert!(a.err().is_none());
    assert_eq!(a.int_value(), 1);
}

#[test]
fn encode_error_surfaces_directly() {
    let doc = Json::new();
    let err = doc.key("f").set(&f64::NAN);
    // serde_json writes non-finite floats as null rather than failing.
    assert!(err.is_ok());
    assert!(doc.key("f").is_null());

    struct Unserializable;
    impl serde::Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }
    let err = doc.key("g").set(&Unserializable).unwrap_err();
    assert_eq!(err, Error::Encode { reason: "refused".into() });
    assert!(doc.key("g").not_exists());
}
