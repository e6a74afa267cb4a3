//! Reads and navigation over parsed documents.

use gson::{Error, Json, JsonType};

#[test]
fn numbers_and_numeric_strings() {
    for (text, v) in [("123", 123), ("-123", -123)] {
        let j = Json::parse(text);
        assert_eq!(j.kind(), JsonType::Number);
        assert!(j.is_int());
        assert_eq!(j.int_value(), v);
    }
    for (text, v) in [(r#""123""#, 123), (r#""-123""#, -123)] {
        let j = Json::parse(text);
        assert_eq!(j.kind(), JsonType::String);
        assert!(j.is_int());
        assert_eq!(j.int_value(), v);
    }
    for (text, v) in [("1.23", 1.23), ("-1.23", -1.23)] {
        let j = Json::parse(text);
        assert_eq!(j.kind(), JsonType::Number);
        assert!(!j.is_int());
        assert_eq!(j.float_value(), v);
    }
    for (text, v) in [(r#""1.23""#, 1.23), (r#""-1.23""#, -1.23)] {
        let j = Json::parse(text);
        assert_eq!(j.kind(), JsonType::String);
        assert!(!j.is_int());
        assert_eq!(j.float_value(), v);
    }
}

#[test]
fn object_keys_and_members() {
    assert!(Json::parse("{}").keys().is_empty());
    assert_eq!(
        Json::parse(r#"{"a":1, "x":"7", "b":2, "y":"8", "c": 3, "z":"9"}"#).keys(),
        vec!["a", "x", "b", "y", "c", "z"]
    );
    assert_eq!(Json::parse(r#"{"a": 123}"#).key("a").int_value(), 123);
    assert_eq!(
        Json::parse(r#"{"a": {"b": {"c": 123}}}"#)
            .key("a")
            .key("b")
            .key("c")
            .int_value(),
        123
    );
}

#[test]
fn duplicate_keys_keep_first_position_last_value() {
    let doc = Json::parse(r#"{"a": 1, "b": 2, "a": 3}"#);
    assert_eq!(doc.keys(), vec!["a", "b"]);
    assert_eq!(doc.key("a").int_value(), 3);
}

#[test]
fn lists() {
    assert_eq!(Json::parse("[]").len(), 0);
    assert_eq!(Json::parse("[123]").index(0).int_value(), 123);
    let nested = Json::parse(r#"[[[["123"]]]]"#);
    assert_eq!(nested.index(0).index(0).index(0).index(0).int_value(), 123);
}

#[test]
fn nested_list_walk() {
    let doc = Json::parse("[[[0],[1],[2]], [[10],[11],[12]]]");
    for i in 0..doc.len() {
        for j in 0..doc.index(i).len() {
            let x = doc.index(i).index(j).index(0);
            assert_eq!(x.int_value(), (i * 10 + j) as i64, "{:?}", x.err());
        }
    }
}

#[test]
fn mixed_key_index_walk() {
    let doc = Json::parse(r#"{"a":[{"b":"0"},{"b":1},{"b":"2"},{"b":3}]}"#);
    assert_eq!(doc.key("a").len(), 4);
    for i in 0..doc.key("a").len() {
        assert_eq!(doc.key("a").index(i).key("b").int_value(), i as i64);
    }
}

#[test]
fn any_reconciles_field_names() {
    let doc = Json::parse(r#"{"a": 123, "b": "456", "c": "789"}"#);
    assert_eq!(doc.any(&["a", "b"]).int_value(), 123);
    assert_eq!(doc.any(&["c", "b"]).int_value(), 789);

    let node = Json::parse(r#"{"errcode": 123}"#).any(&["errcode", "err_code"]);
    assert_eq!(node.int_value(), 123);
    assert_eq!(node.path(), "errcode");

    let node = Json::parse(r#"{"err_code": "123"}"#).any(&["errcode", "err_code"]);
    assert_eq!(node.int_value(), 123);
    assert_eq!(node.path(), "err_code");
}

#[test]
fn smart_key_lookups() {
    let doc = Json::parse(r#"{"a": [{"b": {"c": 123}}]}"#);
    assert_eq!(doc.get("a[0].b.c").int_value(), 123);

    let doc = Json::parse(r#"[{"a": [[{"b": {"c": ["123"]}}]]}]"#);
    assert_eq!(doc.get("[0].a[0][0].b.c[0]").int_value(), 123);

    let doc = Json::parse(r#"{"a":[[[],[{},{},{"b":123}]]]}"#);
    assert_eq!(doc.get("a[0][1][2].b").int_value(), 123);

    let doc = Json::parse(r#"[[[],[{},{},{"a":[[[{"b":[123]}]]]}]]]"#);
    assert_eq!(doc.get("[0][1][2].a[0][0][0].b[0]").int_value(), 123);

    let doc = Json::parse(r#"{"": {"": {"": {"a": 123}}}}"#);
    assert_eq!(doc.get("...a").int_value(), 123);
}

#[test]
fn get_matches_explicit_steps() {
    let doc = Json::parse(r#"{"a":[[[ ], [{}, {}, {"c": 1}]]]}"#);
    let via_get = doc.get("a.b[0][1].c");
    let via_steps = doc.key("a").key("b").index(0).index(1).key("c");
    assert_eq!(via_get.err(), via_steps.err());

    let via_get = doc.get("a[0][1][2].c");
    let via_steps = doc.key("a").index(0).index(1).index(2).key("c");
    assert!(via_get.same(&via_steps));
    assert_eq!(via_get.int_value(), 1);
}

#[test]
fn paths_of_found_nodes() {
    let doc = Json::parse(r#"{"a": {"b": [0, {"c": 1}]}}"#);
    assert_eq!(doc.path(), "");
    assert_eq!(doc.get("a.b[1].c").path(), "a.b[1].c");
    assert_eq!(doc.get("a.b[1]").path(), "a.b[1]");

    // The path can be fed back to get.
    let c = doc.get("a.b[1].c");
    assert!(doc.get(&c.path()).same(&c));
}

#[test]
fn duplicate_valued_siblings_have_distinct_paths() {
    let doc = Json::parse(r#"{"x": 1, "y": 1, "l": [1, 1]}"#);
    assert_eq!(doc.key("y").path(), "y");
    assert_eq!(doc.get("l[1]").path(), "l[1]");
}

#[test]
fn error_transparency_through_chains() {
    let doc = Json::parse(r#"{"a": {"b": 1}}"#);
    let node = doc.key("a").key("missing").index(3).key("deeper");
    assert_eq!(node.int_value(), 0);
    assert_eq!(node.str_value(), "");
    assert!(!node.bool_value());
    assert_eq!(node.len(), 0);
    assert!(node.keys().is_empty());
    assert!(node.not_exists());
    assert_eq!(node.path(), "");
    assert!(matches!(
        node.err(),
        Some(Error::KeyNotFound { ref path, ref key, .. }) if path == "a" && key == "missing"
    ));
}

#[test]
fn classify_absent_versus_broken() {
    let doc = Json::parse(r#"{"n": 5, "s": "x"}"#);
    assert!(doc.key("nope").not_exists());
    assert!(doc.get("n.x").err().unwrap().is_type_mismatch());
    assert!(!doc.get("n.x").not_exists());
    assert!(doc.get("n[").err().unwrap().is_malformed());
}

#[test]
fn malformed_document_is_a_dead_end() {
    let doc = Json::parse(r#"{"a": [1, 2"#);
    let node = doc.get("a[0]");
    assert!(node.err().unwrap().is_malformed());
    assert!(doc.keys().is_empty());
}

#[test]
fn later_reads_are_not_blamed_for_earlier_failures() {
    let doc = Json::parse(r#"{"name": "abc", "flag": true}"#);
    let name = doc.key("name");
    assert_eq!(name.int_value(), 0);
    assert_eq!(name.try_str(), Ok("abc".to_owned()));
    assert_eq!(name.value::<String>(), Ok("abc".to_owned()));

    let flag = doc.key("flag");
    assert!(flag.try_float().is_err());
    assert_eq!(flag.try_bool(), Ok(true));
}
