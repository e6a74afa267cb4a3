//! Tests for comment stripping, in memory and through the reader.

use std::io::Read;

use jcon::{strip_comments, CommentStripper};
use proptest::prelude::*;

fn via_reader(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    CommentStripper::new(input).read_to_end(&mut out).unwrap();
    out
}

#[test]
fn config_file() {
    let input = br#"{
    // service name
    "name": "api", /* inline */ "port": 8080,
    /*
     * multi-line
     */
    "path": "/v1//users/*"
}"#;
    let expected = br#"{
    
    "name": "api",  "port": 8080,
    
    "path": "/v1//users/*"
}"#;
    assert_eq!(strip_comments(input), expected);
    assert_eq!(via_reader(input), expected);
}

#[test]
fn unterminated_comments_swallow_the_rest() {
    assert_eq!(strip_comments(b"[1] // tail"), b"[1] ");
    assert_eq!(strip_comments(b"[1] /* tail"), b"[1] ");
}

#[test]
fn division_like_slashes_survive() {
    assert_eq!(strip_comments(b"1 / 2"), b"1 / 2");
}

#[test]
fn empty_input() {
    assert!(strip_comments(b"").is_empty());
    assert!(via_reader(b"").is_empty());
}

proptest! {
    #[test]
    fn text_without_slashes_is_unchanged(s in "[a-z0-9 {}:,\"\\\\\\[\\]\n]*") {
        prop_assert_eq!(strip_comments(s.as_bytes()), s.as_bytes());
    }

    #[test]
    fn reader_matches_buffer(s in "[a-z/*\"\\\\\n ]*") {
        prop_assert_eq!(via_reader(s.as_bytes()), strip_comments(s.as_bytes()));
    }

    #[test]
    fn block_comments_between_values_vanish(values in prop::collection::vec(0u32..1000, 0..8)) {
        let plain = values.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
        let commented = values
            .iter()
            .map(|v| format!("/* {v} */{v}"))
            .collect::<Vec<_>>()
            .join(",");
        prop_assert_eq!(strip_comments(commented.as_bytes()), plain.as_bytes());
    }
}
