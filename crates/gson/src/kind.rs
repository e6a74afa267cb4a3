//! Value type classification.
//!
//! [`guess_type`] looks at the first token of a raw buffer only. Nested
//! structure is never scanned, so classifying a large object costs the same
//! as classifying `{}`.

use std::fmt;

/// The JSON type of a node, as guessed from its raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Object,
    List,
    String,
    Number,
    Bool,
    Null,
    Unknown,
}

impl JsonType {
    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Object => "object",
            JsonType::List => "list",
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Bool => "bool",
            JsonType::Null => "null",
            JsonType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Index of the first non-whitespace byte.
pub(crate) fn skip_ws(p: &[u8]) -> usize {
    p.iter().position(|&b| !is_ws(b)).unwrap_or(p.len())
}

/// Classify `p` by its first token.
///
/// Compound openers are trusted without looking further. Scalars must be
/// complete tokens: a truncated literal such as `tru` or `"abc` is
/// [`JsonType::Unknown`], as is an empty buffer.
///
/// # Example
///
/// ```
/// use gson::{guess_type, JsonType};
///
/// assert_eq!(guess_type(br#" {"a": 1}"#), JsonType::Object);
/// assert_eq!(guess_type(b"-1.5e3"), JsonType::Number);
/// assert_eq!(guess_type(b"nul"), JsonType::Unknown);
/// assert_eq!(guess_type(b""), JsonType::Unknown);
/// ```
pub fn guess_type(p: &[u8]) -> JsonType {
    let p = &p[skip_ws(p)..];
    match p.first() {
        None => JsonType::Unknown,
        Some(b'{') => JsonType::Object,
        Some(b'[') => JsonType::List,
        Some(b'"') => match string_token_len(p) {
            Some(_) => JsonType::String,
            None => JsonType::Unknown,
        },
        Some(b'-' | b'0'..=b'9') => match number_token_len(p) {
            Some(_) => JsonType::Number,
            None => JsonType::Unknown,
        },
        Some(b't') if literal(p, b"true") => JsonType::Bool,
        Some(b'f') if literal(p, b"false") => JsonType::Bool,
        Some(b'n') if literal(p, b"null") => JsonType::Null,
        Some(_) => JsonType::Unknown,
    }
}

/// True when `p` starts with `word` and the word is not glued to more
/// identifier characters (`nullx` is not `null`).
fn literal(p: &[u8], word: &[u8]) -> bool {
    p.starts_with(word) && !p.get(word.len()).is_some_and(|b| b.is_ascii_alphanumeric())
}

/// Length of the quoted string token at the start of `p`, escapes included.
fn string_token_len(p: &[u8]) -> Option<usize> {
    let mut i = 1;
    while i < p.len() {
        match p[i] {
            b'"' => return Some(i + 1),
            b'\\' => {
                match p.get(i + 1)? {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => i += 2,
                    b'u' => {
                        let hex = p.get(i + 2..i + 6)?;
                        if !hex.iter().all(u8::is_ascii_hexdigit) {
                            return None;
                        }
                        i += 6;
                    }
                    _ => return None,
                }
            }
            0x00..=0x1f => return None,
            _ => i += 1,
        }
    }
    None
}

/// Length of the number token at the start of `p`, following the JSON
/// number grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
fn number_token_len(p: &[u8]) -> Option<usize> {
    let digits = |from: usize| p[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut i = usize::from(p.first() == Some(&b'-'));
    match p.get(i)? {
        b'0' => i += 1,
        b'1'..=b'9' => i += digits(i),
        _ => return None,
    }
    if p.get(i) == Some(&b'.') {
        let n = digits(i + 1);
        if n == 0 {
            return None;
        }
        i += 1 + n;
    }
    if matches!(p.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(p.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let n = digits(i);
        if n == 0 {
            return None;
        }
        i += n;
    }
    Some(i)
}
