//! Comment stripping for JSON text.
//!
//! Accepts JSON with `// line` and `/* block */` comments and yields plain
//! JSON. Comment markers inside string literals are left alone.
//!
//! # Example
//!
//! ```
//! use jcon::strip_comments;
//!
//! let text = b"{\n  // retries\n  \"n\": 3 /* max */,\n  \"url\": \"http://x\"\n}";
//! let json = strip_comments(text);
//! assert_eq!(json, b"{\n  \n  \"n\": 3 ,\n  \"url\": \"http://x\"\n}");
//! ```

mod reader;
mod scanner;

pub use reader::CommentStripper;

/// Remove comments from a complete buffer.
pub fn strip_comments(input: &[u8]) -> Vec<u8> {
    let mut scanner = scanner::Scanner::default();
    let mut out = Vec::with_capacity(input.len());
    for &b in input {
        scanner.feed(b, &mut out);
    }
    scanner.finish(&mut out);
    out
}
