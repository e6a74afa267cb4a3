//! A lazily parsed, cached and mutable JSON document tree.
//!
//! A [`Json`] handle points at one value inside a document. Nested structure
//! is only decoded when it is first navigated into, and the decoded children
//! are cached on their parent. Navigation never fails: a missing key, an
//! out-of-range index or a type mismatch yields a node that carries the
//! [`Error`] as data, so long chains always end in an inspectable node.
//!
//! Writes go through the same handles. Setting a node re-encodes only that
//! node and marks its ancestors dirty; the next [`Json::to_bytes`] rebuilds
//! the dirty levels from their children and reuses untouched raw slices.
//!
//! # Example
//!
//! ```
//! use gson::Json;
//!
//! let doc = Json::parse(r#"{"a": [{"b": "123"}]}"#);
//! assert_eq!(doc.get("a[0].b").int_value(), 123);
//!
//! // Missing paths are not errors until read.
//! let missing = doc.get("a[0].c");
//! assert!(missing.not_exists());
//!
//! // Writing to a missing path creates it.
//! missing.set(&true).unwrap();
//! assert_eq!(doc.to_string(), r#"{"a":[{"b":"123","c":true}]}"#);
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`kind`] | [`JsonType`] and the first-token type guesser |
//! | [`error`] | [`Error`] taxonomy and its not-found / malformed classes |
//! | [`smart_key`] | `a.b[0][1].c` key parsing and formatting |
//! | `arena` | node slots, parent links and the dirty protocol |
//! | `container` | object / list containers and their lazy decode |
//! | `node`, `navigate`, `mutate`, `path` | the [`Json`] handle API |

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

mod arena;
mod container;
mod mutate;
mod navigate;
mod node;
mod path;
mod serde_impl;

pub mod error;
pub mod kind;
pub mod smart_key;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
pub use kind::{guess_type, JsonType};
pub use node::Json;
pub use smart_key::{format_smart_key, parse_smart_key, Step};
