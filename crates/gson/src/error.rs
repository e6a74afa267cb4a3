//! Errors carried by nodes.
//!
//! Navigation never returns `Err`; instead the resulting node holds one of
//! these in its error slot. Every variant records the route of the node
//! where it arose, in smart-key form (empty for the document root).

use thiserror::Error;

use crate::kind::JsonType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The node has no backing bytes and no cached value.
    #[error("gson: empty raw json message at '{}'", route(.path))]
    EmptyRaw { path: String },

    #[error("gson: type error at '{}', expected: {expected}, real: {actual}", route(.path))]
    TypeMismatch {
        path: String,
        expected: JsonType,
        actual: JsonType,
    },

    #[error("gson: object key not found: '{key}' in '{}', {}", route(.path), accepted_keys(.keys))]
    KeyNotFound {
        path: String,
        key: String,
        keys: Vec<String>,
    },

    #[error("gson: index out of range: {}[{index}], {}", route(.path), accepted_range(.len))]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("gson: path '{}' expected type: {expected}, error: {reason}", route(.path))]
    DecodeError {
        path: String,
        expected: JsonType,
        reason: String,
    },

    /// `segment` is the zero-based position of the offending `.`-separated
    /// part within the smart key.
    #[error("gson: smart key part {segment} '{part}' is invalid: {reason}")]
    InvalidSmartKey {
        segment: usize,
        part: String,
        reason: String,
    },

    #[error("gson: no keys specified at '{}'", route(.path))]
    NoKeysSpecified { path: String },

    #[error("gson: none of the keys ['{}'] found in '{}'", joined(.keys), route(.path))]
    NoAnyKeyFound { path: String, keys: Vec<String> },

    /// A value passed to `set` could not be serialized.
    #[error("gson: encode failed: {reason}")]
    Encode { reason: String },
}

impl Error {
    /// True for the "absent" class: empty source, key miss, index miss and
    /// multi-key miss. These are the errors a write through the same node
    /// can resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::EmptyRaw { .. }
                | Error::KeyNotFound { .. }
                | Error::IndexOutOfRange { .. }
                | Error::NoAnyKeyFound { .. }
        )
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }

    /// True for the "broken" class: bytes or a smart key that do not parse.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::DecodeError { .. } | Error::InvalidSmartKey { .. })
    }

    /// Route of the node the error belongs to, when the variant has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::EmptyRaw { path }
            | Error::TypeMismatch { path, .. }
            | Error::KeyNotFound { path, .. }
            | Error::IndexOutOfRange { path, .. }
            | Error::DecodeError { path, .. }
            | Error::NoKeysSpecified { path }
            | Error::NoAnyKeyFound { path, .. } => Some(path),
            Error::InvalidSmartKey { .. } | Error::Encode { .. } => None,
        }
    }

    /// Map a serde_json failure while reading a node as `expected`.
    ///
    /// Well-formed input of the wrong shape is a type mismatch; anything
    /// that does not parse is a decode error.
    pub(crate) fn from_serde(
        err: &serde_json::Error,
        path: String,
        expected: JsonType,
        actual: JsonType,
    ) -> Self {
        match err.classify() {
            serde_json::error::Category::Data => Error::TypeMismatch {
                path,
                expected,
                actual,
            },
            _ => Error::DecodeError {
                path,
                expected,
                reason: err.to_string(),
            },
        }
    }
}

fn route(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

fn accepted_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        "empty object".to_owned()
    } else {
        format!("accept keys: ['{}']", joined(keys))
    }
}

fn joined(keys: &[String]) -> String {
    keys.join("', '")
}

fn accepted_range(len: &usize) -> String {
    if *len == 0 {
        "empty list".to_owned()
    } else {
        format!("accept range: [0~{len})")
    }
}
