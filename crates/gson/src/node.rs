//! The [`Json`] handle: construction and reads.

use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;
use std::io::{self, Read};
use std::rc::Rc;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::arena::{Arena, Cache, Link, NodeId, Number};
use crate::error::{Error, Result};
use crate::kind::{skip_ws, JsonType};

/// A handle to one value in a lazily decoded JSON document.
///
/// Handles are cheap to clone; clones refer to the same node. All nodes of
/// one document share an arena, so a handle stays usable after the node is
/// removed from its parent (it becomes a standalone value).
///
/// A document is owned by a single thread: `Json` is neither `Send` nor
/// `Sync`. Independent documents are unrelated and can live on different
/// threads; to move one across, send its bytes.
pub struct Json {
    pub(crate) doc: Rc<RefCell<Arena>>,
    pub(crate) id: NodeId,
}

impl Json {
    /// An empty, untyped node. Writing through it builds a document.
    ///
    /// ```
    /// use gson::Json;
    ///
    /// let doc = Json::new();
    /// doc.get("user.tags[0]").set("admin").unwrap();
    /// assert_eq!(doc.to_string(), r#"{"user":{"tags":["admin"]}}"#);
    /// ```
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Root node over an owned copy of `raw`. Nothing is parsed yet.
    pub fn from_bytes(raw: impl Into<Vec<u8>>) -> Self {
        let (mut arena, id) = Arena::with_root(raw.into());
        arena.retain(id);
        Self {
            doc: Rc::new(RefCell::new(arena)),
            id,
        }
    }

    pub fn parse(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        Ok(Self::from_bytes(raw))
    }

    /// Root node holding the serialization of `value`.
    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let raw = serde_json::to_vec(value).map_err(|e| Error::Encode {
            reason: e.to_string(),
        })?;
        Ok(Self::from_bytes(raw))
    }

    pub(crate) fn handle(&self, id: NodeId) -> Json {
        self.doc.borrow_mut().retain(id);
        Json {
            doc: Rc::clone(&self.doc),
            id,
        }
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut Arena, NodeId) -> R) -> R {
        f(&mut self.doc.borrow_mut(), self.id)
    }

    /// The node's type, guessed from the first token of its bytes.
    pub fn kind(&self) -> JsonType {
        self.with(|arena, id| arena.kind(id))
    }

    pub fn is_null(&self) -> bool {
        self.kind() == JsonType::Null
    }

    /// The string value; for non-string scalars, their JSON text.
    ///
    /// An empty node records `EmptyRaw` and yields `""`.
    pub fn str_value(&self) -> String {
        self.with(|arena, id| arena.read_str(id))
    }

    /// The numeric value as an integer. Floats are truncated; numeric
    /// strings such as `"123"` are accepted.
    pub fn int_value(&self) -> i64 {
        self.with(|arena, id| arena.read_number(id).map_or(0, Number::as_i64))
    }

    pub fn float_value(&self) -> f64 {
        self.with(|arena, id| arena.read_number(id).map_or(0.0, Number::as_f64))
    }

    /// True when the value is an integer literal (no fraction, no exponent)
    /// that fits in an `i64`, either bare or inside a string.
    pub fn is_int(&self) -> bool {
        self.with(|arena, id| matches!(arena.read_number(id), Some(Number::Int(_))))
    }

    pub fn is_float(&self) -> bool {
        self.with(|arena, id| matches!(arena.read_number(id), Some(Number::Float(_))))
    }

    /// The boolean value.
    ///
    /// Numbers are true when non-zero. Strings are parsed leniently
    /// (`1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts);
    /// anything else reads as `false` without recording an error.
    pub fn bool_value(&self) -> bool {
        self.with(|arena, id| arena.read_bool(id))
    }

    pub fn try_str(&self) -> Result<String> {
        let s = self.str_value();
        self.err().map_or(Ok(s), Err)
    }

    pub fn try_int(&self) -> Result<i64> {
        let v = self.int_value();
        self.err().map_or(Ok(v), Err)
    }

    pub fn try_float(&self) -> Result<f64> {
        let v = self.float_value();
        self.err().map_or(Ok(v), Err)
    }

    pub fn try_bool(&self) -> Result<bool> {
        let v = self.bool_value();
        self.err().map_or(Ok(v), Err)
    }

    /// The error recorded on this node by navigation or a failed read.
    pub fn err(&self) -> Option<Error> {
        self.with(|arena, id| arena.slot(id).error.clone())
    }

    /// True when the recorded error says the value is absent rather than
    /// broken.
    pub fn not_exists(&self) -> bool {
        self.err().is_some_and(|e| e.is_not_found())
    }

    /// Object keys in document order; empty for anything but an object.
    pub fn keys(&self) -> Vec<String> {
        self.with(|arena, id| match arena.ensure_container(id, JsonType::Object) {
            Ok(()) => match &arena.slot(id).cache {
                Cache::Object(obj) => obj.keys(),
                _ => Vec::new(),
            },
            Err(_) => Vec::new(),
        })
    }

    /// Number of list elements; 0 for anything but a list.
    pub fn len(&self) -> usize {
        self.with(|arena, id| match arena.ensure_container(id, JsonType::List) {
            Ok(()) => match &arena.slot(id).cache {
                Cache::List(list) => list.len(),
                _ => 0,
            },
            Err(_) => 0,
        })
    }

    /// True for an empty list or an object without keys.
    pub fn is_empty(&self) -> bool {
        match self.kind() {
            JsonType::List => self.len() == 0,
            JsonType::Object => self.keys().is_empty(),
            _ => false,
        }
    }

    /// Current serialized bytes. Clean nodes return their raw bytes as
    /// parsed; dirty containers are rebuilt from their children first.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.with(|arena, id| arena.bytes(id))
    }

    pub fn raw(&self) -> Vec<u8> {
        self.to_bytes()
    }

    /// Deserialize the node into any serde type.
    ///
    /// # Errors
    ///
    /// The node's recorded error if it has one, `EmptyRaw` for a node
    /// without bytes, or the mapped serde failure.
    pub fn value<T: DeserializeOwned>(&self) -> Result<T> {
        self.with(|arena, id| {
            if let Some(err) = arena.navigation_error(id) {
                return Err(err);
            }
            let raw = arena.bytes(id);
            if raw.is_empty() {
                return Err(Error::EmptyRaw {
                    path: arena.path_of(id),
                });
            }
            match serde_json::from_slice(&raw) {
                Ok(value) => {
                    arena.settle(id);
                    Ok(value)
                }
                Err(e) => {
                    let actual = arena.kind(id);
                    Err(Error::from_serde(&e, arena.path_of(id), JsonType::Unknown, actual))
                }
            }
        })
    }

    /// Route from the root, e.g. `a.b[0].c`. Empty for the root itself and
    /// for nodes that are not (or no longer) attached to a tree.
    pub fn path(&self) -> String {
        self.with(|arena, id| arena.path_of(id))
    }

    pub fn parent(&self) -> Option<Json> {
        let parent = self.with(|arena, id| arena.parent(id))?;
        Some(self.handle(parent))
    }

    /// Whether both handles refer to the same node.
    pub fn same(&self, other: &Json) -> bool {
        Rc::ptr_eq(&self.doc, &other.doc) && self.id == other.id
    }
}

impl Clone for Json {
    fn clone(&self) -> Self {
        self.handle(self.id)
    }
}

impl Drop for Json {
    fn drop(&mut self) {
        // The last handle takes the whole arena with it.
        if Rc::strong_count(&self.doc) == 1 {
            return;
        }
        if let Ok(mut arena) = self.doc.try_borrow_mut() {
            arena.release(self.id);
        }
    }
}

impl Default for Json {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Json {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for Json {
    fn from(text: String) -> Self {
        Self::from_bytes(text.into_bytes())
    }
}

impl From<Vec<u8>> for Json {
    fn from(raw: Vec<u8>) -> Self {
        Self::from_bytes(raw)
    }
}

impl From<&[u8]> for Json {
    fn from(raw: &[u8]) -> Self {
        Self::from_bytes(raw)
    }
}

impl FromStr for Json {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}

impl fmt::Debug for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(mut arena) = self.doc.try_borrow_mut() else {
            return f.debug_struct("Json").field("id", &self.id).finish_non_exhaustive();
        };
        let raw = arena.bytes(self.id);
        f.debug_struct("Json")
            .field("path", &arena.path_of(self.id))
            .field("kind", &arena.kind(self.id))
            .field("raw", &String::from_utf8_lossy(&raw))
            .field("error", &arena.slot(self.id).error)
            .finish()
    }
}

fn is_quoted(raw: &[u8]) -> bool {
    raw.get(skip_ws(raw)) == Some(&b'"')
}

/// `strconv.ParseBool`-style lenient boolean text.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl Arena {
    /// The error of a placeholder or dead end; these stay until a write.
    fn navigation_error(&self, id: NodeId) -> Option<Error> {
        let slot = self.slot(id);
        match slot.link {
            Link::Pending(_) | Link::DeadEnd => slot.error.clone(),
            Link::Child(_) | Link::Detached => None,
        }
    }

    fn note_empty(&mut self, id: NodeId) {
        let path = self.path_of(id);
        self.note(id, Error::EmptyRaw { path });
    }

    fn note_serde(&mut self, id: NodeId, err: &serde_json::Error, expected: JsonType) {
        let actual = self.kind(id);
        let err = Error::from_serde(err, self.path_of(id), expected, actual);
        self.note(id, err);
    }

    pub(crate) fn read_str(&mut self, id: NodeId) -> String {
        if let Cache::Str(s) = &self.slot(id).cache {
            let s = s.clone();
            self.settle(id);
            return s;
        }
        self.flush(id);
        let raw = &self.slot(id).raw;
        if raw.is_empty() {
            self.note_empty(id);
            return String::new();
        }
        if !is_quoted(raw) {
            let text = String::from_utf8_lossy(raw).into_owned();
            self.settle(id);
            return text;
        }
        match serde_json::from_slice::<String>(raw) {
            Ok(s) => {
                let slot = self.slot_mut(id);
                if slot.cache.is_unset() {
                    slot.cache = Cache::Str(s.clone());
                }
                self.settle(id);
                s
            }
            Err(e) => {
                self.note_serde(id, &e, JsonType::String);
                String::new()
            }
        }
    }

    pub(crate) fn read_number(&mut self, id: NodeId) -> Option<Number> {
        if let Cache::Number(n) = self.slot(id).cache {
            self.settle(id);
            return Some(n);
        }
        self.flush(id);
        let raw = &self.slot(id).raw;
        if raw.is_empty() {
            self.note_empty(id);
            return None;
        }
        let parsed = if is_quoted(raw) {
            serde_json::from_slice::<String>(raw)
                .and_then(|text| serde_json::from_str::<serde_json::Number>(&text))
        } else {
            serde_json::from_slice::<serde_json::Number>(raw)
        };
        match parsed {
            Ok(n) => {
                let num = match n.as_i64() {
                    Some(i) => Number::Int(i),
                    None => Number::Float(n.as_f64().unwrap_or_default()),
                };
                let slot = self.slot_mut(id);
                if slot.cache.is_unset() {
                    slot.cache = Cache::Number(num);
                }
                self.settle(id);
                Some(num)
            }
            Err(e) => {
                self.note_serde(id, &e, JsonType::Number);
                None
            }
        }
    }

    pub(crate) fn read_bool(&mut self, id: NodeId) -> bool {
        if let Cache::Bool(b) = self.slot(id).cache {
            self.settle(id);
            return b;
        }
        self.flush(id);
        if self.slot(id).raw.is_empty() {
            self.note_empty(id);
            return false;
        }
        match self.kind(id) {
            JsonType::Bool => match serde_json::from_slice::<bool>(&self.slot(id).raw) {
                Ok(b) => {
                    let slot = self.slot_mut(id);
                    if slot.cache.is_unset() {
                        slot.cache = Cache::Bool(b);
                    }
                    self.settle(id);
                    b
                }
                Err(e) => {
                    self.note_serde(id, &e, JsonType::Bool);
                    false
                }
            },
            JsonType::Number => match self.read_number(id) {
                Some(Number::Int(i)) => i != 0,
                Some(Number::Float(f)) => f != 0.0,
                None => false,
            },
            JsonType::String => parse_bool(&self.read_str(id)).unwrap_or(false),
            actual => {
                let path = self.path_of(id);
                self.note(
                    id,
                    Error::TypeMismatch {
                        path,
                        expected: JsonType::Bool,
                        actual,
                    },
                );
                false
            }
        }
    }
}
