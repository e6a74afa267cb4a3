//! Object and list containers and their lazy decode.
//!
//! A container is built the first time a node is navigated into. Each child
//! is carved from the parent's raw bytes as an owned slice and keeps it
//! until written, so untouched subtrees serialize back byte for byte.

use indexmap::IndexMap;
use serde_json::value::RawValue;

use crate::arena::{Arena, Cache, Link, NodeId, Slot};
use crate::error::Error;
use crate::kind::{guess_type, JsonType};

/// Ordered key → child mapping. Key order is parse order, then insertion
/// order, and is what serialization emits.
#[derive(Debug, Default)]
pub(crate) struct ObjectContainer {
    entries: IndexMap<String, NodeId>,
}

impl ObjectContainer {
    pub(crate) fn get(&self, key: &str) -> Option<NodeId> {
        self.entries.get(key).copied()
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.values().copied()
    }

    pub(crate) fn entries(&self) -> Vec<(String, NodeId)> {
        self.entries.iter().map(|(k, &id)| (k.clone(), id)).collect()
    }

    /// Map `key` to `id`. An existing key keeps its position; the node it
    /// pointed at is returned.
    pub(crate) fn insert(&mut self, key: String, id: NodeId) -> Option<NodeId> {
        self.entries.insert(key, id)
    }

    /// Drop the entry holding `id`, closing the gap in key order.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<String> {
        let pos = self.entries.values().position(|&c| c == id)?;
        self.entries.shift_remove_index(pos).map(|(key, _)| key)
    }

    pub(crate) fn key_of(&self, id: NodeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, &c)| c == id)
            .map(|(k, _)| k.as_str())
    }
}

/// Positional child sequence with no gaps.
#[derive(Debug, Default)]
pub(crate) struct ListContainer {
    items: Vec<NodeId>,
}

impl ListContainer {
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    pub(crate) fn ids(&self) -> &[NodeId] {
        &self.items
    }

    pub(crate) fn push(&mut self, id: NodeId) {
        self.items.push(id);
    }

    /// Put `id` at `index`, replacing the current occupant, or append when
    /// `index` is at or past the end.
    pub(crate) fn place(&mut self, index: usize, id: NodeId) -> Option<NodeId> {
        match self.items.get_mut(index) {
            Some(slot) => Some(std::mem::replace(slot, id)),
            None => {
                self.items.push(id);
                None
            }
        }
    }

    /// Remove `id`, shifting later elements down by one.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<usize> {
        let pos = self.position(id)?;
        self.items.remove(pos);
        Some(pos)
    }

    pub(crate) fn position(&self, id: NodeId) -> Option<usize> {
        self.items.iter().position(|&c| c == id)
    }
}

enum Decoded {
    Object(IndexMap<String, Box<RawValue>>),
    List(Vec<Box<RawValue>>),
}

fn decode(p: &[u8], shape: JsonType) -> Result<Decoded, serde_json::Error> {
    if shape == JsonType::List {
        serde_json::from_slice(p).map(Decoded::List)
    } else {
        serde_json::from_slice(p).map(Decoded::Object)
    }
}

impl Arena {
    /// Make sure `id` holds a decoded container of `shape` (object or list).
    ///
    /// A node typed as a string whose contents are an object or list (the
    /// object-as-text case) decodes its contents and stays a string; it is
    /// re-quoted on serialization.
    ///
    /// # Errors
    ///
    /// - `EmptyRaw` when the node has no bytes and no container yet
    /// - `TypeMismatch` when the node is of another type
    /// - `DecodeError` when the bytes are not a valid container; this
    ///   failure is cached and returned again without re-decoding
    pub(crate) fn ensure_container(&mut self, id: NodeId, shape: JsonType) -> Result<(), Error> {
        let held = match self.slot(id).cache {
            Cache::Object(_) => Some(JsonType::Object),
            Cache::List(_) => Some(JsonType::List),
            _ => None,
        };
        if let Some(held) = held {
            if held == shape {
                return Ok(());
            }
            return Err(Error::TypeMismatch {
                path: self.path_of(id),
                expected: shape,
                actual: self.kind(id),
            });
        }
        if self.slot(id).raw.is_empty() {
            return Err(Error::EmptyRaw {
                path: self.path_of(id),
            });
        }

        let kind = self.kind(id);
        if kind != shape && kind != JsonType::String {
            return Err(Error::TypeMismatch {
                path: self.path_of(id),
                expected: shape,
                actual: kind,
            });
        }
        if let Cache::Invalid(err) = &self.slot(id).cache {
            return Err(err.clone());
        }

        let decoded = if kind == shape {
            decode(&self.slot(id).raw, shape)
        } else {
            let text = match &self.slot(id).cache {
                Cache::Str(s) => Ok(s.clone()),
                _ => serde_json::from_slice::<String>(&self.slot(id).raw),
            };
            match text {
                Ok(text) if guess_type(text.as_bytes()) == shape => decode(text.as_bytes(), shape),
                Ok(_) => {
                    return Err(Error::TypeMismatch {
                        path: self.path_of(id),
                        expected: shape,
                        actual: kind,
                    });
                }
                Err(e) => Err(e),
            }
        };

        let decoded = match decoded {
            Ok(decoded) => decoded,
            Err(e) => {
                let err = Error::from_serde(&e, self.path_of(id), shape, kind);
                debug!(path = %self.path_of(id), error = %err, "container decode failed");
                self.slot_mut(id).cache = Cache::Invalid(err.clone());
                return Err(err);
            }
        };

        let cache = match decoded {
            Decoded::Object(map) => {
                let mut obj = ObjectContainer::default();
                for (key, raw) in map {
                    let child = self.carve(id, raw);
                    obj.insert(key, child);
                }
                trace!(path = %self.path_of(id), keys = obj.keys().len(), "decoded object");
                Cache::Object(obj)
            }
            Decoded::List(items) => {
                let mut list = ListContainer::default();
                for raw in items {
                    let child = self.carve(id, raw);
                    list.push(child);
                }
                trace!(path = %self.path_of(id), len = list.len(), "decoded list");
                Cache::List(list)
            }
        };
        self.slot_mut(id).cache = cache;
        Ok(())
    }

    fn carve(&mut self, parent: NodeId, raw: Box<RawValue>) -> NodeId {
        self.alloc(Slot::new(raw.get().as_bytes().to_vec(), Link::Child(parent)))
    }

    /// Replace whatever `id` holds with an empty container of `shape`.
    pub(crate) fn reset_container(&mut self, id: NodeId, shape: JsonType) {
        self.orphan_children(id);
        let slot = self.slot_mut(id);
        slot.raw.clear();
        slot.kind = Some(shape);
        slot.cache = if shape == JsonType::List {
            Cache::List(ListContainer::default())
        } else {
            Cache::Object(ObjectContainer::default())
        };
        slot.dirty = true;
    }

    /// Rebuild the bytes of a container node from its children. `None` when
    /// the node holds no container.
    ///
    /// # Errors
    ///
    /// [`Error::Encode`] when an object held as text has a child whose raw
    /// bytes are not UTF-8, so the text cannot be quoted back into a string.
    pub(crate) fn encode_container(&mut self, id: NodeId) -> Result<Option<Vec<u8>>, Error> {
        let mut out = Vec::new();
        match &self.slot(id).cache {
            Cache::Object(obj) => {
                let entries = obj.entries();
                out.push(b'{');
                for (i, (key, child)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        out.push(b',');
                    }
                    serde_json::to_writer(&mut out, &key).map_err(encode_error)?;
                    out.push(b':');
                    self.write_child(&mut out, child);
                }
                out.push(b'}');
            }
            Cache::List(list) => {
                let items = list.ids().to_vec();
                out.push(b'[');
                for (i, child) in items.into_iter().enumerate() {
                    if i > 0 {
                        out.push(b',');
                    }
                    self.write_child(&mut out, child);
                }
                out.push(b']');
            }
            _ => return Ok(None),
        }

        if self.kind(id) == JsonType::String {
            let text = std::str::from_utf8(&out).map_err(|e| Error::Encode {
                reason: format!("object text at '{}' is not UTF-8: {e}", self.path_of(id)),
            })?;
            return serde_json::to_vec(text).map(Some).map_err(encode_error);
        }
        Ok(Some(out))
    }
}

fn encode_error(err: serde_json::Error) -> Error {
    Error::Encode {
        reason: err.to_string(),
    }
}
