//! Writes: `set`, `set_raw` and `remove`.

use serde::Serialize;

use crate::arena::{Arena, Cache, Link, NodeId, Pending};
use crate::error::{Error, Result};
use crate::kind::JsonType;
use crate::node::Json;

impl Json {
    /// Replace the node's value with the serialization of `value`.
    ///
    /// A placeholder from a missed lookup is inserted into its parent,
    /// creating any missing containers along the way.
    ///
    /// # Errors
    ///
    /// [`Error::Encode`] if `value` cannot be serialized. The node is left
    /// untouched in that case.
    ///
    /// ```
    /// use gson::Json;
    ///
    /// let doc = Json::parse("[]");
    /// doc.index(5).set(&123).unwrap();
    /// assert_eq!(doc.to_string(), "[123]");
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_vec(value).map_err(|e| Error::Encode {
            reason: e.to_string(),
        })?;
        self.with(|arena, id| arena.replace(id, raw));
        Ok(())
    }

    /// Replace the node's bytes verbatim. No validation is done.
    pub fn set_raw(&self, raw: impl Into<Vec<u8>>) {
        let raw = raw.into();
        self.with(|arena, id| arena.replace(id, raw));
    }

    /// Detach the node from its parent. Returns false when there was
    /// nothing to detach from.
    ///
    /// The handle stays usable as a standalone value.
    pub fn remove(&self) -> bool {
        self.with(|arena, id| arena.detach(id))
    }
}

fn pending_shape(pending: &Pending) -> JsonType {
    match pending {
        Pending::Key { .. } => JsonType::Object,
        Pending::Index { .. } => JsonType::List,
    }
}

impl Arena {
    fn replace(&mut self, id: NodeId, raw: Vec<u8>) {
        self.orphan_children(id);
        let slot = self.slot_mut(id);
        slot.raw = raw;
        slot.cache = Cache::Unset;
        slot.kind = None;
        slot.error = None;
        match std::mem::replace(&mut slot.link, Link::Detached) {
            Link::Pending(pending) => self.materialize(id, pending),
            Link::Child(parent) => self.slot_mut(id).link = Link::Child(parent),
            Link::Detached | Link::DeadEnd => {}
        }
        self.touch(id);
    }

    /// Insert a pending node into its owner.
    fn materialize(&mut self, id: NodeId, pending: Pending) {
        let owner = self.prepare_owner(pending.owner(), pending_shape(&pending));
        self.attach(id, owner, pending);
    }

    /// Make `owner` a container of `shape` and return the node to insert
    /// into. Whatever else the owner held is overwritten.
    ///
    /// A pending owner is materialized first, unless a write through another
    /// handle already created a container of the right shape at its place;
    /// that container is returned instead so sibling placeholders end up
    /// under one parent.
    fn prepare_owner(&mut self, owner: NodeId, shape: JsonType) -> NodeId {
        if let Link::Pending(pending) = &self.slot(owner).link {
            let pending = pending.clone();
            let grand = self.prepare_owner(pending.owner(), pending_shape(&pending));
            let existing = match (&pending, &self.slot(grand).cache) {
                (Pending::Key { key, .. }, Cache::Object(obj)) => obj.get(key),
                (Pending::Index { index, .. }, Cache::List(list)) => list.get(*index),
                _ => None,
            };
            if let Some(existing) = existing {
                if self.ensure_container(existing, shape).is_ok() {
                    return existing;
                }
            }
            self.slot_mut(owner).error = None;
            self.reset_container(owner, shape);
            self.attach(owner, grand, pending);
            return owner;
        }
        if self.ensure_container(owner, shape).is_err() {
            self.reset_container(owner, shape);
            self.slot_mut(owner).error = None;
        }
        owner
    }

    fn attach(&mut self, id: NodeId, owner: NodeId, pending: Pending) {
        let replaced = match (pending, &mut self.slot_mut(owner).cache) {
            (Pending::Key { key, .. }, Cache::Object(obj)) => obj.insert(key, id),
            (Pending::Index { index, .. }, Cache::List(list)) => list.place(index, id),
            _ => None,
        };
        if let Some(old) = replaced.filter(|&old| old != id) {
            self.slot_mut(old).link = Link::Detached;
        }
        self.slot_mut(id).link = Link::Child(owner);
        trace!(path = %self.path_of(id), "materialized placeholder");
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let Link::Child(parent) = self.slot(id).link else {
            return false;
        };
        let removed = match &mut self.slot_mut(parent).cache {
            Cache::Object(obj) => obj.remove(id).is_some(),
            Cache::List(list) => list.remove(id).is_some(),
            _ => false,
        };
        self.slot_mut(id).link = Link::Detached;
        if removed {
            self.touch(parent);
            trace!(parent = %self.path_of(parent), "removed node");
        }
        removed
    }
}
