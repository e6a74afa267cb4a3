//! Node storage.
//!
//! All nodes of a document live in one `Vec<Slot>` arena and refer to each
//! other by index. Ownership runs downward only: a slot's container holds
//! the ids of its children, and a child's [`Link::Child`] names its parent
//! purely for routing and dirty propagation. Removing a child clears that
//! link, so a stale id is never followed upward.
//!
//! Every [`Json`](crate::Json) handle counts toward its slot. Once a handle
//! drops and enough slots have piled up since the last pass, [`Arena::collect`]
//! keeps whatever is reachable from a live handle and recycles the rest, so
//! misses, dead ends and orphans do not outlive the handles that saw them.

use std::collections::HashMap;

use crate::container::{ListContainer, ObjectContainer};
use crate::error::Error;
use crate::kind::{guess_type, JsonType};

pub(crate) type NodeId = usize;

/// Where a placeholder goes once it is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Pending {
    Key { owner: NodeId, key: String },
    Index { owner: NodeId, index: usize },
}

impl Pending {
    pub(crate) fn owner(&self) -> NodeId {
        match self {
            Pending::Key { owner, .. } | Pending::Index { owner, .. } => *owner,
        }
    }
}

/// A slot's relation to the rest of the tree.
#[derive(Debug, Clone)]
pub(crate) enum Link {
    /// Document root, or a node removed from its parent.
    Detached,
    Child(NodeId),
    /// Not in the tree yet; inserted on first write.
    Pending(Pending),
    /// Result of a failed navigation. Navigating further returns itself.
    DeadEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn as_i64(self) -> i64 {
        match self {
            Number::Int(i) => i,
            Number::Float(f) => f as i64,
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Decoded view of a slot's raw bytes.
///
/// Scalar variants are a pure cache of `raw`. Container variants own the
/// children and, once the slot is dirty, are the source of truth that `raw`
/// is rebuilt from.
#[derive(Debug, Default)]
pub(crate) enum Cache {
    #[default]
    Unset,
    Str(String),
    Number(Number),
    Bool(bool),
    Object(ObjectContainer),
    List(ListContainer),
    /// A container decode that already failed.
    Invalid(Error),
}

impl Cache {
    pub(crate) fn is_unset(&self) -> bool {
        matches!(self, Cache::Unset)
    }

    pub(crate) fn children(&self) -> Vec<NodeId> {
        match self {
            Cache::Object(obj) => obj.ids().collect(),
            Cache::List(list) => list.ids().to_vec(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) raw: Vec<u8>,
    pub(crate) link: Link,
    pub(crate) kind: Option<JsonType>,
    pub(crate) cache: Cache,
    pub(crate) dirty: bool,
    pub(crate) error: Option<Error>,
    /// Live `Json` handles pointing here.
    pub(crate) handles: usize,
}

impl Slot {
    pub(crate) fn new(raw: Vec<u8>, link: Link) -> Self {
        Self {
            raw,
            link,
            kind: None,
            cache: Cache::Unset,
            dirty: false,
            error: None,
            handles: 0,
        }
    }
}

/// Slots allowed to pile up beyond the last surviving set before a drop
/// triggers a collection.
const COLLECT_SLACK: usize = 64;

#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<NodeId>,
    /// Open placeholders by target, so a repeated miss hands back the same
    /// node instead of a new one.
    misses: HashMap<Pending, NodeId>,
    /// Slots in use right after the last collection.
    survivors: usize,
}

impl Arena {
    /// A fresh arena holding a single detached root.
    pub(crate) fn with_root(raw: Vec<u8>) -> (Self, NodeId) {
        let mut arena = Self::default();
        let root = arena.alloc(Slot::new(raw, Link::Detached));
        (arena, root)
    }

    pub(crate) fn alloc(&mut self, slot: Slot) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id] = slot;
            return id;
        }
        self.slots.push(slot);
        self.slots.len() - 1
    }

    /// Slots currently in use.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Register a new handle on `id`.
    pub(crate) fn retain(&mut self, id: NodeId) {
        self.slots[id].handles += 1;
    }

    /// Drop a handle on `id`, collecting once garbage has built up.
    ///
    /// Must only be called between operations: ids held on the stack by an
    /// ongoing operation are not handles and would not survive a collection.
    pub(crate) fn release(&mut self, id: NodeId) {
        let slot = &mut self.slots[id];
        slot.handles = slot.handles.saturating_sub(1);
        if slot.handles == 0 && self.live() > self.survivors * 2 + COLLECT_SLACK {
            self.collect();
        }
    }

    /// Mark everything reachable from a live handle and free the rest.
    ///
    /// Reachability runs both ways: down through containers, and up through
    /// parent links and placeholder owners, since paths, dirty marks and
    /// materialization all walk upward.
    pub(crate) fn collect(&mut self) {
        let mut marked = vec![false; self.slots.len()];
        let mut stack: Vec<NodeId> = (0..self.slots.len())
            .filter(|&id| self.slots[id].handles > 0)
            .collect();
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut marked[id], true) {
                continue;
            }
            let slot = &self.slots[id];
            stack.extend(slot.cache.children());
            match &slot.link {
                Link::Child(parent) => stack.push(*parent),
                Link::Pending(pending) => stack.push(pending.owner()),
                Link::Detached | Link::DeadEnd => {}
            }
        }

        self.free.clear();
        for id in (0..self.slots.len()).rev() {
            if !marked[id] {
                self.slots[id] = Slot::new(Vec::new(), Link::Detached);
                self.free.push(id);
            }
        }
        self.misses.retain(|_, id| marked[*id]);
        self.survivors = self.live();
        trace!(live = self.survivors, freed = self.free.len(), "collected slots");
    }

    pub(crate) fn slot(&self, id: NodeId) -> &Slot {
        &self.slots[id]
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        &mut self.slots[id]
    }

    pub(crate) fn dead_end(&mut self, error: Error) -> NodeId {
        let mut slot = Slot::new(Vec::new(), Link::DeadEnd);
        slot.error = Some(error);
        self.alloc(slot)
    }

    /// A node that goes to `pending` once written.
    ///
    /// A placeholder still open for the same target and the same error is
    /// returned again.
    pub(crate) fn placeholder(&mut self, pending: Pending, error: Error) -> NodeId {
        if let Some(&id) = self.misses.get(&pending) {
            let slot = &self.slots[id];
            let open = matches!(&slot.link, Link::Pending(p) if *p == pending);
            if open && slot.error.as_ref() == Some(&error) {
                return id;
            }
        }
        let mut slot = Slot::new(Vec::new(), Link::Pending(pending.clone()));
        slot.error = Some(error);
        let id = self.alloc(slot);
        self.misses.insert(pending, id);
        id
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.slots[id].link {
            Link::Child(parent) => Some(parent),
            _ => None,
        }
    }

    /// Cached type, guessed from `raw` on first use.
    pub(crate) fn kind(&mut self, id: NodeId) -> JsonType {
        let slot = &mut self.slots[id];
        if let Some(kind) = slot.kind {
            return kind;
        }
        let kind = match slot.cache {
            Cache::Object(_) => JsonType::Object,
            Cache::List(_) => JsonType::List,
            _ => guess_type(&slot.raw),
        };
        slot.kind = Some(kind);
        kind
    }

    /// Mark `id` and every ancestor dirty.
    pub(crate) fn touch(&mut self, id: NodeId) {
        let mut cur = id;
        loop {
            self.slots[cur].dirty = true;
            match self.slots[cur].link {
                Link::Child(parent) => cur = parent,
                _ => break,
            }
        }
    }

    /// Bring `raw` up to date with the container, if the slot is dirty.
    ///
    /// When the container cannot be encoded, `raw` keeps its last good bytes
    /// and the failure is recorded on the node.
    pub(crate) fn flush(&mut self, id: NodeId) {
        if !self.slots[id].dirty {
            return;
        }
        match self.encode_container(id) {
            Ok(Some(raw)) => self.slots[id].raw = raw,
            Ok(None) => {}
            Err(err) => {
                debug!(path = %self.path_of(id), error = %err, "re-encode failed");
                self.note(id, err);
            }
        }
        self.slots[id].dirty = false;
    }

    /// Current serialized bytes of `id`.
    pub(crate) fn bytes(&mut self, id: NodeId) -> Vec<u8> {
        self.flush(id);
        self.slots[id].raw.clone()
    }

    /// Append the bytes of a child to `out`, writing `null` for a child with
    /// no bytes so the parent stays valid JSON.
    pub(crate) fn write_child(&mut self, out: &mut Vec<u8>, child: NodeId) {
        self.flush(child);
        let raw = &self.slots[child].raw;
        if raw.is_empty() {
            out.extend_from_slice(b"null");
        } else {
            out.extend_from_slice(raw);
        }
    }

    /// Cut every child of `id` loose from it.
    pub(crate) fn orphan_children(&mut self, id: NodeId) {
        for child in self.slots[id].cache.children() {
            if matches!(self.slots[child].link, Link::Child(p) if p == id) {
                self.slots[child].link = Link::Detached;
            }
        }
    }

    /// Record a read failure. `EmptyRaw` never overwrites an existing error,
    /// so a placeholder keeps reporting what was missing.
    pub(crate) fn note(&mut self, id: NodeId, error: Error) {
        let slot = &mut self.slots[id];
        if matches!(error, Error::EmptyRaw { .. }) && slot.error.is_some() {
            return;
        }
        slot.error = Some(error);
    }

    /// Forget an earlier failed read once a read of `id` succeeds.
    ///
    /// Only value errors are cleared. Placeholders and dead ends keep the
    /// navigation error they were created with.
    pub(crate) fn settle(&mut self, id: NodeId) {
        let slot = &mut self.slots[id];
        let attached = matches!(slot.link, Link::Child(_) | Link::Detached);
        let stale = matches!(
            slot.error,
            Some(Error::TypeMismatch { .. } | Error::DecodeError { .. })
        );
        if attached && stale {
            slot.error = None;
        }
    }
}
