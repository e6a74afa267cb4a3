//! Route of a node from its root, in smart-key form.

use crate::arena::{Arena, Cache, NodeId};
use crate::smart_key::{format_smart_key, Step};

impl Arena {
    /// Steps from the root down to `id`.
    ///
    /// Each level asks the parent's container which entry holds this exact
    /// node, so siblings with equal values are told apart. `None` when a
    /// parent no longer lists the node.
    pub(crate) fn steps_of(&self, id: NodeId) -> Option<Vec<Step>> {
        let mut steps = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            let step = match &self.slot(parent).cache {
                Cache::Object(obj) => obj.key_of(cur).map(|k| Step::Key(k.to_owned())),
                Cache::List(list) => list.position(cur).map(Step::Index),
                _ => None,
            }?;
            steps.push(step);
            cur = parent;
        }
        steps.reverse();
        Some(steps)
    }

    /// `a.b[0].c`-style route of `id`; empty for roots, removed nodes,
    /// placeholders and dead ends.
    pub(crate) fn path_of(&self, id: NodeId) -> String {
        self.steps_of(id)
            .map(|steps| format_smart_key(&steps))
            .unwrap_or_default()
    }
}
