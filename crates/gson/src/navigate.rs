//! Chained navigation: `key`, `index`, `any` and smart-key `get`.
//!
//! Navigation never fails. A miss returns a placeholder that remembers
//! where it would go and carries the not-found error; writing to it
//! creates the missing structure. A node that cannot be navigated at all
//! (wrong type, undecodable bytes, bad smart key) yields a dead end, and
//! every step after a dead end returns that same dead end.

use crate::arena::{Arena, Cache, Link, NodeId, Pending};
use crate::error::Error;
use crate::kind::JsonType;
use crate::node::Json;
use crate::smart_key::{parse_smart_key, Step};

impl Json {
    /// The member `name` of an object.
    ///
    /// ```
    /// use gson::Json;
    ///
    /// let doc = Json::parse(r#"{"a": {"b": 1}}"#);
    /// assert_eq!(doc.key("a").key("b").int_value(), 1);
    /// assert!(doc.key("x").key("y").not_exists());
    /// ```
    pub fn key(&self, name: &str) -> Json {
        let child = self.with(|arena, id| arena.lookup_key(id, name));
        self.handle(child)
    }

    /// The element at `index` of a list.
    pub fn index(&self, index: usize) -> Json {
        let child = self.with(|arena, id| arena.lookup_index(id, index));
        self.handle(child)
    }

    /// The member under the first of `keys` that exists.
    ///
    /// ```
    /// use gson::Json;
    ///
    /// let doc = Json::parse(r#"{"err_code": "123"}"#);
    /// assert_eq!(doc.any(&["errcode", "err_code"]).int_value(), 123);
    /// ```
    pub fn any<S: AsRef<str>>(&self, keys: &[S]) -> Json {
        let child = self.with(|arena, id| arena.lookup_any(id, keys));
        self.handle(child)
    }

    /// Follow a smart key such as `a.b[0][1].c`.
    ///
    /// The whole key is parsed before any step is taken; a malformed key
    /// yields a dead end carrying [`Error::InvalidSmartKey`].
    pub fn get(&self, smart_key: &str) -> Json {
        let child = self.with(|arena, id| match parse_smart_key(smart_key) {
            Ok(steps) => steps.iter().fold(id, |cur, step| match step {
                Step::Key(name) => arena.lookup_key(cur, name),
                Step::Index(index) => arena.lookup_index(cur, *index),
            }),
            Err(err) => arena.dead_end(err),
        });
        self.handle(child)
    }
}

/// How a node answers navigation, decided before its contents are looked at.
enum Reach {
    /// Returns itself.
    DeadEnd,
    /// Not in the tree yet; misses inherit this error.
    Pending(Error),
    /// No bytes and no container: an implicit, not-yet-typed container.
    Empty,
    Decodable,
}

impl Arena {
    fn reach(&self, id: NodeId) -> Reach {
        let slot = self.slot(id);
        match &slot.link {
            Link::DeadEnd => Reach::DeadEnd,
            Link::Pending(_) => Reach::Pending(slot.error.clone().unwrap_or(Error::EmptyRaw {
                path: String::new(),
            })),
            Link::Detached | Link::Child(_) => {
                let held = matches!(slot.cache, Cache::Object(_) | Cache::List(_));
                if slot.raw.is_empty() && !held {
                    Reach::Empty
                } else {
                    Reach::Decodable
                }
            }
        }
    }

    pub(crate) fn lookup_key(&mut self, id: NodeId, key: &str) -> NodeId {
        let pending = Pending::Key {
            owner: id,
            key: key.to_owned(),
        };
        match self.reach(id) {
            Reach::DeadEnd => return id,
            Reach::Pending(err) => return self.placeholder(pending, err),
            Reach::Empty => {
                let err = Error::KeyNotFound {
                    path: self.path_of(id),
                    key: key.to_owned(),
                    keys: Vec::new(),
                };
                return self.placeholder(pending, err);
            }
            Reach::Decodable => {}
        }
        if let Err(err) = self.ensure_container(id, JsonType::Object) {
            return self.dead_end(err);
        }
        let (hit, keys) = match &self.slot(id).cache {
            Cache::Object(obj) => (obj.get(key), obj.keys()),
            _ => (None, Vec::new()),
        };
        match hit {
            Some(child) => child,
            None => {
                let err = Error::KeyNotFound {
                    path: self.path_of(id),
                    key: key.to_owned(),
                    keys,
                };
                self.placeholder(pending, err)
            }
        }
    }

    pub(crate) fn lookup_index(&mut self, id: NodeId, index: usize) -> NodeId {
        let pending = Pending::Index { owner: id, index };
        match self.reach(id) {
            Reach::DeadEnd => return id,
            Reach::Pending(err) => return self.placeholder(pending, err),
            Reach::Empty => {
                let err = Error::IndexOutOfRange {
                    path: self.path_of(id),
                    index,
                    len: 0,
                };
                return self.placeholder(pending, err);
            }
            Reach::Decodable => {}
        }
        if let Err(err) = self.ensure_container(id, JsonType::List) {
            return self.dead_end(err);
        }
        let (hit, len) = match &self.slot(id).cache {
            Cache::List(list) => (list.get(index), list.len()),
            _ => (None, 0),
        };
        match hit {
            Some(child) => child,
            None => {
                let err = Error::IndexOutOfRange {
                    path: self.path_of(id),
                    index,
                    len,
                };
                self.placeholder(pending, err)
            }
        }
    }

    /// First hit among `keys`. A miss is armed to create the first key.
    pub(crate) fn lookup_any<S: AsRef<str>>(&mut self, id: NodeId, keys: &[S]) -> NodeId {
        if matches!(self.reach(id), Reach::DeadEnd) {
            return id;
        }
        let Some(first) = keys.first() else {
            let err = Error::NoKeysSpecified {
                path: self.path_of(id),
            };
            return self.dead_end(err);
        };
        let names: Vec<String> = keys.iter().map(|k| k.as_ref().to_owned()).collect();
        let pending = Pending::Key {
            owner: id,
            key: first.as_ref().to_owned(),
        };
        let miss = |arena: &Arena| Error::NoAnyKeyFound {
            path: arena.path_of(id),
            keys: names.clone(),
        };
        match self.reach(id) {
            Reach::DeadEnd => id,
            Reach::Pending(err) => self.placeholder(pending, err),
            Reach::Empty => {
                let err = miss(self);
                self.placeholder(pending, err)
            }
            Reach::Decodable => {
                if let Err(err) = self.ensure_container(id, JsonType::Object) {
                    return self.dead_end(err);
                }
                let hit = match &self.slot(id).cache {
                    Cache::Object(obj) => names.iter().find_map(|k| obj.get(k)),
                    _ => None,
                };
                match hit {
                    Some(child) => child,
                    None => {
                        let err = miss(self);
                        self.placeholder(pending, err)
                    }
                }
            }
        }
    }
}
