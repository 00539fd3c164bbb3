//! Object container: ordered keys plus a key→cell map.

use std::collections::HashMap;

use crate::codec;
use crate::commit::Slot;
use crate::tree::{Body, CellId, Kind, Tree};

/// Members of a realized object.
///
/// `keys` records first-insertion order and may hold the same key more than
/// once when the input text did; `entries` keeps only the last value per
/// key. Serialization walks `keys`, so a duplicated key is written once per
/// occurrence, each time with that single value.
#[derive(Debug, Default)]
pub(crate) struct ObjectBody {
    keys: Vec<String>,
    entries: HashMap<String, CellId>,
}

impl ObjectBody {
    pub(crate) fn get(&self, key: &str) -> Option<CellId> {
        self.entries.get(key).copied()
    }

    /// Number of keys, duplicates included.
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn keys(&self) -> &[String] {
        &self.keys
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = CellId> + '_ {
        self.entries.values().copied()
    }

    /// `(key, value)` in serialization order. A key left in the order list
    /// after its entry was removed has no value and is written as `null`.
    pub(crate) fn members(&self) -> Vec<(String, Option<CellId>)> {
        self.keys
            .iter()
            .map(|key| (key.clone(), self.entries.get(key).copied()))
            .collect()
    }

    /// Insert or overwrite `key`, keeping its original position. Returns the
    /// displaced cell.
    pub(crate) fn put(&mut self, key: String, child: CellId) -> Option<CellId> {
        if !self.entries.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.entries.insert(key, child)
    }

    /// Append a decoded member. Unlike [`put`](Self::put), the key is always
    /// recorded, so duplicates in the input are kept structurally.
    fn push_decoded(&mut self, key: String, child: CellId) -> Option<CellId> {
        self.keys.push(key.clone());
        self.entries.insert(key, child)
    }

    /// Remove `child` if it is a member. Only the first occurrence of its key
    /// leaves the order list.
    pub(crate) fn detach(&mut self, child: CellId) -> bool {
        let Some(key) = self
            .entries
            .iter()
            .find(|&(_, &id)| id == child)
            .map(|(key, _)| key.clone())
        else {
            return false;
        };
        self.entries.remove(&key);
        if let Some(pos) = self.keys.iter().position(|k| *k == key) {
            self.keys.remove(pos);
        }
        true
    }
}

impl Tree {
    pub(crate) fn decode_object(&mut self, owner: CellId, raw: &[u8]) -> Option<Body> {
        let entries = codec::decode_object(raw)?;
        let mut body = ObjectBody::default();
        for (key, value) in entries {
            let child = self.new_cell(value, Some(owner));
            if let Some(shadowed) = body.push_decoded(key, child) {
                self.cell_mut(shadowed).parent = None;
            }
        }
        Some(Body::Object(body))
    }

    /// Child of `id` at `key`, or a placeholder that commits into the object
    /// (creating it if needed) on first write.
    pub(crate) fn object_index(&mut self, id: CellId, key: &str) -> CellId {
        let container = self.container_for(id, Kind::Object);
        if let Body::Object(obj) = &self.container(container).body {
            if let Some(child) = obj.get(key) {
                return child;
            }
        }
        self.placeholder(container, Slot::Key(key.to_string()))
    }

    /// Keys of `id` in order; empty when it is not an object.
    pub(crate) fn object_keys(&mut self, id: CellId) -> Vec<String> {
        if !self.realize(id, Kind::Object) {
            return Vec::new();
        }
        match self.cell(id).shape.container().map(|c| &self.container(c).body) {
            Some(Body::Object(obj)) => obj.keys().to_vec(),
            _ => Vec::new(),
        }
    }

    /// First existing member among `keys`.
    pub(crate) fn object_any(&mut self, id: CellId, keys: &[&str]) -> Option<CellId> {
        if !self.realize(id, Kind::Object) {
            return None;
        }
        let container = self.cell(id).shape.container()?;
        let Body::Object(obj) = &self.container(container).body else {
            return None;
        };
        keys.iter().find_map(|key| obj.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_keeps_first_position() {
        let mut obj = ObjectBody::default();
        let mut tree = Tree::new();
        let a = tree.new_cell(b"1".to_vec(), None);
        let b = tree.new_cell(b"2".to_vec(), None);
        let c = tree.new_cell(b"3".to_vec(), None);
        assert_eq!(obj.put("a".to_string(), a), None);
        assert_eq!(obj.put("b".to_string(), b), None);
        assert_eq!(obj.put("a".to_string(), c), Some(a));
        assert_eq!(obj.keys(), ["a", "b"]);
        assert_eq!(obj.get("a"), Some(c));
    }

    #[test]
    fn test_detach() {
        let mut obj = ObjectBody::default();
        let mut tree = Tree::new();
        let a = tree.new_cell(b"1".to_vec(), None);
        let stray = tree.new_cell(b"2".to_vec(), None);
        obj.put("a".to_string(), a);
        assert!(!obj.detach(stray));
        assert!(obj.detach(a));
        assert!(!obj.detach(a));
        assert_eq!(obj.len(), 0);
    }

    #[test]
    fn test_decode_duplicate_keys() {
        let mut tree = Tree::new();
        let id = tree.new_cell(br#"{"a":1,"b":2,"a":3}"#.to_vec(), None);
        assert_eq!(tree.object_keys(id), ["a", "b", "a"]);
        let a = tree.object_index(id, "a");
        assert_eq!(tree.raw(a), b"3");
    }

    #[test]
    fn test_object_any() {
        let mut tree = Tree::new();
        let id = tree.new_cell(br#"{"err_code":1,"errcode":"2"}"#.to_vec(), None);
        let first = tree.object_any(id, &["missing", "errcode", "err_code"]).unwrap();
        assert_eq!(tree.raw(first), b"\"2\"");
        assert!(tree.object_any(id, &["nope"]).is_none());
    }
}
