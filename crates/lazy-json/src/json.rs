//! The public document handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lazy_json_path::SmartPath;
use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::debug;

use crate::codec;
use crate::coerce;
use crate::error::Error;
use crate::tree::{CellId, Kind, Tree};

/// A handle to one value in a lazily-parsed JSON document.
///
/// Handles are cheap to clone and all handles derived from one root share
/// the same document. Indexing never fails: a missing member yields a
/// placeholder that reads as absent and, once written, creates every
/// container on the way to it.
///
/// A document and its handles are confined to one thread: they share the
/// tree through `Rc<RefCell<_>>`, so `Json` is neither `Send` nor `Sync`.
/// Dropping the last handle to a placeholder that was never written frees
/// it.
///
/// ```
/// use lazy_json::Json;
///
/// let doc = Json::new();
/// doc.get("a[0].b").set(&123).unwrap();
/// assert_eq!(doc.raw_string(), r#"{"a":[{"b":123}]}"#);
///
/// let doc = Json::from_text(r#"{"user":{"name":"ann","age":"31"}}"#);
/// assert_eq!(doc.get("user.name").str(), "ann");
/// assert_eq!(doc.get("user.age").int(), 31);
/// assert!(!doc.get("user.email").exists());
/// ```
pub struct Json {
    tree: Rc<RefCell<Tree>>,
    id: CellId,
}

impl Json {
    /// An empty (absent) document.
    pub fn new() -> Self {
        Self::from_bytes(b"")
    }

    /// A document over `data`. Surrounding whitespace is trimmed; the text
    /// is not parsed until it is read through.
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Self {
        let mut tree = Tree::new();
        let id = tree.new_cell(codec::trim(data.as_ref()).to_vec(), None);
        tree.retain_handle(id);
        Json {
            tree: Rc::new(RefCell::new(tree)),
            id,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text)
    }

    fn handle(&self, id: CellId) -> Json {
        self.tree.borrow_mut().retain_handle(id);
        Json {
            tree: Rc::clone(&self.tree),
            id,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Tree, CellId) -> R) -> R {
        f(&mut self.tree.borrow_mut(), self.id)
    }

    // ── Raw text ──────────────────────────────────────────────────────────

    /// Raw JSON text; empty when absent.
    pub fn raw(&self) -> Vec<u8> {
        self.with(|tree, id| tree.raw(id).to_vec())
    }

    /// Raw JSON text as a string, strings included with their quotes.
    pub fn raw_string(&self) -> String {
        String::from_utf8_lossy(&self.raw()).into_owned()
    }

    pub fn exists(&self) -> bool {
        self.with(|tree, id| !tree.raw(id).is_empty())
    }

    /// Byte length of a string's content, member count of an object or
    /// array, and 0 for anything else.
    pub fn len(&self) -> usize {
        self.with(|tree, id| {
            if tree.is_str(id) {
                return tree.str_value(id).len();
            }
            for kind in [Kind::Object, Kind::Array] {
                if tree.realize(id, kind) {
                    return tree.member_count(id).unwrap_or(0);
                }
            }
            0
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Navigation ────────────────────────────────────────────────────────

    /// Member at `key`. Writing a placeholder turns this value into an
    /// object if it is not one already.
    pub fn object_index(&self, key: &str) -> Json {
        let child = self.with(|tree, id| tree.object_index(id, key));
        self.handle(child)
    }

    /// Element at `index`; negative indexes count from the end.
    pub fn array_index(&self, index: isize) -> Json {
        let child = self.with(|tree, id| tree.array_index(id, index));
        self.handle(child)
    }

    /// Nested document held in a string value.
    pub fn str_json(&self) -> Json {
        let child = self.with(|tree, id| tree.str_json(id));
        self.handle(child)
    }

    /// Value at a path expression such as `data.items[0].name`.
    ///
    /// A malformed path yields a detached absent value; use
    /// [`get_path`](Self::get_path) with a parsed [`SmartPath`] to see the
    /// error.
    pub fn get(&self, path: &str) -> Json {
        match SmartPath::parse(path) {
            Ok(path) => self.get_path(&path),
            Err(err) => {
                debug!(path, %err, "rejected path expression");
                Json::new()
            }
        }
    }

    pub fn get_path(&self, path: &SmartPath) -> Json {
        let target = self.with(|tree, id| tree.navigate(id, path));
        self.handle(target)
    }

    /// Object keys in order; empty when this is not an object.
    pub fn keys(&self) -> Vec<String> {
        self.with(|tree, id| tree.object_keys(id))
    }

    /// First member present among `keys`, or a detached absent value.
    pub fn any(&self, keys: &[&str]) -> Json {
        match self.with(|tree, id| tree.object_any(id, keys)) {
            Some(child) => self.handle(child),
            None => Json::new(),
        }
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    pub fn as_object(&self) -> bool {
        self.with(|tree, id| tree.realize(id, Kind::Object))
    }

    pub fn as_array(&self) -> bool {
        self.with(|tree, id| tree.realize(id, Kind::Array))
    }

    pub fn as_str_json(&self) -> bool {
        self.with(|tree, id| tree.realize(id, Kind::StrJson))
    }

    pub fn is_object(&self) -> bool {
        self.with(|tree, id| tree.is_object(id))
    }

    pub fn is_array(&self) -> bool {
        self.with(|tree, id| tree.is_array(id))
    }

    pub fn is_str(&self) -> bool {
        self.with(|tree, id| tree.is_str(id))
    }

    /// Whether this is a string whose content is valid JSON.
    pub fn str_is_json(&self) -> bool {
        self.with(|tree, id| tree.is_str(id) && tree.str_is_json(id))
    }

    pub fn is_null(&self) -> bool {
        coerce::is_null(&self.raw())
    }

    pub fn is_bool(&self) -> bool {
        coerce::is_bool(&self.raw())
    }

    pub fn is_number(&self) -> bool {
        coerce::is_number(&self.raw())
    }

    pub fn is_int(&self) -> bool {
        coerce::is_int(&self.raw())
    }

    pub fn is_uint(&self) -> bool {
        coerce::is_uint(&self.raw())
    }

    pub fn is_float(&self) -> bool {
        coerce::is_float(&self.raw())
    }

    // ── Scalars ───────────────────────────────────────────────────────────

    /// String content; empty when this is not a string.
    pub fn str(&self) -> String {
        self.with(|tree, id| tree.str_value(id))
    }

    pub fn try_bool(&self) -> (bool, bool) {
        let len = self.len();
        coerce::try_bool(&self.raw(), len)
    }

    pub fn bool(&self) -> bool {
        self.try_bool().0
    }

    pub fn try_int(&self) -> (i64, bool) {
        coerce::try_int(&self.raw())
    }

    pub fn int(&self) -> i64 {
        self.try_int().0
    }

    pub fn try_uint(&self) -> (u64, bool) {
        coerce::try_uint(&self.raw())
    }

    pub fn uint(&self) -> u64 {
        self.try_uint().0
    }

    pub fn try_float(&self) -> (f64, bool) {
        coerce::try_float(&self.raw())
    }

    pub fn float(&self) -> f64 {
        self.try_float().0
    }

    /// Deserialize the value. An absent value reads as `null`.
    pub fn value<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let raw = self.raw();
        let raw: &[u8] = if raw.is_empty() { b"null" } else { &raw };
        serde_json::from_slice(raw).map_err(Error::Deserialize)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Replace this value with `value` serialized as JSON.
    ///
    /// On a placeholder, this also creates the containers leading to it. If
    /// those were changed underneath in the meantime the write stays local
    /// to this handle and the document is left untouched.
    pub fn set<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), Error> {
        let raw = serde_json::to_vec(value).map_err(Error::Serialize)?;
        self.with(|tree, id| tree.reset(id, raw));
        Ok(())
    }

    /// Like [`set`](Self::set) with JSON text, which must be valid.
    pub fn set_raw(&self, raw: impl AsRef<[u8]>) -> Result<(), Error> {
        let raw = codec::trim(raw.as_ref());
        if !codec::validate(raw) {
            return Err(Error::InvalidJson);
        }
        self.with(|tree, id| tree.reset(id, raw.to_vec()));
        Ok(())
    }

    /// Detach this value from its parent. No-op on a root or on a value that
    /// is no longer a member.
    pub fn remove(&self) {
        self.with(|tree, id| tree.remove(id));
    }
}

impl Clone for Json {
    fn clone(&self) -> Self {
        self.handle(self.id)
    }
}

impl Drop for Json {
    fn drop(&mut self) {
        // Skipped only if dropped while the tree is borrowed; the slot then
        // simply stays allocated.
        if let Ok(mut tree) = self.tree.try_borrow_mut() {
            tree.release_handle(self.id);
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
        Json::from_text(text)
    }
}

impl From<&[u8]> for Json {
    fn from(data: &[u8]) -> Self {
        Json::from_bytes(data)
    }
}

impl From<Vec<u8>> for Json {
    fn from(data: Vec<u8>) -> Self {
        Json::from_bytes(data)
    }
}

/// String content for strings, raw text for everything else.
impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_str() {
            f.write_str(&self.str())
        } else {
            f.write_str(&self.raw_string())
        }
    }
}

impl fmt::Debug for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Json").field(&self.raw_string()).finish()
    }
}

impl Serialize for Json {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = self.raw_string();
        if raw.is_empty() {
            return serializer.serialize_unit();
        }
        RawValue::from_string(raw)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Json {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(Json::from_text(raw.get()))
    }
}
