//! Strings that hold embedded JSON text.
//!
//! A string cell whose content parses as JSON can be realized as a wrapper
//! around a nested root cell. The nested root's parent is the string cell
//! itself, so writes below it clear the string cell's cache; the next read
//! re-serializes the nested document and quotes it again.

use crate::codec;
use crate::commit::Slot;
use crate::tree::{Body, CellId, Kind, Tree};

#[derive(Debug, Default)]
pub(crate) struct StrJsonBody {
    /// Nested root; `None` once it has been removed (serialized as `"null"`).
    pub value: Option<CellId>,
}

impl StrJsonBody {
    pub(crate) fn detach(&mut self, child: CellId) -> bool {
        if self.value == Some(child) {
            self.value = None;
            return true;
        }
        false
    }

    /// Replace the nested root. Returns the displaced one.
    pub(crate) fn put(&mut self, child: CellId) -> Option<CellId> {
        self.value.replace(child)
    }
}

impl Tree {
    pub(crate) fn decode_str_json(&mut self, owner: CellId, raw: &[u8]) -> Option<Body> {
        let content = codec::unquote(raw)?;
        if !codec::validate(content.as_bytes()) {
            return None;
        }
        let nested = self.new_cell(codec::trim(content.as_bytes()).to_vec(), Some(owner));
        Some(Body::StrJson(StrJsonBody { value: Some(nested) }))
    }

    /// String content of `id`; empty when it is not a string.
    pub(crate) fn str_value(&mut self, id: CellId) -> String {
        codec::unquote(self.raw(id)).unwrap_or_default()
    }

    /// Whether the string content of `id` is itself valid JSON.
    pub(crate) fn str_is_json(&mut self, id: CellId) -> bool {
        codec::validate(self.str_value(id).as_bytes())
    }

    /// Nested root of `id`, or a placeholder that turns `id` into a string
    /// holding the written JSON on first write.
    pub(crate) fn str_json(&mut self, id: CellId) -> CellId {
        let container = self.container_for(id, Kind::StrJson);
        if let Body::StrJson(s) = &self.container(container).body {
            if let Some(value) = s.value {
                return value;
            }
        }
        self.placeholder(container, Slot::Elem)
    }

    /// Step through embedded JSON: a string cell holding valid JSON yields
    /// its nested root, anything else is returned unchanged.
    pub(crate) fn unwrap_embedded(&mut self, id: CellId) -> CellId {
        if self.is_str(id) && self.str_is_json(id) {
            return self.str_json(id);
        }
        id
    }
}
