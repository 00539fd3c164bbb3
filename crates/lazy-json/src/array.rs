//! Array container.

use crate::codec;
use crate::commit::Slot;
use crate::tree::{Body, CellId, ContainerId, Kind, Tree};

#[derive(Debug, Default)]
pub(crate) struct ArrayBody {
    values: Vec<CellId>,
}

impl ArrayBody {
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn values(&self) -> &[CellId] {
        &self.values
    }

    /// Element at `index`; negative indexes count from the end, modulo the
    /// current length.
    pub(crate) fn get(&self, index: isize) -> Option<CellId> {
        self.resolve(index).and_then(|i| self.values.get(i).copied())
    }

    /// Position a write at `index` lands on, or `None` for an append
    /// (negative index into an empty array).
    pub(crate) fn resolve(&self, index: isize) -> Option<usize> {
        if index >= 0 {
            return Some(index as usize);
        }
        if self.values.is_empty() {
            return None;
        }
        Some(index.rem_euclid(self.values.len() as isize) as usize)
    }

    pub(crate) fn detach(&mut self, child: CellId) -> bool {
        match self.values.iter().position(|&id| id == child) {
            Some(pos) => {
                self.values.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl Tree {
    pub(crate) fn decode_array(&mut self, owner: CellId, raw: &[u8]) -> Option<Body> {
        let elems = codec::decode_array(raw)?;
        let values = elems
            .into_iter()
            .map(|raw| self.new_cell(raw, Some(owner)))
            .collect();
        Some(Body::Array(ArrayBody { values }))
    }

    /// Element of `id` at `index`, or a placeholder that commits into the
    /// array (creating it if needed) on first write.
    pub(crate) fn array_index(&mut self, id: CellId, index: isize) -> CellId {
        let container = self.container_for(id, Kind::Array);
        if let Body::Array(arr) = &self.container(container).body {
            if let Some(child) = arr.get(index) {
                return child;
            }
        }
        self.placeholder(container, Slot::Index(index))
    }

    /// Store `child` at `index` of an array container owned by `owner`,
    /// filling any gap with absent cells. Returns the displaced cell.
    pub(crate) fn array_place(
        &mut self,
        container: ContainerId,
        owner: CellId,
        index: isize,
        child: CellId,
    ) -> Option<CellId> {
        let (pos, len) = match &self.container(container).body {
            Body::Array(arr) => (arr.resolve(index), arr.len()),
            _ => return None,
        };
        let holes: Vec<CellId> = match pos {
            Some(pos) if pos >= len => (len..=pos)
                .map(|_| self.new_cell(Vec::new(), Some(owner)))
                .collect(),
            _ => Vec::new(),
        };
        let Body::Array(arr) = &mut self.container_mut(container).body else {
            return None;
        };
        arr.values.extend(holes);
        match pos {
            Some(pos) => Some(std::mem::replace(&mut arr.values[pos], child)),
            None => {
                arr.values.push(child);
                None
            }
        }
    }
}
