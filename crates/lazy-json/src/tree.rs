//! Arena of value cells and containers.
//!
//! Every node of one document lives in a single [`Tree`] and is addressed by
//! a stable [`CellId`] or [`ContainerId`]. Parent links are ids, never owning
//! pointers, so reference cycles cannot form. An id stays valid for as long
//! as the tree lives, including ids of cells that have been removed or
//! orphaned by a kind switch.
//!
//! The one exception is an unwritten placeholder. Each cell counts the
//! [`Json`](crate::Json) handles pointing at it, and cells and containers
//! count the pending chains that mention them. Once a placeholder has
//! neither, nothing can ever commit it, so its slot (and those of the
//! detached containers only it needed) goes on a free list for reuse.
//!
//! A cell either holds raw JSON text, or has a realized container
//! ([`Shape`]) whose serialization is cached in `raw`. The cache is cleared
//! bottom-up whenever something below it changes.

use tracing::trace;

use crate::array::ArrayBody;
use crate::codec;
use crate::commit::{PendingWrite, Slot};
use crate::object::ObjectBody;
use crate::str_json::StrJsonBody;

// ── Ids ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CellId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ContainerId(u32);

impl CellId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl ContainerId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Either kind of arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeId {
    Cell(CellId),
    Container(ContainerId),
}

// ── Shapes ────────────────────────────────────────────────────────────────

/// Container kind a cell can be realized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Object,
    Array,
    StrJson,
}

/// The active representation of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Shape {
    /// Raw text (possibly empty, meaning absent) is authoritative.
    #[default]
    Unrealized,
    Object(ContainerId),
    Array(ContainerId),
    StrJson(ContainerId),
}

impl Shape {
    pub(crate) fn of(kind: Kind, id: ContainerId) -> Shape {
        match kind {
            Kind::Object => Shape::Object(id),
            Kind::Array => Shape::Array(id),
            Kind::StrJson => Shape::StrJson(id),
        }
    }

    pub(crate) fn container(self) -> Option<ContainerId> {
        match self {
            Shape::Unrealized => None,
            Shape::Object(id) | Shape::Array(id) | Shape::StrJson(id) => Some(id),
        }
    }

    pub(crate) fn kind(self) -> Option<Kind> {
        match self {
            Shape::Unrealized => None,
            Shape::Object(_) => Some(Kind::Object),
            Shape::Array(_) => Some(Kind::Array),
            Shape::StrJson(_) => Some(Kind::StrJson),
        }
    }
}

// ── Nodes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub(crate) struct Cell {
    /// Raw JSON text. A cache when `shape` is realized; empty means absent
    /// (or not yet serialized).
    pub raw: Vec<u8>,
    pub shape: Shape,
    /// The cell whose container holds this one.
    pub parent: Option<CellId>,
    /// Writes to replay when this placeholder is first set.
    pub pending: Vec<PendingWrite>,
    /// Bumped on every content reset and every committed kind switch.
    pub generation: u64,
    /// Live `Json` handles.
    pub handles: u32,
    /// Pending chains, other than its own, that mention this cell.
    pub pins: u32,
}

#[derive(Debug)]
pub(crate) enum Body {
    Object(ObjectBody),
    Array(ArrayBody),
    StrJson(StrJsonBody),
}

impl Body {
    pub(crate) fn empty(kind: Kind) -> Body {
        match kind {
            Kind::Object => Body::Object(ObjectBody::default()),
            Kind::Array => Body::Array(ArrayBody::default()),
            Kind::StrJson => Body::StrJson(StrJsonBody::default()),
        }
    }

    pub(crate) fn kind(&self) -> Kind {
        match self {
            Body::Object(_) => Kind::Object,
            Body::Array(_) => Kind::Array,
            Body::StrJson(_) => Kind::StrJson,
        }
    }

    /// Current member cells.
    pub(crate) fn children(&self) -> Vec<CellId> {
        match self {
            Body::Object(obj) => obj.children().collect(),
            Body::Array(arr) => arr.values().to_vec(),
            Body::StrJson(s) => s.value.into_iter().collect(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Container {
    pub body: Body,
    /// The cell this container is (or will be, once committed) mounted on.
    /// `None` after it has been unmounted.
    pub owner: Option<CellId>,
    /// Chain inherited by placeholders handed out from this container.
    /// Empty once mounted.
    pub pending: Vec<PendingWrite>,
    pub pins: u32,
}

// ── Tree ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub(crate) struct Tree {
    cells: Vec<Cell>,
    containers: Vec<Container>,
    free_cells: Vec<CellId>,
    free_containers: Vec<ContainerId>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn new_cell(&mut self, raw: Vec<u8>, parent: Option<CellId>) -> CellId {
        let cell = Cell {
            raw,
            parent,
            ..Cell::default()
        };
        if let Some(id) = self.free_cells.pop() {
            self.cells[id.index()] = cell;
            return id;
        }
        let id = CellId(self.cells.len() as u32);
        self.cells.push(cell);
        id
    }

    pub(crate) fn new_container(
        &mut self,
        body: Body,
        owner: Option<CellId>,
        pending: Vec<PendingWrite>,
    ) -> ContainerId {
        let container = Container {
            body,
            owner,
            pending,
            pins: 0,
        };
        if let Some(id) = self.free_containers.pop() {
            self.containers[id.index()] = container;
            return id;
        }
        let id = ContainerId(self.containers.len() as u32);
        self.containers.push(container);
        id
    }

    /// Id the next [`new_container`](Self::new_container) call returns.
    pub(crate) fn next_container_id(&self) -> ContainerId {
        match self.free_containers.last() {
            Some(&id) => id,
            None => ContainerId(self.containers.len() as u32),
        }
    }

    pub(crate) fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.index()]
    }

    pub(crate) fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.index()]
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> &mut Container {
        &mut self.containers[id.index()]
    }

    // ── Raw text ──────────────────────────────────────────────────────────

    /// Raw text of a cell, serializing (and caching) a realized container
    /// when the cache is empty. Empty means the cell is absent.
    pub(crate) fn raw(&mut self, id: CellId) -> &[u8] {
        self.ensure_raw(id);
        &self.cell(id).raw
    }

    fn ensure_raw(&mut self, id: CellId) {
        let cell = self.cell(id);
        if !cell.raw.is_empty() {
            return;
        }
        let Some(container) = cell.shape.container() else {
            return;
        };
        let raw = self.serialize_container(container);
        self.cell_mut(id).raw = raw;
    }

    fn serialize_container(&mut self, id: ContainerId) -> Vec<u8> {
        let mut out = Vec::new();
        match &self.container(id).body {
            Body::Object(obj) => {
                let members = obj.members();
                out.push(b'{');
                for (i, (key, child)) in members.into_iter().enumerate() {
                    if i > 0 {
                        out.push(b',');
                    }
                    out.extend_from_slice(&codec::encode_str(&key));
                    out.push(b':');
                    self.write_member(&mut out, child);
                }
                out.push(b'}');
            }
            Body::Array(arr) => {
                let values = arr.values().to_vec();
                out.push(b'[');
                for (i, child) in values.into_iter().enumerate() {
                    if i > 0 {
                        out.push(b',');
                    }
                    self.write_member(&mut out, Some(child));
                }
                out.push(b']');
            }
            Body::StrJson(s) => {
                let value = s.value;
                let mut inner = Vec::new();
                self.write_member(&mut inner, value);
                out = codec::encode_str(&String::from_utf8_lossy(&inner));
            }
        }
        out
    }

    fn write_member(&mut self, out: &mut Vec<u8>, child: Option<CellId>) {
        let raw = match child {
            Some(child) => self.raw(child),
            None => &[],
        };
        if raw.is_empty() {
            out.extend_from_slice(b"null");
        } else {
            out.extend_from_slice(raw);
        }
    }

    /// Clear the raw cache of `start` and of every ancestor above it.
    ///
    /// Stops at the first unrealized cell: its raw text is authoritative and
    /// does not reflect anything below it.
    pub(crate) fn invalidate_from(&mut self, start: Option<CellId>) {
        let mut next = start;
        while let Some(id) = next {
            let cell = self.cell_mut(id);
            if cell.shape == Shape::Unrealized {
                break;
            }
            cell.raw.clear();
            next = cell.parent;
        }
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    pub(crate) fn is_object(&mut self, id: CellId) -> bool {
        matches!(self.cell(id).shape, Shape::Object(_)) || self.raw(id).first() == Some(&b'{')
    }

    pub(crate) fn is_array(&mut self, id: CellId) -> bool {
        matches!(self.cell(id).shape, Shape::Array(_)) || self.raw(id).first() == Some(&b'[')
    }

    pub(crate) fn is_str(&mut self, id: CellId) -> bool {
        self.raw(id).first() == Some(&b'"')
    }

    /// Try to realize `id` as `kind` by decoding its raw text.
    ///
    /// Idempotent. Fails (returning `false`) when the text does not decode
    /// as that kind; the cell is then left as it was.
    pub(crate) fn realize(&mut self, id: CellId, kind: Kind) -> bool {
        if self.cell(id).shape.kind() == Some(kind) {
            return true;
        }
        let raw = self.raw(id).to_vec();
        let body = match kind {
            Kind::Object => self.decode_object(id, &raw),
            Kind::Array => self.decode_array(id, &raw),
            Kind::StrJson => self.decode_str_json(id, &raw),
        };
        let Some(body) = body else {
            trace!(?kind, len = raw.len(), "cell does not decode as container");
            return false;
        };
        let container = self.new_container(body, Some(id), Vec::new());
        self.set_shape(id, Shape::of(kind, container));
        // Decoding does not change content, so the cached text stays valid.
        self.cell_mut(id).raw = raw;
        true
    }

    /// Make `shape` the active representation of `id`, unmounting the
    /// previous container.
    pub(crate) fn set_shape(&mut self, id: CellId, shape: Shape) {
        let old = self.cell(id).shape;
        if old == shape {
            return;
        }
        if let Some(old) = old.container() {
            self.unmount(old);
        }
        self.cell_mut(id).shape = shape;
        if let Some(container) = shape.container() {
            self.container_mut(container).owner = Some(id);
        }
    }

    /// Sever a container from its owner. Its members become independent
    /// sub-documents: still valid, no longer reachable from the owner.
    fn unmount(&mut self, id: ContainerId) {
        let container = self.container_mut(id);
        container.owner = None;
        for child in container.body.children() {
            self.cell_mut(child).parent = None;
        }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Replace the content of `id` with `raw`.
    ///
    /// No-op when `raw` equals the current text. Otherwise the realized
    /// representation is dropped, pending placeholder writes are committed,
    /// and ancestor caches are cleared.
    pub(crate) fn reset(&mut self, id: CellId, raw: Vec<u8>) {
        if self.raw(id) == raw.as_slice() {
            return;
        }
        self.set_shape(id, Shape::Unrealized);
        let cell = self.cell_mut(id);
        cell.raw = raw;
        cell.generation += 1;

        self.commit(id);
        let parent = self.cell(id).parent;
        self.invalidate_from(parent);
    }

    /// Detach `id` from its parent's container.
    ///
    /// No-op for roots and for cells that are not currently members.
    pub(crate) fn remove(&mut self, id: CellId) {
        let Some(parent) = self.cell(id).parent else {
            return;
        };
        let shape = self.cell(parent).shape;
        let detached = match shape {
            Shape::Unrealized => false,
            Shape::Object(c) | Shape::Array(c) | Shape::StrJson(c) => {
                match &mut self.container_mut(c).body {
                    Body::Object(obj) => obj.detach(id),
                    Body::Array(arr) => arr.detach(id),
                    Body::StrJson(s) => s.detach(id),
                }
            }
        };
        if detached {
            self.cell_mut(id).parent = None;
            self.invalidate_from(Some(parent));
        }
    }

    /// Number of members of a realized object/array; `None` otherwise.
    pub(crate) fn member_count(&self, id: CellId) -> Option<usize> {
        let container = self.cell(id).shape.container()?;
        match &self.container(container).body {
            Body::Object(obj) => Some(obj.len()),
            Body::Array(arr) => Some(arr.len()),
            Body::StrJson(_) => None,
        }
    }

    /// Hand out a placeholder for `slot` of `container`. The placeholder
    /// inherits the container's chain plus one insert record.
    pub(crate) fn placeholder(&mut self, container: ContainerId, slot: Slot) -> CellId {
        let owner = self.container(container).owner;
        let mut pending = self.container(container).pending.clone();
        let child = self.new_cell(Vec::new(), owner);
        pending.push(PendingWrite::Insert { container, child, slot });
        self.pin_chain(&pending, NodeId::Cell(child));
        self.cell_mut(child).pending = pending;
        child
    }

    /// Container of `kind` for `id`: the realized one, or a new detached one
    /// that mounts itself on `id` when a write below it commits.
    pub(crate) fn container_for(&mut self, id: CellId, kind: Kind) -> ContainerId {
        if self.realize(id, kind) {
            if let Some(container) = self.cell(id).shape.container() {
                return container;
            }
        }
        let cell = self.cell(id);
        let container = self.next_container_id();
        let mut pending = cell.pending.clone();
        pending.push(PendingWrite::Mount {
            cell: id,
            container,
            generation: cell.generation,
        });
        self.pin_chain(&pending, NodeId::Container(container));
        self.new_container(Body::empty(kind), Some(id), pending)
    }

    // ── Reclamation ───────────────────────────────────────────────────────

    pub(crate) fn retain_handle(&mut self, id: CellId) {
        self.cell_mut(id).handles += 1;
    }

    pub(crate) fn release_handle(&mut self, id: CellId) {
        let cell = self.cell_mut(id);
        cell.handles = cell.handles.saturating_sub(1);
        if let Some(chain) = self.reclaim(NodeId::Cell(id)) {
            self.unpin_chain(chain, NodeId::Cell(id));
        }
    }

    fn pins_mut(&mut self, node: NodeId) -> &mut u32 {
        match node {
            NodeId::Cell(id) => &mut self.cell_mut(id).pins,
            NodeId::Container(id) => &mut self.container_mut(id).pins,
        }
    }

    /// Pin every node `chain` mentions, except its `holder`.
    pub(crate) fn pin_chain(&mut self, chain: &[PendingWrite], holder: NodeId) {
        for node in chain.iter().flat_map(PendingWrite::nodes) {
            if node != holder {
                *self.pins_mut(node) += 1;
            }
        }
    }

    /// Undo [`pin_chain`](Self::pin_chain) for a chain its holder dropped,
    /// reclaiming whatever that leaves unreferenced.
    pub(crate) fn unpin_chain(&mut self, chain: Vec<PendingWrite>, holder: NodeId) {
        let mut work = vec![(chain, holder)];
        while let Some((chain, holder)) = work.pop() {
            for node in chain.iter().flat_map(PendingWrite::nodes) {
                if node == holder {
                    continue;
                }
                let pins = self.pins_mut(node);
                *pins = pins.saturating_sub(1);
                if let Some(freed) = self.reclaim(node) {
                    work.push((freed, node));
                }
            }
        }
    }

    /// Free `node` if it is an unwritten placeholder cell, or a container
    /// that was never mounted, and nothing refers to it any more. Returns
    /// the chain it held.
    fn reclaim(&mut self, node: NodeId) -> Option<Vec<PendingWrite>> {
        match node {
            NodeId::Cell(id) => {
                let cell = self.cell(id);
                if cell.handles > 0 || cell.pins > 0 || cell.pending.is_empty() {
                    return None;
                }
                let freed = std::mem::take(self.cell_mut(id));
                self.free_cells.push(id);
                Some(freed.pending)
            }
            NodeId::Container(id) => {
                let container = self.container(id);
                if container.pins > 0 || container.pending.is_empty() {
                    return None;
                }
                let kind = container.body.kind();
                let chain = std::mem::take(&mut self.container_mut(id).pending);
                let container = self.container_mut(id);
                container.body = Body::empty(kind);
                container.owner = None;
                self.free_containers.push(id);
                Some(chain)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn arena_size(&self) -> (usize, usize) {
        (self.cells.len(), self.containers.len())
    }
}
