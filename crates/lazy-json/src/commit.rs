//! Deferred writes through placeholders.
//!
//! Indexing a missing member hands out a placeholder cell carrying a chain
//! of [`PendingWrite`] records: the containers that must be mounted and the
//! slots that must be filled, from the outermost existing cell down to the
//! placeholder. Setting the placeholder commits the chain.
//!
//! A commit is all-or-nothing. The whole chain is validated against the
//! current tree first; if any record no longer applies (its cell has been
//! reset since, or its container was unmounted) the chain is stale and
//! nothing is written. Valid chains merge into what already exists: a
//! container whose cell was realized in the meantime is redirected to the
//! live container, and an intermediate placeholder whose slot got filled is
//! redirected to the cell occupying it. The final write always wins its slot.

use std::collections::HashMap;

use tracing::debug;

use crate::tree::{Body, CellId, ContainerId, NodeId, Shape, Tree};

#[derive(Debug, Clone)]
pub(crate) enum PendingWrite {
    /// Mount `container` on `cell`, as long as `cell` has not been reset
    /// since the record was made.
    Mount {
        cell: CellId,
        container: ContainerId,
        generation: u64,
    },
    /// Store `child` in `slot` of `container`.
    Insert {
        container: ContainerId,
        child: CellId,
        slot: Slot,
    },
}

impl PendingWrite {
    /// Arena nodes the record refers to.
    pub(crate) fn nodes(&self) -> [NodeId; 2] {
        match self {
            PendingWrite::Mount { cell, container, .. } => {
                [NodeId::Cell(*cell), NodeId::Container(*container)]
            }
            PendingWrite::Insert { container, child, .. } => {
                [NodeId::Container(*container), NodeId::Cell(*child)]
            }
        }
    }
}

/// Where a child goes in its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    Key(String),
    /// Negative indexes resolve against the array length at commit time.
    Index(isize),
    /// The nested root of a string-embedded document.
    Elem,
}

#[derive(Debug)]
enum Step {
    Mount {
        cell: CellId,
        container: ContainerId,
    },
    Insert {
        container: ContainerId,
        owner: CellId,
        child: CellId,
        slot: Slot,
    },
}

/// Validated chain, ready to apply.
#[derive(Debug, Default)]
struct Plan {
    containers: HashMap<ContainerId, ContainerId>,
    cells: HashMap<CellId, CellId>,
    /// Containers mounted by this plan, by the cell they land on.
    mounted: HashMap<CellId, ContainerId>,
    owners: HashMap<ContainerId, CellId>,
    steps: Vec<Step>,
}

impl Plan {
    fn container(&self, mut id: ContainerId) -> ContainerId {
        while let Some(&next) = self.containers.get(&id) {
            if next == id {
                break;
            }
            id = next;
        }
        id
    }

    fn cell(&self, id: CellId) -> CellId {
        self.cells.get(&id).copied().unwrap_or(id)
    }

    fn mount(&mut self, cell: CellId, container: ContainerId) {
        self.mounted.insert(cell, container);
        self.owners.insert(container, cell);
        self.steps.push(Step::Mount { cell, container });
    }
}

/// Why a chain could not be committed.
#[derive(Debug, Clone, Copy)]
enum Stale {
    Reset(CellId),
    Unmounted(ContainerId),
    KindConflict(CellId),
}

impl Tree {
    /// Commit the pending chain of `target`.
    ///
    /// Returns `true` when there was nothing to do or the chain applied. On a
    /// stale chain the target is detached (it keeps its own content) and
    /// `false` is returned. Either way the chain is consumed.
    pub(crate) fn commit(&mut self, target: CellId) -> bool {
        let chain = std::mem::take(&mut self.cell_mut(target).pending);
        if chain.is_empty() {
            return true;
        }
        let committed = match self.plan(target, &chain) {
            Ok(plan) => {
                self.apply(plan);
                true
            }
            Err(stale) => {
                debug!(?target, ?stale, records = chain.len(), "discarding stale placeholder write");
                self.cell_mut(target).parent = None;
                false
            }
        };
        // Held until now so nothing the plan touches is reclaimed mid-apply.
        self.unpin_chain(chain, NodeId::Cell(target));
        committed
    }

    fn plan(&mut self, target: CellId, chain: &[PendingWrite]) -> Result<Plan, Stale> {
        let mut plan = Plan::default();
        for record in chain {
            match record {
                PendingWrite::Mount {
                    cell,
                    container,
                    generation,
                } => self.plan_mount(&mut plan, *cell, *container, *generation)?,
                PendingWrite::Insert {
                    container,
                    child,
                    slot,
                } => self.plan_insert(&mut plan, target, *container, *child, slot)?,
            }
        }
        Ok(plan)
    }

    fn plan_mount(
        &mut self,
        plan: &mut Plan,
        original: CellId,
        container: ContainerId,
        generation: u64,
    ) -> Result<(), Stale> {
        let cell = plan.cell(original);
        let kind = self.container(container).body.kind();

        if let Some(&existing) = plan.mounted.get(&cell) {
            if self.container(existing).body.kind() != kind {
                return Err(Stale::KindConflict(cell));
            }
            plan.containers.insert(container, existing);
            return Ok(());
        }
        let shape = self.cell(cell).shape;
        if shape.container() == Some(container) {
            return Ok(());
        }
        if shape == Shape::Unrealized {
            self.realize(cell, kind);
        }
        let shape = self.cell(cell).shape;
        if shape.kind() == Some(kind) {
            if let Some(live) = shape.container() {
                plan.containers.insert(container, live);
                return Ok(());
            }
        }
        if self.container(container).owner.is_none() {
            return Err(Stale::Unmounted(container));
        }
        if cell != original || self.cell(cell).generation == generation {
            plan.mount(cell, container);
            return Ok(());
        }
        Err(Stale::Reset(cell))
    }

    fn plan_insert(
        &mut self,
        plan: &mut Plan,
        target: CellId,
        container: ContainerId,
        child: CellId,
        slot: &Slot,
    ) -> Result<(), Stale> {
        let container = plan.container(container);
        let owner = match plan.owners.get(&container) {
            Some(&owner) => owner,
            None => {
                let owner = self
                    .container(container)
                    .owner
                    .ok_or(Stale::Unmounted(container))?;
                if self.cell(owner).shape.container() != Some(container) {
                    return Err(Stale::Unmounted(container));
                }
                owner
            }
        };

        if child != target {
            if let Some(existing) = self.occupant(container, slot) {
                plan.cells.insert(child, existing);
                return Ok(());
            }
        }
        plan.steps.push(Step::Insert {
            container,
            owner,
            child,
            slot: slot.clone(),
        });
        Ok(())
    }

    fn occupant(&self, container: ContainerId, slot: &Slot) -> Option<CellId> {
        match (&self.container(container).body, slot) {
            (Body::Object(obj), Slot::Key(key)) => obj.get(key),
            (Body::Array(arr), Slot::Index(index)) => arr.get(*index),
            (Body::StrJson(s), Slot::Elem) => s.value,
            _ => None,
        }
    }

    fn apply(&mut self, plan: Plan) {
        for step in plan.steps {
            match step {
                Step::Mount { cell, container } => {
                    let kind = self.container(container).body.kind();
                    self.set_shape(cell, Shape::of(kind, container));
                    let chain = std::mem::take(&mut self.container_mut(container).pending);
                    self.unpin_chain(chain, NodeId::Container(container));
                    let cell = self.cell_mut(cell);
                    cell.generation += 1;
                    cell.raw.clear();
                }
                Step::Insert {
                    container,
                    owner,
                    child,
                    slot,
                } => {
                    let displaced = match slot {
                        Slot::Index(index) => self.array_place(container, owner, index, child),
                        Slot::Key(key) => match &mut self.container_mut(container).body {
                            Body::Object(obj) => obj.put(key, child),
                            _ => None,
                        },
                        Slot::Elem => match &mut self.container_mut(container).body {
                            Body::StrJson(s) => s.put(child),
                            _ => None,
                        },
                    };
                    if let Some(displaced) = displaced.filter(|&d| d != child) {
                        self.cell_mut(displaced).parent = None;
                    }
                    let cell = self.cell_mut(child);
                    cell.parent = Some(owner);
                    let chain = std::mem::take(&mut cell.pending);
                    self.unpin_chain(chain, NodeId::Cell(child));
                    self.cell_mut(owner).raw.clear();
                }
            }
        }
    }
}
