//! Readability sets with implied readability (`requires transitive`).
//!
//! Both sets are memoized per module once, at graph build time:
//!
//! - `implied[m]`: `m` plus every module that reading `m` implies, in BFS
//!   discovery order. An automatic module implies every automatic module.
//! - `readable[r]`: `r` first, then for each direct read edge of `r` (in
//!   edge order) the implied set of its target. Unnamed and automatic
//!   readers read the whole universe in discovery order.

use std::collections::VecDeque;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::universe::{ModuleId, ModuleUniverse};

/// Why a direct read edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeOrigin {
    Requires,
    RequiresStatic,
    /// `--add-reads`
    AddReads,
    /// Implicit `requires java.base`.
    Mandated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadEdge {
    pub origin: EdgeOrigin,
    pub transitive: bool,
}

impl ReadEdge {
    pub fn new(origin: EdgeOrigin, transitive: bool) -> Self {
        Self { origin, transitive }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Readability {
    implied: Vec<IndexSet<ModuleId>>,
    readable: Vec<IndexSet<ModuleId>>,
}

impl Readability {
    pub(crate) fn compute(universe: &ModuleUniverse, direct: &[Vec<(ModuleId, ReadEdge)>]) -> Self {
        let automatic: Vec<ModuleId> = universe
            .iter()
            .filter(|(_, d)| d.is_automatic())
            .map(|(id, _)| id)
            .collect();

        let implied: Vec<IndexSet<ModuleId>> = universe
            .ids()
            .map(|id| implied_closure(universe, direct, &automatic, id))
            .collect();

        let readable = universe
            .iter()
            .map(|(id, descriptor)| {
                let mut set = IndexSet::new();
                set.insert(id);
                if descriptor.is_explicit() {
                    for (target, _) in &direct[id.index()] {
                        set.extend(implied[target.index()].iter().copied());
                    }
                } else {
                    set.extend(universe.ids());
                }
                set
            })
            .collect();

        Self { implied, readable }
    }

    pub(crate) fn implied(&self, id: ModuleId) -> &IndexSet<ModuleId> {
        &self.implied[id.index()]
    }

    pub(crate) fn readable(&self, id: ModuleId) -> &IndexSet<ModuleId> {
        &self.readable[id.index()]
    }
}

fn implied_closure(
    universe: &ModuleUniverse,
    direct: &[Vec<(ModuleId, ReadEdge)>],
    automatic: &[ModuleId],
    start: ModuleId,
) -> IndexSet<ModuleId> {
    let mut seen = IndexSet::new();
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        if universe.descriptor(current).is_automatic() {
            queue.extend(automatic.iter().copied());
        } else {
            queue.extend(
                direct[current.index()]
                    .iter()
                    .filter(|(_, edge)| edge.transitive)
                    .map(|(target, _)| *target),
            );
        }
    }
    seen
}
