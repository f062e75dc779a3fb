//! Shortest read-edge paths between modules.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::ModuleGraph;
use crate::name::ModuleName;
use crate::universe::ModuleId;

/// Longest path `requires_path` explores.
pub const MAX_REQUIRES_PATH_DEPTH: usize = 50;

/// A chain of direct read edges, e.g. `mod.three -> mod.two -> mod.one`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiresPath {
    pub modules: Vec<ModuleName>,
}

impl RequiresPath {
    pub fn depth(&self) -> usize {
        self.modules.len().saturating_sub(1)
    }

    pub fn format_chain(&self) -> String {
        self.modules
            .iter()
            .map(ModuleName::as_str)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl ModuleGraph {
    /// Shortest path of direct read edges from `from` to `to`, preferring
    /// edges in declaration order. `None` when unreachable within
    /// [`MAX_REQUIRES_PATH_DEPTH`] steps.
    pub fn requires_path(&self, from: ModuleId, to: ModuleId) -> Option<RequiresPath> {
        let mut previous: Vec<Option<ModuleId>> = vec![None; self.module_count()];
        let mut visited = vec![false; self.module_count()];
        let mut queue = VecDeque::from([(from, 0usize)]);
        visited[from.index()] = true;

        while let Some((current, depth)) = queue.pop_front() {
            if current == to {
                let mut path = vec![self.name(current).clone()];
                let mut cursor = current;
                while let Some(prev) = previous[cursor.index()] {
                    path.push(self.name(prev).clone());
                    cursor = prev;
                }
                path.reverse();
                return Some(RequiresPath { modules: path });
            }
            if depth >= MAX_REQUIRES_PATH_DEPTH {
                continue;
            }
            for (next, _) in self.direct_reads(current) {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    previous[next.index()] = Some(current);
                    queue.push_back((*next, depth + 1));
                }
            }
        }
        None
    }
}
