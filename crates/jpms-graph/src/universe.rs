//! The set of observable modules for one compilation.

use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::declaration::{CompilationUnit, ModuleOrigin, ProjectInput};
use crate::descriptor::ModuleDescriptor;
use crate::error::{GraphError, Result};
use crate::name::ModuleName;

/// Dense index of a module in the [`ModuleUniverse`]. It doubles as the
/// node index of the readability graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(u32);

impl ModuleId {
    /// The unnamed module always comes first.
    pub const UNNAMED: ModuleId = ModuleId(0);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position in the universe, and of the node in the graph arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Module name to descriptor, in discovery order. Discovery order is what
/// unnamed and automatic readers use to order providers.
#[derive(Debug, Clone)]
pub struct ModuleUniverse {
    modules: IndexMap<ModuleName, ModuleDescriptor>,
}

impl ModuleUniverse {
    /// A universe holding only the unnamed module.
    pub fn new(classpath: Vec<CompilationUnit>) -> Self {
        let mut modules = IndexMap::new();
        modules.insert(ModuleName::unnamed(), ModuleDescriptor::unnamed(classpath));
        Self { modules }
    }

    /// Materializes every module source of `input`, in input order, after the
    /// unnamed module built from the classpath units.
    pub fn from_input(input: ProjectInput) -> Result<Self> {
        let mut universe = Self::new(input.classpath);
        for source in input.modules {
            universe.insert(ModuleDescriptor::from_source(source)?)?;
        }
        tracing::debug!("module universe has {} modules", universe.len());
        Ok(universe)
    }

    /// Adds a module. Two modules with the same name is a fatal error.
    pub fn insert(&mut self, descriptor: ModuleDescriptor) -> Result<ModuleId> {
        match self.modules.entry(descriptor.name.clone()) {
            Entry::Occupied(entry) => Err(GraphError::DuplicateModule(entry.key().clone())),
            Entry::Vacant(entry) => {
                let id = ModuleId::from_index(entry.index());
                entry.insert(descriptor);
                Ok(id)
            }
        }
    }

    /// Number of modules, the unnamed module included.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Looks up a module by name.
    pub fn get(&self, name: &ModuleName) -> Option<&ModuleDescriptor> {
        self.modules.get(name)
    }

    /// Id of the named module, `None` if it is not observable.
    pub fn id_of(&self, name: &ModuleName) -> Option<ModuleId> {
        self.modules.get_index_of(name).map(ModuleId::from_index)
    }

    /// Descriptor of the module `id`.
    ///
    /// # Panics
    ///
    /// If `id` does not come from this universe.
    pub fn descriptor(&self, id: ModuleId) -> &ModuleDescriptor {
        &self.modules[id.index()]
    }

    pub fn name(&self, id: ModuleId) -> &ModuleName {
        &self.descriptor(id).name
    }

    /// Modules with their ids, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &ModuleDescriptor)> + '_ {
        self.modules
            .values()
            .enumerate()
            .map(|(idx, d)| (ModuleId::from_index(idx), d))
    }

    /// All ids in discovery order.
    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        (0..self.modules.len()).map(ModuleId::from_index)
    }

    /// Applies `--limit-modules`: keeps the named modules and everything
    /// they require, transitively, plus every module compiled from source
    /// and the unnamed module. Names outside the universe are ignored.
    pub fn limit(mut self, roots: &[ModuleName]) -> Self {
        if roots.is_empty() {
            return self;
        }

        let mut keep: FxHashSet<ModuleName> = FxHashSet::default();
        let mut queue: VecDeque<ModuleName> = VecDeque::new();

        for root in roots {
            if self.modules.contains_key(root) {
                queue.push_back(root.clone());
            } else {
                tracing::debug!("--limit-modules: ignoring unknown module {root}");
            }
        }
        for descriptor in self.modules.values() {
            if descriptor.is_unnamed() || descriptor.origin == ModuleOrigin::Source {
                queue.push_back(descriptor.name.clone());
            }
        }

        while let Some(name) = queue.pop_front() {
            if !keep.insert(name.clone()) {
                continue;
            }
            let Some(descriptor) = self.modules.get(&name) else {
                continue;
            };
            for req in &descriptor.requires {
                if !keep.contains(&req.module) {
                    queue.push_back(req.module.clone());
                }
            }
            if !name.is_java_base() && self.modules.contains_key(&ModuleName::java_base()) {
                queue.push_back(ModuleName::java_base());
            }
        }

        let before = self.modules.len();
        self.modules.retain(|name, _| keep.contains(name));
        tracing::debug!(
            "--limit-modules kept {} of {} modules",
            self.modules.len(),
            before
        );
        self
    }
}
