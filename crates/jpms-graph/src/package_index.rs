use indexmap::IndexMap;

use crate::name::PackageName;
use crate::universe::{ModuleId, ModuleUniverse};

/// Package name to the modules that contain it.
///
/// Every package with an associated compilation unit is indexed, exported
/// or not. Owners are listed in universe order. A package with several
/// owners is not an error by itself; it only matters once a reader sees
/// more than one of them.
#[derive(Debug, Clone, Default)]
pub struct PackageOwnershipIndex {
    owners: IndexMap<PackageName, Vec<ModuleId>>,
}

impl PackageOwnershipIndex {
    pub fn build(universe: &ModuleUniverse) -> Self {
        let mut owners: IndexMap<PackageName, Vec<ModuleId>> = IndexMap::new();
        for (id, descriptor) in universe.iter() {
            for package in descriptor.packages.keys() {
                owners.entry(package.clone()).or_default().push(id);
            }
        }
        Self { owners }
    }

    pub fn owners(&self, package: &PackageName) -> &[ModuleId] {
        self.owners.get(package).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, package: &PackageName) -> bool {
        self.owners.contains_key(package)
    }

    /// Packages present in more than one module.
    pub fn split_packages(&self) -> impl Iterator<Item = (&PackageName, &[ModuleId])> {
        self.owners
            .iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(package, owners)| (package, owners.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
