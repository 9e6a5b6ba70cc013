// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Components D and E: the Package Registry and the Cycle Resolver, plus the generic traversal
//! skeleton both of them and downstream consumers drive emission through.

mod build;
mod cycles;
mod iterate;

pub use iterate::{CycleEdge, PackageVisit};

use crate::dep_manager::DependencyManager;
use crate::name_table::NameTable;
use crate::struct_manager::StructManager;
use crate::universe::ObjectUniverse;
use crate::{ObjectIndex, PackageIndex};
use indexmap::IndexMap;
use std::cell::Cell;
use std::sync::Arc;

/// The initial capacity reservation for the package map, named rather than left as a magic
/// literal (`PackageInfos.reserve(0x800)` in the reference source).
const EXPECTED_PACKAGE_COUNT: usize = 0x800;

/// `{ PackageIdx, bShouldIncludeStructs, bShouldIncludeClasses }` (§3).
///
/// A single edge may require both the peer's `_structs` and its `_classes` output; these are
/// independent booleans, not a single enum, because both can be true at once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RequirementInfo {
    /// The package this requirement is about.
    pub package_index: PackageIndex,
    /// Whether the peer's `_structs` output must be included.
    pub should_include_structs: bool,
    /// Whether the peer's `_classes` output must be included.
    pub should_include_classes: bool,
}

impl RequirementInfo {
    fn new(package_index: PackageIndex) -> Self {
        RequirementInfo {
            package_index,
            should_include_structs: false,
            should_include_classes: false,
        }
    }
}

/// `PackageIndex -> RequirementInfo`, one of the three dependency lanes on a [`DependencyInfo`].
pub type DependencyListType = IndexMap<PackageIndex, RequirementInfo>;

/// Inter-package requirements of one package (§3).
#[derive(Clone, Debug, Default)]
pub struct DependencyInfo {
    /// Which other packages this package's `_structs` output needs included.
    pub structs_dependencies: DependencyListType,
    /// Which other packages this package's `_classes` output needs included.
    pub classes_dependencies: DependencyListType,
    /// Which other packages this package's parameter structs need included.
    pub parameters_dependencies: DependencyListType,
    structs_iteration_hit_count: Cell<u64>,
    classes_iteration_hit_count: Cell<u64>,
}

/// One per package that contains at least one struct/class/enum (§3).
///
/// Created on first sighting of a member object in its package during `InitDependencies`,
/// mutated through the remainder of `Init`/`PostInit`, never destroyed before the owning
/// [`PackageRegistry`] is dropped.
#[derive(Clone, Debug)]
pub struct PackageInfo {
    /// This package's own index.
    pub package_index: PackageIndex,
    /// Interned display name, set during `InitNames`. `None` until then.
    pub name: Option<Arc<str>>,
    /// 0 if the name is unique; otherwise `n >= 1`, producing the display name `"<name>_{n-1}"`.
    pub collision_count: u32,
    /// The intra-package DAG of non-function structs.
    pub structs_sorted: DependencyManager,
    /// The intra-package DAG of classes.
    pub classes_sorted: DependencyManager,
    /// Owned function indices, in discovery order.
    pub functions: Vec<ObjectIndex>,
    /// Owned enum indices, in discovery order.
    pub enums: Vec<ObjectIndex>,
    /// True iff at least one owned function has >= 1 parameter. Monotonic: once set, never
    /// cleared (§3 invariant 3).
    pub has_params: bool,
    /// This package's inter-package requirements.
    pub package_dependencies: DependencyInfo,
}

impl PackageInfo {
    fn new(package_index: PackageIndex) -> Self {
        PackageInfo {
            package_index,
            name: None,
            collision_count: 0,
            structs_sorted: DependencyManager::new(),
            classes_sorted: DependencyManager::new(),
            functions: Vec::new(),
            enums: Vec::new(),
            has_params: false,
            package_dependencies: DependencyInfo::default(),
        }
    }
}

/// A read-only view over a [`PackageInfo`] (§6 "Downstream consumer (produced)").
///
/// Carries only query methods. Compare [`PackageInfoEditHandle`], which is the only way to
/// reach the two mutating setters, and which only `registry::cycles` ever constructs — see
/// the design note "Mutation through read handles" (§9): the reference source instead exposes
/// the mutators on this same, otherwise-const-looking handle type.
#[derive(Clone, Copy)]
pub struct PackageInfoHandle<'a> {
    info: &'a PackageInfo,
}

impl<'a> PackageInfoHandle<'a> {
    /// This package's index.
    pub fn index(&self) -> PackageIndex {
        self.info.package_index
    }

    /// Renders this package's display name (Testable Property 8): the canonical name if
    /// `collision_count == 0`, otherwise `"<name>_{collision_count - 1}"`.
    ///
    /// Panics if called before `InitNames` has set a name for this package.
    pub fn name(&self) -> String {
        let canonical = self.info.name.as_deref().expect("PackageInfo::name set by InitNames");
        if self.info.collision_count == 0 {
            canonical.to_string()
        } else {
            format!("{}_{}", canonical, self.info.collision_count - 1)
        }
    }

    /// Returns `(canonicalName, collisionCount)`, mirroring `GetNameCollisionPair`.
    pub fn name_collision_pair(&self) -> (String, u32) {
        let canonical = self.info.name.as_deref().expect("PackageInfo::name set by InitNames");
        (canonical.to_string(), self.info.collision_count)
    }

    /// True if this package has at least one class.
    pub fn has_classes(&self) -> bool {
        !self.info.classes_sorted.is_empty()
    }

    /// True if this package has at least one non-function struct.
    pub fn has_structs(&self) -> bool {
        !self.info.structs_sorted.is_empty()
    }

    /// True if this package has at least one function.
    pub fn has_functions(&self) -> bool {
        !self.info.functions.is_empty()
    }

    /// True if at least one owned function has >= 1 parameter.
    pub fn has_parameter_structs(&self) -> bool {
        self.info.has_params
    }

    /// True if this package has at least one enum.
    pub fn has_enums(&self) -> bool {
        !self.info.enums.is_empty()
    }

    /// True if this package has no structs, classes, enums, parameter structs, or functions.
    pub fn is_empty(&self) -> bool {
        !self.has_classes()
            && !self.has_structs()
            && !self.has_enums()
            && !self.has_parameter_structs()
            && !self.has_functions()
    }

    /// The intra-package DAG of non-function structs.
    pub fn sorted_structs(&self) -> &'a DependencyManager {
        &self.info.structs_sorted
    }

    /// The intra-package DAG of classes.
    pub fn sorted_classes(&self) -> &'a DependencyManager {
        &self.info.classes_sorted
    }

    /// Owned function indices, in discovery order.
    pub fn functions(&self) -> &'a [ObjectIndex] {
        &self.info.functions
    }

    /// Owned enum indices, in discovery order.
    pub fn enums(&self) -> &'a [ObjectIndex] {
        &self.info.enums
    }

    /// This package's inter-package requirements.
    pub fn package_dependencies(&self) -> &'a DependencyInfo {
        &self.info.package_dependencies
    }
}

/// An explicit mutator over a [`PackageInfo`], used only by the Cycle Resolver's post-pass edge
/// surgery (§4.4). See the design note "Mutation through read handles" (§9).
pub struct PackageInfoEditHandle<'a> {
    info: &'a mut PackageInfo,
}

impl<'a> PackageInfoEditHandle<'a> {
    /// Erases the `StructsDependencies` entry keyed by `package`, if present.
    pub fn erase_package_dependency_from_structs(&mut self, package: PackageIndex) {
        self.info.package_dependencies.structs_dependencies.shift_remove(&package);
    }

    /// Erases the `ClassesDependencies` entry keyed by `package`, if present.
    pub fn erase_package_dependency_from_classes(&mut self, package: PackageIndex) {
        self.info.package_dependencies.classes_dependencies.shift_remove(&package);
    }

    fn classes_dependencies_mut(&mut self) -> &mut DependencyListType {
        &mut self.info.package_dependencies.classes_dependencies
    }
}

/// Component D: the mapping from package index to [`PackageInfo`], and the entry point for
/// `Init`/`PostInit`/`IterateDependencies`/`FindCycle`.
///
/// Owns every `PackageInfo` exclusively. Handles passed to callers are non-owning views,
/// invalidated if the registry itself is dropped (§5).
#[derive(Debug, Default)]
pub struct PackageRegistry {
    infos: IndexMap<PackageIndex, PackageInfo>,
    name_table: NameTable,
    current_iteration_hit_count: Cell<u64>,
    initialized: bool,
    post_initialized: bool,
}

impl PackageRegistry {
    /// Creates an empty, uninitialized registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry's `PackageInfo` map and assigns display names, from `universe`.
    ///
    /// Idempotent: a second call is a no-op. Runs `InitDependencies` before `InitNames`,
    /// since the latter iterates over `PackageInfo` entries the former creates — see
    /// DESIGN.md, "Init/InitNames ordering".
    pub fn init(&mut self, universe: &ObjectUniverse) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        self.infos.reserve(EXPECTED_PACKAGE_COUNT);
        build::init_dependencies(&mut self.infos, universe);
        build::init_names(&mut self.infos, &mut self.name_table, universe);
    }

    /// Runs the Cycle Resolver (§4.4): detects inter-package cycles, informs `struct_manager`
    /// of cyclic struct ownership, and mutates this registry's dependency maps to break them.
    ///
    /// Idempotent: a second call is a no-op. `struct_manager`'s own initialization must have
    /// completed before this is called (§6).
    pub fn post_init(&mut self, universe: &ObjectUniverse, struct_manager: &mut dyn StructManager) {
        if self.post_initialized {
            return;
        }
        self.post_initialized = true;

        cycles::handle_cycles(self, universe, struct_manager);
    }

    /// Returns a read-only view over the `PackageInfo` for `package_index`.
    ///
    /// Panics if `package_index` is not present in the registry (§7: "access to a nonexistent
    /// package index ... implementations may check and abort").
    pub fn get_info(&self, package_index: PackageIndex) -> PackageInfoHandle<'_> {
        let info = self
            .infos
            .get(&package_index)
            .unwrap_or_else(|| panic!("no such package index: {}", package_index));
        PackageInfoHandle { info }
    }

    /// Returns a read-only view over the `PackageInfo` for `package_index`, or `None` if absent.
    pub fn try_get_info(&self, package_index: PackageIndex) -> Option<PackageInfoHandle<'_>> {
        self.infos.get(&package_index).map(|info| PackageInfoHandle { info })
    }

    /// Iterates every package index currently in the registry, in discovery order.
    pub fn package_indices(&self) -> impl Iterator<Item = PackageIndex> + '_ {
        self.infos.keys().copied()
    }

    /// Number of packages currently in the registry.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// True if the registry has no packages.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Drives emission in dependency order: `cb` is invoked for each (package, lane) after all
    /// of its dependencies (§4.5).
    pub fn iterate_dependencies(&self, cb: impl FnMut(PackageVisit)) {
        iterate::run(self, false, cb, |_| {});
    }

    /// Invokes `on_cycle` for every back-edge found during a fresh traversal pass (§4.5).
    pub fn find_cycle(&self, on_cycle: impl FnMut(CycleEdge)) {
        iterate::run(self, true, |_| {}, on_cycle);
    }

    fn edit_info(&mut self, package_index: PackageIndex) -> PackageInfoEditHandle<'_> {
        let info = self
            .infos
            .get_mut(&package_index)
            .unwrap_or_else(|| panic!("no such package index: {}", package_index));
        PackageInfoEditHandle { info }
    }

    /// Checks this registry's own structural invariants (§3). Intended for tests and debug
    /// assertions, mirroring the teacher crate's `#[doc(hidden)] fn verify()`.
    #[doc(hidden)]
    pub fn verify(&self) -> Result<(), String> {
        for (package_index, info) in &self.infos {
            if info.package_index != *package_index {
                return Err(format!(
                    "PackageInfo stored under key {} claims index {}",
                    package_index, info.package_index
                ));
            }
            if info.package_dependencies.structs_dependencies.contains_key(package_index) {
                return Err(format!("package {} depends on its own structs", package_index));
            }
        }
        Ok(())
    }
}
