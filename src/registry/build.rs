// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `InitDependencies` and `InitNames` (§4.3, §4.2).

use super::{DependencyListType, PackageInfo, RequirementInfo};
use crate::dep_manager::DependencyManager;
use crate::name_table::NameTable;
use crate::universe::{ObjectEntry, ObjectKind, ObjectUniverse, PropertyType};
use crate::{ObjectIndex, PackageIndex};
use indexmap::{IndexMap, IndexSet};

/// Recursively walks `entry`'s properties, collecting the indices of referenced structs and
/// enums (§4.3.1), then removes `entry`'s own index from the result (a struct may legally
/// reference itself via pointer; that is not counted as a dependency).
fn property_dependencies(entry: &ObjectEntry) -> IndexSet<ObjectIndex> {
    let mut out = IndexSet::new();
    for prop in &entry.properties {
        collect_property_dependency(prop, &mut out);
    }
    out.shift_remove(&entry.index);
    out
}

fn collect_property_dependency(prop: &PropertyType, out: &mut IndexSet<ObjectIndex>) {
    match prop {
        PropertyType::Struct { inner } => {
            out.insert(*inner);
        }
        PropertyType::Enum { enum_index } | PropertyType::Byte { enum_index } => {
            if let Some(idx) = enum_index {
                out.insert(*idx);
            }
        }
        PropertyType::Array(inner) | PropertyType::Set(inner) => {
            collect_property_dependency(inner, out);
        }
        PropertyType::Map(key, value) => {
            collect_property_dependency(key, out);
            collect_property_dependency(value, out);
        }
        PropertyType::Other => {}
    }
}

/// `SetPackageDependencies` / `AddEnumPackageDependencies` share this shape in the reference
/// source: walk `dependencies`, resolve each to its owning package, and (unless it is the
/// package doing the requiring, or `allow_self` says that's fine) record a requirement.
fn set_package_dependencies(
    dep_list: &mut DependencyListType,
    dependencies: &IndexSet<ObjectIndex>,
    universe: &ObjectUniverse,
    owner_package: PackageIndex,
    allow_self: bool,
    only_enums: bool,
) {
    for &dep in dependencies {
        let Some(dep_entry) = universe.get(dep) else { continue };
        if only_enums && !matches!(dep_entry.kind, ObjectKind::Enum) {
            continue;
        }
        let dep_package = dep_entry.package_index;
        if !allow_self && dep_package == owner_package {
            continue;
        }
        let req = dep_list
            .entry(dep_package)
            .or_insert_with(|| RequirementInfo::new(dep_package));
        req.should_include_structs = true;
    }
}

/// `AddStructDependencies`: within the same package, record intra-file edges between non-enum
/// struct dependencies (§4.3 step 4, "If S is a struct").
fn add_struct_dependencies(
    mgr: &mut DependencyManager,
    dependencies: &IndexSet<ObjectIndex>,
    struct_index: ObjectIndex,
    struct_package: PackageIndex,
    universe: &ObjectUniverse,
) {
    let mut same_package = IndexSet::new();
    for &dep in dependencies {
        let Some(dep_entry) = universe.get(dep) else { continue };
        if dep_entry.package_index == struct_package && !matches!(dep_entry.kind, ObjectKind::Enum) {
            same_package.insert(dep);
        }
    }
    mgr.set_dependencies(struct_index, same_package);
}

/// Walks every entity in the object universe exactly once, partitioning it into the registry's
/// `PackageInfo` map and computing both dependency levels (§4.3).
pub(super) fn init_dependencies(infos: &mut IndexMap<PackageIndex, PackageInfo>, universe: &ObjectUniverse) {
    for entry in universe.iter() {
        if entry.is_default_object {
            continue;
        }

        let current_package = entry.package_index;
        let is_class = matches!(entry.kind, ObjectKind::Class);
        let is_struct_or_class = matches!(entry.kind, ObjectKind::Struct | ObjectKind::Class);
        let is_enum = matches!(entry.kind, ObjectKind::Enum);

        if is_struct_or_class {
            let info = infos
                .entry(current_package)
                .or_insert_with(|| PackageInfo::new(current_package));
            info.package_index = current_package;

            let struct_index = entry.index;
            let struct_package = entry.package_index;

            let dependencies = property_dependencies(entry);

            let lane_sorted = if is_class { &mut info.classes_sorted } else { &mut info.structs_sorted };
            lane_sorted.set_exists(struct_index);

            let lane_deps = if is_class {
                &mut info.package_dependencies.classes_dependencies
            } else {
                &mut info.package_dependencies.structs_dependencies
            };
            set_package_dependencies(lane_deps, &dependencies, universe, struct_package, is_class, false);

            if !is_class {
                let lane_sorted = &mut info.structs_sorted;
                add_struct_dependencies(lane_sorted, &dependencies, struct_index, struct_package, universe);
            }

            if let Some(super_index) = entry.super_index {
                if let Some(super_entry) = universe.get(super_index) {
                    if super_entry.package_index == struct_package {
                        let lane_sorted = if is_class { &mut info.classes_sorted } else { &mut info.structs_sorted };
                        lane_sorted.add_dependency(struct_index, super_index);
                    } else {
                        let lane_deps = if is_class {
                            &mut info.package_dependencies.classes_dependencies
                        } else {
                            &mut info.package_dependencies.structs_dependencies
                        };
                        let req = lane_deps
                            .entry(super_entry.package_index)
                            .or_insert_with(|| RequirementInfo::new(super_entry.package_index));
                        req.should_include_structs |= !is_class;
                        req.should_include_classes |= is_class;
                    }
                }
            }

            if is_class {
                handle_class_functions(info, entry, universe);
            }
        } else if is_enum {
            let info = infos
                .entry(current_package)
                .or_insert_with(|| PackageInfo::new(current_package));
            info.package_index = current_package;
            info.enums.push(entry.index);
        }
    }
}

/// §4.3.2: for each function of class `entry`, records it and its parameter dependencies.
fn handle_class_functions(info: &mut PackageInfo, entry: &ObjectEntry, universe: &ObjectUniverse) {
    for &func_index in &entry.functions {
        let Some(func_entry) = universe.get(func_index) else { continue };

        info.functions.push(func_index);

        let param_dependencies = property_dependencies(func_entry);
        info.has_params |= func_entry.has_members;

        let func_package = func_entry.package_index;

        set_package_dependencies(
            &mut info.package_dependencies.parameters_dependencies,
            &param_dependencies,
            universe,
            func_package,
            true,
            false,
        );
        set_package_dependencies(
            &mut info.package_dependencies.classes_dependencies,
            &param_dependencies,
            universe,
            func_package,
            true,
            true,
        );
    }
}

/// Assigns each package's display name via the Name Table (§4.2).
pub(super) fn init_names(
    infos: &mut IndexMap<PackageIndex, PackageInfo>,
    name_table: &mut NameTable,
    universe: &ObjectUniverse,
) {
    for (package_index, info) in infos.iter_mut() {
        let raw_name = universe
            .get(*package_index)
            .map(|e| e.name.as_str())
            .unwrap_or("UnknownPackage");
        let (name, collision_count, _inserted) = name_table.find_or_add(raw_name);
        info.name = Some(name);
        info.collision_count = collision_count;
    }
}
