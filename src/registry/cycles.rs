// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Cycle Resolver (§4.4): finds inter-package cycles, reports cyclic struct ownership to a
//! [`StructManager`], and mutates the registry's dependency lanes to break them.

use super::PackageRegistry;
use crate::dep_manager::DependencyManager;
use crate::struct_manager::StructManager;
use crate::universe::ObjectUniverse;
use crate::PackageIndex;
use indexmap::IndexSet;

/// One resolved cycle: `loser`'s direct inclusion by `winner` is the edge that gets cut.
///
/// `winner` is the heavier side — the one whose lane has more direct structural references
/// (a super, or for the structs lane a direct struct-typed property) into the other package.
/// See DESIGN.md, "cycle-resolution weight heuristic".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Break {
    loser: PackageIndex,
    winner: PackageIndex,
    is_struct: bool,
}

/// Counts how many nodes in `dep_manager`'s lane have a direct structural link into
/// `target_package`: a super in `target_package`, or a direct struct-typed property child in
/// `target_package` (§4.4 step 2 — unlike the step 5 marking pass, the weight count does not
/// gate the child check on lane: "`w_A→B` := number of structs/classes in `A`'s lane-L
/// intra-DAG whose direct dependency (super or struct-typed child) lives in package `B`").
fn count_package_dependencies_in_lane(
    dep_manager: &DependencyManager,
    universe: &ObjectUniverse,
    target_package: PackageIndex,
) -> u32 {
    let mut count = 0u32;
    for node in dep_manager.node_indices() {
        let Some(entry) = universe.get(node) else { continue };

        if let Some(super_index) = entry.super_index {
            if let Some(super_entry) = universe.get(super_index) {
                if super_entry.package_index == target_package {
                    count += 1;
                }
            }
        }

        for prop in &entry.properties {
            if let Some(inner) = prop.direct_struct_target() {
                if let Some(inner_entry) = universe.get(inner) {
                    if inner_entry.package_index == target_package {
                        count += 1;
                    }
                }
            }
        }
    }
    count
}

/// For each node in `winner`'s lane whose super, or (structs lane only) direct struct-typed
/// property child, belongs to `loser`, reports that node as cyclic with partner `loser`.
///
/// The node itself is reported (not the dependency it points at), and the partner recorded is
/// `loser`, not `winner` — see DESIGN.md's Open Question resolutions on the marking target and
/// marking partner, both settled in favor of the spec's own prose and Scenario S4 over a
/// conflicting literal trace of the reference source's call site.
fn mark_cyclic_structs(
    registry: &PackageRegistry,
    universe: &ObjectUniverse,
    struct_manager: &mut dyn StructManager,
    winner: PackageIndex,
    loser: PackageIndex,
    is_struct: bool,
) {
    let Some(info) = registry.infos.get(&winner) else { return };
    let lane = if is_struct { &info.structs_sorted } else { &info.classes_sorted };

    for node in lane.node_indices() {
        let Some(entry) = universe.get(node) else { continue };

        let super_hits_loser = entry
            .super_index
            .and_then(|s| universe.get(s))
            .map(|s| s.package_index == loser)
            .unwrap_or(false);

        let child_hits_loser = is_struct
            && entry.properties.iter().any(|prop| {
                prop.direct_struct_target()
                    .and_then(|inner| universe.get(inner))
                    .map(|inner_entry| inner_entry.package_index == loser)
                    .unwrap_or(false)
            });

        if super_hits_loser || child_hits_loser {
            struct_manager.set_cycle_for_struct(node, loser);
        }
    }
}

/// Runs the Cycle Resolver over `registry` (§4.4).
///
/// Pass 1 re-walks the graph with [`PackageRegistry::find_cycle`], deduplicating each unordered
/// `(package, package, lane)` triple, weighing both sides, and reporting cyclic structs to
/// `struct_manager`. Pass 2 (after the immutable traversal borrow ends) performs the post-pass
/// edge surgery: `winner`'s direct inclusion of `loser` is removed outright for the structs lane;
/// for the classes lane it is merely demoted if a legitimate structs-only requirement remains
/// (§4.4, "Post-pass edge surgery").
pub(super) fn handle_cycles(registry: &mut PackageRegistry, universe: &ObjectUniverse, struct_manager: &mut dyn StructManager) {
    let mut seen: IndexSet<(PackageIndex, PackageIndex, bool)> = IndexSet::new();
    let mut breaks: Vec<Break> = Vec::new();

    {
        let registry_ref: &PackageRegistry = registry;
        registry_ref.find_cycle(|edge| {
            // `a` is "the current node at detection time" (Testable Property 6's tie-break
            // target): the ancestor the back-edge closed onto. `b` is the dependent node whose
            // edge found it.
            let (a, b) = (edge.current_package, edge.previous_package);
            let key = if a <= b { (a, b, edge.is_struct) } else { (b, a, edge.is_struct) };
            if !seen.insert(key) {
                return;
            }

            let Some(info_a) = registry_ref.try_get_info(a) else { return };
            let Some(info_b) = registry_ref.try_get_info(b) else { return };
            let lane_a = if edge.is_struct { info_a.sorted_structs() } else { info_a.sorted_classes() };
            let lane_b = if edge.is_struct { info_b.sorted_structs() } else { info_b.sorted_classes() };

            let weight_a = count_package_dependencies_in_lane(lane_a, universe, b);
            let weight_b = count_package_dependencies_in_lane(lane_b, universe, a);

            // Property 6: weight(loser -> winner) <= weight(winner -> loser), ties toward
            // loser = a (S4: "tie -> loser = P1 (detected current)").
            let (loser, winner) = if weight_a <= weight_b { (a, b) } else { (b, a) };

            mark_cyclic_structs(registry_ref, universe, struct_manager, winner, loser, edge.is_struct);
            breaks.push(Break { loser, winner, is_struct: edge.is_struct });
        });
    }

    for brk in breaks {
        if brk.is_struct {
            // Structs lane: asymmetric. Only the winner's direct inclusion of the loser is
            // removed; the loser's reverse entry survives untouched (S4).
            registry.edit_info(brk.winner).erase_package_dependency_from_structs(brk.loser);
        } else {
            // Classes lane: a legitimate classes-of-winner -> structs-of-loser need can survive
            // (demoted rather than erased) on the winner's side, but classes cannot embed classes
            // by value, so the loser's reverse classes requirement is never legitimate and is
            // always dropped outright (S5: "the reverse lane-classes edge is erased entirely").
            let mut winner_handle = registry.edit_info(brk.winner);
            let keep_as_structs_only = winner_handle
                .classes_dependencies_mut()
                .get(&brk.loser)
                .map(|req| req.should_include_structs)
                .unwrap_or(false);
            if keep_as_structs_only {
                if let Some(req) = winner_handle.classes_dependencies_mut().get_mut(&brk.loser) {
                    req.should_include_classes = false;
                }
            } else {
                winner_handle.erase_package_dependency_from_classes(brk.loser);
            }

            registry.edit_info(brk.loser).erase_package_dependency_from_classes(brk.winner);
        }
    }
}
