// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generic traversal (§4.5) that both `IterateDependencies` and `FindCycle` drive: an
//! explicit-stack postorder DFS over `(package, lane)` pairs, the same iterative technique
//! [`DependencyManager`](crate::dep_manager::DependencyManager) uses one level down.

use super::{DependencyListType, PackageRegistry, RequirementInfo};
use crate::PackageIndex;
use indexmap::IndexMap;

/// One `(package, lane)` pair fully emitted: all of its dependencies were visited first (§4.5).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PackageVisit {
    /// The package that finished.
    pub package_index: PackageIndex,
    /// `true` for the structs lane, `false` for the classes lane.
    pub is_struct: bool,
}

/// One back-edge found while re-walking the graph for cycles (§4.4 step 1, §4.5).
///
/// `current_package` is "the current node at detection time" in the sense Testable Property 6
/// uses the phrase: the ancestor already on the active path, still in progress on the same lane,
/// that a dependency edge was just found to close back onto. `previous_package` is the
/// dependent node whose edge closed the cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CycleEdge {
    /// The ancestor already in progress on this lane, reached again via a back-edge.
    pub current_package: PackageIndex,
    /// The dependent node whose edge pointed back at `current_package`.
    pub previous_package: PackageIndex,
    /// `true` if the closing edge is in the structs lane, `false` for classes.
    pub is_struct: bool,
}

/// Which lanes of a package are currently on the active DFS path, keyed by package (not by
/// lane) so a single entry can track both flags independently.
#[derive(Clone, Copy, Debug, Default)]
struct InProgress {
    structs: bool,
    classes: bool,
}

impl InProgress {
    fn get(&self, is_struct: bool) -> bool {
        if is_struct {
            self.structs
        } else {
            self.classes
        }
    }

    fn set(&mut self, is_struct: bool, value: bool) {
        if is_struct {
            self.structs = value;
        } else {
            self.classes = value;
        }
    }

    fn is_clear(&self) -> bool {
        !self.structs && !self.classes
    }
}

struct Frame {
    package_index: PackageIndex,
    is_struct: bool,
    prev_package: Option<PackageIndex>,
    dep_pos: usize,
}

/// Attempts to descend into `(package_index, is_struct)` reached from `prev_package`.
///
/// Three outcomes, mirroring the reference source's hit-count guard plus its path-local
/// `VisitedNodes`:
/// - The lane is already on the active path (an ancestor, still in progress): a cycle. Reported
///   via `cycle_cb` when `check_for_cycle` is set; no frame is pushed either way.
/// - The lane was already fully emitted earlier in this pass (global hit counter at or past the
///   current pass): nothing to do, no frame pushed, no re-emission.
/// - Otherwise: mark the lane in-progress (both globally and on the path) and push a frame.
fn try_enter(
    registry: &PackageRegistry,
    package_index: PackageIndex,
    is_struct: bool,
    prev_package: Option<PackageIndex>,
    current_pass: u64,
    on_path: &mut IndexMap<PackageIndex, InProgress>,
    stack: &mut Vec<Frame>,
    check_for_cycle: bool,
    cycle_cb: &mut dyn FnMut(CycleEdge),
) {
    let Some(info) = registry.infos.get(&package_index) else {
        return;
    };

    if let Some(state) = on_path.get(&package_index) {
        if state.get(is_struct) {
            if check_for_cycle {
                cycle_cb(CycleEdge {
                    current_package: package_index,
                    previous_package: prev_package.expect("a cycle is only found via an edge"),
                    is_struct,
                });
            }
            return;
        }
    }

    let hit_count = if is_struct {
        &info.package_dependencies.structs_iteration_hit_count
    } else {
        &info.package_dependencies.classes_iteration_hit_count
    };
    if hit_count.get() >= current_pass {
        return;
    }
    hit_count.set(current_pass);

    on_path.entry(package_index).or_default().set(is_struct, true);
    stack.push(Frame {
        package_index,
        is_struct,
        prev_package,
        dep_pos: 0,
    });
}

fn dependency_list(registry: &PackageRegistry, package_index: PackageIndex, is_struct: bool) -> &DependencyListType {
    let info = &registry.infos[&package_index];
    if is_struct {
        &info.package_dependencies.structs_dependencies
    } else {
        &info.package_dependencies.classes_dependencies
    }
}

/// Runs one full traversal pass over every package in `registry` (in discovery order),
/// invoking `emit_cb` for each `(package, lane)` as it finishes and `cycle_cb` for each back-edge
/// found (only meaningful, and only walked for, when `check_for_cycle` is set).
///
/// `ParametersDependencies` is deliberately not walked here — see DESIGN.md, "ParametersDependencies
/// unconsumed": nothing downstream orders emission by parameter-struct requirements.
pub(super) fn run(
    registry: &PackageRegistry,
    check_for_cycle: bool,
    mut emit_cb: impl FnMut(PackageVisit),
    mut cycle_cb: impl FnMut(CycleEdge),
) {
    registry.current_iteration_hit_count.set(registry.current_iteration_hit_count.get() + 1);
    let current_pass = registry.current_iteration_hit_count.get();

    let roots: Vec<PackageIndex> = registry.infos.keys().copied().collect();

    for root in roots {
        let mut on_path: IndexMap<PackageIndex, InProgress> = IndexMap::new();
        let mut stack: Vec<Frame> = Vec::new();

        // Classes pushed first, structs second: the stack is LIFO, so structs is processed
        // first for a given node, matching the reference source's sequential structs-then-
        // classes function calls.
        try_enter(
            registry,
            root,
            false,
            None,
            current_pass,
            &mut on_path,
            &mut stack,
            check_for_cycle,
            &mut cycle_cb,
        );
        try_enter(
            registry,
            root,
            true,
            None,
            current_pass,
            &mut on_path,
            &mut stack,
            check_for_cycle,
            &mut cycle_cb,
        );

        while !stack.is_empty() {
            let (package_index, is_struct, dep_pos) = {
                let frame = stack.last().expect("stack is non-empty");
                (frame.package_index, frame.is_struct, frame.dep_pos)
            };

            let deps = dependency_list(registry, package_index, is_struct);
            if dep_pos < deps.len() {
                let req: RequirementInfo = *deps.get_index(dep_pos).expect("dep_pos is within bounds").1;
                stack.last_mut().expect("stack is non-empty").dep_pos += 1;

                if req.should_include_classes {
                    try_enter(
                        registry,
                        req.package_index,
                        false,
                        Some(package_index),
                        current_pass,
                        &mut on_path,
                        &mut stack,
                        check_for_cycle,
                        &mut cycle_cb,
                    );
                }
                if req.should_include_structs {
                    try_enter(
                        registry,
                        req.package_index,
                        true,
                        Some(package_index),
                        current_pass,
                        &mut on_path,
                        &mut stack,
                        check_for_cycle,
                        &mut cycle_cb,
                    );
                }
            } else {
                let frame = stack.pop().expect("stack is non-empty");
                if let Some(state) = on_path.get_mut(&frame.package_index) {
                    state.set(frame.is_struct, false);
                    if state.is_clear() {
                        on_path.shift_remove(&frame.package_index);
                    }
                }
                emit_cb(PackageVisit {
                    package_index: frame.package_index,
                    is_struct: frame.is_struct,
                });
            }
        }
    }
}
