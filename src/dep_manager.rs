// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component C: the per-package intra-file DAG (§4.1).
//!
//! The traversal here is an explicit-stack, iterative postorder DFS — the same technique the
//! teacher crate's `petgraph_support::topo::TopoWithCycles` and `petgraph_support::dfs` apply to
//! its own package graphs, and for the same reason its doc comments give: these graphs have
//! unbounded depth, so a recursive `DfsPostOrder` risks blowing the stack on a sufficiently long
//! inheritance chain.

use crate::ObjectIndex;
use indexmap::{IndexMap, IndexSet};

#[derive(Clone, Copy, Eq, PartialEq)]
enum VisitState {
    InProgress,
    Done,
}

/// A per-package ordered map of nodes, each with a set of outgoing edges to other nodes in the
/// same manager.
///
/// All indices in one `DependencyManager` belong to the same package (§3 invariant 1); nothing
/// here checks that on its own, since the package boundary is enforced by the caller
/// (`registry::build`), not by this type.
#[derive(Clone, Debug, Default)]
pub struct DependencyManager {
    nodes: IndexMap<ObjectIndex, IndexSet<ObjectIndex>>,
}

impl DependencyManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `idx` present. Idempotent; does not touch its dependency set if it already exists.
    pub fn set_exists(&mut self, idx: ObjectIndex) {
        self.nodes.entry(idx).or_default();
    }

    /// Records that `from` depends on `to`. Both become present if they were not already.
    pub fn add_dependency(&mut self, from: ObjectIndex, to: ObjectIndex) {
        self.set_exists(to);
        self.nodes.entry(from).or_default().insert(to);
    }

    /// Replaces the dependency set for `idx`, marking `idx` present.
    pub fn set_dependencies(&mut self, idx: ObjectIndex, deps: IndexSet<ObjectIndex>) {
        self.nodes.insert(idx, deps);
    }

    /// Returns whether `idx` is present.
    pub fn contains(&self, idx: ObjectIndex) -> bool {
        self.nodes.contains_key(&idx)
    }

    /// Number of present nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates every present node, in insertion order. No ordering guarantee relative to
    /// dependencies — unlike [`visit_all_nodes_with_callback`](Self::visit_all_nodes_with_callback),
    /// this is for callers (the cycle resolver's weight heuristic, §4.4 step 2) that only need
    /// to look at each node once, not in dependency order.
    pub(crate) fn node_indices(&self) -> impl Iterator<Item = ObjectIndex> + '_ {
        self.nodes.keys().copied()
    }

    /// True if there are no present nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Invokes `f` on every present node such that all of a node's dependencies are visited
    /// before it (post-order DFS); within equal-depth siblings, insertion order is the
    /// tie-break. Each node is visited exactly once per call.
    ///
    /// Panics if a dependency target was never marked present (a missing node is a programming
    /// error, §4.1 "Failure semantics"), or if the manager's own edges are cyclic (not expected
    /// to happen inside one package, §4.1).
    pub fn visit_all_nodes_with_callback(&self, mut f: impl FnMut(ObjectIndex)) {
        let mut state: IndexMap<ObjectIndex, VisitState> = IndexMap::with_capacity(self.nodes.len());
        // Stack of (node, index of the next dependency to examine).
        let mut stack: Vec<(ObjectIndex, usize)> = Vec::new();

        for &root in self.nodes.keys() {
            if state.contains_key(&root) {
                continue;
            }
            state.insert(root, VisitState::InProgress);
            stack.push((root, 0));

            while let Some(&(node, pos)) = stack.last() {
                let deps = &self.nodes[&node];
                if pos < deps.len() {
                    let child = *deps.get_index(pos).expect("pos is within bounds");
                    stack.last_mut().expect("stack is non-empty").1 += 1;
                    match state.get(&child) {
                        Some(VisitState::Done) => {}
                        Some(VisitState::InProgress) => panic!(
                            "DependencyManager: cycle detected within a single package's intra-file DAG ({} -> {})",
                            node, child
                        ),
                        None => {
                            if !self.nodes.contains_key(&child) {
                                panic!(
                                    "DependencyManager: dependency target {} of node {} was never marked present",
                                    child, node
                                );
                            }
                            state.insert(child, VisitState::InProgress);
                            stack.push((child, 0));
                        }
                    }
                } else {
                    f(node);
                    state.insert(node, VisitState::Done);
                    stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(v: u32) -> ObjectIndex {
        ObjectIndex::new(v)
    }

    #[test]
    fn visits_dependencies_before_dependents() {
        let mut mgr = DependencyManager::new();
        mgr.set_exists(idx(1));
        mgr.add_dependency(idx(2), idx(1));

        let mut order = Vec::new();
        mgr.visit_all_nodes_with_callback(|i| order.push(i));
        assert_eq!(order, vec![idx(1), idx(2)]);
    }

    #[test]
    fn insertion_order_breaks_ties_among_siblings() {
        let mut mgr = DependencyManager::new();
        mgr.set_exists(idx(10));
        mgr.set_exists(idx(20));
        mgr.set_exists(idx(30));

        let mut order = Vec::new();
        mgr.visit_all_nodes_with_callback(|i| order.push(i));
        assert_eq!(order, vec![idx(10), idx(20), idx(30)]);
    }

    #[test]
    fn each_node_visited_exactly_once_in_a_diamond() {
        // 4 depends on 2 and 3; 2 and 3 both depend on 1.
        let mut mgr = DependencyManager::new();
        mgr.set_exists(idx(1));
        mgr.add_dependency(idx(2), idx(1));
        mgr.add_dependency(idx(3), idx(1));
        mgr.set_dependencies(idx(4), IndexSet::from([idx(2), idx(3)]));

        let mut order = Vec::new();
        mgr.visit_all_nodes_with_callback(|i| order.push(i));
        assert_eq!(order, vec![idx(1), idx(2), idx(3), idx(4)]);
    }

    #[test]
    #[should_panic(expected = "cycle detected")]
    fn intra_package_cycle_panics() {
        let mut mgr = DependencyManager::new();
        mgr.add_dependency(idx(1), idx(2));
        mgr.add_dependency(idx(2), idx(1));
        mgr.visit_all_nodes_with_callback(|_| {});
    }

    #[test]
    #[should_panic(expected = "was never marked present")]
    fn missing_dependency_target_panics() {
        let mut mgr = DependencyManager::new();
        mgr.set_dependencies(idx(1), IndexSet::from([idx(99)]));
        mgr.visit_all_nodes_with_callback(|_| {});
    }
}
