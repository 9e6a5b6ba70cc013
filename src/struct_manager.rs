// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Struct Manager: an external collaborator the Cycle Resolver (§4.4) reports into.
//!
//! Narrow single-method trait at the seam, the same shape guppy itself favors for its own
//! external collaborators over a wider "do everything" interface.

use crate::{ObjectIndex, PackageIndex};

/// Consumes cycle-ownership side effects from the Cycle Resolver (§4.4, §6).
///
/// The core calls [`set_cycle_for_struct`](StructManager::set_cycle_for_struct) exclusively from
/// `registry::cycles::handle_cycles`, and only after the manager's own initialization (external
/// to this crate) has completed.
pub trait StructManager {
    /// Records that the struct at `struct_index` participates in a cycle with
    /// `partner_package_index`: the downstream writer must emit it with an explicit package
    /// qualifier rather than a plain `#include`.
    fn set_cycle_for_struct(&mut self, struct_index: ObjectIndex, partner_package_index: PackageIndex);
}

/// A [`StructManager`] that just records every call, for tests and for tooling that wants to
/// inspect cycle ownership without a full downstream code emitter.
#[derive(Debug, Default)]
pub struct RecordingStructManager {
    cycles: indexmap::IndexMap<ObjectIndex, Vec<PackageIndex>>,
}

impl RecordingStructManager {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the partner packages recorded for `struct_index`, in call order.
    pub fn partners_for(&self, struct_index: ObjectIndex) -> &[PackageIndex] {
        self.cycles.get(&struct_index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if `set_cycle_for_struct` was ever called for `struct_index` with
    /// `partner_package_index`.
    pub fn records(&self, struct_index: ObjectIndex, partner_package_index: PackageIndex) -> bool {
        self.partners_for(struct_index).contains(&partner_package_index)
    }
}

impl StructManager for RecordingStructManager {
    fn set_cycle_for_struct(&mut self, struct_index: ObjectIndex, partner_package_index: PackageIndex) {
        self.cycles.entry(struct_index).or_default().push(partner_package_index);
    }
}
