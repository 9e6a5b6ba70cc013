// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component B: a deduplicating registry of package names with collision counts (§4.2).

use indexmap::IndexMap;
use std::sync::Arc;

/// A deduplicating store of package name strings.
///
/// `operator[](Handle).GetCollisionCount()` from the reference interface (§6) is folded into the
/// return value of [`find_or_add`](NameTable::find_or_add) itself: there is no reason in safe
/// Rust to look a handle back up in the table immediately after inserting it.
#[derive(Debug, Default)]
pub struct NameTable {
    /// Canonical name -> next 1-based collision index to hand out.
    next_collision: IndexMap<Arc<str>, u32>,
}

impl NameTable {
    /// Creates an empty name table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds or inserts `name`, returning the canonical handle, the package's collision count
    /// (0 if this is the first package with this name), and whether this was the first
    /// insertion.
    pub fn find_or_add(&mut self, name: &str) -> (Arc<str>, u32, bool) {
        if let Some((canonical, count)) = self.next_collision.get_key_value(name) {
            let collision_count = *count;
            let canonical = Arc::clone(canonical);
            self.next_collision.insert(Arc::clone(&canonical), collision_count + 1);
            (canonical, collision_count, false)
        } else {
            let canonical: Arc<str> = Arc::from(name);
            self.next_collision.insert(Arc::clone(&canonical), 1);
            (canonical, 0, true)
        }
    }
}
