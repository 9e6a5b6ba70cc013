// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partitions a reflected object universe into packages and orders their emission.
//!
//! This crate takes a snapshot of reflected structs, classes, enums and functions (an
//! [`ObjectUniverse`]) and computes, for each package those entities belong to: an intra-package
//! emission order for its structs and classes, the set of other packages it must pull in to
//! emit correctly, and which structs participate in an inter-package cycle and therefore need an
//! explicit package-qualified reference rather than a plain include.
//!
//! # Examples
//!
//! ```
//! use pkgraph::{ObjectEntry, ObjectIndex, ObjectKind, ObjectUniverse, PackageRegistry};
//! use pkgraph::struct_manager::RecordingStructManager;
//!
//! let mut universe = ObjectUniverse::new();
//! universe.insert(ObjectEntry {
//!     index: ObjectIndex::new(1),
//!     package_index: ObjectIndex::new(1),
//!     kind: ObjectKind::Package,
//!     is_default_object: false,
//!     name: "Engine".to_string(),
//!     super_index: None,
//!     properties: Vec::new(),
//!     functions: Vec::new(),
//!     has_members: false,
//! });
//! universe.insert(ObjectEntry {
//!     index: ObjectIndex::new(2),
//!     package_index: ObjectIndex::new(1),
//!     kind: ObjectKind::Struct,
//!     is_default_object: false,
//!     name: "FVector".to_string(),
//!     super_index: None,
//!     properties: Vec::new(),
//!     functions: Vec::new(),
//!     has_members: false,
//! });
//!
//! let mut registry = PackageRegistry::new();
//! registry.init(&universe);
//!
//! let mut struct_manager = RecordingStructManager::new();
//! registry.post_init(&universe, &mut struct_manager);
//!
//! let info = registry.get_info(ObjectIndex::new(1));
//! assert_eq!(info.name(), "Engine");
//! assert!(info.has_structs());
//! ```
//!
//! # Optional features
//!
//! * `proptest1`: support for [property-based testing](https://jessitron.com/2013/04/25/property-based-testing-what-is-it/)
//!   using the [`proptest`](https://altsysrq.github.io/proptest-book/intro.html) framework.

#![warn(missing_docs)]

pub mod dep_manager;
pub mod errors;
pub mod name_table;
pub mod registry;
pub mod struct_manager;
#[cfg(test)]
mod unit_tests;
pub mod universe;

pub use errors::Error;
pub use registry::{CycleEdge, DependencyInfo, PackageInfoHandle, PackageRegistry, PackageVisit, RequirementInfo};
pub use struct_manager::StructManager;
pub use universe::{ObjectEntry, ObjectIndex, ObjectKind, ObjectUniverse, PackageIndex, PropertyType};
