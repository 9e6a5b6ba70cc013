// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reflected object universe: Component A, "external, interface only".
//!
//! [`ObjectUniverse`] stands in for the reflection reader that is explicitly out of scope for
//! this crate (§1). The engine only ever reads from it; nothing here mutates it after
//! construction.

use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, non-negative index into the object universe.
///
/// Packages are themselves reflected objects, so a [`PackageIndex`] is the same type as an
/// [`ObjectIndex`] — it just names the role a given index is playing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectIndex(u32);

impl ObjectIndex {
    /// Creates a new index from a raw value.
    pub fn new(raw: u32) -> Self {
        ObjectIndex(raw)
    }

    /// Returns the raw value of this index.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ObjectIndex {
    fn from(raw: u32) -> Self {
        ObjectIndex(raw)
    }
}

/// An index into the object universe that is known to identify a package.
///
/// There is no sentinel "no package" value at the type level — the reference source's `-1`
/// is modeled as `Option<PackageIndex>` at every call site that needs it (e.g. the traversal's
/// "previous package" slot, which has nothing to point at for a top-level root).
pub type PackageIndex = ObjectIndex;

/// The kind of a reflected object, as far as the core needs to distinguish.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A plain struct (not a class, not a function).
    Struct,
    /// A class — a struct-like entity that may also own functions.
    Class,
    /// A UFunction-style function, itself reflected as a struct-like entity.
    Function,
    /// An enum.
    Enum,
    /// A package.
    Package,
    /// Anything else the core does not need to distinguish.
    Other,
}

/// A single property on a struct-like entity, modeled as a tagged variant (§4.3.1).
///
/// Property kinds the core does not need to distinguish collapse into [`PropertyType::Other`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PropertyType {
    /// A property whose value is an instance of another struct.
    Struct {
        /// Index of the referenced struct.
        inner: ObjectIndex,
    },
    /// A property whose value is an enum.
    Enum {
        /// Index of the referenced enum, if the reflection data retained it.
        enum_index: Option<ObjectIndex>,
    },
    /// A byte property that is really an enum underneath.
    Byte {
        /// Index of the referenced enum, if any.
        enum_index: Option<ObjectIndex>,
    },
    /// An array of some element property.
    Array(Box<PropertyType>),
    /// A set of some element property.
    Set(Box<PropertyType>),
    /// A map from a key property to a value property.
    Map(Box<PropertyType>, Box<PropertyType>),
    /// Any property kind §4.3.1 does not dispatch on.
    Other,
}

impl PropertyType {
    /// If this property directly names a struct (not through an array/set/map wrapper),
    /// returns its index. Used by the cycle resolver's weight heuristic (§4.4 step 2), which
    /// only looks at *direct* struct-typed children.
    pub(crate) fn direct_struct_target(&self) -> Option<ObjectIndex> {
        match self {
            PropertyType::Struct { inner } => Some(*inner),
            _ => None,
        }
    }
}

/// One entity in the reflected object universe.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// This entity's own index.
    pub index: ObjectIndex,
    /// The package this entity belongs to.
    pub package_index: PackageIndex,
    /// What kind of entity this is.
    pub kind: ObjectKind,
    /// Whether this entity carries the class-default-object flag (§4.3 step 1).
    #[serde(default)]
    pub is_default_object: bool,
    /// The sanitized identifier this entity renders as (`getValidName()`).
    pub name: String,
    /// The super type, for struct-like entities. `None` if there is no super.
    #[serde(default)]
    pub super_index: Option<ObjectIndex>,
    /// Properties of this entity, in declaration order. Empty for non-struct-like entities.
    #[serde(default)]
    pub properties: Vec<PropertyType>,
    /// Owned functions, in declaration order. Only meaningful for classes.
    #[serde(default)]
    pub functions: Vec<ObjectIndex>,
    /// Whether this entity (when it is a function) has at least one parameter.
    #[serde(default)]
    pub has_members: bool,
}

/// Read-only store of reflected entities keyed by small integer index (Component A).
///
/// This is the concrete stand-in for what the design notes call "external, interface only":
/// a snapshot the core consumes but never mutates, played the same role guppy's own
/// [`CargoMetadata`](https://docs.rs/guppy/latest/guppy/struct.CargoMetadata.html) plays for its
/// `cargo metadata` JSON input — a plain owned struct, not a trait object, because the core only
/// ever reads from it and a trait would buy nothing but indirection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObjectUniverse {
    entries: indexmap::IndexMap<ObjectIndex, ObjectEntry>,
}

impl ObjectUniverse {
    /// Creates an empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an object universe from its JSON representation.
    ///
    /// Mirrors `CargoMetadata::parse_json` in spirit: the core has no way to produce an
    /// `ObjectUniverse` on its own (reading the reflection snapshot is out of scope, §1), so
    /// fixtures and downstream tooling describe one as JSON instead.
    pub fn parse_json(json: impl AsRef<str>) -> Result<Self, Error> {
        serde_json::from_str(json.as_ref()).map_err(Error::UniverseParseError)
    }

    /// Inserts or replaces an entry. Entries are iterated back out in insertion order, matching
    /// the reference source's single linear walk over `ObjectArray`.
    pub fn insert(&mut self, entry: ObjectEntry) {
        self.entries.insert(entry.index, entry);
    }

    /// Looks up an entry by index.
    pub fn get(&self, index: ObjectIndex) -> Option<&ObjectEntry> {
        self.entries.get(&index)
    }

    /// Iterates all entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectEntry> {
        self.entries.values()
    }
}
