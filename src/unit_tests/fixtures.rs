// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the six scenario-seed object universes from §8 of the design as reusable fixtures.
//!
//! Each `scenario_sN` function returns the `ObjectUniverse` plus whatever indices its own test
//! needs to name. Universes are built by hand rather than via `parse_json` so each scenario
//! stays a single readable function, the same way the teacher crate's `fixtures` module builds
//! `PackageGraph`s directly from `PackageMetadata` literals rather than round-tripping JSON.

use crate::universe::{ObjectEntry, ObjectIndex, ObjectKind, ObjectUniverse, PropertyType};

fn insert_package(universe: &mut ObjectUniverse, index: u32, name: &str) -> ObjectIndex {
    let idx = ObjectIndex::new(index);
    universe.insert(ObjectEntry {
        index: idx,
        package_index: idx,
        kind: ObjectKind::Package,
        is_default_object: false,
        name: name.to_string(),
        super_index: None,
        properties: Vec::new(),
        functions: Vec::new(),
        has_members: false,
    });
    idx
}

#[allow(clippy::too_many_arguments)]
fn insert_entry(
    universe: &mut ObjectUniverse,
    index: u32,
    package_index: ObjectIndex,
    kind: ObjectKind,
    name: &str,
    super_index: Option<ObjectIndex>,
    properties: Vec<PropertyType>,
    functions: Vec<ObjectIndex>,
    has_members: bool,
) -> ObjectIndex {
    let idx = ObjectIndex::new(index);
    universe.insert(ObjectEntry {
        index: idx,
        package_index,
        kind,
        is_default_object: false,
        name: name.to_string(),
        super_index,
        properties,
        functions,
        has_members,
    });
    idx
}

/// S1 — simple chain: `P1` owns struct `SA`; `P2` owns class `CB` with a struct property
/// referencing `SA`.
pub fn scenario_s1() -> (ObjectUniverse, ObjectIndex, ObjectIndex, ObjectIndex, ObjectIndex) {
    let mut universe = ObjectUniverse::new();
    let p1 = insert_package(&mut universe, 1, "P1");
    let p2 = insert_package(&mut universe, 2, "P2");
    let sa = insert_entry(&mut universe, 10, p1, ObjectKind::Struct, "SA", None, Vec::new(), Vec::new(), false);
    let cb = insert_entry(
        &mut universe,
        20,
        p2,
        ObjectKind::Class,
        "CB",
        None,
        vec![PropertyType::Struct { inner: sa }],
        Vec::new(),
        false,
    );
    (universe, p1, p2, sa, cb)
}

/// S2 — enum-in-param: `P1` owns enum `E`; `P2` owns class `C` with function `F(E x)`.
pub fn scenario_s2() -> (ObjectUniverse, ObjectIndex, ObjectIndex, ObjectIndex, ObjectIndex, ObjectIndex) {
    let mut universe = ObjectUniverse::new();
    let p1 = insert_package(&mut universe, 1, "P1");
    let p2 = insert_package(&mut universe, 2, "P2");
    let e = insert_entry(&mut universe, 10, p1, ObjectKind::Enum, "E", None, Vec::new(), Vec::new(), false);
    let f = insert_entry(
        &mut universe,
        21,
        p2,
        ObjectKind::Function,
        "F",
        None,
        vec![PropertyType::Enum { enum_index: Some(e) }],
        Vec::new(),
        true,
    );
    let c = insert_entry(&mut universe, 20, p2, ObjectKind::Class, "C", None, Vec::new(), vec![f], false);
    (universe, p1, p2, e, c, f)
}

/// S3 — intra-package super: `P1` owns struct `A` and struct `B : A`.
pub fn scenario_s3() -> (ObjectUniverse, ObjectIndex, ObjectIndex, ObjectIndex) {
    let mut universe = ObjectUniverse::new();
    let p1 = insert_package(&mut universe, 1, "P1");
    let a = insert_entry(&mut universe, 10, p1, ObjectKind::Struct, "A", None, Vec::new(), Vec::new(), false);
    let b = insert_entry(&mut universe, 11, p1, ObjectKind::Struct, "B", Some(a), Vec::new(), Vec::new(), false);
    (universe, p1, a, b)
}

/// S4 — two-package struct cycle: `P1::X` has a struct field typed `P2::Y`; `P2::Y` has a
/// struct field typed `P1::X`. `X` is inserted before `Y` so `P1` is the ancestor re-entered
/// when the back-edge is found (the "detected current" node Testable Property 6 names).
pub fn scenario_s4() -> (ObjectUniverse, ObjectIndex, ObjectIndex, ObjectIndex, ObjectIndex) {
    let mut universe = ObjectUniverse::new();
    let p1 = insert_package(&mut universe, 1, "P1");
    let p2 = insert_package(&mut universe, 2, "P2");
    let x = ObjectIndex::new(10);
    let y = ObjectIndex::new(20);
    insert_entry(&mut universe, 10, p1, ObjectKind::Struct, "X", None, vec![PropertyType::Struct { inner: y }], Vec::new(), false);
    insert_entry(&mut universe, 20, p2, ObjectKind::Struct, "Y", None, vec![PropertyType::Struct { inner: x }], Vec::new(), false);
    (universe, p1, p2, x, y)
}

/// S5 — classes cycle with a legitimate structs edge: `P1::CA`'s super is `P2::CB`, and `CA`
/// also has a struct property referencing `P2::SB`; `P2::CB`'s super is `P1::CA`. `CA` (and its
/// package) is inserted before `CB`, making `P1` the ancestor re-entered on the back-edge.
pub fn scenario_s5() -> (ObjectUniverse, ObjectIndex, ObjectIndex, ObjectIndex, ObjectIndex, ObjectIndex) {
    let mut universe = ObjectUniverse::new();
    let p1 = insert_package(&mut universe, 1, "P1");
    let p2 = insert_package(&mut universe, 2, "P2");
    let ca = ObjectIndex::new(10);
    let cb = ObjectIndex::new(20);
    let sb = insert_entry(&mut universe, 21, p2, ObjectKind::Struct, "SB", None, Vec::new(), Vec::new(), false);
    insert_entry(
        &mut universe,
        10,
        p1,
        ObjectKind::Class,
        "CA",
        Some(cb),
        vec![PropertyType::Struct { inner: sb }],
        Vec::new(),
        false,
    );
    insert_entry(&mut universe, 20, p2, ObjectKind::Class, "CB", Some(ca), Vec::new(), Vec::new(), false);
    (universe, p1, p2, ca, cb, sb)
}

/// S6 — name collision: two unrelated packages both named `"Engine"`. Each owns one struct so
/// both are present in the registry; the first struct inserted belongs to the package that wins
/// the collision (`CollisionCount == 0`).
pub fn scenario_s6() -> (ObjectUniverse, ObjectIndex, ObjectIndex) {
    let mut universe = ObjectUniverse::new();
    let p1 = insert_package(&mut universe, 100, "Engine");
    let p2 = insert_package(&mut universe, 200, "Engine");
    insert_entry(&mut universe, 101, p1, ObjectKind::Struct, "SA1", None, Vec::new(), Vec::new(), false);
    insert_entry(&mut universe, 201, p2, ObjectKind::Struct, "SB1", None, Vec::new(), Vec::new(), false);
    (universe, p1, p2)
}

/// S7 — asymmetric struct cycle: like S4, `P1::X` and `P2::Y` reference each other, but `X` has
/// *two* struct-typed fields into `Y` where `Y` has only one back into `X`. `X` is inserted
/// before `Y`, so `P1` is again the ancestor re-entered on the back-edge — but this time the
/// ancestor is the heavier side, so it must win rather than lose (Testable Property 6's other
/// branch, never reached by S4's 1-vs-1 tie or S5's 2-vs-1 where the ancestor is the *lighter*
/// side).
pub fn scenario_s7() -> (ObjectUniverse, ObjectIndex, ObjectIndex, ObjectIndex, ObjectIndex) {
    let mut universe = ObjectUniverse::new();
    let p1 = insert_package(&mut universe, 1, "P1");
    let p2 = insert_package(&mut universe, 2, "P2");
    let x = ObjectIndex::new(10);
    let y = ObjectIndex::new(20);
    insert_entry(
        &mut universe,
        10,
        p1,
        ObjectKind::Struct,
        "X",
        None,
        vec![PropertyType::Struct { inner: y }, PropertyType::Struct { inner: y }],
        Vec::new(),
        false,
    );
    insert_entry(&mut universe, 20, p2, ObjectKind::Struct, "Y", None, vec![PropertyType::Struct { inner: x }], Vec::new(), false);
    (universe, p1, p2, x, y)
}
