// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests against the scenario seeds from §8 of the design, mirroring the teacher
//! crate's own `unit_tests` layout: one `fixtures` submodule building reusable inputs, one
//! submodule of tests that exercise them.

mod fixtures;
