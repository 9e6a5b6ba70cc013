// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contains types that describe errors this crate's boundary operations can return.
//!
//! The domain core itself (§7 of the design) never returns `Result`: a structural invariant
//! violation there is a programming error and panics with a diagnostic. This module exists for
//! the one genuinely recoverable failure mode at the crate's edge — parsing a serialized
//! [`ObjectUniverse`](crate::ObjectUniverse) fixture.

use std::error;
use std::fmt;

use Error::*;

/// Error type describing the sorts of errors this crate can return.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An error occurred while parsing object universe JSON.
    UniverseParseError(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniverseParseError(err) => write!(f, "error while parsing object universe JSON: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            UniverseParseError(err) => Some(err),
        }
    }
}
