// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Result type for fallible annotation operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while loading tutorial data.
///
/// Transitions themselves never fail; this only covers the data boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error("tutorial data: {0}")]
    /// The input is not a valid tutorial document.
    Parse(#[from] serde_json::Error),
}
