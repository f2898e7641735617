// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for data model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or decoding structural element data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid GUID '{0}': {1}")]
    InvalidGuid(String, String),

    #[error("Unknown haunch zone: {0}")]
    UnknownZone(String),

    #[error("Invalid section dimension '{name}': {value}")]
    InvalidDimension { name: String, value: f64 },

    #[error("Sections cannot be interpolated: {0}")]
    Interpolation(String),
}
