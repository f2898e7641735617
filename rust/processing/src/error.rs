// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Processing errors. Per-element failures during a batch end up in the
/// report instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid definition input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] stbifc_geometry::Error),
}

impl Error {
    /// Stable category used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Geometry(inner) => inner.kind(),
        }
    }
}
