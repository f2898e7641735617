// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # STB-IFC Processing
//!
//! Batch pipeline on top of the geometry engine: reads element definitions
//! from JSON, converts them through an authoring backend and reports what
//! was produced, skipped and degraded.
//!
//! ```rust,ignore
//! use stbifc_geometry::{DefaultIdentityProvider, RecordingBackend};
//! use stbifc_processing::{load_definitions, ConversionConfig, StructuralConverter};
//!
//! let definitions = load_definitions(&json)?;
//! let converter = StructuralConverter::new(ConversionConfig::from_env());
//! let mut backend = RecordingBackend::new();
//! let report = converter.convert(&definitions, &mut backend, &DefaultIdentityProvider);
//! println!("{}", report.to_json()?);
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod report;

pub use config::ConversionConfig;
pub use converter::StructuralConverter;
pub use error::{Error, Result};
pub use report::{ClassCounts, ConversionReport, ElementFailure, ProducedElement};

use stbifc_core::ElementDefinition;

/// Parse a JSON array of element definitions.
pub fn load_definitions(json: &str) -> Result<Vec<ElementDefinition>> {
    let definitions: Vec<ElementDefinition> = serde_json::from_str(json)?;
    tracing::debug!(count = definitions.len(), "Loaded element definitions");
    Ok(definitions)
}
