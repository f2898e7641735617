// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-run conversion report.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use stbifc_core::{ElementClass, IfcGuid};
use stbifc_geometry::{CacheStats, ElementGeometry, GeometryKind, GeometryWarning};
use std::collections::BTreeMap;

/// One element (or haunch segment) handed to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducedElement {
    pub name: String,
    pub tag: String,
    pub class: ElementClass,
    pub guid: IfcGuid,
    pub geometry: GeometryKind,
    pub profile_name: String,
    pub depth: f64,
    /// Names of the openings voided out of this element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub openings: Vec<String>,
}

impl ProducedElement {
    pub fn new(class: ElementClass, produced: &ElementGeometry) -> Self {
        Self {
            name: produced.name.clone(),
            tag: produced.tag.clone(),
            class,
            guid: produced.guid.clone(),
            geometry: produced.geometry.kind,
            profile_name: produced.geometry.profile_name.clone(),
            depth: produced.geometry.depth,
            openings: produced.openings.iter().map(|o| o.name.clone()).collect(),
        }
    }
}

/// An element that was skipped because it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementFailure {
    pub element: String,
    pub class: ElementClass,
    /// Stable error category, e.g. `geometry_validation`.
    pub kind: String,
    pub message: String,
}

/// Produced/failed counts for one element class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub input: usize,
    pub produced: usize,
    pub failed: usize,
}

/// Outcome of a conversion run.
///
/// Failures are element-scoped: a failed element is listed under `errors`
/// and the rest of the batch is still converted unless the run was
/// configured to fail fast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub produced: Vec<ProducedElement>,
    pub errors: Vec<ElementFailure>,
    pub warnings: Vec<GeometryWarning>,
    pub per_class: BTreeMap<ElementClass, ClassCounts>,
    /// Definitions never attempted because of fail-fast.
    pub skipped: usize,
    pub aborted: bool,
    pub profile_cache: CacheStats,
    pub total_time_ms: u64,
}

impl ConversionReport {
    /// True when every element converted.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && !self.aborted
    }

    pub fn produced_count(&self) -> usize {
        self.produced.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn counts(&self, class: ElementClass) -> ClassCounts {
        self.per_class.get(&class).copied().unwrap_or_default()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
