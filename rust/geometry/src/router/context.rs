// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-run build state shared by all processors.

use crate::backend::AuthoringBackend;
use crate::config::GeometryConfig;
use crate::extrusion::ExtrusionGeometryBuilder;
use crate::face::FaceFrameBuilder;
use crate::frame::CoordinateFrameBuilder;
use crate::haunch::HaunchSegmenter;
use crate::identity::IdentityProvider;
use crate::opening::OpeningGeometryBuilder;
use crate::placement::PlacementCalculator;
use crate::profiles::ProfileFactory;
use stbifc_core::{ElementClass, ElementIdentity};
use std::fmt;

/// Category of a non-fatal problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum WarningKind {
    /// Unsupported section replaced by a rectangle
    FallbackProfile,
    /// Backend declined a tapered representation
    RepresentationDowngrade,
    /// Opening could not be built; the host was still produced
    SkippedOpening,
    /// Degenerate polygon, canonical frame used
    FallbackFrame,
    /// Openings on an element class that does not support them
    IgnoredOpenings,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FallbackProfile => "fallback_profile",
            Self::RepresentationDowngrade => "representation_downgrade",
            Self::SkippedOpening => "skipped_opening",
            Self::FallbackFrame => "fallback_frame",
            Self::IgnoredOpenings => "ignored_openings",
        };
        f.write_str(s)
    }
}

/// Non-fatal problem recorded while building an element
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryWarning {
    pub element: String,
    pub class: ElementClass,
    pub kind: WarningKind,
    pub message: String,
}

/// Collaborators and builders for one conversion run
pub struct BuildContext<'a> {
    pub config: &'a GeometryConfig,
    pub backend: &'a mut dyn AuthoringBackend,
    pub identity: &'a dyn IdentityProvider,
    pub profiles: &'a ProfileFactory,
    pub frames: CoordinateFrameBuilder,
    pub faces: FaceFrameBuilder,
    pub extrusion: ExtrusionGeometryBuilder,
    pub placements: PlacementCalculator,
    pub openings: OpeningGeometryBuilder,
    pub haunches: HaunchSegmenter,
    warnings: Vec<GeometryWarning>,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        config: &'a GeometryConfig,
        profiles: &'a ProfileFactory,
        backend: &'a mut dyn AuthoringBackend,
        identity: &'a dyn IdentityProvider,
    ) -> Self {
        Self {
            config,
            backend,
            identity,
            profiles,
            frames: CoordinateFrameBuilder::new(config),
            faces: FaceFrameBuilder::new(config),
            extrusion: ExtrusionGeometryBuilder::new(config),
            placements: PlacementCalculator::new(config),
            openings: OpeningGeometryBuilder::new(config),
            haunches: HaunchSegmenter::new(config.tolerance),
            warnings: Vec::new(),
        }
    }

    /// Record a warning against `identity`
    pub fn warn(
        &mut self,
        identity: &ElementIdentity,
        class: ElementClass,
        kind: WarningKind,
        message: impl Into<String>,
    ) {
        let message = message.into();
        // Builders already logged at their own level
        tracing::debug!(element = %identity, %class, %kind, %message, "warning recorded");
        self.warnings.push(GeometryWarning {
            element: identity.name.clone(),
            class,
            kind,
            message,
        });
    }

    pub fn warnings(&self) -> &[GeometryWarning] {
        &self.warnings
    }

    /// Drop warnings recorded after the first `len`.
    ///
    /// Used when an element fails, so the report only carries warnings of
    /// produced elements.
    pub fn truncate_warnings(&mut self, len: usize) {
        if self.warnings.len() > len {
            tracing::trace!(
                discarded = self.warnings.len() - len,
                "warnings of failed element discarded"
            );
            self.warnings.truncate(len);
        }
    }

    /// Hand over the warnings recorded so far
    pub fn take_warnings(&mut self) -> Vec<GeometryWarning> {
        std::mem::take(&mut self.warnings)
    }
}
