// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall openings
//!
//! Openings are positioned from the wall's lower-left corner but placed
//! relative to the wall placement, which sits at the wall center. The void
//! solid is a rectangle pushed through the full thickness with a small
//! clearance on both faces so the subtraction never leaves a skin.

use crate::backend::SolidPosition;
use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::profile::{Profile2D, ProfileDescriptor};
use nalgebra::{Point2, Point3};
use stbifc_core::{ElementClass, OpeningDefinition, WallExtent};

/// Name of the opening element for `id`
pub fn opening_name(id: &str) -> String {
    format!("Opening_{}", id)
}

/// Name of the host/opening voiding relationship for `id`
pub fn voiding_name(id: &str) -> String {
    format!("WallVoiding_{}", id)
}

/// Void geometry of one opening, in its host wall's local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningGeometry {
    pub id: String,
    pub name: String,
    pub relation_name: String,
    /// Opening center relative to the wall placement
    pub center: Point3<f64>,
    pub width: f64,
    pub height: f64,
    /// Void solid position relative to the opening placement
    pub position: SolidPosition,
    pub depth: f64,
    pub profile: ProfileDescriptor,
}

/// Builds through-penetrating voids for wall openings
#[derive(Debug, Clone)]
pub struct OpeningGeometryBuilder {
    tolerance: f64,
    clearance: f64,
    default_size: (f64, f64),
    default_extent: (f64, f64),
}

impl Default for OpeningGeometryBuilder {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl OpeningGeometryBuilder {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            clearance: config.opening_clearance,
            default_size: config.default_opening_size,
            default_extent: config.default_wall_extent,
        }
    }

    /// Wall length and height used to center openings.
    ///
    /// An explicit extent wins; otherwise the bounding box of the wall's
    /// local outline, and the configured default when that is degenerate.
    pub fn wall_extent(&self, explicit: Option<WallExtent>, local_outline: &[Point2<f64>]) -> WallExtent {
        if let Some(extent) = explicit.filter(|e| e.length > self.tolerance && e.height > self.tolerance) {
            return extent;
        }
        let bounds = Profile2D::new(local_outline.to_vec()).bounds();
        match bounds {
            Some((min, max)) if max.x - min.x > self.tolerance && max.y - min.y > self.tolerance => WallExtent {
                length: max.x - min.x,
                height: max.y - min.y,
            },
            _ => {
                tracing::warn!(
                    length = self.default_extent.0,
                    height = self.default_extent.1,
                    "wall extent unavailable, using default"
                );
                WallExtent {
                    length: self.default_extent.0,
                    height: self.default_extent.1,
                }
            }
        }
    }

    pub fn build(
        &self,
        opening: &OpeningDefinition,
        extent: &WallExtent,
        wall_thickness: f64,
    ) -> Result<OpeningGeometry> {
        let width = opening.width.unwrap_or(self.default_size.0);
        let height = opening.height.unwrap_or(self.default_size.1);
        for (parameter, value) in [("opening_width", width), ("opening_height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::parameter(
                    ElementClass::Wall,
                    parameter,
                    format!("opening {} must be positive, got {}", opening.id, value),
                ));
            }
        }
        if !wall_thickness.is_finite() || wall_thickness <= 0.0 {
            return Err(Error::parameter(
                ElementClass::Wall,
                "thickness",
                format!("must be positive, got {}", wall_thickness),
            ));
        }

        // Lower-left corner offsets to center-relative coordinates
        let center = Point3::new(
            opening.offset_x - extent.length / 2.0 + width / 2.0,
            opening.offset_y - extent.height / 2.0 + height / 2.0,
            0.0,
        );
        let position = SolidPosition::at(Point3::new(0.0, 0.0, -wall_thickness / 2.0 - self.clearance));
        let depth = wall_thickness + 2.0 * self.clearance;
        let name = opening_name(&opening.id);

        Ok(OpeningGeometry {
            id: opening.id.clone(),
            relation_name: voiding_name(&opening.id),
            center,
            width,
            height,
            position,
            depth,
            profile: ProfileDescriptor::rectangle(name.clone(), width, height),
            name,
        })
    }
}
