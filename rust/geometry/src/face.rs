// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local frames for planar polygons (walls)
//!
//! The normal comes from Newell's method, which is robust for slightly
//! non-planar or concave outlines. A degenerate outline yields the global
//! frame, flagged and logged, never a silent default.

use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::frame::CoordinateFrame;
use crate::transform::project_orthogonal;
use nalgebra::{Point2, Point3, Vector3};
use smallvec::SmallVec;
use stbifc_core::ElementClass;

/// Orthonormal frame of a planar polygon
#[derive(Debug, Clone, PartialEq)]
pub struct FaceFrame {
    pub origin: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub normal: Vector3<f64>,
    /// Polygon corners, extended to four when only three were given
    pub corners: SmallVec<[Point3<f64>; 4]>,
    /// True when the polygon was degenerate and the global frame was used
    pub is_fallback: bool,
}

impl FaceFrame {
    /// Express a world point in frame-local 2D coordinates
    #[inline]
    pub fn to_local(&self, point: &Point3<f64>) -> Point2<f64> {
        let d = point - self.origin;
        Point2::new(d.dot(&self.x_axis), d.dot(&self.y_axis))
    }

    /// Corners projected into the frame, consecutive duplicates removed
    pub fn local_outline(&self, tolerance: f64) -> Vec<Point2<f64>> {
        let mut outline: Vec<Point2<f64>> = Vec::with_capacity(self.corners.len());
        for corner in &self.corners {
            let p = self.to_local(corner);
            if outline
                .last()
                .map_or(true, |last| (p - last).norm() > tolerance)
            {
                outline.push(p);
            }
        }
        // Closing duplicate of the first corner
        if outline.len() > 1 {
            let first = outline[0];
            if outline
                .last()
                .is_some_and(|last| (first - last).norm() <= tolerance)
            {
                outline.pop();
            }
        }
        outline
    }

    /// Same frame in the common representation (axis = normal, ref = X)
    pub fn as_coordinate_frame(&self) -> CoordinateFrame {
        CoordinateFrame {
            origin: self.origin,
            axis: self.normal,
            ref_direction: self.x_axis,
            up: self.y_axis,
        }
    }
}

/// Newell normal (unnormalized) of a closed polygon
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for (i, p1) in points.iter().enumerate() {
        let p2 = &points[(i + 1) % points.len()];
        normal.x += (p1.y - p2.y) * (p1.z + p2.z);
        normal.y += (p1.z - p2.z) * (p1.x + p2.x);
        normal.z += (p1.x - p2.x) * (p1.y + p2.y);
    }
    normal
}

/// Derives [`FaceFrame`]s for wall outlines
#[derive(Debug, Clone)]
pub struct FaceFrameBuilder {
    tolerance: f64,
    normal_epsilon: f64,
}

impl Default for FaceFrameBuilder {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl FaceFrameBuilder {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            normal_epsilon: config.normal_epsilon,
        }
    }

    /// Build the frame of `points`, centred on `center` or the corner average
    pub fn build(
        &self,
        class: ElementClass,
        points: &[Point3<f64>],
        center: Option<Point3<f64>>,
    ) -> Result<FaceFrame> {
        if points.len() < 3 {
            return Err(Error::geometry(
                class,
                format!("polygon needs at least 3 points, got {}", points.len()),
            ));
        }

        let origin = center.unwrap_or_else(|| average(points));

        let mut corners: SmallVec<[Point3<f64>; 4]> = points.iter().copied().collect();
        if corners.len() == 3 {
            corners.push(corners[0]);
        }

        let newell = newell_normal(&corners);
        let length = newell.norm();
        if !length.is_finite() || length < self.normal_epsilon {
            tracing::warn!(
                element = %class,
                corners = corners.len(),
                "degenerate polygon normal, using canonical frame"
            );
            return Ok(FaceFrame {
                origin,
                x_axis: Vector3::x(),
                y_axis: Vector3::y(),
                normal: Vector3::z(),
                corners,
                is_fallback: true,
            });
        }
        let normal = newell / length;

        let first_edge = corners[1] - corners[0];
        let x_axis = project_orthogonal(&first_edge, &normal, self.tolerance)
            .or_else(|| project_orthogonal(&Vector3::x(), &normal, self.tolerance))
            .or_else(|| project_orthogonal(&Vector3::y(), &normal, self.tolerance));

        let Some(x_axis) = x_axis else {
            // Unreachable for a unit normal, kept so the frame is never invalid
            tracing::warn!(element = %class, "no in-plane axis found, using canonical frame");
            return Ok(FaceFrame {
                origin,
                x_axis: Vector3::x(),
                y_axis: Vector3::y(),
                normal: Vector3::z(),
                corners,
                is_fallback: true,
            });
        };
        let y_axis = normal.cross(&x_axis).normalize();

        Ok(FaceFrame {
            origin,
            x_axis,
            y_axis,
            normal,
            corners,
            is_fallback: false,
        })
    }
}

fn average(points: &[Point3<f64>]) -> Point3<f64> {
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}
