// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D profile definitions
//!
//! [`ProfileShape`] is the resolved, closed form of a section's dimension
//! bag; [`ProfileDescriptor`] adds the alignment offset and naming the
//! authoring backend needs. Outlines follow the usual convention: outer
//! boundary counter-clockwise, holes clockwise.

use nalgebra::{Point2, Vector2};
use stbifc_core::{ElementClass, SectionKey, SectionType};
use std::f64::consts::PI;

/// 2D Profile with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Add a hole to the profile
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Shift every point by `offset`
    pub fn translate(&mut self, offset: &Vector2<f64>) {
        if offset.x == 0.0 && offset.y == 0.0 {
            return;
        }
        for point in &mut self.outer {
            *point += offset;
        }
        for hole in &mut self.holes {
            for point in hole {
                *point += offset;
            }
        }
    }

    /// Force CCW outer boundary and CW holes
    pub fn normalize_winding(&mut self) {
        if signed_area(&self.outer) < 0.0 {
            self.outer.reverse();
        }
        for hole in &mut self.holes {
            if signed_area(hole) > 0.0 {
                hole.reverse();
            }
        }
    }

    /// Net area (outer minus holes)
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        signed_area(&self.outer).abs() - holes
    }

    /// Axis-aligned bounds of the outer boundary
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = self.outer.first()?;
        let (min, max) = self.outer.iter().fold((*first, *first), |(min, max), p| {
            (
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some((min, max))
    }
}

/// Shoelace area; positive for counter-clockwise loops
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    twice / 2.0
}

/// Create a rectangular profile
#[inline]
pub fn create_rectangle(width: f64, height: f64) -> Profile2D {
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    Profile2D::new(vec![
        Point2::new(-half_w, -half_h),
        Point2::new(half_w, -half_h),
        Point2::new(half_w, half_h),
        Point2::new(-half_w, half_h),
    ])
}

fn circle_points(radius: f64, segments: usize) -> Vec<Point2<f64>> {
    (0..segments)
        .map(|i| {
            let angle = 2.0 * PI * (i as f64) / (segments as f64);
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Create a circular profile (with optional hole)
pub fn create_circle(radius: f64, hole_radius: Option<f64>, segments: usize) -> Profile2D {
    let segments = segments.max(8);
    let mut profile = Profile2D::new(circle_points(radius, segments));

    if let Some(hole_r) = hole_radius {
        let mut hole = circle_points(hole_r, segments);
        hole.reverse(); // Make clockwise
        profile.add_hole(hole);
    }

    profile
}

/// Resolved cross-section geometry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfileShape {
    Rectangle {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    IShape {
        overall_width: f64,
        overall_depth: f64,
        web_thickness: f64,
        flange_thickness: f64,
        fillet_radius: f64,
    },
    RectangleHollow {
        width: f64,
        height: f64,
        wall_thickness: f64,
    },
    CircleHollow {
        radius: f64,
        wall_thickness: f64,
    },
    Channel {
        depth: f64,
        flange_width: f64,
        web_thickness: f64,
        flange_thickness: f64,
    },
    Angle {
        width: f64,
        height: f64,
        thickness: f64,
    },
    Tee {
        depth: f64,
        flange_width: f64,
        web_thickness: f64,
        flange_thickness: f64,
    },
    Zee {
        depth: f64,
        flange_width: f64,
        web_thickness: f64,
        flange_thickness: f64,
    },
    /// Arbitrary closed outline (walls, slabs)
    Polygon {
        points: Vec<Point2<f64>>,
    },
}

impl ProfileShape {
    /// Overall (width, height) of the shape's bounding box
    pub fn extents(&self) -> (f64, f64) {
        match self {
            Self::Rectangle { width, height } | Self::RectangleHollow { width, height, .. } => {
                (*width, *height)
            }
            Self::Circle { radius } | Self::CircleHollow { radius, .. } => {
                (radius * 2.0, radius * 2.0)
            }
            Self::IShape {
                overall_width,
                overall_depth,
                ..
            } => (*overall_width, *overall_depth),
            Self::Channel {
                depth,
                flange_width,
                ..
            }
            | Self::Tee {
                depth,
                flange_width,
                ..
            } => (*flange_width, *depth),
            Self::Zee {
                depth,
                flange_width,
                web_thickness,
                ..
            } => (flange_width * 2.0 + web_thickness, *depth),
            Self::Angle { width, height, .. } => (*width, *height),
            Self::Polygon { points } => {
                let profile = Profile2D::new(points.clone());
                profile
                    .bounds()
                    .map(|(min, max)| (max.x - min.x, max.y - min.y))
                    .unwrap_or((0.0, 0.0))
            }
        }
    }

    /// Half of the vertical extent, used for top-center alignment
    #[inline]
    pub fn half_height(&self) -> f64 {
        self.extents().1 / 2.0
    }

    /// Outline centred on its bounding box
    pub fn outline(&self, circle_segments: usize) -> Profile2D {
        let mut profile = match self {
            Self::Rectangle { width, height } => create_rectangle(*width, *height),
            Self::Circle { radius } => create_circle(*radius, None, circle_segments),
            Self::CircleHollow {
                radius,
                wall_thickness,
            } => create_circle(*radius, Some(radius - wall_thickness), circle_segments),
            Self::RectangleHollow {
                width,
                height,
                wall_thickness,
            } => {
                let mut profile = create_rectangle(*width, *height);
                let mut inner = create_rectangle(width - 2.0 * wall_thickness, height - 2.0 * wall_thickness).outer;
                inner.reverse();
                profile.add_hole(inner);
                profile
            }
            Self::IShape {
                overall_width,
                overall_depth,
                web_thickness,
                flange_thickness,
                ..
            } => i_shape(*overall_width, *overall_depth, *web_thickness, *flange_thickness),
            Self::Channel {
                depth,
                flange_width,
                web_thickness,
                flange_thickness,
            } => channel(*depth, *flange_width, *web_thickness, *flange_thickness),
            Self::Angle {
                width,
                height,
                thickness,
            } => angle(*width, *height, *thickness),
            Self::Tee {
                depth,
                flange_width,
                web_thickness,
                flange_thickness,
            } => tee(*depth, *flange_width, *web_thickness, *flange_thickness),
            Self::Zee {
                depth,
                flange_width,
                web_thickness,
                flange_thickness,
            } => zee(*depth, *flange_width, *web_thickness, *flange_thickness),
            Self::Polygon { points } => Profile2D::new(points.clone()),
        };
        profile.normalize_winding();
        profile
    }
}

fn i_shape(overall_width: f64, overall_depth: f64, web_thickness: f64, flange_thickness: f64) -> Profile2D {
    let half_width = overall_width / 2.0;
    let half_depth = overall_depth / 2.0;
    let half_web = web_thickness / 2.0;

    // Counter-clockwise from bottom-left
    Profile2D::new(vec![
        // Bottom flange
        Point2::new(-half_width, -half_depth),
        Point2::new(half_width, -half_depth),
        Point2::new(half_width, -half_depth + flange_thickness),
        // Right side of web
        Point2::new(half_web, -half_depth + flange_thickness),
        Point2::new(half_web, half_depth - flange_thickness),
        // Top flange
        Point2::new(half_width, half_depth - flange_thickness),
        Point2::new(half_width, half_depth),
        Point2::new(-half_width, half_depth),
        Point2::new(-half_width, half_depth - flange_thickness),
        // Left side of web
        Point2::new(-half_web, half_depth - flange_thickness),
        Point2::new(-half_web, -half_depth + flange_thickness),
        Point2::new(-half_width, -half_depth + flange_thickness),
    ])
}

fn channel(depth: f64, flange_width: f64, web_thickness: f64, flange_thickness: f64) -> Profile2D {
    let half_depth = depth / 2.0;
    let left = -flange_width / 2.0;
    let right = flange_width / 2.0;
    let web = left + web_thickness;

    // Web on the left, flanges opening to +X
    Profile2D::new(vec![
        Point2::new(left, -half_depth),
        Point2::new(right, -half_depth),
        Point2::new(right, -half_depth + flange_thickness),
        Point2::new(web, -half_depth + flange_thickness),
        Point2::new(web, half_depth - flange_thickness),
        Point2::new(right, half_depth - flange_thickness),
        Point2::new(right, half_depth),
        Point2::new(left, half_depth),
    ])
}

fn angle(width: f64, height: f64, thickness: f64) -> Profile2D {
    let x0 = -width / 2.0;
    let y0 = -height / 2.0;

    // Heel at the bottom-left corner
    Profile2D::new(vec![
        Point2::new(x0, y0),
        Point2::new(x0 + width, y0),
        Point2::new(x0 + width, y0 + thickness),
        Point2::new(x0 + thickness, y0 + thickness),
        Point2::new(x0 + thickness, y0 + height),
        Point2::new(x0, y0 + height),
    ])
}

fn tee(depth: f64, flange_width: f64, web_thickness: f64, flange_thickness: f64) -> Profile2D {
    let half_depth = depth / 2.0;
    let half_flange = flange_width / 2.0;
    let half_web = web_thickness / 2.0;
    let under_flange = half_depth - flange_thickness;

    // Flange on top
    Profile2D::new(vec![
        Point2::new(-half_web, -half_depth),
        Point2::new(half_web, -half_depth),
        Point2::new(half_web, under_flange),
        Point2::new(half_flange, under_flange),
        Point2::new(half_flange, half_depth),
        Point2::new(-half_flange, half_depth),
        Point2::new(-half_flange, under_flange),
        Point2::new(-half_web, under_flange),
    ])
}

fn zee(depth: f64, flange_width: f64, web_thickness: f64, flange_thickness: f64) -> Profile2D {
    let half_depth = depth / 2.0;
    let half_web = web_thickness / 2.0;

    // Bottom flange to -X, top flange to +X
    Profile2D::new(vec![
        Point2::new(-half_web - flange_width, -half_depth),
        Point2::new(half_web, -half_depth),
        Point2::new(half_web, half_depth - flange_thickness),
        Point2::new(half_web + flange_width, half_depth - flange_thickness),
        Point2::new(half_web + flange_width, half_depth),
        Point2::new(-half_web, half_depth),
        Point2::new(-half_web, -half_depth + flange_thickness),
        Point2::new(-half_web - flange_width, -half_depth + flange_thickness),
    ])
}

/// Where the profile sits relative to the member axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ProfileAlignment {
    /// Geometric center on the axis
    Centered,
    /// Top edge on the axis (Y offset = -half height)
    TopCenter,
}

impl ProfileAlignment {
    /// Beams hang from their axis; braces only for wide-flange shapes;
    /// everything else is centred.
    pub fn for_member(class: ElementClass, section_type: &SectionType) -> Self {
        match class {
            ElementClass::Beam => Self::TopCenter,
            ElementClass::Brace if section_type.is_flanged() => Self::TopCenter,
            _ => Self::Centered,
        }
    }

    /// Profile position offset for `shape`
    pub fn offset(&self, shape: &ProfileShape) -> Vector2<f64> {
        match self {
            Self::Centered => Vector2::zeros(),
            Self::TopCenter => Vector2::new(0.0, -shape.half_height()),
        }
    }
}

/// Structural cache key of a resolved profile
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    pub section: SectionKey,
    pub alignment: ProfileAlignment,
    /// Set for unsupported tags, whose fallback size depends on the class
    pub fallback_class: Option<ElementClass>,
}

/// Profile ready for the authoring backend
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDescriptor {
    /// Section family; `None` for arbitrary outlines
    pub section_type: Option<SectionType>,
    pub shape: ProfileShape,
    pub alignment: ProfileAlignment,
    /// Position offset of the profile in its own plane
    pub offset: Vector2<f64>,
    pub name: String,
    /// Cache key; `None` for one-off outlines
    pub key: Option<ProfileKey>,
    /// Why an approximation was used, when the section was not supported
    pub fallback: Option<String>,
}

impl ProfileDescriptor {
    /// One-off profile from an arbitrary outline
    pub fn polygon(name: impl Into<String>, points: Vec<Point2<f64>>) -> Self {
        Self {
            section_type: None,
            shape: ProfileShape::Polygon { points },
            alignment: ProfileAlignment::Centered,
            offset: Vector2::zeros(),
            name: name.into(),
            key: None,
            fallback: None,
        }
    }

    /// One-off centred rectangle (opening voids)
    pub fn rectangle(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            section_type: Some(SectionType::Rectangle),
            shape: ProfileShape::Rectangle { width, height },
            alignment: ProfileAlignment::Centered,
            offset: Vector2::zeros(),
            name: name.into(),
            key: None,
            fallback: None,
        }
    }

    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Outline with the alignment offset applied
    pub fn outline(&self, circle_segments: usize) -> Profile2D {
        let mut profile = self.shape.outline(circle_segments);
        profile.translate(&self.offset);
        profile
    }
}
