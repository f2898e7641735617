// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry engine tuning knobs

use stbifc_core::{ElementClass, NamingMode};

/// Numeric tolerances and defaults used by the builders
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryConfig {
    /// Length below which a vector counts as zero
    pub tolerance: f64,
    /// |axis.z| above this makes a column "vertical"
    pub vertical_threshold: f64,
    /// Newell normal length below which a polygon is degenerate
    pub normal_epsilon: f64,
    /// Extra depth added to each face of an opening solid
    pub opening_clearance: f64,
    /// Segments used to render circular outlines
    pub circle_segments: usize,
    /// Interpolated steps for tapered columns (0 disables the approximation)
    pub taper_steps: usize,
    pub default_wall_thickness: f64,
    pub default_slab_thickness: f64,
    /// Opening size (width, height) when the definition omits it
    pub default_opening_size: (f64, f64),
    /// Wall (length, height) when neither explicit extent nor outline is usable
    pub default_wall_extent: (f64, f64),
    /// Pile diameter when the section gives none
    pub default_pile_diameter: f64,
    /// Footing plan size (x, y) and depth when the definition omits them
    pub default_footing_size: (f64, f64),
    pub default_footing_depth: f64,
    pub naming: NamingMode,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            vertical_threshold: 0.9,
            normal_epsilon: 1e-9,
            opening_clearance: 1.0,
            circle_segments: 24,
            taper_steps: 0,
            default_wall_thickness: 250.0,
            default_slab_thickness: 150.0,
            default_opening_size: (1000.0, 2000.0),
            default_wall_extent: (6000.0, 4500.0),
            default_pile_diameter: 500.0,
            default_footing_size: (1000.0, 1000.0),
            default_footing_depth: 1000.0,
            naming: NamingMode::Legacy,
        }
    }
}

impl GeometryConfig {
    /// Rectangle (width, height) used when a section cannot be resolved
    pub fn fallback_rectangle(&self, class: ElementClass) -> (f64, f64) {
        match class {
            ElementClass::Column => (600.0, 600.0),
            ElementClass::Brace => (100.0, 100.0),
            ElementClass::Pile => (self.default_pile_diameter, self.default_pile_diameter),
            ElementClass::Footing => self.default_footing_size,
            ElementClass::Beam | ElementClass::Wall | ElementClass::Slab => (300.0, 600.0),
        }
    }
}
