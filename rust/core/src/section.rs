// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-section descriptors
//!
//! A section is a shape tag plus a bag of named dimensions, exactly as the
//! upstream parser hands it over. Equality is structural (tag + dimension
//! values); the display name never takes part in comparisons or cache keys.

use crate::error::{Error, Result};
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Well-known dimension keys
pub mod keys {
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const WIDTH_X: &str = "width_x";
    pub const WIDTH_Y: &str = "width_y";
    pub const THICKNESS: &str = "thickness";
    pub const WALL_THICKNESS: &str = "wall_thickness";
    pub const RADIUS: &str = "radius";
    pub const DIAMETER: &str = "diameter";
    pub const OUTER_DIAMETER: &str = "outer_diameter";
    pub const OUTER_WIDTH: &str = "outer_width";
    pub const OUTER_HEIGHT: &str = "outer_height";
    pub const OVERALL_WIDTH: &str = "overall_width";
    pub const OVERALL_DEPTH: &str = "overall_depth";
    pub const WEB_THICKNESS: &str = "web_thickness";
    pub const FLANGE_THICKNESS: &str = "flange_thickness";
    pub const FLANGE_WIDTH: &str = "flange_width";
    pub const FILLET_RADIUS: &str = "fillet_radius";
}

/// Section shape family
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum SectionType {
    Rectangle,
    /// Wide-flange H / I shapes
    H,
    /// Rectangular hollow section
    Box,
    /// Circular hollow section
    Pipe,
    Circle,
    /// Channel (C / U)
    Channel,
    /// Two channels, approximated by a single wide channel
    CompoundChannel,
    /// Angle (L)
    Angle,
    /// Two angles, approximated by a single angle
    CompoundAngle,
    Tee,
    FlatBar,
    Zee,
    /// Steel-reinforced concrete; the concrete outline governs geometry
    SrcComposite,
    /// Unrecognised tag, carried verbatim
    Other(String),
}

impl SectionType {
    /// Resolve a tag (or one of its aliases) into a section type.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unknown tags are kept as [`SectionType::Other`] so that the caller can
    /// decide how to degrade.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "RECTANGLE" | "RECT" => Self::Rectangle,
            "H" | "I" | "IBEAM" | "I_BEAM" | "HW" | "HM" | "HN" | "SH" | "H_SHAPE" => Self::H,
            "BOX" | "BCR" | "BCP" | "SHS" | "RHS" | "STKR" => Self::Box,
            "PIPE" | "P" | "STK" | "CHS" => Self::Pipe,
            "CIRCLE" | "ROUND" => Self::Circle,
            "C" | "CHANNEL" | "U" => Self::Channel,
            "COMPOUND_CHANNEL" | "2C" | "DOUBLE_CHANNEL" => Self::CompoundChannel,
            "L" | "ANGLE" => Self::Angle,
            "COMPOUND_L" | "2L" | "DOUBLE_ANGLE" => Self::CompoundAngle,
            "T" | "CT" | "TEE" => Self::Tee,
            "FLAT_BAR" | "FB" | "PL" | "FLAT" => Self::FlatBar,
            "Z" => Self::Zee,
            "SRC_COMPOSITE" | "SRC" => Self::SrcComposite,
            _ => Self::Other(normalized),
        }
    }

    /// Canonical tag string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rectangle => "RECTANGLE",
            Self::H => "H",
            Self::Box => "BOX",
            Self::Pipe => "PIPE",
            Self::Circle => "CIRCLE",
            Self::Channel => "C",
            Self::CompoundChannel => "COMPOUND_CHANNEL",
            Self::Angle => "L",
            Self::CompoundAngle => "COMPOUND_L",
            Self::Tee => "T",
            Self::FlatBar => "FLAT_BAR",
            Self::Zee => "Z",
            Self::SrcComposite => "SRC_COMPOSITE",
            Self::Other(tag) => tag,
        }
    }

    /// True for wide-flange shapes (the only family braces align top-center)
    #[inline]
    pub fn is_flanged(&self) -> bool {
        matches!(self, Self::H)
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SectionType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl From<String> for SectionType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<SectionType> for String {
    fn from(section_type: SectionType) -> Self {
        section_type.as_str().to_string()
    }
}

/// Section as delivered by the upstream parser
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionDescriptor {
    pub section_type: SectionType,
    /// Display name from the source model (e.g. "H-400x200x8x13")
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dimensions: BTreeMap<String, f64>,
}

impl SectionDescriptor {
    /// Create a descriptor with no dimensions
    pub fn new(section_type: impl Into<SectionType>) -> Self {
        Self {
            section_type: section_type.into(),
            name: None,
            dimensions: BTreeMap::new(),
        }
    }

    /// Builder-style dimension setter
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.dimensions.insert(key.to_string(), value);
        self
    }

    /// Builder-style display name setter
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Rectangle shorthand
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(SectionType::Rectangle)
            .with(keys::WIDTH, width)
            .with(keys::HEIGHT, height)
    }

    /// H-shape shorthand: depth x width x web x flange
    pub fn h_shape(depth: f64, width: f64, web: f64, flange: f64) -> Self {
        Self::new(SectionType::H)
            .with(keys::OVERALL_DEPTH, depth)
            .with(keys::OVERALL_WIDTH, width)
            .with(keys::WEB_THICKNESS, web)
            .with(keys::FLANGE_THICKNESS, flange)
    }

    #[inline]
    pub fn dimension(&self, key: &str) -> Option<f64> {
        self.dimensions.get(key).copied()
    }

    /// First present value among alternative keys
    pub fn first_of(&self, candidates: &[&str]) -> Option<f64> {
        candidates.iter().find_map(|key| self.dimension(key))
    }

    /// Canonical structural key used for caching
    pub fn key(&self) -> SectionKey {
        SectionKey::from(self)
    }

    /// Linearly blend the dimensions of two same-type sections.
    ///
    /// `t = 0` yields `self`, `t = 1` yields `other`. Dimensions present on
    /// only one side keep that side's value.
    pub fn interpolate(&self, other: &SectionDescriptor, t: f64) -> Result<SectionDescriptor> {
        if self.section_type != other.section_type {
            return Err(Error::Interpolation(format!(
                "{} and {} are different section types",
                self.section_type, other.section_type
            )));
        }
        if !(0.0..=1.0).contains(&t) {
            return Err(Error::Interpolation(format!(
                "ratio {} outside [0, 1]",
                t
            )));
        }

        let mut dimensions = self.dimensions.clone();
        for (key, end) in &other.dimensions {
            let blended = match self.dimensions.get(key) {
                Some(start) => start + (end - start) * t,
                None => *end,
            };
            dimensions.insert(key.clone(), blended);
        }

        Ok(SectionDescriptor {
            section_type: self.section_type.clone(),
            name: None,
            dimensions,
        })
    }
}

impl PartialEq for SectionDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.section_type == other.section_type && self.dimensions == other.dimensions
    }
}

impl fmt::Display for SectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.section_type),
            None => write!(f, "{}", self.section_type),
        }
    }
}

/// Hashable structural identity of a section: tag plus sorted dimension bits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionKey {
    section_type: SectionType,
    dimensions: SmallVec<[(String, u64); 6]>,
}

impl SectionKey {
    #[inline]
    pub fn section_type(&self) -> &SectionType {
        &self.section_type
    }

    /// 64-bit fingerprint, handy for logging
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl From<&SectionDescriptor> for SectionKey {
    fn from(section: &SectionDescriptor) -> Self {
        // BTreeMap iteration is already sorted by key
        let dimensions = section
            .dimensions
            .iter()
            .map(|(name, value)| (name.clone(), canonical_bits(*value)))
            .collect();
        Self {
            section_type: section.section_type.clone(),
            dimensions,
        }
    }
}

#[inline]
fn canonical_bits(value: f64) -> u64 {
    // -0.0 == 0.0 but their bit patterns differ
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}
