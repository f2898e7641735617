// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural element definitions
//!
//! Definitions are built once by the upstream parser and consumed read-only
//! by the geometry engine.

use crate::error::{Error, Result};
use crate::section::SectionDescriptor;
use nalgebra::Point3;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Point in project length units
pub type Point3D = Point3<f64>;

/// Polygon corners; walls and slabs are almost always quadrilaterals
pub type Polygon = SmallVec<[Point3D; 4]>;

/// Element class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ElementClass {
    Beam,
    Column,
    Brace,
    Wall,
    Slab,
    Pile,
    Footing,
}

impl ElementClass {
    pub const ALL: [ElementClass; 7] = [
        ElementClass::Beam,
        ElementClass::Column,
        ElementClass::Brace,
        ElementClass::Wall,
        ElementClass::Slab,
        ElementClass::Pile,
        ElementClass::Footing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beam => "beam",
            Self::Column => "column",
            Self::Brace => "brace",
            Self::Wall => "wall",
            Self::Slab => "slab",
            Self::Pile => "pile",
            Self::Footing => "footing",
        }
    }

    /// Members defined by two endpoints
    #[inline]
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Beam | Self::Column | Self::Brace | Self::Pile)
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identity carried through from the source model
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementIdentity {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tag: String,
    /// Source GUID, if the source model provides one
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub external_id: Option<String>,
}

impl ElementIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: String::new(),
            external_id: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Seed used for derived identifiers; falls back to the name
    pub fn seed(&self) -> &str {
        self.external_id.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for ElementIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.external_id {
            Some(id) => write!(f, "{} [{}]", self.name, id),
            None => f.write_str(&self.name),
        }
    }
}

/// Section zone of a haunched beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum HaunchZone {
    Start,
    Center,
    End,
}

impl HaunchZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Center => "CENTER",
            Self::End => "END",
        }
    }
}

impl fmt::Display for HaunchZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HaunchZone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "START" => Ok(Self::Start),
            "CENTER" | "CENTRE" => Ok(Self::Center),
            "END" => Ok(Self::End),
            other => Err(Error::UnknownZone(other.to_string())),
        }
    }
}

/// Zone sections and haunch lengths of a haunched beam
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HaunchSections {
    pub zones: BTreeMap<HaunchZone, SectionDescriptor>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub haunch_start: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub haunch_end: f64,
}

impl HaunchSections {
    pub fn new(haunch_start: f64, haunch_end: f64) -> Self {
        Self {
            zones: BTreeMap::new(),
            haunch_start,
            haunch_end,
        }
    }

    pub fn with_zone(mut self, zone: HaunchZone, section: SectionDescriptor) -> Self {
        self.zones.insert(zone, section);
        self
    }

    #[inline]
    pub fn section(&self, zone: HaunchZone) -> Option<&SectionDescriptor> {
        self.zones.get(&zone)
    }
}

/// Cross-section assignment of a linear member
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum MemberSections {
    Uniform { section: SectionDescriptor },
    Tapered {
        start: SectionDescriptor,
        end: SectionDescriptor,
    },
    Haunch(HaunchSections),
}

impl MemberSections {
    pub fn uniform(section: SectionDescriptor) -> Self {
        Self::Uniform { section }
    }

    pub fn tapered(start: SectionDescriptor, end: SectionDescriptor) -> Self {
        Self::Tapered { start, end }
    }

    /// Every section referenced by this assignment
    pub fn sections(&self) -> SmallVec<[&SectionDescriptor; 3]> {
        match self {
            Self::Uniform { section } => smallvec::smallvec![section],
            Self::Tapered { start, end } => smallvec::smallvec![start, end],
            Self::Haunch(haunch) => haunch.zones.values().collect(),
        }
    }
}

/// Beam or brace
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearMember {
    pub identity: ElementIdentity,
    pub start: Point3D,
    pub end: Point3D,
    pub sections: MemberSections,
}

impl LinearMember {
    pub fn new(
        identity: ElementIdentity,
        start: Point3D,
        end: Point3D,
        sections: MemberSections,
    ) -> Self {
        Self {
            identity,
            start,
            end,
            sections,
        }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    #[inline]
    pub fn midpoint(&self) -> Point3D {
        nalgebra::center(&self.start, &self.end)
    }
}

fn default_reference_direction() -> bool {
    true
}

/// Column with orientation flags
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnMember {
    pub identity: ElementIdentity,
    pub bottom: Point3D,
    pub top: Point3D,
    pub sections: MemberSections,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation_radians: f64,
    /// False selects the alternate section orientation (adds a quarter turn)
    #[cfg_attr(feature = "serde", serde(default = "default_reference_direction"))]
    pub is_reference_direction: bool,
}

impl ColumnMember {
    pub fn new(
        identity: ElementIdentity,
        bottom: Point3D,
        top: Point3D,
        sections: MemberSections,
    ) -> Self {
        Self {
            identity,
            bottom,
            top,
            sections,
            rotation_radians: 0.0,
            is_reference_direction: default_reference_direction(),
        }
    }

    pub fn with_rotation(mut self, rotation_radians: f64, is_reference_direction: bool) -> Self {
        self.rotation_radians = rotation_radians;
        self.is_reference_direction = is_reference_direction;
        self
    }

    #[inline]
    pub fn height(&self) -> f64 {
        (self.top - self.bottom).norm()
    }
}

/// Rectangular opening in a wall, positioned from the wall's lower-left corner
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpeningDefinition {
    pub id: String,
    /// Offset along the wall length
    pub offset_x: f64,
    /// Offset up the wall height
    pub offset_y: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Option<f64>,
}

impl OpeningDefinition {
    pub fn new(id: impl Into<String>, offset_x: f64, offset_y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            offset_x,
            offset_y,
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Overall wall dimensions used to center openings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallExtent {
    pub length: f64,
    pub height: f64,
}

/// Wall or slab defined by an ordered polygon
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarMember {
    pub identity: ElementIdentity,
    pub points: Polygon,
    #[cfg_attr(feature = "serde", serde(default))]
    pub center: Option<Point3D>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub thickness: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extent: Option<WallExtent>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub openings: Vec<OpeningDefinition>,
}

impl PlanarMember {
    pub fn new(identity: ElementIdentity, points: impl IntoIterator<Item = Point3D>) -> Self {
        Self {
            identity,
            points: points.into_iter().collect(),
            center: None,
            thickness: None,
            extent: None,
            openings: Vec::new(),
        }
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn with_extent(mut self, length: f64, height: f64) -> Self {
        self.extent = Some(WallExtent { length, height });
        self
    }

    pub fn with_opening(mut self, opening: OpeningDefinition) -> Self {
        self.openings.push(opening);
        self
    }
}

/// Pile, extruded from its bottom point to its top point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PileMember {
    pub identity: ElementIdentity,
    pub bottom: Point3D,
    pub top: Point3D,
    /// Usually a circle; `None` uses the default pile diameter
    #[cfg_attr(feature = "serde", serde(default))]
    pub section: Option<SectionDescriptor>,
}

impl PileMember {
    pub fn new(identity: ElementIdentity, bottom: Point3D, top: Point3D) -> Self {
        Self {
            identity,
            bottom,
            top,
            section: None,
        }
    }

    pub fn with_section(mut self, section: SectionDescriptor) -> Self {
        self.section = Some(section);
        self
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.top - self.bottom).norm()
    }
}

/// Rectangular pad footing standing on `bottom`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FootingMember {
    pub identity: ElementIdentity,
    /// Center of the underside
    pub bottom: Point3D,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width_x: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width_y: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub depth: Option<f64>,
}

impl FootingMember {
    pub fn new(identity: ElementIdentity, bottom: Point3D) -> Self {
        Self {
            identity,
            bottom,
            width_x: None,
            width_y: None,
            depth: None,
        }
    }

    pub fn with_size(mut self, width_x: f64, width_y: f64, depth: f64) -> Self {
        self.width_x = Some(width_x);
        self.width_y = Some(width_y);
        self.depth = Some(depth);
        self
    }
}

/// Element definition as produced by the upstream parser
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum ElementDefinition {
    Beam(LinearMember),
    Column(ColumnMember),
    Brace(LinearMember),
    Wall(PlanarMember),
    Slab(PlanarMember),
    Pile(PileMember),
    Footing(FootingMember),
}

impl ElementDefinition {
    pub fn class(&self) -> ElementClass {
        match self {
            Self::Beam(_) => ElementClass::Beam,
            Self::Column(_) => ElementClass::Column,
            Self::Brace(_) => ElementClass::Brace,
            Self::Wall(_) => ElementClass::Wall,
            Self::Slab(_) => ElementClass::Slab,
            Self::Pile(_) => ElementClass::Pile,
            Self::Footing(_) => ElementClass::Footing,
        }
    }

    pub fn identity(&self) -> &ElementIdentity {
        match self {
            Self::Beam(m) | Self::Brace(m) => &m.identity,
            Self::Column(c) => &c.identity,
            Self::Wall(p) | Self::Slab(p) => &p.identity,
            Self::Pile(p) => &p.identity,
            Self::Footing(f) => &f.identity,
        }
    }

    /// Sections referenced by the element (empty for walls, slabs and footings)
    pub fn sections(&self) -> SmallVec<[&SectionDescriptor; 3]> {
        match self {
            Self::Beam(m) | Self::Brace(m) => m.sections.sections(),
            Self::Column(c) => c.sections.sections(),
            Self::Pile(p) => p.section.iter().collect(),
            Self::Wall(_) | Self::Slab(_) | Self::Footing(_) => SmallVec::new(),
        }
    }
}
