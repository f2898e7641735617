// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # STB-IFC Core
//!
//! Data model shared by the structural conversion pipeline.
//!
//! ## Overview
//!
//! - **Sections**: shape tag plus named dimensions, compared structurally
//! - **Element definitions**: beams, columns, braces, walls, slabs, piles and
//!   footings as handed over by the source-format parser
//! - **Identity**: IFC compressed GUIDs and deterministic derived ids
//! - **Naming**: standard profile names compatible with earlier output
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stbifc_core::{ElementDefinition, ElementIdentity, LinearMember, MemberSections, Point3D, SectionDescriptor};
//!
//! let beam = LinearMember::new(
//!     ElementIdentity::new("G1"),
//!     Point3D::new(0.0, 0.0, 0.0),
//!     Point3D::new(6000.0, 0.0, 0.0),
//!     MemberSections::uniform(SectionDescriptor::h_shape(400.0, 200.0, 8.0, 12.0)),
//! );
//! let definition = ElementDefinition::Beam(beam);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for element definitions

pub mod element;
pub mod error;
pub mod guid;
pub mod naming;
pub mod section;

pub use element::{
    ColumnMember, ElementClass, ElementDefinition, ElementIdentity, FootingMember, HaunchSections,
    HaunchZone, LinearMember, MemberSections, OpeningDefinition, PileMember, PlanarMember, Point3D,
    Polygon, WallExtent,
};
pub use error::{Error, Result};
pub use guid::IfcGuid;
pub use naming::NamingMode;
pub use section::{keys, SectionDescriptor, SectionKey, SectionType};
