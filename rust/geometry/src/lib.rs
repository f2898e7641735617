// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STB-IFC Geometry Processing
//!
//! Turns structural element definitions into authoring calls: member
//! frames, 2D profiles, extruded and tapered solids, haunch segments,
//! placements and wall openings. Math is done with nalgebra; the actual
//! model entities are created through an [`AuthoringBackend`].
//!
//! ```rust,ignore
//! use stbifc_geometry::{DefaultIdentityProvider, ElementRouter, RecordingBackend};
//!
//! let router = ElementRouter::new();
//! let mut backend = RecordingBackend::new();
//! let identity = DefaultIdentityProvider;
//! let mut ctx = router.context(&mut backend, &identity);
//! let produced = router.process(&definition, &mut ctx)?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod extrusion;
pub mod face;
pub mod frame;
pub mod haunch;
pub mod identity;
pub mod opening;
pub mod placement;
pub mod processors;
pub mod profile;
pub mod profiles;
pub mod router;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use backend::{
    AuthoringBackend, ElementHandle, ElementRecord, EntityKind, PlacementHandle, ProfileHandle,
    RecordingBackend, Representation, SolidHandle, SolidPosition, Spine,
};
pub use config::GeometryConfig;
pub use error::{Error, Result};
pub use extrusion::{ExtrusionAnchor, ExtrusionGeometryBuilder, GeometryKind, GeometryResult};
pub use face::{FaceFrame, FaceFrameBuilder};
pub use frame::{CoordinateFrame, CoordinateFrameBuilder};
pub use haunch::{HaunchSegment, HaunchSegmenter};
pub use identity::{DefaultIdentityProvider, DeterministicIdentityProvider, IdentityProvider};
pub use opening::{OpeningGeometry, OpeningGeometryBuilder};
pub use placement::{PlacementCalculator, PlacementResult};
pub use processors::{
    ColumnProcessor, FoundationProcessor, LinearMemberProcessor, SlabProcessor, WallProcessor,
};
pub use profile::{Profile2D, ProfileAlignment, ProfileDescriptor, ProfileKey, ProfileShape};
pub use profiles::{CacheStats, ProfileFactory};
pub use router::{
    BuildContext, ElementGeometry, ElementProcessor, ElementRouter, GeometryWarning,
    OpeningOutput, WarningKind,
};
