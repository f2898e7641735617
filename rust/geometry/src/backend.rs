// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authoring backend boundary
//!
//! The engine never writes model entities itself. Everything it produces is
//! handed to an [`AuthoringBackend`], which returns opaque handles. A backend
//! that cannot represent a tapered sweep answers with
//! [`Representation::Rejected`] and the caller walks its fallback chain.
//!
//! [`RecordingBackend`] keeps everything in memory and is what tests and dry
//! runs use.

use crate::error::{Error, Result};
use crate::placement::PlacementResult;
use crate::profile::ProfileDescriptor;
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use stbifc_core::{ElementClass, IfcGuid};
use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

handle!(
    /// Handle to a profile definition
    ProfileHandle
);
handle!(
    /// Handle to a solid representation item
    SolidHandle
);
handle!(
    /// Handle to an object placement
    PlacementHandle
);
handle!(
    /// Handle to a produced element
    ElementHandle
);

/// Outcome of a representation request the backend may decline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation<T> {
    Accepted(T),
    Rejected { reason: String },
}

impl<T> Representation<T> {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Position of a solid in its element's local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolidPosition {
    pub origin: Point3<f64>,
    pub axis: Vector3<f64>,
    pub ref_direction: Vector3<f64>,
}

impl SolidPosition {
    /// Axis-aligned position at `origin`
    pub fn at(origin: Point3<f64>) -> Self {
        Self {
            origin,
            axis: Vector3::z(),
            ref_direction: Vector3::x(),
        }
    }
}

/// Straight directrix of a swept solid, in element-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spine {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Spine {
    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// What kind of entity an [`ElementRecord`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EntityKind {
    Member(ElementClass),
    Opening,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(class) => write!(f, "{}", class),
            Self::Opening => f.write_str("opening"),
        }
    }
}

/// Everything the backend needs to emit one element
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementRecord {
    pub kind: EntityKind,
    pub guid: IfcGuid,
    pub name: String,
    pub tag: String,
    pub placement: PlacementHandle,
    pub solids: SmallVec<[SolidHandle; 1]>,
    /// Display name of the main profile, if any
    pub profile_name: Option<String>,
}

/// Sink for produced geometry and elements
pub trait AuthoringBackend {
    fn create_profile(&mut self, profile: &ProfileDescriptor) -> Result<ProfileHandle>;

    fn create_extruded_solid(
        &mut self,
        profile: ProfileHandle,
        position: &SolidPosition,
        direction: &Vector3<f64>,
        depth: f64,
    ) -> Result<SolidHandle>;

    /// Continuous sweep between two sections
    fn create_swept_solid(
        &mut self,
        start: ProfileHandle,
        end: ProfileHandle,
        spine: &Spine,
    ) -> Result<Representation<SolidHandle>>;

    /// Cross sections placed along a spine
    fn create_sectioned_spine(
        &mut self,
        sections: &[ProfileHandle],
        spine: &Spine,
    ) -> Result<Representation<SolidHandle>>;

    fn create_placement(&mut self, placement: &PlacementResult) -> Result<PlacementHandle>;

    /// Solid subtracted from a host; always extruded along local +Z
    fn create_void_solid(
        &mut self,
        profile: ProfileHandle,
        position: &SolidPosition,
        depth: f64,
    ) -> Result<SolidHandle>;

    fn create_element(&mut self, record: &ElementRecord) -> Result<ElementHandle>;

    /// Link `opening` as a void of `host`
    fn relate_voids(&mut self, host: ElementHandle, opening: ElementHandle, name: &str)
        -> Result<()>;
}

/// Solid as recorded by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum SolidRecord {
    Extruded {
        profile: ProfileHandle,
        position: SolidPosition,
        direction: Vector3<f64>,
        depth: f64,
    },
    Swept {
        start: ProfileHandle,
        end: ProfileHandle,
        spine: Spine,
    },
    Sectioned {
        sections: Vec<ProfileHandle>,
        spine: Spine,
    },
    Void {
        profile: ProfileHandle,
        position: SolidPosition,
        depth: f64,
    },
}

/// Host/opening link as recorded by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoidRelation {
    pub host: ElementHandle,
    pub opening: ElementHandle,
    pub name: String,
}

/// In-memory arena backend
#[derive(Debug, Default)]
pub struct RecordingBackend {
    profiles: Vec<ProfileDescriptor>,
    solids: Vec<SolidRecord>,
    placements: Vec<PlacementResult>,
    elements: Vec<ElementRecord>,
    void_relations: Vec<VoidRelation>,
    reject_swept: bool,
    reject_sectioned: bool,
    failing_names: Vec<String>,
}

fn next_index<T>(arena: &[T]) -> Result<u32> {
    u32::try_from(arena.len()).map_err(|_| Error::Backend("arena exhausted".to_string()))
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decline continuous sweeps, like writers limited to older schemas
    pub fn rejecting_sweeps(mut self) -> Self {
        self.reject_swept = true;
        self
    }

    /// Decline sectioned spines
    pub fn rejecting_sectioned_spines(mut self) -> Self {
        self.reject_sectioned = true;
        self
    }

    /// Fail hard when an element with `name` is created
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.failing_names.push(name.into());
        self
    }

    pub fn profile(&self, handle: ProfileHandle) -> Option<&ProfileDescriptor> {
        self.profiles.get(handle.0 as usize)
    }

    pub fn solid(&self, handle: SolidHandle) -> Option<&SolidRecord> {
        self.solids.get(handle.0 as usize)
    }

    pub fn placement(&self, handle: PlacementHandle) -> Option<&PlacementResult> {
        self.placements.get(handle.0 as usize)
    }

    pub fn element(&self, handle: ElementHandle) -> Option<&ElementRecord> {
        self.elements.get(handle.0 as usize)
    }

    pub fn profiles(&self) -> &[ProfileDescriptor] {
        &self.profiles
    }

    pub fn solids(&self) -> &[SolidRecord] {
        &self.solids
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn void_relations(&self) -> &[VoidRelation] {
        &self.void_relations
    }

    /// Elements of one kind, in creation order
    pub fn elements_of(&self, kind: EntityKind) -> impl Iterator<Item = &ElementRecord> {
        self.elements.iter().filter(move |record| record.kind == kind)
    }

    pub fn element_named(&self, name: &str) -> Option<&ElementRecord> {
        self.elements.iter().find(|record| record.name == name)
    }

    fn push_solid(&mut self, solid: SolidRecord) -> Result<SolidHandle> {
        let handle = SolidHandle(next_index(&self.solids)?);
        self.solids.push(solid);
        Ok(handle)
    }

    fn check_profile(&self, handle: ProfileHandle) -> Result<()> {
        if self.profile(handle).is_some() {
            Ok(())
        } else {
            Err(Error::Backend(format!("unknown profile {}", handle)))
        }
    }
}

impl AuthoringBackend for RecordingBackend {
    fn create_profile(&mut self, profile: &ProfileDescriptor) -> Result<ProfileHandle> {
        let handle = ProfileHandle(next_index(&self.profiles)?);
        self.profiles.push(profile.clone());
        Ok(handle)
    }

    fn create_extruded_solid(
        &mut self,
        profile: ProfileHandle,
        position: &SolidPosition,
        direction: &Vector3<f64>,
        depth: f64,
    ) -> Result<SolidHandle> {
        self.check_profile(profile)?;
        self.push_solid(SolidRecord::Extruded {
            profile,
            position: *position,
            direction: *direction,
            depth,
        })
    }

    fn create_swept_solid(
        &mut self,
        start: ProfileHandle,
        end: ProfileHandle,
        spine: &Spine,
    ) -> Result<Representation<SolidHandle>> {
        if self.reject_swept {
            return Ok(Representation::rejected("tapered sweeps are not supported"));
        }
        self.check_profile(start)?;
        self.check_profile(end)?;
        let handle = self.push_solid(SolidRecord::Swept {
            start,
            end,
            spine: *spine,
        })?;
        Ok(Representation::Accepted(handle))
    }

    fn create_sectioned_spine(
        &mut self,
        sections: &[ProfileHandle],
        spine: &Spine,
    ) -> Result<Representation<SolidHandle>> {
        if self.reject_sectioned {
            return Ok(Representation::rejected("sectioned spines are not supported"));
        }
        for section in sections {
            self.check_profile(*section)?;
        }
        let handle = self.push_solid(SolidRecord::Sectioned {
            sections: sections.to_vec(),
            spine: *spine,
        })?;
        Ok(Representation::Accepted(handle))
    }

    fn create_placement(&mut self, placement: &PlacementResult) -> Result<PlacementHandle> {
        if let Some(parent) = placement.parent {
            if self.placement(parent).is_none() {
                return Err(Error::Backend(format!("unknown parent placement {}", parent)));
            }
        }
        let handle = PlacementHandle(next_index(&self.placements)?);
        self.placements.push(placement.clone());
        Ok(handle)
    }

    fn create_void_solid(
        &mut self,
        profile: ProfileHandle,
        position: &SolidPosition,
        depth: f64,
    ) -> Result<SolidHandle> {
        self.check_profile(profile)?;
        self.push_solid(SolidRecord::Void {
            profile,
            position: *position,
            depth,
        })
    }

    fn create_element(&mut self, record: &ElementRecord) -> Result<ElementHandle> {
        if self.failing_names.iter().any(|name| *name == record.name) {
            return Err(Error::Backend(format!("refused to create '{}'", record.name)));
        }
        let handle = ElementHandle(next_index(&self.elements)?);
        self.elements.push(record.clone());
        Ok(handle)
    }

    fn relate_voids(
        &mut self,
        host: ElementHandle,
        opening: ElementHandle,
        name: &str,
    ) -> Result<()> {
        if self.element(host).is_none() || self.element(opening).is_none() {
            return Err(Error::Backend(format!(
                "void relation {} between unknown elements {} and {}",
                name, host, opening
            )));
        }
        self.void_relations.push(VoidRelation {
            host,
            opening,
            name: name.to_string(),
        });
        Ok(())
    }
}
