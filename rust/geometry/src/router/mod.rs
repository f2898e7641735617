// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element Router - dispatch of element definitions to processors
//!
//! Routes each [`ElementDefinition`] to the processor registered for its
//! class. Processors share one [`BuildContext`] per run, which carries the
//! backend, the identity provider and the builders.

mod context;


pub use context::{BuildContext, GeometryWarning, WarningKind};

use crate::backend::{AuthoringBackend, ElementHandle, EntityKind, PlacementHandle, SolidHandle};
use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::extrusion::GeometryResult;
use crate::identity::IdentityProvider;
use crate::processors::{
    ColumnProcessor, FoundationProcessor, LinearMemberProcessor, SlabProcessor, WallProcessor,
};
use crate::profiles::ProfileFactory;
use stbifc_core::{ElementClass, ElementDefinition, IfcGuid};
use std::collections::HashMap;
use std::sync::Arc;

/// Element processor trait
/// Each processor handles one or more element classes
pub trait ElementProcessor {
    /// Build geometry and emit the element(s) through the context's backend.
    ///
    /// Returns one entry per produced element; haunched beams produce one per
    /// segment.
    fn process(
        &self,
        element: &ElementDefinition,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>>;

    /// Element classes handled by this processor
    fn supported_classes(&self) -> Vec<ElementClass>;
}

/// Opening produced in a wall
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningOutput {
    pub id: String,
    pub name: String,
    pub guid: IfcGuid,
    pub element: ElementHandle,
    pub placement: PlacementHandle,
    pub solid: SolidHandle,
}

/// One produced element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementGeometry {
    pub kind: EntityKind,
    pub name: String,
    pub tag: String,
    pub guid: IfcGuid,
    pub element: ElementHandle,
    pub placement: PlacementHandle,
    pub geometry: GeometryResult,
    pub openings: Vec<OpeningOutput>,
}

/// Element router - routes definitions to processors
pub struct ElementRouter {
    config: GeometryConfig,
    processors: HashMap<ElementClass, Arc<dyn ElementProcessor>>,
    profiles: Arc<ProfileFactory>,
}

impl ElementRouter {
    /// Create new router with default processors
    pub fn new() -> Self {
        Self::with_config(GeometryConfig::default())
    }

    /// Create router with custom tolerances and defaults
    pub fn with_config(config: GeometryConfig) -> Self {
        let profiles = Arc::new(ProfileFactory::new(&config));
        let mut router = Self {
            config,
            processors: HashMap::new(),
            profiles,
        };

        router.register(Box::new(LinearMemberProcessor::new()));
        router.register(Box::new(ColumnProcessor::new()));
        router.register(Box::new(WallProcessor::new()));
        router.register(Box::new(SlabProcessor::new()));
        router.register(Box::new(FoundationProcessor::new()));

        router
    }

    /// Register an element processor, replacing any for the same classes
    pub fn register(&mut self, processor: Box<dyn ElementProcessor>) {
        let processor_arc: Arc<dyn ElementProcessor> = Arc::from(processor);
        for class in processor_arc.supported_classes() {
            self.processors.insert(class, Arc::clone(&processor_arc));
        }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Shared profile factory (and its cache)
    pub fn profiles(&self) -> &Arc<ProfileFactory> {
        &self.profiles
    }

    /// Fresh context for one run against `backend`
    pub fn context<'a>(
        &'a self,
        backend: &'a mut dyn AuthoringBackend,
        identity: &'a dyn IdentityProvider,
    ) -> BuildContext<'a> {
        BuildContext::new(&self.config, &self.profiles, backend, identity)
    }

    /// Process one element
    pub fn process(
        &self,
        element: &ElementDefinition,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>> {
        let class = element.class();
        let processor = self
            .processors
            .get(&class)
            .ok_or(Error::UnsupportedElement(class))?;

        tracing::trace!(element = %element.identity(), %class, "processing element");
        let recorded = ctx.warnings().len();
        let result = processor.process(element, ctx);
        if result.is_err() {
            ctx.truncate_warnings(recorded);
        }
        result
    }
}

impl Default for ElementRouter {
    fn default() -> Self {
        Self::new()
    }
}
