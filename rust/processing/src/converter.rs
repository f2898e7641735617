// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch conversion of element definitions.

use crate::config::ConversionConfig;
use crate::error::Result;
use crate::report::{ConversionReport, ElementFailure, ProducedElement};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use stbifc_core::{ElementClass, ElementDefinition, SectionDescriptor};
use stbifc_geometry::{
    AuthoringBackend, BuildContext, ElementGeometry, ElementRouter, IdentityProvider,
};

/// Converts element definitions through an [`ElementRouter`].
///
/// The router (and with it the profile cache) lives as long as the
/// converter, so repeated runs reuse resolved profiles.
pub struct StructuralConverter {
    config: ConversionConfig,
    router: ElementRouter,
}

impl StructuralConverter {
    pub fn new(config: ConversionConfig) -> Self {
        let router = ElementRouter::with_config(config.geometry.clone());
        Self { config, router }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn router(&self) -> &ElementRouter {
        &self.router
    }

    /// Convert one element in an existing build context.
    pub fn convert_element(
        &self,
        element: &ElementDefinition,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>> {
        Ok(self.router.process(element, ctx)?)
    }

    /// Resolve every section referenced by `elements` ahead of conversion.
    ///
    /// Returns the number of distinct profiles resolved.
    pub fn prewarm(&self, elements: &[ElementDefinition]) -> usize {
        let mut by_class: FxHashMap<ElementClass, Vec<&SectionDescriptor>> = FxHashMap::default();
        for element in elements {
            by_class
                .entry(element.class())
                .or_default()
                .extend(element.sections());
        }

        // Classes resolve independently; the factory cache is shared
        let profiles = self.router.profiles();
        by_class
            .par_iter()
            .map(|(class, sections)| profiles.prewarm(sections, *class))
            .sum()
    }

    /// Convert a batch in input order.
    ///
    /// Element errors are recorded in the report and the batch continues,
    /// unless `fail_fast` is set.
    pub fn convert(
        &self,
        elements: &[ElementDefinition],
        backend: &mut dyn AuthoringBackend,
        identity: &dyn IdentityProvider,
    ) -> ConversionReport {
        let start = std::time::Instant::now();
        tracing::info!(elements = elements.len(), "Starting structural conversion");

        if self.config.prewarm_profiles {
            let resolved = self.prewarm(elements);
            tracing::debug!(resolved, "Profile cache prewarmed");
        }

        let mut report = ConversionReport::default();
        let mut ctx = self.router.context(backend, identity);

        for (index, element) in elements.iter().enumerate() {
            let class = element.class();
            let counts = report.per_class.entry(class).or_default();
            counts.input += 1;

            match self.convert_element(element, &mut ctx) {
                Ok(produced) => {
                    counts.produced += produced.len();
                    report
                        .produced
                        .extend(produced.iter().map(|p| ProducedElement::new(class, p)));
                }
                Err(e) => {
                    counts.failed += 1;
                    let name = element.identity().name.clone();
                    tracing::warn!(element = %element.identity(), %class, error = %e, "Element skipped");
                    report.errors.push(ElementFailure {
                        element: name,
                        class,
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    });

                    if self.config.fail_fast {
                        report.aborted = true;
                        report.skipped = elements.len() - index - 1;
                        break;
                    }
                }
            }
        }

        report.warnings = ctx.take_warnings();
        report.profile_cache = self.router.profiles().cache_stats();
        report.total_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            produced = report.produced_count(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            total_time_ms = report.total_time_ms,
            "Structural conversion complete"
        );
        report
    }
}

impl Default for StructuralConverter {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}
