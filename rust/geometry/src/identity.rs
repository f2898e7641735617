// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GlobalId assignment for produced elements

use stbifc_core::{ElementIdentity, IfcGuid};

/// Supplies GlobalIds for elements, segments and openings
pub trait IdentityProvider {
    /// GUID of an element carried over from the source model
    fn element_guid(&self, identity: &ElementIdentity) -> IfcGuid;

    /// GUID of an opening cut into `host`
    fn opening_guid(&self, host: &ElementIdentity, opening_id: &str) -> IfcGuid;

    /// Deterministic GUID for a derived entity (haunch segments)
    fn derived_guid(&self, seed: &str) -> IfcGuid {
        IfcGuid::derived(seed)
    }
}

fn parse_external(identity: &ElementIdentity) -> Option<IfcGuid> {
    let external = identity.external_id.as_deref()?;
    match IfcGuid::parse(external) {
        Ok(guid) => Some(guid),
        Err(e) => {
            tracing::debug!(element = %identity, error = %e, "ignoring unusable source id");
            None
        }
    }
}

/// Keeps usable source ids, otherwise generates random ones
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIdentityProvider;

impl IdentityProvider for DefaultIdentityProvider {
    fn element_guid(&self, identity: &ElementIdentity) -> IfcGuid {
        parse_external(identity).unwrap_or_else(IfcGuid::new_random)
    }

    fn opening_guid(&self, _host: &ElementIdentity, _opening_id: &str) -> IfcGuid {
        IfcGuid::new_random()
    }
}

/// Reproducible ids: every GUID is derived from names, so runs compare equal
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicIdentityProvider;

impl IdentityProvider for DeterministicIdentityProvider {
    fn element_guid(&self, identity: &ElementIdentity) -> IfcGuid {
        parse_external(identity).unwrap_or_else(|| {
            IfcGuid::derived(&format!("{}_{}", identity.name, identity.tag))
        })
    }

    fn opening_guid(&self, host: &ElementIdentity, opening_id: &str) -> IfcGuid {
        IfcGuid::derived(&format!("{}_opening_{}", host.seed(), opening_id))
    }
}
