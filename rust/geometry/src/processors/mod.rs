// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element Processors
//!
//! One processor per family of element classes:
//!
//! - `linear`: beams and braces, including haunch segmentation
//! - `column`: columns, extruded from the base with orientation flags
//! - `wall`: planar walls and their openings
//! - `slab`: planar slabs extruded downwards
//! - `foundation`: piles and pad footings extruded up from their base
//! - `helpers`: profile resolution and element emission shared by all of them

mod helpers;
mod linear;
mod column;
mod wall;
mod slab;
mod foundation;

#[cfg(test)]
mod tests;

pub use linear::LinearMemberProcessor;
pub use column::ColumnProcessor;
pub use wall::WallProcessor;
pub use slab::SlabProcessor;
pub use foundation::FoundationProcessor;
