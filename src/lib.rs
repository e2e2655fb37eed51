/* Incremental buildability caches for grid-based settlement maps.
Copyright (C) 2023  Alexander Pyattaev

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

#![doc = include_str!("../README.md")]

//!
//! # Cache families
//! - [`TerrainCapabilityIndex`]: static, computed once per island. Which anchors the ground allows.
//! - [`FullContainmentCache`]: anchors whose entire footprint is available.
//! - [`PartialOverlapCache`]: anchors whose footprint touches any available cell.
//! - [`SettlementBuildabilityCache`], [`FreeAreaCache`], [`CollectorCoverageCache`]:
//!   the above, fed from settlement claims, unclaimed land and building service areas.
//!
//! # Mutations
//! `add_area` requires every coordinate to be absent, `remove_area` requires every
//! coordinate to be present. Violations are bugs in the caller and panic, since a
//! half-applied update would poison every derived size.
//!
//! # Queries
//! Every cache is indexed by [`Footprint`], e.g. `cache[Footprint::new(3, 3)]`, and hands
//! out a plain [`AnchorSet`]. Combine layers with
//! [`TerrainCapabilityIndex::get_buildability_intersection`].

pub mod coords;
pub use crate::coords::*;

pub mod world;
pub use crate::world::*;

mod chain;

pub mod terrain;
pub use crate::terrain::*;

pub mod containment;
pub use crate::containment::*;

pub mod overlap;
pub use crate::overlap::*;

pub mod settlement;
pub use crate::settlement::*;

pub mod free_area;
pub use crate::free_area::*;

pub mod coverage;
pub use crate::coverage::*;

mod layers;

pub mod island;
pub use crate::island::*;
