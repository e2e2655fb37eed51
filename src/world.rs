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

//! What the caches need to know about the rest of the simulation.
//!
//! The caches never own map state. They read it through [`GroundMap`] and
//! [`WaterBodies`], and are told about buildings through [`ServiceArea`].

use crate::coords::*;

/// Static ground type of a tile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TerrainKind {
    /// constructible land
    Land,
    /// coastline, constructible only by buildings that need the coast
    Coast,
    Water,
}

impl TerrainKind {
    #[inline]
    pub fn is_land_or_coast(self) -> bool {
        matches!(self, TerrainKind::Land | TerrainKind::Coast)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettlementId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaterBodyId(pub u32);

/// Object standing on a tile (building, tree, field...).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlacedObject {
    /// a new building may replace this object (e.g. trees)
    pub buildable_upon: bool,
}

/// Read access to the ground tiles of one island.
pub trait GroundMap {
    /// all coordinates that have a tile
    fn coords(&self) -> impl Iterator<Item = Coord> + '_;

    /// ground type of the tile, None if there is no tile at all
    fn terrain(&self, c: Coord) -> Option<TerrainKind>;

    fn owner(&self, c: Coord) -> Option<SettlementId>;

    fn placed_object(&self, c: Coord) -> Option<PlacedObject>;

    /// true when nothing blocking stands on the tile
    #[inline]
    fn is_unobstructed(&self, c: Coord) -> bool {
        self.placed_object(c).map_or(true, |o| o.buildable_upon)
    }
}

/// Which body of water a coordinate belongs to, if any.
pub trait WaterBodies {
    fn water_body(&self, c: Coord) -> Option<WaterBodyId>;
}

/// Area served by a building: its footprint plus everything within `radius` of it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ServiceArea {
    pub anchor: Coord,
    pub footprint: Footprint,
    pub radius: i32,
}

impl ServiceArea {
    pub fn new(anchor: Coord, footprint: Footprint, radius: i32) -> Self {
        Self {
            anchor,
            footprint,
            radius,
        }
    }

    /// all coordinates covered, footprint included
    #[inline]
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        self.footprint.radius_coords(self.anchor, self.radius)
    }
}
