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

//! Static terrain capability of an island, computed once when the island loads.
//!
//! For every [`TerrainRequirement`] and footprint the index holds the anchors where
//! the ground itself allows such a building, ignoring anything standing on it.
//!
//! Coastal buildings only come in square footprints (2x2 and 3x3), so
//! [`TerrainRequirement::LandAndCoast`] has no rectangular sizes.

use crate::coords::*;
use crate::world::*;
use hashbrown::HashMap;
use log::{debug, warn};

/// How far around a coastal building we look for the open sea.
pub const SEA_PROXIMITY_RADIUS: i32 = 3;

/// Ground a building needs under its footprint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TerrainRequirement {
    /// all cells are constructible land
    Land,
    /// land and coast cells, with at least one of each
    LandAndCoast,
    /// as [`TerrainRequirement::LandAndCoast`], and the open sea is within [`SEA_PROXIMITY_RADIUS`]
    LandAndCoastNearSea,
}

/// Whether a run of cells contains land and/or coast. Only recorded for runs made
/// entirely of land or coast.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
struct Mix {
    land: bool,
    coast: bool,
}

impl Mix {
    #[inline]
    fn or(self, other: Mix) -> Mix {
        Mix {
            land: self.land || other.land,
            coast: self.coast || other.coast,
        }
    }

    #[inline]
    fn pure_land(self) -> bool {
        self.land && !self.coast
    }

    #[inline]
    fn mixed(self) -> bool {
        self.land && self.coast
    }
}

type MixMap = HashMap<Coord, Mix>;

/// Combines `n` consecutive entries of `src` along `step` into one, keyed by the first.
fn combine_runs(src: &MixMap, n: i32, step: Coord) -> MixMap {
    src.iter()
        .filter_map(|(&c, &m)| {
            (1..n).try_fold(m, |acc, i| {
                let next = c.offset(step.x * i, step.y * i);
                src.get(&next).map(|o| acc.or(*o))
            })
            .map(|m| (c, m))
        })
        .collect()
}

/// Anchors `c` of `src` such that `c + step * k` is in `src` for every given k.
fn chain_anchors(src: &AnchorSet, offsets: &[(i32, i32)]) -> AnchorSet {
    src.iter()
        .filter(|c| offsets.iter().all(|&(dx, dy)| src.contains(&c.offset(dx, dy))))
        .copied()
        .collect()
}

/// Terrain-only buildability of one island.
#[derive(Debug, Clone, Default)]
pub struct TerrainCapabilityIndex {
    land: AnchorSet,
    coast: AnchorSet,
    land_or_coast: AnchorSet,
    cache: HashMap<TerrainRequirement, HashMap<Footprint, AnchorSet>>,
}

impl TerrainCapabilityIndex {
    /// Classifies the ground of an island. Equivalent to `Default` followed by `create_cache`.
    pub fn new<G: GroundMap>(ground: &G) -> Self {
        let mut index = Self::default();
        index.create_cache(ground);
        index
    }

    /// constructible land tiles
    #[inline]
    pub fn land(&self) -> &AnchorSet {
        &self.land
    }

    /// coastline tiles
    #[inline]
    pub fn coast(&self) -> &AnchorSet {
        &self.coast
    }

    #[inline]
    pub fn land_or_coast(&self) -> &AnchorSet {
        &self.land_or_coast
    }

    #[inline]
    pub fn is_land_or_coast(&self, c: Coord) -> bool {
        self.land_or_coast.contains(&c)
    }

    /// anchors allowed by the terrain, None if no building with that requirement has that size
    #[inline]
    pub fn anchors(&self, requirement: TerrainRequirement, size: Footprint) -> Option<&AnchorSet> {
        self.cache.get(&requirement)?.get(&size)
    }

    /// (Re)builds the land and land-and-coast categories from the ground tiles.
    /// Any previous near-sea data is discarded.
    pub fn create_cache<G: GroundMap>(&mut self, ground: &G) {
        self.land.clear();
        self.coast.clear();
        for c in ground.coords() {
            match ground.terrain(c) {
                Some(TerrainKind::Land) => {
                    self.land.insert(c);
                }
                Some(TerrainKind::Coast) => {
                    self.coast.insert(c);
                }
                _ => {}
            }
        }
        self.land_or_coast = self.land.union(&self.coast).copied().collect();

        let cells: MixMap = self
            .land_or_coast
            .iter()
            .map(|&c| {
                let land = self.land.contains(&c);
                (c, Mix { land, coast: !land })
            })
            .collect();
        let row2 = combine_runs(&cells, 2, Coord::new(1, 0));
        let row3 = combine_runs(&cells, 3, Coord::new(1, 0));
        let sq2 = combine_runs(&row2, 2, Coord::new(0, 1));
        let sq3 = combine_runs(&row3, 3, Coord::new(0, 1));

        let pick = |src: &MixMap, pred: fn(Mix) -> bool| -> AnchorSet {
            src.iter()
                .filter(|(_, m)| pred(**m))
                .map(|(c, _)| *c)
                .collect()
        };

        let land_2x2 = pick(&sq2, Mix::pure_land);
        let land_3x3 = pick(&sq3, Mix::pure_land);

        let mut land = HashMap::new();
        land.insert(Footprint::new(1, 1), self.land.clone());
        land.insert(Footprint::new(3, 2), chain_anchors(&land_2x2, &[(1, 0)]));
        land.insert(Footprint::new(4, 2), chain_anchors(&land_2x2, &[(1, 0), (2, 0)]));
        land.insert(Footprint::new(2, 3), chain_anchors(&land_2x2, &[(0, 1)]));
        land.insert(Footprint::new(2, 4), chain_anchors(&land_2x2, &[(0, 1), (0, 2)]));
        land.insert(Footprint::new(4, 4), chain_anchors(&land_3x3, &[(1, 0), (0, 1), (1, 1)]));
        land.insert(Footprint::new(6, 6), chain_anchors(&land_3x3, &[(3, 0), (0, 3), (3, 3)]));
        land.insert(Footprint::new(2, 2), land_2x2);
        land.insert(Footprint::new(3, 3), land_3x3);

        let mut coastal = HashMap::new();
        coastal.insert(Footprint::new(2, 2), pick(&sq2, Mix::mixed));
        coastal.insert(Footprint::new(3, 3), pick(&sq3, Mix::mixed));

        self.cache.clear();
        self.cache.insert(TerrainRequirement::Land, land);
        self.cache.insert(TerrainRequirement::LandAndCoast, coastal);

        if log::log_enabled!(log::Level::Debug) {
            for (req, sizes) in &self.cache {
                for (size, set) in sizes {
                    debug!("terrain {req:?} {size}: {} anchors", set.len());
                }
            }
        }
    }

    /// Marks 3x3 coastal anchors that have a tile of the sea body `sea` within
    /// [`SEA_PROXIMITY_RADIUS`] of their footprint. Needs the world's water map, which
    /// is not available when the island itself is loaded. Calling it again replaces
    /// the previous result.
    pub fn create_sea_cache<W: WaterBodies>(&mut self, water: &W, sea: WaterBodyId) {
        let size = Footprint::new(3, 3);
        let near_sea: AnchorSet = self
            .anchors(TerrainRequirement::LandAndCoast, size)
            .into_iter()
            .flatten()
            .filter(|&&c| {
                size.radius_coords(c, SEA_PROXIMITY_RADIUS)
                    .any(|p| water.water_body(p) == Some(sea))
            })
            .copied()
            .collect();

        if near_sea.is_empty() {
            warn!("no coastal anchor is within reach of sea body {sea:?}");
        } else {
            debug!("terrain LandAndCoastNearSea {size}: {} anchors", near_sea.len());
        }
        let mut sizes = HashMap::new();
        sizes.insert(size, near_sea);
        self.cache
            .insert(TerrainRequirement::LandAndCoastNearSea, sizes);
    }

    /// Anchors the terrain allows for `requirement` and `size`, intersected with the
    /// same-size anchors of every layer. E.g. terrain & free island area & one settlement.
    pub fn get_buildability_intersection(
        &self,
        requirement: TerrainRequirement,
        size: Footprint,
        layers: &[&dyn AnchorLayer],
    ) -> AnchorSet {
        let Some(base) = self.anchors(requirement, size) else {
            return AnchorSet::new();
        };
        let layers: Vec<&AnchorSet> = layers.iter().map(|l| l.anchors(size)).collect();
        base.iter()
            .filter(|c| layers.iter().all(|l| l.contains(*c)))
            .copied()
            .collect()
    }
}
