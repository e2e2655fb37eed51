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

//! Cells within reach of at least one collector building.
//!
//! Service areas of different buildings overlap a lot, so every cell carries a
//! reference count. Only the 0 -> 1 and 1 -> 0 transitions reach the underlying
//! [`PartialOverlapCache`]; `cache[size]` then tells which footprints would touch
//! the covered area.

use crate::coords::*;
use crate::overlap::PartialOverlapCache;
use crate::terrain::TerrainCapabilityIndex;
use crate::world::ServiceArea;
use hashbrown::HashMap;
use log::trace;
use slab::Slab;
use std::rc::Rc;

/// Handle for a building registered with [`CollectorCoverageCache::add_building`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CoverageKey(usize);

#[derive(Debug, Clone)]
pub struct CollectorCoverageCache {
    terrain: Rc<TerrainCapabilityIndex>,
    counts: HashMap<Coord, u32>,
    /// coordinates each registered building covers, so removal undoes exactly the addition
    buildings: Slab<Vec<Coord>>,
    pub(crate) cache: PartialOverlapCache,
}

impl CollectorCoverageCache {
    pub fn new(terrain: Rc<TerrainCapabilityIndex>) -> Self {
        Self {
            terrain,
            counts: HashMap::new(),
            buildings: Slab::new(),
            cache: PartialOverlapCache::new(),
        }
    }

    /// Registers the land and coast within the service area of a building.
    pub fn add_building(&mut self, area: &ServiceArea) -> CoverageKey {
        let covered: Vec<Coord> = area
            .coords()
            .filter(|c| self.terrain.is_land_or_coast(*c))
            .collect();
        let mut fresh = Vec::new();
        for &c in &covered {
            let count = self.counts.entry(c).or_insert(0);
            *count += 1;
            if *count == 1 {
                fresh.push(c);
            }
        }
        if !fresh.is_empty() {
            self.cache.add_area(&fresh);
        }
        trace!(
            "coverage: building at {} covers {} cells, {} newly",
            area.anchor,
            covered.len(),
            fresh.len()
        );
        CoverageKey(self.buildings.insert(covered))
    }

    /// Unregisters a building. Cells still reached by other buildings stay covered.
    ///
    /// Panics if the key was already removed.
    pub fn remove_building(&mut self, key: CoverageKey) {
        let covered = self
            .buildings
            .try_remove(key.0)
            .unwrap_or_else(|| panic!("coverage key {key:?} is not registered"));
        let mut lost = Vec::new();
        for c in covered {
            let count = self
                .counts
                .get_mut(&c)
                .unwrap_or_else(|| panic!("coordinate {c} has no coverage to remove"));
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&c);
                lost.push(c);
            }
        }
        if !lost.is_empty() {
            self.cache.remove_area(&lost);
        }
        trace!("coverage: {} cells lost their last collector", lost.len());
    }

    /// number of registered buildings reaching `c`
    #[inline]
    pub fn coverage_count(&self, c: Coord) -> u32 {
        self.counts.get(&c).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_covered(&self, c: Coord) -> bool {
        self.counts.contains_key(&c)
    }

    /// number of registered buildings
    #[inline]
    pub fn num_buildings(&self) -> usize {
        self.buildings.len()
    }
}
