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

//! Partial overlap cache: an anchor is in `cache[size]` when at least one cell of
//! the footprint is currently available.
//!
//! Unlike [`crate::FullContainmentCache`] all sizes, 6x6 included, are updated eagerly.
//! This cache is queried for many footprints after every change, so recomputing the
//! big squares lazily would not save anything.

use crate::chain::*;
use crate::coords::*;
use log::trace;
use std::ops::Index;

const PLAN: [(Footprint, Footprint, (i32, i32)); MAX_STAGES] = [
    (Footprint::new(1, 1), Footprint::new(2, 1), (1, 0)),
    (Footprint::new(2, 1), Footprint::new(2, 2), (0, 1)),
    (Footprint::new(2, 2), Footprint::new(2, 3), (0, 1)),
    (Footprint::new(2, 3), Footprint::new(2, 4), (0, 1)),
    (Footprint::new(2, 2), Footprint::new(3, 2), (1, 0)),
    (Footprint::new(3, 2), Footprint::new(4, 2), (1, 0)),
    (Footprint::new(3, 2), Footprint::new(3, 3), (0, 1)),
    // only needed on the way to 6x6
    (Footprint::new(3, 3), Footprint::new(3, 4), (0, 1)),
    (Footprint::new(3, 4), Footprint::new(4, 4), (1, 0)),
    (Footprint::new(4, 4), Footprint::new(4, 5), (0, 1)),
    (Footprint::new(4, 5), Footprint::new(5, 5), (1, 0)),
    (Footprint::new(5, 5), Footprint::new(5, 6), (0, 1)),
    (Footprint::new(5, 6), Footprint::new(6, 6), (1, 0)),
];

/// Anchors whose footprint touches at least one available cell.
#[derive(Debug, Clone)]
pub struct PartialOverlapCache {
    chain: DerivedChain,
}

impl Default for PartialOverlapCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialOverlapCache {
    pub fn new() -> Self {
        Self {
            chain: DerivedChain::new(Combine::Any, &PLAN),
        }
    }

    /// Makes coordinates available. Panics if any of them is already present.
    pub fn add_area(&mut self, coords: &[Coord]) {
        let changed = self.chain.insert(coords);
        trace!("overlap: added {} coords, {changed} anchors joined", coords.len());
    }

    /// Makes coordinates unavailable. Panics if any of them is not present.
    pub fn remove_area(&mut self, coords: &[Coord]) {
        let changed = self.chain.remove(coords);
        trace!("overlap: removed {} coords, {changed} anchors left", coords.len());
    }

    #[inline]
    pub fn get(&self, size: Footprint) -> Option<&AnchorSet> {
        self.chain.get(size)
    }

    /// all sizes held, intermediate ones included
    pub fn sizes(&self) -> impl Iterator<Item = Footprint> + '_ {
        self.chain.sizes()
    }

    #[inline]
    pub fn coords(&self) -> &AnchorSet {
        self.chain.base()
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.chain.base().contains(&c)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chain.base().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.base().is_empty()
    }
}

impl Index<Footprint> for PartialOverlapCache {
    type Output = AnchorSet;

    fn index(&self, size: Footprint) -> &AnchorSet {
        self.get(size)
            .unwrap_or_else(|| panic!("footprint {size} is not tracked by this cache"))
    }
}

impl AnchorLayer for PartialOverlapCache {
    #[inline]
    fn anchors(&self, size: Footprint) -> &AnchorSet {
        &self[size]
    }
}
