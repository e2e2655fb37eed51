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

//! Full containment cache: an anchor is in `cache[size]` when every cell of the
//! footprint is currently available.
//!
//! Sizes up to 3x3 are kept up to date on every mutation. 4x4 and 6x6 are only
//! needed by a handful of buildings, so they are derived from 3x3 on first access
//! after a change and kept until the next change.

use crate::chain::*;
use crate::coords::*;
use crate::terrain::TerrainCapabilityIndex;
use log::trace;
use std::cell::OnceCell;
use std::ops::Index;
use std::rc::Rc;

const PLAN: [(Footprint, Footprint, (i32, i32)); 7] = [
    (Footprint::new(1, 1), Footprint::new(2, 1), (1, 0)),
    (Footprint::new(2, 1), Footprint::new(2, 2), (0, 1)),
    (Footprint::new(2, 2), Footprint::new(2, 3), (0, 1)),
    (Footprint::new(2, 3), Footprint::new(2, 4), (0, 1)),
    (Footprint::new(2, 2), Footprint::new(3, 2), (1, 0)),
    (Footprint::new(3, 2), Footprint::new(4, 2), (1, 0)),
    (Footprint::new(3, 2), Footprint::new(3, 3), (0, 1)),
];

const THREE: Footprint = Footprint::new(3, 3);

/// Square size derived from the 3x3 set on demand.
///
/// `c` is an anchor when the 3x3 squares at c, c+(k,0), c+(0,k) and c+(k,k) are all
/// anchors, where k = size - 3. The result is kept until [`LazyAnchorSet::invalidate`].
#[derive(Debug, Clone)]
pub struct LazyAnchorSet {
    size: Footprint,
    shift: i32,
    set: OnceCell<AnchorSet>,
}

impl LazyAnchorSet {
    pub fn new(size: Footprint) -> Self {
        debug_assert_eq!(size.width, size.height);
        debug_assert!(size.width > 3 && size.width <= 6);
        Self {
            size,
            shift: size.width - 3,
            set: OnceCell::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> Footprint {
        self.size
    }

    /// true if the set was computed since the last invalidation
    #[inline]
    pub fn is_materialized(&self) -> bool {
        self.set.get().is_some()
    }

    /// drops the computed set, the next query recomputes it
    #[inline]
    pub fn invalidate(&mut self) {
        self.set.take();
    }

    /// Returns the anchors, computing them from `squares` (the current 3x3 set) if needed.
    pub fn materialize(&self, squares: &AnchorSet) -> &AnchorSet {
        self.set.get_or_init(|| {
            let k = self.shift;
            let set: AnchorSet = squares
                .iter()
                .filter(|c| {
                    squares.contains(&c.offset(k, 0))
                        && squares.contains(&c.offset(0, k))
                        && squares.contains(&c.offset(k, k))
                })
                .copied()
                .collect();
            trace!("materialized {} anchors for {}", set.len(), self.size);
            set
        })
    }
}

/// Anchors whose whole footprint is available.
///
/// Only terrain-eligible (land or coast) coordinates may ever be added.
#[derive(Debug, Clone)]
pub struct FullContainmentCache {
    terrain: Rc<TerrainCapabilityIndex>,
    chain: DerivedChain,
    large: [LazyAnchorSet; 2],
}

impl FullContainmentCache {
    /// Creates an empty cache over the given island terrain.
    pub fn new(terrain: Rc<TerrainCapabilityIndex>) -> Self {
        Self {
            terrain,
            chain: DerivedChain::new(Combine::All, &PLAN),
            large: [
                LazyAnchorSet::new(Footprint::new(4, 4)),
                LazyAnchorSet::new(Footprint::new(6, 6)),
            ],
        }
    }

    #[inline]
    pub fn terrain(&self) -> &Rc<TerrainCapabilityIndex> {
        &self.terrain
    }

    /// Makes coordinates available.
    ///
    /// Panics if any of them is already present or is not land or coast.
    pub fn add_area(&mut self, coords: &[Coord]) {
        for c in coords {
            assert!(
                self.terrain.is_land_or_coast(*c),
                "coordinate {c} is neither land nor coast"
            );
        }
        let changed = self.chain.insert(coords);
        self.invalidate_large();
        trace!("added {} coords, {changed} anchors joined", coords.len());
    }

    /// Makes coordinates unavailable.
    ///
    /// Panics if any of them is not present.
    pub fn remove_area(&mut self, coords: &[Coord]) {
        let changed = self.chain.remove(coords);
        self.invalidate_large();
        trace!("removed {} coords, {changed} anchors left", coords.len());
    }

    fn invalidate_large(&mut self) {
        for l in self.large.iter_mut() {
            l.invalidate();
        }
    }

    /// Anchor set for `size`, None if the cache does not track it.
    /// 4x4 and 6x6 are computed here if a mutation happened since the last query.
    pub fn get(&self, size: Footprint) -> Option<&AnchorSet> {
        match self.large.iter().find(|l| l.size() == size) {
            Some(lazy) => Some(lazy.materialize(self.chain.get(THREE)?)),
            None => self.chain.get(size),
        }
    }

    /// sizes this cache answers for, including the intermediate 2x1 row
    pub fn sizes(&self) -> impl Iterator<Item = Footprint> + '_ {
        self.chain.sizes().chain(self.large.iter().map(|l| l.size()))
    }

    /// the currently available coordinates
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

impl Index<Footprint> for FullContainmentCache {
    type Output = AnchorSet;

    fn index(&self, size: Footprint) -> &AnchorSet {
        self.get(size)
            .unwrap_or_else(|| panic!("footprint {size} is not tracked by this cache"))
    }
}

impl AnchorLayer for FullContainmentCache {
    #[inline]
    fn anchors(&self, size: Footprint) -> &AnchorSet {
        &self[size]
    }
}
