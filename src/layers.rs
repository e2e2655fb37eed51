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

//! Read access shared by the caches that wrap a full containment or overlap cache.
use crate::coords::*;
use crate::coverage::CollectorCoverageCache;
use crate::free_area::FreeAreaCache;
use crate::settlement::SettlementBuildabilityCache;
use std::ops::Index;

duplicate::duplicate! {
    [
        Wrapper;
        [SettlementBuildabilityCache];
        [FreeAreaCache];
        [CollectorCoverageCache];
    ]

    impl Wrapper {
        /// Anchor set for `size`, None if the cache does not track it.
        #[inline]
        pub fn get(&self, size: Footprint) -> Option<&AnchorSet> {
            self.cache.get(size)
        }

        /// sizes this cache answers for
        pub fn sizes(&self) -> impl Iterator<Item = Footprint> + '_ {
            self.cache.sizes()
        }

        /// the currently available coordinates
        #[inline]
        pub fn coords(&self) -> &AnchorSet {
            self.cache.coords()
        }

        #[inline]
        pub fn contains(&self, c: Coord) -> bool {
            self.cache.contains(c)
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.cache.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.cache.is_empty()
        }
    }

    impl Index<Footprint> for Wrapper {
        type Output = AnchorSet;

        #[inline]
        fn index(&self, size: Footprint) -> &AnchorSet {
            &self.cache[size]
        }
    }

    impl AnchorLayer for Wrapper {
        #[inline]
        fn anchors(&self, size: Footprint) -> &AnchorSet {
            &self.cache[size]
        }
    }
}
