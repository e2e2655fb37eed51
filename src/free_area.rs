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

//! Island tiles no settlement has claimed yet. Answers where a new settlement could go.

use crate::containment::FullContainmentCache;
use crate::coords::*;
use crate::terrain::TerrainCapabilityIndex;
use crate::world::*;
use log::debug;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct FreeAreaCache {
    pub(crate) cache: FullContainmentCache,
}

#[inline]
fn is_free<G: GroundMap>(terrain: &TerrainCapabilityIndex, c: Coord, ground: &G) -> bool {
    terrain.is_land_or_coast(c) && ground.owner(c).is_none() && ground.is_unobstructed(c)
}

impl FreeAreaCache {
    /// Seeds the cache with every unclaimed, unobstructed land or coast tile.
    pub fn new<G: GroundMap>(terrain: Rc<TerrainCapabilityIndex>, ground: &G) -> Self {
        let coords: Vec<Coord> = ground
            .coords()
            .filter(|&c| is_free(&terrain, c, ground))
            .collect();
        debug!("free area seeded with {} tiles", coords.len());
        let mut cache = FullContainmentCache::new(terrain);
        cache.add_area(&coords);
        Self { cache }
    }

    /// Returns tiles to the free pool, e.g. when a settlement is abandoned.
    /// Water is skipped. Panics if a land or coast coordinate is already free.
    pub fn add_area(&mut self, coords: &[Coord]) {
        let terrain = self.cache.terrain();
        let coords: Vec<Coord> = coords
            .iter()
            .copied()
            .filter(|c| terrain.is_land_or_coast(*c))
            .collect();
        self.cache.add_area(&coords);
    }

    /// Takes tiles out of the free pool. Coordinates that are not free are ignored, so a
    /// whole settlement claim can be passed even if parts of it were never free.
    pub fn remove_area(&mut self, coords: &[Coord]) {
        let coords: Vec<Coord> = coords
            .iter()
            .copied()
            .filter(|c| self.cache.contains(*c))
            .collect();
        self.cache.remove_area(&coords);
    }

    /// Re-evaluates tiles after their owner or objects changed.
    pub fn modify_area<G: GroundMap>(&mut self, coords: &[Coord], ground: &G) {
        let terrain = self.cache.terrain();
        let (add, remove): (Vec<Coord>, Vec<Coord>) = coords
            .iter()
            .copied()
            .filter(|&c| is_free(terrain, c, ground) != self.cache.contains(c))
            .partition(|&c| !self.cache.contains(c));
        if !remove.is_empty() {
            self.cache.remove_area(&remove);
        }
        if !add.is_empty() {
            self.cache.add_area(&add);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island::Island;
    use crate::settlement::SettlementBuildabilityCache;
    use crate::terrain::TerrainRequirement;

    const MAP: &str = "
        ~~~~~~~~~~
        ~,......,~
        ~.111....~
        ~.111..B.~
        ~,..T...,~
        ~~~~~~~~~~
    ";

    #[test]
    fn seeded_from_ground() {
        let island = Island::from_ascii(MAP).unwrap();
        let terrain = Rc::new(TerrainCapabilityIndex::new(&island));
        let free = FreeAreaCache::new(terrain, &island);
        // 32 land or coast tiles, 6 claimed, one blocked
        assert_eq!(free.len(), 25);
        assert!(free.contains(Coord::new(4, 4)));
        assert!(!free.contains(Coord::new(7, 3)));
        assert!(!free.contains(Coord::new(2, 2)));
    }

    #[test]
    fn settlement_takes_and_returns_land() {
        let island = Island::from_ascii(MAP).unwrap();
        let terrain = Rc::new(TerrainCapabilityIndex::new(&island));
        let mut free = FreeAreaCache::new(terrain.clone(), &island);
        let claim: Vec<Coord> = Footprint::new(4, 4).cells(Coord::new(5, 1)).collect();

        let before = free[Footprint::new(2, 2)].clone();
        free.remove_area(&claim);
        // the blocked tile inside the claim was never free
        assert_eq!(free.len(), 25 - 15);
        let returned: Vec<Coord> = claim
            .iter()
            .copied()
            .filter(|c| *c != Coord::new(7, 3))
            .collect();
        free.add_area(&returned);
        assert_eq!(free[Footprint::new(2, 2)], before);

        let land = terrain.get_buildability_intersection(
            TerrainRequirement::Land,
            Footprint::new(2, 2),
            &[&free],
        );
        assert!(land.iter().all(|c| free[Footprint::new(2, 2)].contains(c)));
        assert!(land.contains(&Coord::new(5, 1)));

        let settlement =
            SettlementBuildabilityCache::from_ground(terrain.clone(), SettlementId(1), &island);
        let overlap = terrain.get_buildability_intersection(
            TerrainRequirement::Land,
            Footprint::new(2, 2),
            &[&free, &settlement],
        );
        assert!(overlap.is_empty());
    }

    #[test]
    fn modify_follows_ground() {
        let mut island = Island::from_ascii(MAP).unwrap();
        let terrain = Rc::new(TerrainCapabilityIndex::new(&island));
        let mut free = FreeAreaCache::new(terrain, &island);
        island.clear_object(Coord::new(7, 3), Footprint::SINGLE);
        island.set_owner(Coord::new(5, 2), Some(SettlementId(4)));
        free.modify_area(&[Coord::new(7, 3), Coord::new(5, 2), Coord::new(6, 2)], &island);
        assert!(free.contains(Coord::new(7, 3)));
        assert!(!free.contains(Coord::new(5, 2)));
        assert!(free.contains(Coord::new(6, 2)));
        assert_eq!(free.len(), 25);
    }
}
