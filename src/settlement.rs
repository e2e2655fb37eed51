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

//! Buildable cells inside the claim of one settlement.

use crate::containment::FullContainmentCache;
use crate::coords::*;
use crate::terrain::TerrainCapabilityIndex;
use crate::world::*;
use log::trace;
use std::rc::Rc;

/// Full containment cache over the land of one settlement.
///
/// A coordinate is present when it is land or coast, belongs to the settlement and
/// nothing that blocks construction stands on it.
#[derive(Debug, Clone)]
pub struct SettlementBuildabilityCache {
    settlement: SettlementId,
    pub(crate) cache: FullContainmentCache,
}

impl SettlementBuildabilityCache {
    /// empty cache, fill it with [`SettlementBuildabilityCache::add_area`] as the settlement claims land
    pub fn new(terrain: Rc<TerrainCapabilityIndex>, settlement: SettlementId) -> Self {
        Self {
            settlement,
            cache: FullContainmentCache::new(terrain),
        }
    }

    /// Builds the cache from the current state of the island, e.g. after loading a game.
    pub fn from_ground<G: GroundMap>(
        terrain: Rc<TerrainCapabilityIndex>,
        settlement: SettlementId,
        ground: &G,
    ) -> Self {
        let mut s = Self::new(terrain, settlement);
        let coords: Vec<Coord> = ground
            .coords()
            .filter(|&c| s.wants(c, ground))
            .collect();
        s.cache.add_area(&coords);
        s
    }

    #[inline]
    pub fn settlement(&self) -> SettlementId {
        self.settlement
    }

    #[inline]
    fn wants<G: GroundMap>(&self, c: Coord, ground: &G) -> bool {
        self.cache.terrain().is_land_or_coast(c)
            && ground.owner(c) == Some(self.settlement)
            && ground.is_unobstructed(c)
    }

    /// Adds newly claimed land. Coordinates that are neither land nor coast are skipped,
    /// as claims may reach into the water. Panics if a coordinate is already present.
    pub fn add_area(&mut self, coords: &[Coord]) {
        let terrain = self.cache.terrain();
        let coords: Vec<Coord> = coords
            .iter()
            .copied()
            .filter(|c| terrain.is_land_or_coast(*c))
            .collect();
        self.cache.add_area(&coords);
    }

    /// Removes land, skipping water the same way as [`SettlementBuildabilityCache::add_area`].
    /// Panics if a land or coast coordinate is not present.
    pub fn remove_area(&mut self, coords: &[Coord]) {
        let terrain = self.cache.terrain();
        let coords: Vec<Coord> = coords
            .iter()
            .copied()
            .filter(|c| terrain.is_land_or_coast(*c))
            .collect();
        self.cache.remove_area(&coords);
    }

    /// Re-evaluates coordinates whose tile changed (object placed or removed, owner
    /// changed) and applies the minimal removal, then addition.
    pub fn modify_area<G: GroundMap>(&mut self, coords: &[Coord], ground: &G) {
        let mut add = Vec::new();
        let mut remove = Vec::new();
        for &c in coords {
            match (self.wants(c, ground), self.cache.contains(c)) {
                (true, false) => add.push(c),
                (false, true) => remove.push(c),
                _ => {}
            }
        }
        trace!(
            "settlement {:?}: modify {} coords, -{} +{}",
            self.settlement,
            coords.len(),
            remove.len(),
            add.len()
        );
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

    const MAP: &str = "
        ~~~~~~~~
        ~,1111,~
        ~111111~
        ~111111~
        ~,....,~
        ~~~~~~~~
    ";

    fn setup() -> (Island, Rc<TerrainCapabilityIndex>) {
        let island = Island::from_ascii(MAP).unwrap();
        let terrain = Rc::new(TerrainCapabilityIndex::new(&island));
        (island, terrain)
    }

    #[test]
    fn claims_skip_water() {
        let (_, terrain) = setup();
        let mut s = SettlementBuildabilityCache::new(terrain, SettlementId(1));
        let claim: Vec<Coord> = Footprint::new(8, 3).cells(Coord::new(0, 1)).collect();
        s.add_area(&claim);
        assert_eq!(s.len(), 18);
        assert!(!s.contains(Coord::new(0, 1)));
        assert_eq!(s[Footprint::new(3, 3)].len(), 4);
        s.remove_area(&claim);
        assert!(s.is_empty());
    }

    #[test]
    fn from_ground_only_takes_own_land() {
        let (island, terrain) = setup();
        let s = SettlementBuildabilityCache::from_ground(terrain, SettlementId(1), &island);
        // the coast corners are not owned, nor is the bottom row
        assert_eq!(s.len(), 16);
        assert_eq!(s.settlement(), SettlementId(1));
        assert_eq!(s[Footprint::new(6, 6)].len(), 0);
        assert_eq!(s[Footprint::new(2, 2)].len(), 8);
    }

    #[test]
    fn objects_change_membership() {
        let (mut island, terrain) = setup();
        let mut s = SettlementBuildabilityCache::from_ground(terrain, SettlementId(1), &island);
        let blocker = PlacedObject {
            buildable_upon: false,
        };
        let changed = island.place_object(Coord::new(2, 2), Footprint::new(2, 2), blocker);
        s.modify_area(&changed, &island);
        assert_eq!(s.len(), 12);
        assert!(!s.contains(Coord::new(3, 3)));

        let changed = island.clear_object(Coord::new(2, 2), Footprint::new(2, 2));
        s.modify_area(&changed, &island);
        assert_eq!(s.len(), 16);

        // trees do not block
        let tree = PlacedObject {
            buildable_upon: true,
        };
        let changed = island.place_object(Coord::new(5, 2), Footprint::SINGLE, tree);
        s.modify_area(&changed, &island);
        assert!(s.contains(Coord::new(5, 2)));

        // losing the tile to someone else removes it
        island.set_owner(Coord::new(6, 2), Some(SettlementId(2)));
        s.modify_area(&[Coord::new(6, 2), Coord::new(6, 3)], &island);
        assert!(!s.contains(Coord::new(6, 2)));
        assert!(s.contains(Coord::new(6, 3)));
    }
}
