/* Incremental buildability caches for grid-based settlement maps.
 * Copyright (C) 2023  Alexander Pyattaev
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Property tests: incremental caches against recomputation from scratch.
//!
//! Run with: cargo test --release properties

use buildcache::*;
use proptest::prelude::*;
use std::rc::Rc;

const SIDE: i32 = 12;

/// all-land terrain big enough for every generated coordinate
fn land() -> Rc<TerrainCapabilityIndex> {
    let row = ".".repeat(SIDE as usize);
    let text = vec![row; SIDE as usize].join("\n");
    Rc::new(TerrainCapabilityIndex::new(&Island::from_ascii(&text).unwrap()))
}

fn coords() -> impl Strategy<Value = Vec<Coord>> {
    prop::collection::hash_set((0..SIDE, 0..SIDE), 0..80)
        .prop_map(|s| s.into_iter().map(Coord::from).collect())
}

/// list of (add?, coordinates) steps
fn steps() -> impl Strategy<Value = Vec<(bool, Vec<Coord>)>> {
    prop::collection::vec((any::<bool>(), coords()), 1..12)
}

fn full_snapshot(cache: &FullContainmentCache) -> Vec<(Footprint, AnchorSet)> {
    cache.sizes().map(|s| (s, cache[s].clone())).collect()
}

fn overlap_snapshot(cache: &PartialOverlapCache) -> Vec<(Footprint, AnchorSet)> {
    cache.sizes().map(|s| (s, cache[s].clone())).collect()
}

/// splits a step into the part that is legal to apply right now
fn legal(add: bool, batch: &[Coord], present: impl Fn(Coord) -> bool) -> Vec<Coord> {
    batch.iter().copied().filter(|c| present(*c) != add).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// c is an anchor iff its whole footprint is available.
    #[test]
    fn prop_full_containment(steps in steps()) {
        let mut cache = FullContainmentCache::new(land());
        for (add, batch) in steps {
            let batch = legal(add, &batch, |c| cache.contains(c));
            if add { cache.add_area(&batch) } else { cache.remove_area(&batch) }
        }
        for size in cache.sizes().collect::<Vec<_>>() {
            let expected: AnchorSet = cache
                .coords()
                .iter()
                .filter(|&&c| size.cells(c).all(|p| cache.contains(p)))
                .copied()
                .collect();
            prop_assert_eq!(&cache[size], &expected, "size {}", size);
        }
    }

    /// c is an anchor iff its footprint touches an available cell.
    #[test]
    fn prop_partial_overlap(steps in steps()) {
        let mut cache = PartialOverlapCache::new();
        for (add, batch) in steps {
            let batch = legal(add, &batch, |c| cache.contains(c));
            if add { cache.add_area(&batch) } else { cache.remove_area(&batch) }
        }
        for size in cache.sizes().collect::<Vec<_>>() {
            let expected: AnchorSet = cache
                .coords()
                .iter()
                .flat_map(|&c| size.cells(c.offset(1 - size.width, 1 - size.height)))
                .collect();
            prop_assert_eq!(&cache[size], &expected, "size {}", size);
        }
    }

    /// add_area(X) followed by remove_area(X) changes nothing.
    #[test]
    fn prop_add_remove_restores(base in coords(), extra in coords()) {
        let extra: Vec<Coord> = extra.into_iter().filter(|c| !base.contains(c)).collect();

        let mut full = FullContainmentCache::new(land());
        full.add_area(&base);
        let before = full_snapshot(&full);
        full.add_area(&extra);
        full.remove_area(&extra);
        prop_assert_eq!(before, full_snapshot(&full));

        let mut overlap = PartialOverlapCache::new();
        overlap.add_area(&base);
        let before = overlap_snapshot(&overlap);
        overlap.add_area(&extra);
        overlap.remove_area(&extra);
        prop_assert_eq!(before, overlap_snapshot(&overlap));
    }

    /// disjoint batches give the same result in any order and split.
    #[test]
    fn prop_order_independent(all in coords(), mask in prop::collection::vec(any::<bool>(), 80)) {
        let (a, b): (Vec<(usize, Coord)>, Vec<(usize, Coord)>) = all
            .iter()
            .copied()
            .enumerate()
            .partition(|(i, _)| mask[*i]);
        let a: Vec<Coord> = a.into_iter().map(|(_, c)| c).collect();
        let b: Vec<Coord> = b.into_iter().map(|(_, c)| c).collect();

        let mut ab = FullContainmentCache::new(land());
        ab.add_area(&a);
        ab.add_area(&b);
        let mut ba = FullContainmentCache::new(land());
        ba.add_area(&b);
        ba.add_area(&a);
        let mut once = FullContainmentCache::new(land());
        once.add_area(&all);
        prop_assert_eq!(full_snapshot(&ab), full_snapshot(&once));
        prop_assert_eq!(full_snapshot(&ba), full_snapshot(&once));

        let mut ab = PartialOverlapCache::new();
        ab.add_area(&a);
        ab.add_area(&b);
        let mut once = PartialOverlapCache::new();
        once.add_area(&all);
        prop_assert_eq!(overlap_snapshot(&ab), overlap_snapshot(&once));
    }

    /// one coordinate at a time ends up where a single bulk call does.
    #[test]
    fn prop_incremental_equals_bulk(all in coords()) {
        let mut single = FullContainmentCache::new(land());
        let mut overlap_single = PartialOverlapCache::new();
        for c in &all {
            single.add_area(&[*c]);
            overlap_single.add_area(&[*c]);
        }
        let mut bulk = FullContainmentCache::new(land());
        bulk.add_area(&all);
        let mut overlap_bulk = PartialOverlapCache::new();
        overlap_bulk.add_area(&all);
        prop_assert_eq!(full_snapshot(&single), full_snapshot(&bulk));
        prop_assert_eq!(overlap_snapshot(&overlap_single), overlap_snapshot(&overlap_bulk));
    }

    /// coverage survives as long as any building still reaches a cell.
    #[test]
    fn prop_coverage_reference_counts(
        anchors in prop::collection::vec((0..SIDE, 0..SIDE, 0..3i32), 1..8),
        drop_mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let terrain = land();
        let mut cov = CollectorCoverageCache::new(terrain.clone());
        let areas: Vec<ServiceArea> = anchors
            .iter()
            .map(|&(x, y, r)| ServiceArea::new(Coord::new(x, y), Footprint::new(2, 2), r))
            .collect();
        let keys: Vec<CoverageKey> = areas.iter().map(|a| cov.add_building(a)).collect();
        let mut kept = Vec::new();
        for (i, key) in keys.into_iter().enumerate() {
            if drop_mask[i] {
                cov.remove_building(key);
            } else {
                kept.push(areas[i]);
            }
        }
        let expected: AnchorSet = kept
            .iter()
            .flat_map(|a| a.coords())
            .filter(|c| terrain.is_land_or_coast(*c))
            .collect();
        prop_assert_eq!(cov.coords(), &expected);
        for c in &expected {
            let n = kept.iter().filter(|a| a.coords().any(|p| p == *c)).count() as u32;
            prop_assert_eq!(cov.coverage_count(*c), n);
        }
    }
}
