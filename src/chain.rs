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

//! Chain of derived anchor sets, each built from an earlier one by pairing every
//! anchor with its neighbour one step along an axis.
//!
//! Slot 0 always holds the 1x1 set, i.e. the raw available coordinates. Every stage
//! adds one more slot, so a size is readable as soon as its stage exists.
//! Mutations only walk the coordinates that changed at the previous stage, so the
//! cost of an update is proportional to the size of the change and not the map.

use crate::coords::*;
use arrayvec::ArrayVec;

/// Longest chain any cache needs (the overlap cache goes all the way to 6x6).
pub(crate) const MAX_STAGES: usize = 13;
const MAX_SLOTS: usize = MAX_STAGES + 1;

/// How a pair of source anchors combines into a target anchor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Combine {
    /// both anchors of the pair must be present (full containment)
    All,
    /// any of the two is enough (partial overlap)
    Any,
}

/// One derivation step: target[c] = source[c] (op) source[c + step]
#[derive(Debug, Copy, Clone)]
struct Stage {
    target: Footprint,
    source: usize,
    step: Coord,
}

#[derive(Debug, Clone)]
pub(crate) struct DerivedChain {
    combine: Combine,
    stages: ArrayVec<Stage, MAX_STAGES>,
    sets: ArrayVec<AnchorSet, MAX_SLOTS>,
}

impl DerivedChain {
    /// Builds an empty chain from a plan of (source, target, step) triples.
    /// Every source must be 1x1 or the target of an earlier triple.
    pub(crate) fn new(combine: Combine, plan: &[(Footprint, Footprint, (i32, i32))]) -> Self {
        let mut stages = ArrayVec::new();
        let mut sizes: ArrayVec<Footprint, MAX_SLOTS> = ArrayVec::new();
        sizes.push(Footprint::SINGLE);
        for &(source, target, (dx, dy)) in plan {
            let source = sizes
                .iter()
                .position(|s| *s == source)
                .expect("derivation plan refers to a size before it is built");
            // only unit steps along one axis make sense here
            debug_assert!(dx.abs() + dy.abs() >= 1);
            stages.push(Stage {
                target,
                source,
                step: Coord::new(dx, dy),
            });
            sizes.push(target);
        }
        let sets = (0..sizes.len()).map(|_| AnchorSet::new()).collect();
        Self {
            combine,
            stages,
            sets,
        }
    }

    #[inline]
    fn slot(&self, size: Footprint) -> Option<usize> {
        if size == Footprint::SINGLE {
            return Some(0);
        }
        self.stages
            .iter()
            .position(|s| s.target == size)
            .map(|i| i + 1)
    }

    /// get the anchor set for a size, if this chain builds it
    #[inline]
    pub(crate) fn get(&self, size: Footprint) -> Option<&AnchorSet> {
        self.slot(size).map(|i| &self.sets[i])
    }

    /// the raw available coordinates
    #[inline]
    pub(crate) fn base(&self) -> &AnchorSet {
        &self.sets[0]
    }

    /// sizes held by this chain, in derivation order
    pub(crate) fn sizes(&self) -> impl Iterator<Item = Footprint> + '_ {
        std::iter::once(Footprint::SINGLE).chain(self.stages.iter().map(|s| s.target))
    }

    /// Inserts coordinates that are not yet present and propagates them down the chain.
    /// Returns number of anchors that joined across all stages.
    pub(crate) fn insert(&mut self, coords: &[Coord]) -> usize {
        let base = &mut self.sets[0];
        for &c in coords {
            assert!(base.insert(c), "coordinate {c} is already present in the cache");
        }

        let mut deltas: ArrayVec<Vec<Coord>, MAX_SLOTS> = ArrayVec::new();
        deltas.push(coords.to_vec());
        for (i, stage) in self.stages.iter().enumerate() {
            let (head, tail) = self.sets.split_at_mut(i + 1);
            let prev = &head[stage.source];
            let next = &mut tail[0];
            let added = match self.combine {
                Combine::All => grow_all(prev, next, &deltas[stage.source], stage.step),
                Combine::Any => grow_any(next, &deltas[stage.source], stage.step),
            };
            deltas.push(added);
        }
        deltas.iter().map(Vec::len).sum()
    }

    /// Removes coordinates that are all present and propagates the removal down the chain.
    /// Returns number of anchors that left across all stages.
    pub(crate) fn remove(&mut self, coords: &[Coord]) -> usize {
        let base = &mut self.sets[0];
        for c in coords {
            assert!(base.remove(c), "coordinate {c} is not present in the cache");
        }

        let mut deltas: ArrayVec<Vec<Coord>, MAX_SLOTS> = ArrayVec::new();
        deltas.push(coords.to_vec());
        for (i, stage) in self.stages.iter().enumerate() {
            let (head, tail) = self.sets.split_at_mut(i + 1);
            let prev = &head[stage.source];
            let next = &mut tail[0];
            let removed = match self.combine {
                Combine::All => shrink_all(next, &deltas[stage.source], stage.step),
                Combine::Any => shrink_any(prev, next, &deltas[stage.source], stage.step),
            };
            deltas.push(removed);
        }
        deltas.iter().map(Vec::len).sum()
    }
}

/// A new source anchor can complete the pair it starts and the pair it ends.
/// Pairs without a new member were already decided before this call.
fn grow_all(prev: &AnchorSet, next: &mut AnchorSet, added: &[Coord], step: Coord) -> Vec<Coord> {
    let mut out = Vec::with_capacity(added.len());
    for &x in added {
        for c in [x - step, x] {
            if prev.contains(&c) && prev.contains(&(c + step)) && next.insert(c) {
                out.push(c);
            }
        }
    }
    out
}

/// Losing either member breaks the pair.
fn shrink_all(next: &mut AnchorSet, removed: &[Coord], step: Coord) -> Vec<Coord> {
    let mut out = Vec::with_capacity(removed.len());
    for &x in removed {
        for c in [x - step, x] {
            if next.remove(&c) {
                out.push(c);
            }
        }
    }
    out
}

fn grow_any(next: &mut AnchorSet, added: &[Coord], step: Coord) -> Vec<Coord> {
    let mut out = Vec::with_capacity(added.len() * 2);
    for &x in added {
        for c in [x - step, x] {
            if next.insert(c) {
                out.push(c);
            }
        }
    }
    out
}

/// An anchor only leaves once neither member of its pair survives in the updated source.
fn shrink_any(prev: &AnchorSet, next: &mut AnchorSet, removed: &[Coord], step: Coord) -> Vec<Coord> {
    let mut out = Vec::with_capacity(removed.len());
    for &x in removed {
        for c in [x - step, x] {
            if !prev.contains(&c) && !prev.contains(&(c + step)) && next.remove(&c) {
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_chain(combine: Combine) -> DerivedChain {
        DerivedChain::new(
            combine,
            &[(Footprint::SINGLE, Footprint::new(2, 1), (1, 0))],
        )
    }

    fn set(coords: &[(i32, i32)]) -> AnchorSet {
        coords.iter().map(|&c| Coord::from(c)).collect()
    }

    #[test]
    fn pairs_need_both_members() {
        let mut chain = row_chain(Combine::All);
        chain.insert(&[Coord::new(4, 1)]);
        chain.insert(&[Coord::new(2, 1)]);
        chain.insert(&[Coord::new(3, 1)]);
        chain.insert(&[Coord::new(1, 1)]);
        let row = Footprint::new(2, 1);
        assert_eq!(chain.get(row), Some(&set(&[(1, 1), (2, 1), (3, 1)])));

        chain.remove(&[Coord::new(2, 1)]);
        assert_eq!(chain.get(row), Some(&set(&[(3, 1)])));
    }

    #[test]
    fn any_member_is_enough() {
        let mut chain = row_chain(Combine::Any);
        chain.insert(&[Coord::new(2, 1), Coord::new(3, 1)]);
        let row = Footprint::new(2, 1);
        assert_eq!(chain.get(row), Some(&set(&[(1, 1), (2, 1), (3, 1)])));

        chain.remove(&[Coord::new(2, 1)]);
        assert_eq!(chain.get(row), Some(&set(&[(2, 1), (3, 1)])));
        chain.remove(&[Coord::new(3, 1)]);
        assert!(chain.get(row).unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn double_insert_is_fatal() {
        let mut chain = row_chain(Combine::All);
        chain.insert(&[Coord::new(0, 0)]);
        chain.insert(&[Coord::new(0, 0)]);
    }

    #[test]
    #[should_panic(expected = "not present")]
    fn removing_missing_is_fatal() {
        let mut chain = row_chain(Combine::Any);
        chain.remove(&[Coord::new(0, 0)]);
    }

    #[test]
    fn unknown_size_is_none() {
        let chain = row_chain(Combine::All);
        assert!(chain.get(Footprint::new(3, 3)).is_none());
        assert_eq!(chain.sizes().count(), 2);
    }
}
