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

//! Contains grid coordinates, footprint sizes and the anchor set type shared by all caches.

use std::fmt;
use std::ops::{Add, Sub};

/// Set of anchor coordinates, the currency of every cache in this crate.
pub type AnchorSet = hashbrown::HashSet<Coord>;

/// Anything that can hand out an anchor set per footprint, i.e. every dynamic cache.
/// Used to intersect terrain capability with the current state of other caches.
pub trait AnchorLayer {
    /// Panics if the layer does not hold `size`.
    fn anchors(&self, size: Footprint) -> &AnchorSet;
}

/// A single cell of the island grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// returns the coordinate shifted by (dx, dy)
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Coord {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Coord {
    type Output = Coord;
    #[inline]
    fn add(self, rhs: Coord) -> Coord {
        self.offset(rhs.x, rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;
    #[inline]
    fn sub(self, rhs: Coord) -> Coord {
        self.offset(-rhs.x, -rhs.y)
    }
}

/// Rectangle shape a building occupies. Footprints are always anchored at their
/// top-left cell, i.e. the anchor has the smallest x and y of all covered cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Footprint {
    pub width: i32,
    pub height: i32,
}

impl Footprint {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const SINGLE: Footprint = Footprint::new(1, 1);

    /// All footprints the caches can answer queries for.
    pub const SUPPORTED: [Footprint; 9] = [
        Footprint::new(1, 1),
        Footprint::new(2, 2),
        Footprint::new(2, 3),
        Footprint::new(3, 2),
        Footprint::new(2, 4),
        Footprint::new(4, 2),
        Footprint::new(3, 3),
        Footprint::new(4, 4),
        Footprint::new(6, 6),
    ];

    #[inline]
    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }

    #[inline]
    pub fn area(self) -> usize {
        (self.width * self.height) as usize
    }

    /// iterates over all cells covered by this footprint when anchored at `anchor`
    #[inline]
    pub fn cells(self, anchor: Coord) -> impl Iterator<Item = Coord> {
        (0..self.height)
            .flat_map(move |dy| (0..self.width).map(move |dx| anchor.offset(dx, dy)))
    }

    /// iterates over every cell whose euclidean distance to the footprint anchored at
    /// `anchor` is at most `radius`. Cells of the footprint itself are included.
    pub fn radius_coords(self, anchor: Coord, radius: i32) -> impl Iterator<Item = Coord> {
        debug_assert!(radius >= 0);
        let right = anchor.x + self.width - 1;
        let bottom = anchor.y + self.height - 1;
        let r2 = radius * radius;
        (anchor.y - radius..=bottom + radius).flat_map(move |y| {
            (anchor.x - radius..=right + radius).filter_map(move |x| {
                // distance along each axis to the nearest edge, zero inside the rectangle
                let dx = (anchor.x - x).max(x - right).max(0);
                let dy = (anchor.y - y).max(y - bottom).max(0);
                (dx * dx + dy * dy <= r2).then_some(Coord::new(x, y))
            })
        })
    }
}

impl From<(i32, i32)> for Footprint {
    #[inline]
    fn from((width, height): (i32, i32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
