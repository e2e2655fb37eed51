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

//! In-memory island and water maps, loadable from ASCII art.
//!
//! Glyphs: `.` land, `,` coast, `~` water, `T` land with a tree (buildable upon),
//! `B` land with a blocking building, `1`-`9` land owned by that settlement.
//! Row 0 of the text is y = 0, column 0 is x = 0.

use crate::coords::*;
use crate::world::*;
use hashbrown::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapParseError {
    #[error("unknown glyph {glyph:?} at {at}")]
    UnknownGlyph { glyph: char, at: Coord },
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("map contains no rows")]
    Empty,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tile {
    pub terrain: TerrainKind,
    pub owner: Option<SettlementId>,
    pub object: Option<PlacedObject>,
}

impl Tile {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            owner: None,
            object: None,
        }
    }
}

const TREE: PlacedObject = PlacedObject {
    buildable_upon: true,
};
const BUILDING: PlacedObject = PlacedObject {
    buildable_upon: false,
};

/// Ground tiles of one island, keyed by coordinate.
#[derive(Debug, Clone, Default)]
pub struct Island {
    tiles: HashMap<Coord, Tile>,
}

/// Splits the text into trimmed non-empty rows and checks they all have the same width.
fn ascii_rows(text: &str) -> Result<Vec<Vec<char>>, MapParseError> {
    let rows: Vec<Vec<char>> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.chars().collect())
        .collect();
    let expected = rows.first().ok_or(MapParseError::Empty)?.len();
    for (row, r) in rows.iter().enumerate() {
        if r.len() != expected {
            return Err(MapParseError::RaggedRow {
                row,
                expected,
                found: r.len(),
            });
        }
    }
    Ok(rows)
}

impl Island {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an island from ASCII art, see module docs for the glyphs.
    /// Water glyphs produce water tiles, so the island's ground map covers the whole rectangle.
    pub fn from_ascii(text: &str) -> Result<Self, MapParseError> {
        let mut island = Self::new();
        for (y, row) in ascii_rows(text)?.iter().enumerate() {
            for (x, &glyph) in row.iter().enumerate() {
                let at = Coord::new(x as i32, y as i32);
                let tile = match glyph {
                    '.' => Tile::new(TerrainKind::Land),
                    ',' => Tile::new(TerrainKind::Coast),
                    '~' => Tile::new(TerrainKind::Water),
                    'T' => Tile {
                        object: Some(TREE),
                        ..Tile::new(TerrainKind::Land)
                    },
                    'B' => Tile {
                        object: Some(BUILDING),
                        ..Tile::new(TerrainKind::Land)
                    },
                    '1'..='9' => Tile {
                        owner: glyph.to_digit(10).map(SettlementId),
                        ..Tile::new(TerrainKind::Land)
                    },
                    _ => return Err(MapParseError::UnknownGlyph { glyph, at }),
                };
                island.tiles.insert(at, tile);
            }
        }
        Ok(island)
    }

    /// Generates a random island of the given size: a land blob surrounded by coast and
    /// water, with scattered trees and buildings.
    #[cfg(feature = "rand")]
    pub fn random<R: rand::Rng>(rng: &mut R, width: i32, height: i32) -> Self {
        let mut island = Self::new();
        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        for y in 0..height {
            for x in 0..width {
                // normalized distance from the centre, jittered a bit to get a ragged shore
                let d = (((x as f32 - cx) / cx).powi(2) + ((y as f32 - cy) / cy).powi(2)).sqrt()
                    + rng.random_range(-0.05..0.05);
                let mut tile = match d {
                    d if d < 0.8 => Tile::new(TerrainKind::Land),
                    d if d < 0.9 => Tile::new(TerrainKind::Coast),
                    _ => Tile::new(TerrainKind::Water),
                };
                if tile.terrain == TerrainKind::Land {
                    tile.object = match rng.random_range(0..20) {
                        0..=1 => Some(TREE),
                        2 => Some(BUILDING),
                        _ => None,
                    };
                }
                island.tiles.insert(Coord::new(x, y), tile);
            }
        }
        island
    }

    #[inline]
    pub fn tile(&self, c: Coord) -> Option<&Tile> {
        self.tiles.get(&c)
    }

    pub fn insert_tile(&mut self, c: Coord, tile: Tile) {
        self.tiles.insert(c, tile);
    }

    /// Sets the owner of the tile, returns false if there is no tile.
    pub fn set_owner(&mut self, c: Coord, owner: Option<SettlementId>) -> bool {
        match self.tiles.get_mut(&c) {
            Some(t) => {
                t.owner = owner;
                true
            }
            None => false,
        }
    }

    /// Places an object on every tile of a footprint that exists, returns the affected coordinates.
    pub fn place_object(
        &mut self,
        anchor: Coord,
        footprint: Footprint,
        object: PlacedObject,
    ) -> Vec<Coord> {
        footprint
            .cells(anchor)
            .filter(|c| match self.tiles.get_mut(c) {
                Some(t) => {
                    t.object = Some(object);
                    true
                }
                None => false,
            })
            .collect()
    }

    /// Removes whatever stands in the footprint, returns the affected coordinates.
    pub fn clear_object(&mut self, anchor: Coord, footprint: Footprint) -> Vec<Coord> {
        footprint
            .cells(anchor)
            .filter(|c| match self.tiles.get_mut(c) {
                Some(t) => t.object.take().is_some(),
                None => false,
            })
            .collect()
    }

    /// Bounding box of all tiles as (min, max), None for an empty island.
    pub fn bounds(&self) -> Option<(Coord, Coord)> {
        let mut it = self.tiles.keys();
        let first = *it.next()?;
        Some(it.fold((first, first), |(lo, hi), c| {
            (
                Coord::new(lo.x.min(c.x), lo.y.min(c.y)),
                Coord::new(hi.x.max(c.x), hi.y.max(c.y)),
            )
        }))
    }

    /// Renders the island back to the glyphs of [`Island::from_ascii`]. Missing tiles are spaces.
    pub fn render_ascii(&self) -> String {
        let Some((lo, hi)) = self.bounds() else {
            return String::new();
        };
        let mut out = String::new();
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let glyph = match self.tiles.get(&Coord::new(x, y)) {
                    None => ' ',
                    Some(t) => match (t.terrain, t.object, t.owner) {
                        (TerrainKind::Water, _, _) => '~',
                        (TerrainKind::Coast, _, _) => ',',
                        (TerrainKind::Land, Some(o), _) if o.buildable_upon => 'T',
                        (TerrainKind::Land, Some(_), _) => 'B',
                        (TerrainKind::Land, None, Some(SettlementId(id))) if (1..=9).contains(&id) => {
                            char::from_digit(id, 10).unwrap_or('.')
                        }
                        (TerrainKind::Land, None, _) => '.',
                    },
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

impl GroundMap for Island {
    fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tiles.keys().copied()
    }

    #[inline]
    fn terrain(&self, c: Coord) -> Option<TerrainKind> {
        self.tiles.get(&c).map(|t| t.terrain)
    }

    #[inline]
    fn owner(&self, c: Coord) -> Option<SettlementId> {
        self.tiles.get(&c)?.owner
    }

    #[inline]
    fn placed_object(&self, c: Coord) -> Option<PlacedObject> {
        self.tiles.get(&c)?.object
    }
}

/// Labels connected bodies of water.
#[derive(Debug, Clone, Default)]
pub struct WaterMap {
    bodies: HashMap<Coord, WaterBodyId>,
}

impl WaterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flood fills every 4-connected group of `~` glyphs. Bodies are numbered from 0
    /// in the order their first cell is met scanning rows top to bottom.
    pub fn from_ascii(text: &str) -> Result<Self, MapParseError> {
        let water: hashbrown::HashSet<Coord> = ascii_rows(text)?
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, g)| **g == '~')
                    .map(move |(x, _)| Coord::new(x as i32, y as i32))
            })
            .collect();
        let mut sorted: Vec<Coord> = water.iter().copied().collect();
        sorted.sort_by_key(|c| (c.y, c.x));

        let mut bodies = HashMap::with_capacity(water.len());
        let mut next_id = 0;
        let mut stack = Vec::new();
        for start in sorted {
            if bodies.contains_key(&start) {
                continue;
            }
            let id = WaterBodyId(next_id);
            next_id += 1;
            bodies.insert(start, id);
            stack.push(start);
            while let Some(c) = stack.pop() {
                for n in [c.offset(1, 0), c.offset(-1, 0), c.offset(0, 1), c.offset(0, -1)] {
                    if water.contains(&n) && !bodies.contains_key(&n) {
                        bodies.insert(n, id);
                        stack.push(n);
                    }
                }
            }
        }
        Ok(Self { bodies })
    }

    pub fn set_body(&mut self, c: Coord, body: WaterBodyId) {
        self.bodies.insert(c, body);
    }

    #[inline]
    pub fn body_at(&self, c: Coord) -> Option<WaterBodyId> {
        self.bodies.get(&c).copied()
    }
}

impl WaterBodies for WaterMap {
    #[inline]
    fn water_body(&self, c: Coord) -> Option<WaterBodyId> {
        self.body_at(c)
    }
}
