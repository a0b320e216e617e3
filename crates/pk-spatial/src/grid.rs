//! Rectangular tile store.
//!
//! # Data layout
//!
//! Tiles live in one `Vec` in row-major order: tile `(x, y)` is at index
//! `y * width + x`.  Iterating the vector front to back is therefore the
//! fixed scan order used by the park step.  Tiles are created once and never
//! move; only their `building` slot changes.

use std::fmt;

use pk_core::{Direction, GridPos};

use crate::{SpatialError, SpatialResult};

/// One grid cell.  Identity is the coordinate.
#[derive(Clone, Debug)]
pub struct Tile<B> {
    pub pos:      GridPos,
    pub building: Option<B>,
}

impl<B> Tile<B> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.building.is_none()
    }
}

/// Bounded `width × height` grid holding at most one `B` per tile.
#[derive(Clone, Debug)]
pub struct Grid<B> {
    width:  u32,
    height: u32,
    tiles:  Vec<Tile<B>>,
}

impl<B> Grid<B> {
    pub fn new(width: u32, height: u32) -> SpatialResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpatialError::EmptyGrid { width, height });
        }
        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                tiles.push(Tile { pos: GridPos::new(x, y), building: None });
            }
        }
        Ok(Self { width, height, tiles })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile the park-wide queries start from.
    pub fn center(&self) -> GridPos {
        GridPos::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Row-major slot of `pos`, or `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn tile(&self, pos: GridPos) -> Option<&Tile<B>> {
        self.index_of(pos).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, pos: GridPos) -> Option<&mut Tile<B>> {
        let i = self.index_of(pos)?;
        Some(&mut self.tiles[i])
    }

    pub fn building(&self, pos: GridPos) -> Option<&B> {
        self.tile(pos).and_then(|t| t.building.as_ref())
    }

    pub fn building_mut(&mut self, pos: GridPos) -> Option<&mut B> {
        self.tile_mut(pos).and_then(|t| t.building.as_mut())
    }

    /// `true` if `pos` is inside the grid and holds nothing.
    pub fn is_vacant(&self, pos: GridPos) -> bool {
        self.tile(pos).is_some_and(Tile::is_empty)
    }

    /// Put `building` on an empty tile.  Hands it back if the tile is
    /// occupied or outside the grid.
    pub fn place(&mut self, pos: GridPos, building: B) -> Result<(), B> {
        match self.tile_mut(pos) {
            Some(tile) if tile.building.is_none() => {
                tile.building = Some(building);
                Ok(())
            }
            _ => Err(building),
        }
    }

    /// Remove and return whatever stands on `pos`.
    pub fn take(&mut self, pos: GridPos) -> Option<B> {
        self.tile_mut(pos).and_then(|t| t.building.take())
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile<B>> {
        self.tiles.iter()
    }

    /// All tile coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.tiles.iter().map(|t| t.pos)
    }

    /// Occupied tiles in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (GridPos, &B)> {
        self.tiles
            .iter()
            .filter_map(|t| t.building.as_ref().map(|b| (t.pos, b)))
    }

    /// In-bounds orthogonal neighbours of `pos`, in [`Direction::ALL`] order.
    pub fn neighbors(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |d| pos.step(d))
            .filter(|p| self.contains(*p))
    }

    /// Bit mask ([`Direction::bit`]) of the neighbours of `pos` whose
    /// building satisfies `predicate`.
    pub fn neighbor_mask(&self, pos: GridPos, mut predicate: impl FnMut(&B) -> bool) -> u8 {
        Direction::ALL
            .into_iter()
            .filter(|d| self.building(pos.step(*d)).is_some_and(&mut predicate))
            .fold(0, |mask, d| mask | d.bit())
    }
}

impl<B: fmt::Display> fmt::Display for Tile<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.building {
            Some(b) => write!(f, "tile {}: {b}", self.pos),
            None => write!(f, "tile {}: empty", self.pos),
        }
    }
}
