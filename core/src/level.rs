//! Concrete tile grid parsed from the plain-text level format.
//!
//! Each character describes one tile: `w` wall, `s` start, `e` end, a space
//! for empty terrain, `+` for a lane waypoint and `n` for an enemy marker.
//! Rows are separated by `\n`; carriage returns are ignored so files saved
//! with Windows line endings load unchanged.

use glam::Vec2;
use thiserror::Error;

use crate::{CellCoord, TileGrid, TileKind};

/// Reasons a level description could not be turned into a grid.
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    /// The description did not contain a single tile.
    #[error("level contains no tiles")]
    Empty,
    /// A row has a different width than the first row.
    #[error("level row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The tile edge length is not a positive finite number.
    #[error("tile length must be positive and finite, got {0}")]
    InvalidTileLength(f32),
}

/// Rectangular tile map loaded from text.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    offset: Vec2,
    tiles: Vec<TileKind>,
    start: Option<CellCoord>,
}

impl LevelGrid {
    /// Parses a level description using the provided tile edge length.
    pub fn parse(text: &str, tile_length: f32) -> Result<Self, LevelError> {
        if !(tile_length.is_finite() && tile_length > 0.0) {
            return Err(LevelError::InvalidTileLength(tile_length));
        }

        let mut tiles = Vec::with_capacity(text.len());
        let mut width: Option<usize> = None;
        let mut rows = 0usize;
        let mut start = None;

        for line in text.split('\n') {
            let mut found = 0usize;
            for character in line.chars() {
                let kind = match character {
                    'w' => TileKind::Wall,
                    's' => {
                        start = Some(CellCoord::new(found as i32, rows as i32));
                        TileKind::Start
                    }
                    'e' => TileKind::End,
                    ' ' => TileKind::Empty,
                    '+' => TileKind::Lane,
                    'n' => TileKind::EnemyMarker,
                    '\r' => continue,
                    other => {
                        tracing::warn!(character = ?other, row = rows, "skipping unknown level tile");
                        continue;
                    }
                };
                tiles.push(kind);
                found += 1;
            }

            if found == 0 {
                continue;
            }

            match width {
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(LevelError::RaggedRow {
                        row: rows,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            rows += 1;
        }

        let Some(columns) = width else {
            return Err(LevelError::Empty);
        };

        Ok(Self {
            columns: columns as u32,
            rows: rows as u32,
            tile_length,
            offset: Vec2::ZERO,
            tiles,
            start,
        })
    }

    /// Moves the grid's top-left corner to the provided world-space point.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// World-space position of the top-left corner of the start tile, if any.
    #[must_use]
    pub fn start_position(&self) -> Option<Vec2> {
        self.start.map(|cell| self.world_position_of(cell))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        Some(row * width + column)
    }
}

impl TileGrid for LevelGrid {
    fn columns(&self) -> u32 {
        self.columns
    }

    fn rows(&self) -> u32 {
        self.rows
    }

    fn tile_length(&self) -> f32 {
        self.tile_length
    }

    fn tile_kind_at(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    fn world_position_of(&self, cell: CellCoord) -> Vec2 {
        self.offset
            + Vec2::new(cell.column() as f32, cell.row() as f32) * self.tile_length
    }
}
