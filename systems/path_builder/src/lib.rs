#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that derives the enemy lane polyline from a tile grid.
//!
//! The lane is assumed to be a single simple chain of 4-connected
//! [`TileKind::Lane`] tiles. The walk starts at the lane tile with the
//! smallest column (then row) and greedily extends to the first unvisited
//! neighbour in `+x, -x, +y, -y` order. Branching or disconnected lane tiles
//! are not reported; they truncate the walk wherever it first runs out of
//! unvisited neighbours.

use lane_defence_core::{CellCoord, TileGrid, TileKind, Vec2};

const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Ordered world-space waypoints that enemies follow from lane start to end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Waypath {
    cells: Vec<CellCoord>,
    points: Vec<Vec2>,
}

impl Waypath {
    /// Creates a path from explicit waypoints with no backing cells.
    #[must_use]
    pub fn from_points(points: Vec<Vec2>) -> Self {
        Self {
            cells: Vec::new(),
            points,
        }
    }

    /// World-space centres of the visited lane tiles, in walking order.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Lane tiles visited by the walk, in walking order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of waypoints contained in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reports whether the path has no waypoints at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reports whether the path is too short for enemies to walk.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// Waypoint where enemies enter the lane.
    #[must_use]
    pub fn start(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    /// Waypoint that marks an escape.
    #[must_use]
    pub fn end(&self) -> Option<Vec2> {
        self.points.last().copied()
    }
}

/// Builds the lane path for the provided grid.
///
/// Returns an empty path when the grid holds no lane tiles.
#[must_use]
pub fn build<G: TileGrid + ?Sized>(grid: &G) -> Waypath {
    let Some(start) = find_start(grid) else {
        tracing::warn!("no lane tiles found; enemy path is empty");
        return Waypath::default();
    };

    let columns = grid.columns() as usize;
    let rows = grid.rows() as usize;
    let mut visited = vec![false; columns * rows];
    let index = |cell: CellCoord| cell.row() as usize * columns + cell.column() as usize;

    let mut cells = vec![start];
    visited[index(start)] = true;
    let mut current = start;

    'walk: loop {
        for (columns_delta, rows_delta) in NEIGHBOUR_OFFSETS {
            let next = current.offset(columns_delta, rows_delta);
            if grid.tile_kind_at(next) != Some(TileKind::Lane) || visited[index(next)] {
                continue;
            }

            visited[index(next)] = true;
            cells.push(next);
            current = next;
            continue 'walk;
        }
        break;
    }

    let points = cells.iter().map(|cell| grid.world_center_of(*cell)).collect();
    tracing::info!(waypoints = cells.len(), "enemy path built");
    Waypath { cells, points }
}

fn find_start<G: TileGrid + ?Sized>(grid: &G) -> Option<CellCoord> {
    let columns = i32::try_from(grid.columns()).ok()?;
    let rows = i32::try_from(grid.rows()).ok()?;

    (0..columns)
        .flat_map(|column| (0..rows).map(move |row| CellCoord::new(column, row)))
        .find(|cell| grid.tile_kind_at(*cell) == Some(TileKind::Lane))
}
