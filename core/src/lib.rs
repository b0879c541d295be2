#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative combat world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! happened during the step. Static data such as the enemy catalog and the
//! tile grid contract also live here so every crate agrees on them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod level;

pub use catalog::{stats_for, EnemyStats};
pub use glam::Vec2;
pub use level::{LevelError, LevelGrid};

/// Number of tiles a turret can reach from the centre of its tile.
pub const TURRET_RANGE_TILES: f32 = 3.0;

/// Seconds a turret waits between consecutive shots.
pub const TURRET_FIRE_INTERVAL: f32 = 0.5;

/// Distance per second travelled by a projectile.
pub const PROJECTILE_SPEED: f32 = 300.0;

/// Health removed from an enemy by a single projectile hit.
pub const PROJECTILE_DAMAGE: u32 = 1;

/// Seconds a projectile survives before expiring without a hit.
pub const PROJECTILE_TIME_TO_LIVE: f32 = 2.0;

/// Collision radius of a projectile in world units.
pub const PROJECTILE_RADIUS: f32 = 4.0;

/// Seconds an enemy stays tinted after taking damage.
pub const HIT_FLASH_DURATION: f32 = 0.2;

/// Colour an enemy shows at the instant it is hit.
pub const HIT_FLASH_TINT: Tint = Tint::from_rgb(255, 180, 180);

/// Commands that express all permissible combat world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests placement of a turret on the provided tile.
    PlaceTurret {
        /// Tile the turret should occupy.
        cell: CellCoord,
    },
    /// Releases the wave director from its waiting state.
    StartNextWave,
    /// Requests that an enemy of the given kind enters at the start of the lane.
    SpawnEnemy {
        /// Kind of enemy to release.
        kind: EnemyKind,
    },
    /// Discards every entity and rewinds wave progression to the first wave.
    Reset,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an enemy entered the lane.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Kind of the new enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy reached the end of the lane.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
        /// Kind of the escaped enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy lost all of its health.
    EnemyKilled {
        /// Identifier of the killed enemy.
        enemy: EnemyId,
        /// Kind of the killed enemy.
        kind: EnemyKind,
    },
    /// Reports that a turret released a projectile.
    ProjectileFired {
        /// Turret that fired.
        turret: TurretId,
    },
    /// Confirms that a turret was placed.
    TurretPlaced {
        /// Identifier assigned to the turret.
        turret: TurretId,
        /// Tile occupied by the turret.
        cell: CellCoord,
    },
    /// Reports that a turret placement request was rejected.
    TurretPlacementRejected {
        /// Tile provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that the player released a wave.
    WaveStarted {
        /// Zero-based level index.
        level: u32,
        /// Zero-based wave index within the level.
        wave: u32,
    },
    /// Announces that a wave was fully spent and cleared of enemies.
    WaveCleared {
        /// Zero-based level index of the cleared wave.
        level: u32,
        /// Zero-based wave index of the cleared wave.
        wave: u32,
    },
    /// Announces that the final wave of the final level was cleared.
    AllWavesComplete,
}

/// Categories of enemies that can walk the lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline walker.
    Basic,
    /// Fragile but quick.
    Fast,
    /// Slow and durable.
    Tank,
    /// Ranged attacker with a short reach.
    ShortRanged,
    /// Bursts when it reaches its target.
    Exploder,
    /// Middle ground between basic and tank.
    Medium,
    /// Mixes melee contact with a short ranged attack.
    RangedMelee,
    /// Quick walker that bursts on contact.
    FastExploder,
    /// Ranged attacker with a long reach.
    LongRange,
    /// Heaviest regular enemy.
    HeavyTank,
    /// Boss guarding the first level.
    Boss1,
    /// Boss guarding the second level.
    Boss2,
    /// Boss guarding the third level.
    Boss3,
    /// Boss guarding the fourth level.
    Boss4,
    /// Boss guarding the fifth level.
    Boss5,
}

impl EnemyKind {
    /// Every declared kind in declaration order.
    pub const ALL: [EnemyKind; 15] = [
        Self::Basic,
        Self::Fast,
        Self::Tank,
        Self::ShortRanged,
        Self::Exploder,
        Self::Medium,
        Self::RangedMelee,
        Self::FastExploder,
        Self::LongRange,
        Self::HeavyTank,
        Self::Boss1,
        Self::Boss2,
        Self::Boss3,
        Self::Boss4,
        Self::Boss5,
    ];

    /// Boss kinds ordered by the level they guard.
    pub const BOSSES: [EnemyKind; 5] = [
        Self::Boss1,
        Self::Boss2,
        Self::Boss3,
        Self::Boss4,
        Self::Boss5,
    ];

    /// Reports whether the kind is one of the level bosses.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(
            self,
            Self::Boss1 | Self::Boss2 | Self::Boss3 | Self::Boss4 | Self::Boss5
        )
    }
}

/// Visual appearance applied to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Tint {
    /// Pure white.
    pub const WHITE: Tint = Tint::from_rgb(255, 255, 255);

    /// Creates a new tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the tint.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the tint.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the tint.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Blends linearly from `self` (at `t == 0`) toward `other` (at `t == 1`).
    ///
    /// `t` is clamped into `0.0..=1.0`.
    #[must_use]
    pub fn lerp(self, other: Tint, t: f32) -> Tint {
        let t = t.clamp(0.0, 1.0);
        let channel = |from: u8, to: u8| -> u8 {
            let blended = f32::from(from) + (f32::from(to) - f32::from(from)) * t;
            blended.round().clamp(0.0, 255.0) as u8
        };
        Tint::from_rgb(
            channel(self.red, other.red),
            channel(self.green, other.green),
            channel(self.blue, other.blue),
        )
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretId(u32);

impl TurretId {
    /// Creates a new turret identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the turret identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row coordinates.
///
/// Coordinates are signed so that positions left of or above the grid map to
/// cells that are simply reported as off-grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell displaced by the provided column and row offsets.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }
}

/// Terrain stored in a single tile of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open terrain where turrets may be built.
    Empty,
    /// Impassable terrain.
    Wall,
    /// Marker for the player's starting tile.
    Start,
    /// Marker for the end of the level.
    End,
    /// Tile that belongs to the enemy lane.
    Lane,
    /// Reserved enemy marker tile.
    EnemyMarker,
}

/// Reasons a turret placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile lies outside of the grid.
    OutOfBounds,
    /// The requested tile is not empty terrain.
    NotEmptyTerrain,
    /// Another turret already occupies the tile.
    Occupied,
}

/// Read-only query surface the simulation needs from the host's tile map.
pub trait TileGrid {
    /// Number of columns contained in the grid.
    fn columns(&self) -> u32;

    /// Number of rows contained in the grid.
    fn rows(&self) -> u32;

    /// Side length of a single square tile expressed in world units.
    fn tile_length(&self) -> f32;

    /// Terrain stored at the provided cell, or `None` when the cell is off-grid.
    fn tile_kind_at(&self, cell: CellCoord) -> Option<TileKind>;

    /// World-space position of the top-left corner of the provided cell.
    fn world_position_of(&self, cell: CellCoord) -> Vec2;

    /// World-space position of the centre of the provided cell.
    fn world_center_of(&self, cell: CellCoord) -> Vec2 {
        self.world_position_of(cell) + Vec2::splat(self.tile_length() * 0.5)
    }

    /// Reports whether the cell lies within the grid bounds.
    fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= 0
            && cell.row() >= 0
            && (cell.column() as u32) < self.columns()
            && (cell.row() as u32) < self.rows()
    }

    /// Cell containing the provided world-space point.
    ///
    /// Points outside the grid map to cells for which [`TileGrid::contains`]
    /// reports `false`.
    fn cell_at(&self, point: Vec2) -> CellCoord {
        let local = (point - self.world_position_of(CellCoord::new(0, 0))) / self.tile_length();
        CellCoord::new(local.x.floor() as i32, local.y.floor() as i32)
    }
}
