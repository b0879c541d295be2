//! Path-following enemies and their hit-flash presentation state.

use lane_defence_core::{
    stats_for, EnemyId, EnemyKind, EnemyStats, Tint, Vec2, HIT_FLASH_DURATION, HIT_FLASH_TINT,
};
use lane_defence_system_path_builder::Waypath;

/// Enemy walking the lane toward its end.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    stats: EnemyStats,
    health: u32,
    path_parameter: f32,
    position: Vec2,
    hit_flash_remaining: f32,
    tint: Tint,
}

impl Enemy {
    /// Creates a full-health enemy of the given kind at the provided position.
    #[must_use]
    pub fn new(id: EnemyId, kind: EnemyKind, position: Vec2) -> Self {
        let stats = stats_for(kind);
        Self {
            id,
            kind,
            stats,
            health: stats.max_health,
            path_parameter: 0.0,
            position,
            hit_flash_remaining: 0.0,
            tint: stats.base_tint,
        }
    }

    /// Identifier allocated by the simulation.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Kind the enemy was spawned as.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Remaining health; zero means the enemy is dead.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health the enemy entered the lane with.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.stats.max_health
    }

    /// Current world-space position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Collision radius taken from the catalog.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.stats.collision_radius
    }

    /// Colour derived from the most recent advance.
    #[must_use]
    pub const fn tint(&self) -> Tint {
        self.tint
    }

    /// Progress along the lane in segment units.
    #[must_use]
    pub const fn path_parameter(&self) -> f32 {
        self.path_parameter
    }

    /// Seconds left on the current hit flash.
    #[must_use]
    pub const fn hit_flash_remaining(&self) -> f32 {
        self.hit_flash_remaining
    }

    /// Reports whether the enemy has run out of health.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Moves the enemy along the path and reports whether it escaped.
    ///
    /// Speed is converted to segment units by dividing by the tile edge length.
    /// Once the segment index reaches the final waypoint the enemy is clamped to
    /// it and `true` is returned. Degenerate paths leave the enemy untouched.
    pub fn advance(&mut self, dt: f32, path: &Waypath, tile_length: f32) -> bool {
        self.decay_flash(dt);

        let points = path.points();
        if path.is_degenerate() {
            return false;
        }

        self.path_parameter += self.stats.speed * dt / tile_length;
        let segment = self.path_parameter.floor();
        let last = points.len() - 1;
        let index = segment as usize;
        if index >= last {
            self.position = points[last];
            return true;
        }

        let factor = self.path_parameter - segment;
        self.position = points[index].lerp(points[index + 1], factor);
        false
    }

    /// Removes health and restarts the hit flash.
    ///
    /// Health saturates at zero. Dead enemies ignore further damage.
    pub fn apply_damage(&mut self, amount: u32) {
        if self.is_dead() {
            return;
        }
        self.health = self.health.saturating_sub(amount);
        self.hit_flash_remaining = HIT_FLASH_DURATION;
    }

    fn decay_flash(&mut self, dt: f32) {
        if self.hit_flash_remaining <= 0.0 {
            self.tint = self.stats.base_tint;
            return;
        }
        self.hit_flash_remaining = (self.hit_flash_remaining - dt).max(0.0);
        let strength = self.hit_flash_remaining / HIT_FLASH_DURATION;
        self.tint = self.stats.base_tint.lerp(HIT_FLASH_TINT, strength);
    }
}
