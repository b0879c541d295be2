//! Stationary turrets that track the nearest enemy in range.

use lane_defence_core::{CellCoord, TurretId, Vec2, TURRET_FIRE_INTERVAL, TURRET_RANGE_TILES};

use crate::enemies::Enemy;

/// Projectile launch decided by a turret during an update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireRequest {
    /// World-space point the projectile starts from.
    pub origin: Vec2,
    /// Unit direction the projectile travels in.
    pub direction: Vec2,
}

/// Turret occupying a single tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Turret {
    id: TurretId,
    cell: CellCoord,
    center: Vec2,
    range: f32,
    cooldown_remaining: f32,
    just_fired: bool,
}

impl Turret {
    /// Creates a ready turret on the tile whose top-left corner is `corner`.
    #[must_use]
    pub fn new(id: TurretId, cell: CellCoord, corner: Vec2, tile_length: f32) -> Self {
        Self {
            id,
            cell,
            center: corner + Vec2::splat(tile_length * 0.5),
            range: TURRET_RANGE_TILES * tile_length,
            cooldown_remaining: 0.0,
            just_fired: false,
        }
    }

    /// Identifier allocated by the simulation.
    #[must_use]
    pub const fn id(&self) -> TurretId {
        self.id
    }

    /// Tile occupied by the turret.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// World-space centre that range checks and projectiles start from.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Reach of the turret in world units.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.range
    }

    /// Seconds until the turret may fire again.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Reports whether the turret fired during its latest update.
    #[must_use]
    pub const fn just_fired(&self) -> bool {
        self.just_fired
    }

    /// Decays the cooldown and, once ready, aims at the nearest live enemy.
    ///
    /// Enemies exactly at the range boundary are still targeted. Equal
    /// distances resolve to the enemy enumerated first.
    pub fn update(&mut self, dt: f32, enemies: &[Enemy]) -> Option<FireRequest> {
        self.just_fired = false;
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
            return None;
        }

        let range_squared = self.range * self.range;
        let target = enemies
            .iter()
            .filter(|enemy| !enemy.is_dead())
            .map(|enemy| (enemy, enemy.position().distance_squared(self.center)))
            .filter(|(_, distance)| *distance <= range_squared)
            .min_by(|(_, left), (_, right)| left.total_cmp(right))
            .map(|(enemy, _)| enemy)?;

        let direction = (target.position() - self.center)
            .try_normalize()
            .unwrap_or(Vec2::X);
        self.cooldown_remaining = TURRET_FIRE_INTERVAL;
        self.just_fired = true;
        Some(FireRequest {
            origin: self.center,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{EnemyId, EnemyKind};

    fn turret() -> Turret {
        Turret::new(TurretId::new(0), CellCoord::new(0, 0), Vec2::ZERO, 50.0)
    }

    fn enemy_at(id: u32, position: Vec2) -> Enemy {
        Enemy::new(EnemyId::new(id), EnemyKind::Basic, position)
    }

    #[test]
    fn centre_and_range_follow_tile_length() {
        let turret = Turret::new(
            TurretId::new(1),
            CellCoord::new(2, 1),
            Vec2::new(100.0, 50.0),
            50.0,
        );
        assert_eq!(turret.center(), Vec2::new(125.0, 75.0));
        assert_eq!(turret.range(), 150.0);
    }

    #[test]
    fn ignores_enemies_beyond_range() {
        let mut turret = turret();
        let enemies = [
            enemy_at(0, Vec2::new(176.0, 25.0)),
            enemy_at(1, Vec2::new(25.0, 400.0)),
        ];

        for _ in 0..10 {
            assert_eq!(turret.update(0.1, &enemies), None);
        }
        assert_eq!(turret.cooldown_remaining(), 0.0);
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut turret = turret();
        let enemies = [enemy_at(0, Vec2::new(175.0, 25.0))];

        let request = turret.update(0.1, &enemies).expect("boundary enemy in range");
        assert_eq!(request.origin, Vec2::new(25.0, 25.0));
        assert_eq!(request.direction, Vec2::X);
    }

    #[test]
    fn aims_at_nearest_live_enemy() {
        let mut turret = turret();
        let mut dead = enemy_at(0, Vec2::new(25.0, 30.0));
        dead.apply_damage(10);
        let enemies = [
            dead,
            enemy_at(1, Vec2::new(125.0, 25.0)),
            enemy_at(2, Vec2::new(25.0, 85.0)),
        ];

        let request = turret.update(0.0, &enemies).expect("target in range");
        assert_eq!(request.direction, Vec2::Y);
        assert!(turret.just_fired());
    }

    #[test]
    fn coincident_target_defaults_to_positive_x() {
        let mut turret = turret();
        let enemies = [enemy_at(0, Vec2::new(25.0, 25.0))];

        let request = turret.update(0.0, &enemies).expect("target in range");
        assert_eq!(request.direction, Vec2::X);
    }

    #[test]
    fn cooldown_blocks_firing_until_elapsed() {
        let mut turret = turret();
        let enemies = [enemy_at(0, Vec2::new(75.0, 25.0))];

        assert!(turret.update(0.1, &enemies).is_some());
        assert_eq!(turret.cooldown_remaining(), TURRET_FIRE_INTERVAL);

        for _ in 0..4 {
            assert_eq!(turret.update(0.125, &enemies), None);
            assert!(!turret.just_fired());
        }
        assert_eq!(turret.cooldown_remaining(), 0.0);
        assert!(turret.update(0.1, &enemies).is_some());
    }
}
