//! Single-hit projectiles released by turrets.

use lane_defence_core::{
    TurretId, Vec2, PROJECTILE_DAMAGE, PROJECTILE_RADIUS, PROJECTILE_SPEED,
    PROJECTILE_TIME_TO_LIVE,
};

use crate::enemies::Enemy;

/// Projectile travelling in a straight line until it hits or expires.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    source: TurretId,
    position: Vec2,
    direction: Vec2,
    speed: f32,
    damage: u32,
    time_to_live: f32,
    radius: f32,
}

impl Projectile {
    /// Creates a projectile with the standard ballistics.
    #[must_use]
    pub fn new(source: TurretId, origin: Vec2, direction: Vec2) -> Self {
        Self {
            source,
            position: origin,
            direction,
            speed: PROJECTILE_SPEED,
            damage: PROJECTILE_DAMAGE,
            time_to_live: PROJECTILE_TIME_TO_LIVE,
            radius: PROJECTILE_RADIUS,
        }
    }

    /// Turret that fired the projectile.
    #[must_use]
    pub const fn source(&self) -> TurretId {
        self.source
    }

    /// Current world-space position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Unit direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Collision radius in world units.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Seconds left before the projectile expires.
    #[must_use]
    pub const fn time_to_live(&self) -> f32 {
        self.time_to_live
    }

    /// Moves the projectile and resolves at most one hit.
    ///
    /// Returns `false` once the projectile expired or struck an enemy. An
    /// expiring projectile performs no collision test on that update.
    pub fn advance(&mut self, dt: f32, enemies: &mut [Enemy]) -> bool {
        self.time_to_live -= dt;
        if self.time_to_live <= 0.0 {
            return false;
        }

        self.position += self.direction * self.speed * dt;

        let hit = enemies.iter_mut().filter(|enemy| !enemy.is_dead()).find(|enemy| {
            let reach = enemy.radius() + self.radius;
            enemy.position().distance_squared(self.position) <= reach * reach
        });

        match hit {
            Some(enemy) => {
                enemy.apply_damage(self.damage);
                false
            }
            None => true,
        }
    }
}
