//! Static table describing the base attributes of every enemy kind.

use serde::Serialize;

use crate::{EnemyKind, Tint};

/// Constant per-kind attributes consulted whenever an enemy is created.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EnemyStats {
    /// Health an enemy of this kind enters the lane with.
    pub max_health: u32,
    /// Distance travelled per second along the lane.
    pub speed: f32,
    /// Radius used for circle collision against projectiles.
    pub collision_radius: f32,
    /// Colour shown while the enemy is not flashing.
    pub base_tint: Tint,
    /// Indicates whether the enemy attacks from a distance.
    pub is_ranged: bool,
    /// Reach of a ranged attack; zero for melee enemies.
    pub range_limit: f32,
    /// Damage dealt on contact or per ranged hit.
    pub contact_damage: u32,
    /// Indicates whether the enemy bursts on contact.
    pub explodes: bool,
    /// Radius of the burst; zero when the enemy does not explode.
    pub explosion_radius: f32,
    /// Points deducted from a wave budget when this kind is released.
    pub spawn_cost: u32,
}

impl EnemyStats {
    const fn melee(
        max_health: u32,
        speed: f32,
        collision_radius: f32,
        base_tint: Tint,
        contact_damage: u32,
        spawn_cost: u32,
    ) -> Self {
        Self {
            max_health,
            speed,
            collision_radius,
            base_tint,
            is_ranged: false,
            range_limit: 0.0,
            contact_damage,
            explodes: false,
            explosion_radius: 0.0,
            spawn_cost,
        }
    }

    const fn ranged(mut self, range_limit: f32) -> Self {
        self.is_ranged = true;
        self.range_limit = range_limit;
        self
    }

    const fn exploding(mut self, explosion_radius: f32) -> Self {
        self.explodes = true;
        self.explosion_radius = explosion_radius;
        self
    }
}

/// Looks up the constant attributes for the provided enemy kind.
#[must_use]
pub const fn stats_for(kind: EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Basic => EnemyStats::melee(3, 60.0, 15.0, Tint::from_rgb(255, 0, 0), 1, 1),
        EnemyKind::Fast => EnemyStats::melee(2, 110.0, 12.0, Tint::from_rgb(255, 200, 0), 1, 2),
        EnemyKind::Tank => EnemyStats::melee(6, 40.0, 18.0, Tint::from_rgb(150, 0, 200), 2, 3),
        EnemyKind::ShortRanged => {
            EnemyStats::melee(3, 55.0, 14.0, Tint::from_rgb(0, 180, 255), 1, 3).ranged(120.0)
        }
        EnemyKind::Exploder => {
            EnemyStats::melee(2, 70.0, 14.0, Tint::from_rgb(255, 120, 0), 3, 3).exploding(60.0)
        }
        EnemyKind::Medium => EnemyStats::melee(4, 55.0, 16.0, Tint::from_rgb(200, 60, 60), 1, 2),
        EnemyKind::RangedMelee => {
            EnemyStats::melee(4, 50.0, 16.0, Tint::from_rgb(0, 200, 150), 2, 4).ranged(80.0)
        }
        EnemyKind::FastExploder => {
            EnemyStats::melee(2, 120.0, 12.0, Tint::from_rgb(255, 80, 40), 2, 4).exploding(50.0)
        }
        EnemyKind::LongRange => {
            EnemyStats::melee(3, 45.0, 14.0, Tint::from_rgb(80, 120, 255), 1, 5).ranged(250.0)
        }
        EnemyKind::HeavyTank => {
            EnemyStats::melee(12, 30.0, 22.0, Tint::from_rgb(90, 0, 140), 3, 6)
        }
        EnemyKind::Boss1 => EnemyStats::melee(20, 35.0, 26.0, Tint::from_rgb(180, 0, 0), 3, 10),
        EnemyKind::Boss2 => {
            EnemyStats::melee(30, 35.0, 28.0, Tint::from_rgb(0, 120, 200), 3, 15).ranged(150.0)
        }
        EnemyKind::Boss3 => {
            EnemyStats::melee(40, 30.0, 30.0, Tint::from_rgb(220, 100, 0), 4, 20).exploding(90.0)
        }
        EnemyKind::Boss4 => {
            EnemyStats::melee(55, 30.0, 32.0, Tint::from_rgb(0, 160, 90), 4, 25).ranged(200.0)
        }
        EnemyKind::Boss5 => EnemyStats::melee(75, 25.0, 36.0, Tint::from_rgb(60, 0, 90), 5, 30)
            .ranged(200.0)
            .exploding(120.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_positive_core_attributes() {
        for kind in EnemyKind::ALL {
            let stats = stats_for(kind);
            assert!(stats.max_health > 0, "{kind:?} health");
            assert!(stats.speed > 0.0, "{kind:?} speed");
            assert!(stats.collision_radius > 0.0, "{kind:?} radius");
            assert!(stats.spawn_cost >= 1, "{kind:?} cost");
            assert!(stats.range_limit >= 0.0 && stats.explosion_radius >= 0.0);
            assert_eq!(stats.is_ranged, stats.range_limit > 0.0, "{kind:?} range");
            assert_eq!(stats.explodes, stats.explosion_radius > 0.0, "{kind:?} burst");
        }
    }

    #[test]
    fn early_kinds_match_the_original_tuning() {
        let basic = stats_for(EnemyKind::Basic);
        assert_eq!(basic.max_health, 3);
        assert_eq!(basic.spawn_cost, 1);
        assert_eq!(basic.speed, 60.0);
        assert_eq!(basic.collision_radius, 15.0);

        let fast = stats_for(EnemyKind::Fast);
        assert_eq!(fast.max_health, 2);
        assert_eq!(fast.spawn_cost, 2);
        assert_eq!(fast.base_tint, Tint::from_rgb(255, 200, 0));

        let tank = stats_for(EnemyKind::Tank);
        assert_eq!(tank.max_health, 6);
        assert_eq!(tank.speed, 40.0);
    }

    #[test]
    fn bosses_outlast_regular_enemies() {
        let sturdiest_regular = EnemyKind::ALL
            .iter()
            .filter(|kind| !kind.is_boss())
            .map(|kind| stats_for(*kind).max_health)
            .max()
            .unwrap_or(0);
        for boss in EnemyKind::BOSSES {
            assert!(stats_for(boss).max_health > sturdiest_regular);
        }
    }
}
