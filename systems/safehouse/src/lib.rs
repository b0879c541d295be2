#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Companion scene where escaped enemies return as invaders.
//!
//! Every enemy that slips past the turrets re-appears here and chases the
//! player, who fights back with a short melee cone. The scene knows nothing
//! about the lane; the session hands it escaped kinds each frame.

use std::f32::consts::FRAC_1_SQRT_2;

use lane_defence_core::{stats_for, EnemyKind, Tint, Vec2};

/// Radius of the player's body.
pub const PLAYER_RADIUS: f32 = 25.0;

/// Health the player starts every run with.
pub const PLAYER_MAX_HEALTH: u32 = 3;

/// Distance per second the player covers.
pub const PLAYER_SPEED: f32 = 200.0;

/// Seconds of invulnerability after the player is touched.
pub const CONTACT_COOLDOWN: f32 = 1.0;

/// Seconds between two melee attacks.
pub const ATTACK_COOLDOWN: f32 = 0.5;

/// Reach of the melee cone.
pub const ATTACK_RADIUS: f32 = 80.0;

/// Seconds an invader flashes after being struck.
pub const INVADER_FLASH_DURATION: f32 = 0.15;

const INVADER_RADIUS_SCALE: f32 = 4.0 / 3.0;
const ATTACK_HALF_ANGLE_COS: f32 = FRAC_1_SQRT_2;
const SPAWN_COLUMN_INSET: f32 = 100.0;
const SPAWN_FIRST_ROW: f32 = 150.0;
const SPAWN_ROW_SPACING: f32 = 50.0;
const SPAWN_BOTTOM_INSET: f32 = 100.0;

/// Tuning applied when a safehouse is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    arena: Vec2,
}

impl Config {
    /// Creates a configuration for an arena of the given size.
    #[must_use]
    pub const fn new(arena: Vec2) -> Self {
        Self { arena }
    }

    /// Width and height of the arena.
    #[must_use]
    pub const fn arena(&self) -> Vec2 {
        self.arena
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

/// Player avatar inside the safehouse.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    health: u32,
    max_health: u32,
}

impl Player {
    fn new(position: Vec2) -> Self {
        Self {
            position,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
        }
    }

    /// Current world-space position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health the player started with.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Radius of the player's body.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        PLAYER_RADIUS
    }
}

/// Escaped enemy chasing the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Invader {
    kind: EnemyKind,
    position: Vec2,
    radius: f32,
    speed: f32,
    health: u32,
    max_health: u32,
    base_tint: Tint,
    tint: Tint,
    flash_remaining: f32,
}

impl Invader {
    fn new(kind: EnemyKind, position: Vec2) -> Self {
        let stats = stats_for(kind);
        Self {
            kind,
            position,
            radius: stats.collision_radius * INVADER_RADIUS_SCALE,
            speed: stats.speed,
            health: stats.max_health,
            max_health: stats.max_health,
            base_tint: stats.base_tint,
            tint: stats.base_tint,
            flash_remaining: 0.0,
        }
    }

    /// Kind of the enemy that escaped.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Current world-space position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Body radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health the invader arrived with.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Colour derived from the most recent tick.
    #[must_use]
    pub const fn tint(&self) -> Tint {
        self.tint
    }

    fn chase(&mut self, target: Vec2, dt: f32) {
        let offset = target - self.position;
        if offset.length_squared() > 1.0 {
            self.position += offset.normalize() * self.speed * dt;
        }
    }

    fn decay_flash(&mut self, dt: f32) {
        if self.flash_remaining <= 0.0 {
            self.tint = self.base_tint;
            return;
        }
        self.flash_remaining = (self.flash_remaining - dt).max(0.0);
        let strength = self.flash_remaining / INVADER_FLASH_DURATION;
        self.tint = self.base_tint.lerp(Tint::WHITE, strength);
    }

    fn strike(&mut self) {
        self.health = self.health.saturating_sub(1);
        self.flash_remaining = INVADER_FLASH_DURATION;
    }
}

/// Arena state: the player, the invaders and the combat timers.
#[derive(Clone, Debug)]
pub struct Safehouse {
    config: Config,
    player: Player,
    invaders: Vec<Invader>,
    contact_cooldown: f32,
    attack_cooldown: f32,
    invaders_defeated: u32,
}

impl Safehouse {
    /// Creates an empty arena with the player standing in its centre.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            player: Player::new(config.arena() * 0.5),
            invaders: Vec::new(),
            contact_cooldown: 0.0,
            attack_cooldown: 0.0,
            invaders_defeated: 0,
        }
    }

    /// Adds one invader per escaped kind, stacked along the right edge.
    pub fn spawn_invaders(&mut self, kinds: &[EnemyKind]) {
        let arena = self.config.arena();
        for &kind in kinds {
            let mut y = SPAWN_FIRST_ROW + self.invaders.len() as f32 * SPAWN_ROW_SPACING;
            if y > arena.y - SPAWN_BOTTOM_INSET {
                y = SPAWN_FIRST_ROW;
            }
            let position = Vec2::new(arena.x - SPAWN_COLUMN_INSET, y);
            tracing::debug!(?kind, x = position.x, y = position.y, "invader entered safehouse");
            self.invaders.push(Invader::new(kind, position));
        }
    }

    /// Advances timers, moves invaders and resolves contact damage.
    pub fn tick(&mut self, dt: f32) {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.contact_cooldown = (self.contact_cooldown - dt).max(0.0);

        let target = self.player.position;
        for invader in &mut self.invaders {
            invader.chase(target, dt);

            let reach = PLAYER_RADIUS + invader.radius;
            let touching = invader.position.distance_squared(target) <= reach * reach;
            if touching && self.contact_cooldown <= 0.0 {
                self.player.health = self.player.health.saturating_sub(1);
                self.contact_cooldown = CONTACT_COOLDOWN;
                tracing::debug!(health = self.player.health, "player touched by invader");
            }

            invader.decay_flash(dt);
        }

        if self.is_player_dead() && !self.invaders.is_empty() {
            tracing::info!("player fell in the safehouse");
            self.invaders.clear();
        }
    }

    /// Swings a melee cone toward `facing` and reports how many invaders it hit.
    ///
    /// Does nothing while the attack is cooling down. A zero `facing` swings
    /// toward `+x`.
    pub fn attack(&mut self, facing: Vec2) -> usize {
        if self.attack_cooldown > 0.0 {
            return 0;
        }
        self.attack_cooldown = ATTACK_COOLDOWN;

        let forward = facing.try_normalize().unwrap_or(Vec2::X);
        let origin = self.player.position;
        let mut hits = 0;
        for invader in &mut self.invaders {
            if in_attack_cone(origin, forward, invader.position) {
                invader.strike();
                hits += 1;
            }
        }

        let before = self.invaders.len();
        self.invaders.retain(|invader| invader.health > 0);
        let defeated = (before - self.invaders.len()) as u32;
        self.invaders_defeated += defeated;
        tracing::debug!(hits, defeated, "player attacked");
        hits
    }

    /// Walks the player freely at [`PLAYER_SPEED`], kept inside the arena.
    pub fn move_player(&mut self, direction: Vec2, dt: f32) {
        let Some(direction) = direction.try_normalize() else {
            return;
        };
        let moved = self.player.position + direction * PLAYER_SPEED * dt;
        self.player.position = moved.clamp(Vec2::ZERO, self.config.arena());
    }

    /// Reports whether the player has run out of health.
    #[must_use]
    pub const fn is_player_dead(&self) -> bool {
        self.player.health == 0
    }

    /// Player avatar.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Invaders currently in the arena, in arrival order.
    #[must_use]
    pub fn invaders(&self) -> &[Invader] {
        &self.invaders
    }

    /// Number of invaders the player has destroyed.
    #[must_use]
    pub const fn invaders_defeated(&self) -> u32 {
        self.invaders_defeated
    }

    /// Seconds until the player may attack again.
    #[must_use]
    pub const fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    /// Seconds of invulnerability left after the latest contact.
    #[must_use]
    pub const fn contact_cooldown(&self) -> f32 {
        self.contact_cooldown
    }
}

impl Default for Safehouse {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn in_attack_cone(origin: Vec2, forward: Vec2, point: Vec2) -> bool {
    let offset = point - origin;
    let distance_squared = offset.length_squared();
    if distance_squared < 1.0 {
        return true;
    }
    if distance_squared > ATTACK_RADIUS * ATTACK_RADIUS {
        return false;
    }
    offset.normalize().dot(forward) >= ATTACK_HALF_ANGLE_COS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cone_covers_ninety_degrees_within_reach() {
        let origin = Vec2::new(100.0, 100.0);
        assert!(in_attack_cone(origin, Vec2::X, Vec2::new(170.0, 100.0)));
        assert!(in_attack_cone(origin, Vec2::X, Vec2::new(140.0, 130.0)));
        assert!(!in_attack_cone(origin, Vec2::X, Vec2::new(130.0, 160.0)));
        assert!(!in_attack_cone(origin, Vec2::X, Vec2::new(190.0, 100.0)));
        assert!(!in_attack_cone(origin, Vec2::X, Vec2::new(40.0, 100.0)));
        assert!(in_attack_cone(origin, Vec2::X, Vec2::new(100.5, 100.0)));
    }

    #[test]
    fn invaders_scale_catalog_radius() {
        let invader = Invader::new(EnemyKind::Basic, Vec2::ZERO);
        assert!((invader.radius() - 20.0).abs() < 1e-5);
        assert_eq!(invader.health(), 3);

        let tank = Invader::new(EnemyKind::Tank, Vec2::ZERO);
        assert!((tank.radius() - 24.0).abs() < 1e-5);
    }

    #[test]
    fn struck_invader_flashes_toward_white() {
        let mut invader = Invader::new(EnemyKind::Basic, Vec2::ZERO);
        invader.strike();
        invader.decay_flash(0.0);
        assert_eq!(invader.tint(), Tint::WHITE);

        invader.decay_flash(1.0);
        assert_eq!(invader.tint(), stats_for(EnemyKind::Basic).base_tint);
    }
}
