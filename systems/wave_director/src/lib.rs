#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave pacing system.
//!
//! The director walks every level through a fixed number of waves. Each wave
//! owns a point budget that is spent on enemies drawn from the kinds unlocked
//! for the level, one spawn per interval. The last wave of every level also
//! releases that level's boss before anything else. A wave is cleared once
//! its budget is spent, its boss (if any) is out, and the lane is empty; the
//! director then waits for the player to release the next one.

use lane_defence_core::{stats_for, EnemyKind};
use serde::Serialize;

/// Number of levels in a full run.
pub const LEVEL_COUNT: u32 = 5;

/// Number of waves in every level; the last one carries the level boss.
pub const WAVES_PER_LEVEL: u32 = 5;

/// Seed used when no explicit seed is configured.
pub const DEFAULT_RNG_SEED: u32 = 0x2545_f491;

const BASE_BUDGET: u32 = 10;
const BUDGET_PER_LEVEL: u32 = 10;
const BUDGET_PER_WAVE: u32 = 4;

const BASE_SPAWN_INTERVAL: f32 = 1.0;
const SPAWN_INTERVAL_STEP: f32 = 0.1;
const MIN_SPAWN_INTERVAL: f32 = 0.4;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Kinds unlocked by each level; a level may spawn its own tier and every
/// earlier tier.
const KIND_TIERS: [&[EnemyKind]; LEVEL_COUNT as usize] = [
    &[EnemyKind::Basic, EnemyKind::Fast],
    &[EnemyKind::Tank, EnemyKind::Medium],
    &[EnemyKind::ShortRanged, EnemyKind::Exploder],
    &[EnemyKind::RangedMelee, EnemyKind::FastExploder],
    &[EnemyKind::LongRange, EnemyKind::HeavyTank],
];

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u32,
}

impl Config {
    /// Creates a new configuration using the provided random seed.
    #[must_use]
    pub const fn new(rng_seed: u32) -> Self {
        Self { rng_seed }
    }

    /// Seed loaded into the generator on every reset.
    #[must_use]
    pub const fn rng_seed(&self) -> u32 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED)
    }
}

/// Spawn parameters for a single wave.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaveConfig {
    /// Points available for regular spawns.
    pub spawn_budget: u32,
    /// Seconds between consecutive regular spawns.
    pub spawn_interval: f32,
    /// Kinds eligible for regular spawns; never empty.
    pub allowed_kinds: Vec<EnemyKind>,
    /// Boss released at the start of the wave, if any.
    pub boss: Option<EnemyKind>,
}

impl WaveConfig {
    /// Reports whether the wave releases a boss.
    #[must_use]
    pub fn has_guaranteed_boss(&self) -> bool {
        self.boss.is_some()
    }
}

/// Derives the spawn parameters for the provided level and wave.
///
/// Budgets grow with both indices, intervals shrink toward a floor, kinds
/// accumulate by level tier, and the final wave of a level carries the boss
/// assigned to that level.
#[must_use]
pub fn wave_config(level: u32, wave: u32) -> WaveConfig {
    let spawn_budget = BASE_BUDGET
        .saturating_add(BUDGET_PER_LEVEL.saturating_mul(level))
        .saturating_add(BUDGET_PER_WAVE.saturating_mul(wave));

    let progression = level.saturating_add(wave) as f32;
    let spawn_interval =
        (BASE_SPAWN_INTERVAL - SPAWN_INTERVAL_STEP * progression).max(MIN_SPAWN_INTERVAL);

    let unlocked_tiers = (level as usize).min(KIND_TIERS.len() - 1) + 1;
    let allowed_kinds = KIND_TIERS[..unlocked_tiers]
        .iter()
        .flat_map(|tier| tier.iter().copied())
        .collect();

    let boss = (wave + 1 == WAVES_PER_LEVEL).then(|| {
        let index = (level as usize).min(EnemyKind::BOSSES.len() - 1);
        EnemyKind::BOSSES[index]
    });

    WaveConfig {
        spawn_budget,
        spawn_interval,
        allowed_kinds,
        boss,
    }
}

/// Phases of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WavePhase {
    /// Waiting for the player to release the current wave.
    AwaitingPlayerStart,
    /// Releasing enemies under the wave's budget and interval.
    Spawning,
    /// Everything is released; waiting for the lane to empty.
    DrainingToZero,
    /// Every wave of every level has been cleared.
    AllComplete,
}

/// Identifies a wave that the director just finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearedWave {
    /// Zero-based level index of the cleared wave.
    pub level: u32,
    /// Zero-based wave index of the cleared wave.
    pub wave: u32,
}

/// State machine that paces enemy releases across levels and waves.
#[derive(Clone, Debug)]
pub struct WaveDirector {
    rng_seed: u32,
    level: u32,
    wave: u32,
    config: WaveConfig,
    remaining_budget: u32,
    time_since_last_spawn: f32,
    boss_spawned: bool,
    phase: WavePhase,
    rng_state: u32,
}

impl WaveDirector {
    /// Creates a director positioned before the first wave of the first level.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng_seed: config.rng_seed(),
            level: 0,
            wave: 0,
            config: wave_config(0, 0),
            remaining_budget: 0,
            time_since_last_spawn: 0.0,
            boss_spawned: false,
            phase: WavePhase::AwaitingPlayerStart,
            rng_state: config.rng_seed(),
        }
    }

    /// Rewinds to the first wave of the first level and reseeds the generator.
    pub fn reset(&mut self) {
        *self = Self::new(Config::new(self.rng_seed));
    }

    /// Releases the current wave.
    ///
    /// Returns `false` without changing state unless the director is waiting
    /// for the player.
    pub fn start_next_wave(&mut self) -> bool {
        if self.phase != WavePhase::AwaitingPlayerStart {
            return false;
        }

        self.remaining_budget = self.config.spawn_budget;
        self.time_since_last_spawn = 0.0;
        self.boss_spawned = false;
        self.phase = WavePhase::Spawning;
        tracing::debug!(
            level = self.level,
            wave = self.wave,
            budget = self.remaining_budget,
            "wave started"
        );
        true
    }

    /// Advances the director by `dt` seconds.
    ///
    /// `live_enemies` is the number of enemies currently on the lane. Kinds to
    /// release this tick are appended to `out`. Returns the wave that was
    /// cleared during this tick, if any.
    pub fn update(
        &mut self,
        dt: f32,
        live_enemies: usize,
        out: &mut Vec<EnemyKind>,
    ) -> Option<ClearedWave> {
        if matches!(
            self.phase,
            WavePhase::AwaitingPlayerStart | WavePhase::AllComplete
        ) {
            return None;
        }

        if self.wave_spent() && live_enemies == 0 {
            return Some(self.advance());
        }

        if self.phase == WavePhase::Spawning {
            self.pace(dt, out);
            if self.wave_spent() {
                self.phase = WavePhase::DrainingToZero;
            }
        }

        None
    }

    /// Zero-based index of the current level.
    #[must_use]
    pub const fn current_level(&self) -> u32 {
        self.level
    }

    /// Zero-based index of the current wave within its level.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.wave
    }

    /// Number of waves in every level.
    #[must_use]
    pub const fn waves_per_level(&self) -> u32 {
        WAVES_PER_LEVEL
    }

    /// Current phase of the state machine.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Reports whether the director waits for the player to start a wave.
    #[must_use]
    pub fn is_awaiting_player_start(&self) -> bool {
        self.phase == WavePhase::AwaitingPlayerStart
    }

    /// Reports whether every wave of every level has been cleared.
    #[must_use]
    pub fn is_all_complete(&self) -> bool {
        self.phase == WavePhase::AllComplete
    }

    /// Points left to spend in the current wave.
    #[must_use]
    pub const fn remaining_budget(&self) -> u32 {
        self.remaining_budget
    }

    /// Spawn parameters of the current wave.
    #[must_use]
    pub const fn wave_config(&self) -> &WaveConfig {
        &self.config
    }

    /// Current generator state.
    #[must_use]
    pub const fn rng_state(&self) -> u32 {
        self.rng_state
    }

    fn wave_spent(&self) -> bool {
        self.remaining_budget == 0 && (self.config.boss.is_none() || self.boss_spawned)
    }

    fn pace(&mut self, dt: f32, out: &mut Vec<EnemyKind>) {
        self.time_since_last_spawn += dt;

        if let Some(boss) = self.config.boss {
            if !self.boss_spawned {
                self.boss_spawned = true;
                tracing::debug!(?boss, level = self.level, "boss released");
                out.push(boss);
                return;
            }
        }

        if self.remaining_budget == 0 || self.time_since_last_spawn < self.config.spawn_interval {
            return;
        }

        self.time_since_last_spawn = 0.0;
        match self.draw_kind() {
            Some(kind) => {
                self.remaining_budget -= stats_for(kind).spawn_cost;
                out.push(kind);
            }
            None => {
                tracing::debug!(
                    remaining = self.remaining_budget,
                    "no affordable kind; wave budget forfeited"
                );
                self.remaining_budget = 0;
            }
        }
    }

    /// Draws a kind among the affordable ones, weighting each by how many
    /// copies the remaining budget could buy.
    fn draw_kind(&mut self) -> Option<EnemyKind> {
        let budget = self.remaining_budget;
        let weight = |kind: EnemyKind| -> u32 {
            let cost = stats_for(kind).spawn_cost;
            if cost <= budget {
                budget / cost
            } else {
                0
            }
        };

        let total: u32 = self.config.allowed_kinds.iter().map(|kind| weight(*kind)).sum();
        if total == 0 {
            return None;
        }

        let mut roll = (self.next_random() >> 16) % total;
        for kind in &self.config.allowed_kinds {
            let share = weight(*kind);
            if roll < share {
                return Some(*kind);
            }
            roll -= share;
        }
        None
    }

    fn next_random(&mut self) -> u32 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.rng_state
    }

    fn advance(&mut self) -> ClearedWave {
        let cleared = ClearedWave {
            level: self.level,
            wave: self.wave,
        };

        if self.wave + 1 < WAVES_PER_LEVEL {
            self.wave += 1;
        } else if self.level + 1 < LEVEL_COUNT {
            self.level += 1;
            self.wave = 0;
        } else {
            self.phase = WavePhase::AllComplete;
            tracing::info!(level = cleared.level, wave = cleared.wave, "final wave cleared");
            return cleared;
        }

        self.config = wave_config(self.level, self.wave);
        self.remaining_budget = 0;
        self.boss_spawned = false;
        self.phase = WavePhase::AwaitingPlayerStart;
        tracing::info!(level = cleared.level, wave = cleared.wave, "wave cleared");
        cleared
    }
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_draw_from_zero_seed_is_pinned() {
        let mut director = WaveDirector::new(Config::new(0));
        assert!(director.start_next_wave());
        assert_eq!(director.draw_kind(), Some(EnemyKind::Basic));
        assert_eq!(director.rng_state(), LCG_INCREMENT);
    }

    #[test]
    fn generator_wraps_at_thirty_two_bits() {
        let mut director = WaveDirector::new(Config::new(u32::MAX));
        let expected = u32::MAX
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        assert_eq!(director.next_random(), expected);
    }

    #[test]
    fn unaffordable_budget_draws_nothing() {
        let mut director = WaveDirector::new(Config::new(7));
        director.config.allowed_kinds = vec![EnemyKind::Tank];
        director.remaining_budget = 2;
        assert_eq!(director.draw_kind(), None);
    }

    #[test]
    fn start_is_ignored_outside_waiting_phase() {
        let mut director = WaveDirector::default();
        assert!(director.start_next_wave());
        assert!(!director.start_next_wave());
        assert_eq!(director.phase(), WavePhase::Spawning);
    }

    #[test]
    fn reset_restores_seed_and_first_wave() {
        let mut director = WaveDirector::new(Config::new(99));
        let _ = director.start_next_wave();
        let mut out = Vec::new();
        for _ in 0..4 {
            let _ = director.update(1.0, 1, &mut out);
        }
        assert_ne!(director.rng_state(), 99);

        director.reset();

        assert_eq!(director.rng_state(), 99);
        assert!(director.is_awaiting_player_start());
        assert_eq!(director.remaining_budget(), 0);
        assert_eq!((director.current_level(), director.current_wave()), (0, 0));
    }
}
