#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative combat state for Lane Defence.
//!
//! [`CombatSimulation`] owns every enemy, turret and projectile together with
//! the wave director that paces the lane. Hosts either call its methods
//! directly or drive it through [`apply`], which mirrors each mutation as a
//! stream of [`Event`] values.

use std::{mem, time::Duration};

use lane_defence_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, PlacementError, TileGrid, TileKind, TurretId,
};
use lane_defence_system_path_builder::{self as path_builder, Waypath};
use lane_defence_system_wave_director::{self as wave_director, WaveDirector, WavePhase};

mod enemies;
mod projectiles;
mod turrets;

pub use enemies::Enemy;
pub use projectiles::Projectile;
pub use turrets::{FireRequest, Turret};

/// Tuning applied when a simulation is created or reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u32,
}

impl Config {
    /// Creates a configuration seeding the wave director with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u32) -> Self {
        Self { rng_seed }
    }

    /// Seed handed to the wave director's generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u32 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(wave_director::DEFAULT_RNG_SEED)
    }
}

/// Tower-defence combat running on top of a host-provided tile grid.
#[derive(Debug)]
pub struct CombatSimulation<G: TileGrid> {
    grid: G,
    path: Waypath,
    director: WaveDirector,
    enemies: Vec<Enemy>,
    turrets: Vec<Turret>,
    projectiles: Vec<Projectile>,
    escaped: Vec<EnemyKind>,
    journal: Vec<Event>,
    spawn_requests: Vec<EnemyKind>,
    next_enemy_id: u32,
    next_turret_id: u32,
}

impl<G: TileGrid> CombatSimulation<G> {
    /// Builds the lane path from `grid` and prepares the first wave.
    #[must_use]
    pub fn new(grid: G, config: Config) -> Self {
        let path = path_builder::build(&grid);
        if path.is_degenerate() {
            tracing::warn!(
                waypoints = path.len(),
                "enemy path is degenerate; spawning and movement are disabled"
            );
        }

        Self {
            grid,
            path,
            director: WaveDirector::new(wave_director::Config::new(config.rng_seed())),
            enemies: Vec::new(),
            turrets: Vec::new(),
            projectiles: Vec::new(),
            escaped: Vec::new(),
            journal: Vec::new(),
            spawn_requests: Vec::new(),
            next_enemy_id: 0,
            next_turret_id: 0,
        }
    }

    /// Discards every entity and rewinds wave progression to the first wave.
    ///
    /// The lane path and the tile grid are kept.
    pub fn reset(&mut self) {
        self.director.reset();
        self.enemies.clear();
        self.turrets.clear();
        self.projectiles.clear();
        self.escaped.clear();
        self.journal.clear();
        self.next_enemy_id = 0;
        self.next_turret_id = 0;
        tracing::debug!("combat simulation reset");
    }

    /// Advances the whole simulation by one step.
    pub fn tick(&mut self, dt: Duration) {
        let dt = dt.as_secs_f32();
        self.run_wave_director(dt);
        self.advance_enemies(dt);
        self.fire_turrets(dt);
        self.advance_projectiles(dt);
        self.remove_dead_enemies();
    }

    /// Places a turret on `cell` if it is unoccupied empty terrain.
    ///
    /// Rejections leave the simulation untouched apart from a
    /// [`Event::TurretPlacementRejected`] journal entry.
    pub fn place_turret(&mut self, cell: CellCoord) -> bool {
        if let Err(reason) = self.check_placement(cell) {
            tracing::debug!(?cell, ?reason, "turret placement rejected");
            self.journal
                .push(Event::TurretPlacementRejected { cell, reason });
            return false;
        }

        let turret = TurretId::new(self.next_turret_id);
        self.next_turret_id += 1;
        self.turrets.push(Turret::new(
            turret,
            cell,
            self.grid.world_position_of(cell),
            self.grid.tile_length(),
        ));
        self.journal.push(Event::TurretPlaced { turret, cell });
        true
    }

    /// Releases an enemy of `kind` at the start of the lane.
    ///
    /// Returns `None` when the lane path is degenerate.
    pub fn spawn_enemy(&mut self, kind: EnemyKind) -> Option<EnemyId> {
        if self.path.is_degenerate() {
            return None;
        }
        let start = self.path.start()?;

        let enemy = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.enemies.push(Enemy::new(enemy, kind, start));
        self.journal.push(Event::EnemySpawned { enemy, kind });
        tracing::debug!(enemy = enemy.get(), ?kind, "enemy spawned");
        Some(enemy)
    }

    /// Leaves the waiting state and begins releasing the current wave.
    ///
    /// Returns `false` while a wave is already running or after the final wave.
    pub fn start_next_wave(&mut self) -> bool {
        if !self.director.start_next_wave() {
            return false;
        }
        self.journal.push(Event::WaveStarted {
            level: self.director.current_level(),
            wave: self.director.current_wave(),
        });
        true
    }

    /// Returns and clears the kinds of enemies that escaped since the last call.
    pub fn consume_escaped_enemies(&mut self) -> Vec<EnemyKind> {
        mem::take(&mut self.escaped)
    }

    /// Returns and clears the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.journal)
    }

    /// Zero-based index of the level being played.
    #[must_use]
    pub fn current_level(&self) -> u32 {
        self.director.current_level()
    }

    /// Zero-based index of the wave within the current level.
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        self.director.current_wave()
    }

    /// Number of waves that make up a level.
    #[must_use]
    pub fn waves_per_level(&self) -> u32 {
        self.director.waves_per_level()
    }

    /// Reports whether the next wave waits for the player.
    #[must_use]
    pub fn is_awaiting_player_start(&self) -> bool {
        self.director.is_awaiting_player_start()
    }

    /// Reports whether every wave of every level has been cleared.
    #[must_use]
    pub fn is_all_complete(&self) -> bool {
        self.director.is_all_complete()
    }

    /// Current phase of the wave director.
    #[must_use]
    pub fn wave_phase(&self) -> WavePhase {
        self.director.phase()
    }

    /// Spawn points left in the running wave.
    #[must_use]
    pub fn remaining_budget(&self) -> u32 {
        self.director.remaining_budget()
    }

    fn check_placement(&self, cell: CellCoord) -> Result<(), PlacementError> {
        match self.grid.tile_kind_at(cell) {
            None => Err(PlacementError::OutOfBounds),
            Some(TileKind::Empty) => {
                if self.turrets.iter().any(|turret| turret.cell() == cell) {
                    Err(PlacementError::Occupied)
                } else {
                    Ok(())
                }
            }
            Some(_) => Err(PlacementError::NotEmptyTerrain),
        }
    }

    fn run_wave_director(&mut self, dt: f32) {
        if self.path.is_degenerate() {
            return;
        }

        let mut requests = mem::take(&mut self.spawn_requests);
        let cleared = self
            .director
            .update(dt, self.enemies.len(), &mut requests);

        if let Some(cleared) = cleared {
            tracing::info!(level = cleared.level, wave = cleared.wave, "wave cleared");
            self.journal.push(Event::WaveCleared {
                level: cleared.level,
                wave: cleared.wave,
            });
            if self.director.is_all_complete() {
                tracing::info!("every wave cleared");
                self.journal.push(Event::AllWavesComplete);
            }
        }

        for kind in requests.drain(..) {
            let _ = self.spawn_enemy(kind);
        }
        self.spawn_requests = requests;
    }

    fn advance_enemies(&mut self, dt: f32) {
        let tile_length = self.grid.tile_length();
        let path = &self.path;
        let escaped = &mut self.escaped;
        let journal = &mut self.journal;

        self.enemies.retain_mut(|enemy| {
            if !enemy.advance(dt, path, tile_length) {
                return true;
            }
            tracing::debug!(enemy = enemy.id().get(), kind = ?enemy.kind(), "enemy escaped");
            escaped.push(enemy.kind());
            journal.push(Event::EnemyEscaped {
                enemy: enemy.id(),
                kind: enemy.kind(),
            });
            false
        });
    }

    fn fire_turrets(&mut self, dt: f32) {
        for turret in &mut self.turrets {
            let Some(request) = turret.update(dt, &self.enemies) else {
                continue;
            };
            self.projectiles
                .push(Projectile::new(turret.id(), request.origin, request.direction));
            self.journal.push(Event::ProjectileFired {
                turret: turret.id(),
            });
        }
    }

    fn advance_projectiles(&mut self, dt: f32) {
        let enemies = &mut self.enemies;
        self.projectiles
            .retain_mut(|projectile| projectile.advance(dt, enemies));
    }

    fn remove_dead_enemies(&mut self) {
        let journal = &mut self.journal;
        self.enemies.retain(|enemy| {
            if !enemy.is_dead() {
                return true;
            }
            journal.push(Event::EnemyKilled {
                enemy: enemy.id(),
                kind: enemy.kind(),
            });
            false
        });
    }
}

/// Applies the provided command to the simulation and reports what happened.
pub fn apply<G: TileGrid>(
    simulation: &mut CombatSimulation<G>,
    command: Command,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::Tick { dt } => simulation.tick(dt),
        Command::PlaceTurret { cell } => {
            let _ = simulation.place_turret(cell);
        }
        Command::StartNextWave => {
            let _ = simulation.start_next_wave();
        }
        Command::SpawnEnemy { kind } => {
            let _ = simulation.spawn_enemy(kind);
        }
        Command::Reset => simulation.reset(),
    }
    out_events.append(&mut simulation.journal);
}

/// Query functions that provide read-only access to the simulation state.
pub mod query {
    use lane_defence_core::TileGrid;
    use lane_defence_system_path_builder::Waypath;

    use super::{CombatSimulation, Enemy, Projectile, Turret};

    /// Enemies currently walking the lane, in spawn order.
    #[must_use]
    pub fn enemies<G: TileGrid>(simulation: &CombatSimulation<G>) -> &[Enemy] {
        &simulation.enemies
    }

    /// Turrets placed so far, in placement order.
    #[must_use]
    pub fn turrets<G: TileGrid>(simulation: &CombatSimulation<G>) -> &[Turret] {
        &simulation.turrets
    }

    /// Projectiles still in flight.
    #[must_use]
    pub fn projectiles<G: TileGrid>(simulation: &CombatSimulation<G>) -> &[Projectile] {
        &simulation.projectiles
    }

    /// Lane path enemies follow.
    #[must_use]
    pub fn waypath<G: TileGrid>(simulation: &CombatSimulation<G>) -> &Waypath {
        &simulation.path
    }

    /// Tile grid the simulation was built on.
    #[must_use]
    pub fn grid<G: TileGrid>(simulation: &CombatSimulation<G>) -> &G {
        &simulation.grid
    }

    /// Number of enemies currently walking the lane.
    #[must_use]
    pub fn live_enemy_count<G: TileGrid>(simulation: &CombatSimulation<G>) -> usize {
        simulation.enemies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::LevelGrid;

    fn simulation(rows: &[&str]) -> CombatSimulation<LevelGrid> {
        let grid = LevelGrid::parse(&rows.join("\n"), 50.0).expect("test level");
        CombatSimulation::new(grid, Config::default())
    }

    #[test]
    fn placement_requires_unoccupied_empty_terrain() {
        let mut simulation = simulation(&["w  ", "+++"]);

        assert!(simulation.place_turret(CellCoord::new(1, 0)));
        assert!(!simulation.place_turret(CellCoord::new(1, 0)));
        assert!(!simulation.place_turret(CellCoord::new(0, 0)));
        assert!(!simulation.place_turret(CellCoord::new(1, 1)));
        assert!(!simulation.place_turret(CellCoord::new(3, 0)));
        assert!(!simulation.place_turret(CellCoord::new(-1, 0)));

        assert_eq!(
            simulation.drain_events(),
            vec![
                Event::TurretPlaced {
                    turret: TurretId::new(0),
                    cell: CellCoord::new(1, 0),
                },
                Event::TurretPlacementRejected {
                    cell: CellCoord::new(1, 0),
                    reason: PlacementError::Occupied,
                },
                Event::TurretPlacementRejected {
                    cell: CellCoord::new(0, 0),
                    reason: PlacementError::NotEmptyTerrain,
                },
                Event::TurretPlacementRejected {
                    cell: CellCoord::new(1, 1),
                    reason: PlacementError::NotEmptyTerrain,
                },
                Event::TurretPlacementRejected {
                    cell: CellCoord::new(3, 0),
                    reason: PlacementError::OutOfBounds,
                },
                Event::TurretPlacementRejected {
                    cell: CellCoord::new(-1, 0),
                    reason: PlacementError::OutOfBounds,
                },
            ]
        );
        assert_eq!(query::turrets(&simulation).len(), 1);
    }

    #[test]
    fn degenerate_path_disables_spawning_and_waves() {
        let mut simulation = simulation(&["+ +", "   "]);

        assert_eq!(simulation.spawn_enemy(EnemyKind::Basic), None);
        assert!(simulation.start_next_wave());
        for _ in 0..10 {
            simulation.tick(Duration::from_secs(1));
        }

        assert_eq!(query::live_enemy_count(&simulation), 0);
        assert_eq!(simulation.wave_phase(), WavePhase::Spawning);
        assert_eq!(simulation.remaining_budget(), 10);
    }

    #[test]
    fn spawned_enemies_enter_at_the_lane_start() {
        let mut simulation = simulation(&["+++", "   "]);

        let id = simulation.spawn_enemy(EnemyKind::Tank).expect("lane exists");
        let enemy = &query::enemies(&simulation)[0];

        assert_eq!(enemy.id(), id);
        assert_eq!(enemy.position(), lane_defence_core::Vec2::new(25.0, 25.0));
        assert_eq!(enemy.health(), 6);
    }

    #[test]
    fn reset_clears_entities_and_rewinds_waves() {
        let mut simulation = simulation(&["++++", "    "]);
        assert!(simulation.place_turret(CellCoord::new(0, 1)));
        assert!(simulation.start_next_wave());
        let _ = simulation.spawn_enemy(EnemyKind::Basic);
        simulation.tick(Duration::from_millis(100));

        simulation.reset();

        assert!(query::enemies(&simulation).is_empty());
        assert!(query::turrets(&simulation).is_empty());
        assert!(query::projectiles(&simulation).is_empty());
        assert!(simulation.drain_events().is_empty());
        assert!(simulation.is_awaiting_player_start());
        assert_eq!(simulation.current_level(), 0);
        assert_eq!(simulation.current_wave(), 0);
        assert_eq!(simulation.waves_per_level(), 5);
    }
}
