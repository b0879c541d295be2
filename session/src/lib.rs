#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level frame driver that owns both halves of a run.
//!
//! A [`GameSession`] ticks the lane combat and the safehouse on every frame,
//! whichever view the player is looking at, and moves escaped enemies from
//! the former into the latter. The active view only decides where player
//! input lands.

use std::{mem, time::Duration};

use lane_defence_core::{CellCoord, Event, TileGrid, TileKind, Vec2};
use lane_defence_system_safehouse::{self as safehouse, Safehouse};
use lane_defence_world::{self as world, CombatSimulation};

/// Distance per second the player covers on the tile map.
pub const PLAYER_SPEED: f32 = 200.0;

/// View currently receiving player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActiveView {
    /// The lane map where turrets are built.
    TowerDefence,
    /// The arena where escaped enemies are fought.
    Safehouse,
    /// The run ended because the player fell in the safehouse.
    GameOver,
}

/// Configuration for both simulations of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Config {
    combat: world::Config,
    safehouse: safehouse::Config,
}

impl Config {
    /// Creates a session configuration from its parts.
    #[must_use]
    pub const fn new(combat: world::Config, safehouse: safehouse::Config) -> Self {
        Self { combat, safehouse }
    }

    /// Configuration used for the lane combat.
    #[must_use]
    pub const fn combat(&self) -> world::Config {
        self.combat
    }

    /// Configuration used for the safehouse.
    #[must_use]
    pub const fn safehouse(&self) -> safehouse::Config {
        self.safehouse
    }
}

/// Running totals gathered from the combat journal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames simulated since the run began.
    pub frames: u64,
    /// Enemies killed on the lane.
    pub enemies_killed: u32,
    /// Enemies that reached the lane end.
    pub enemies_escaped: u32,
    /// Turrets placed.
    pub turrets_placed: u32,
    /// Waves cleared.
    pub waves_cleared: u32,
}

impl SessionStats {
    fn record(&mut self, event: &Event) {
        match event {
            Event::EnemyKilled { .. } => self.enemies_killed += 1,
            Event::EnemyEscaped { .. } => self.enemies_escaped += 1,
            Event::TurretPlaced { .. } => self.turrets_placed += 1,
            Event::WaveCleared { .. } => self.waves_cleared += 1,
            _ => {}
        }
    }
}

/// One run of the game: lane combat, safehouse and the player's whereabouts.
#[derive(Debug)]
pub struct GameSession<G: TileGrid + Clone> {
    grid: G,
    player_start: Vec2,
    config: Config,
    combat: CombatSimulation<G>,
    safehouse: Safehouse,
    view: ActiveView,
    player: Vec2,
    stats: SessionStats,
    events: Vec<Event>,
}

impl<G: TileGrid + Clone> GameSession<G> {
    /// Starts a run on `grid` with the map player standing at `player_start`.
    #[must_use]
    pub fn new(grid: G, player_start: Vec2, config: Config) -> Self {
        let combat = CombatSimulation::new(grid.clone(), config.combat());
        Self {
            grid,
            player_start,
            config,
            combat,
            safehouse: Safehouse::new(config.safehouse()),
            view: ActiveView::Safehouse,
            player: player_start,
            stats: SessionStats::default(),
            events: Vec::new(),
        }
    }

    /// Advances both simulations by one frame.
    ///
    /// Escapes recorded by the lane during this frame become safehouse
    /// invaders before the safehouse ticks. Nothing advances once the run is
    /// over.
    pub fn frame(&mut self, dt: Duration) {
        if self.view == ActiveView::GameOver {
            return;
        }

        self.combat.tick(dt);
        let escaped = self.combat.consume_escaped_enemies();
        if !escaped.is_empty() {
            self.safehouse.spawn_invaders(&escaped);
        }
        self.safehouse.tick(dt.as_secs_f32());
        self.stats.frames += 1;
        self.collect_events();

        if self.safehouse.is_player_dead() {
            tracing::info!(frames = self.stats.frames, "run over");
            self.view = ActiveView::GameOver;
        }
    }

    /// Moves the player of the active view.
    ///
    /// On the lane map the step is refused when it would end on a wall, a
    /// lane tile, an enemy marker or off the grid.
    pub fn move_player(&mut self, direction: Vec2, dt: Duration) {
        match self.view {
            ActiveView::TowerDefence => self.move_map_player(direction, dt.as_secs_f32()),
            ActiveView::Safehouse => self.safehouse.move_player(direction, dt.as_secs_f32()),
            ActiveView::GameOver => {}
        }
    }

    /// Places a turret on the tile under the map player.
    ///
    /// Only honoured while the tower-defence view is active.
    pub fn place_turret_at_player(&mut self) -> bool {
        if self.view != ActiveView::TowerDefence {
            return false;
        }
        self.place_turret(self.player_cell())
    }

    /// Places a turret on `cell` regardless of the active view.
    ///
    /// Scripted hosts use this to lay out defences before a run.
    pub fn place_turret(&mut self, cell: CellCoord) -> bool {
        if self.view == ActiveView::GameOver {
            return false;
        }
        let placed = self.combat.place_turret(cell);
        self.collect_events();
        placed
    }

    /// Swings the safehouse player's melee attack toward `facing`.
    ///
    /// Only honoured while the safehouse view is active.
    pub fn attack(&mut self, facing: Vec2) -> usize {
        if self.view != ActiveView::Safehouse {
            return 0;
        }
        self.safehouse.attack(facing)
    }

    /// Releases the next wave if the lane is waiting for the player.
    pub fn start_next_wave(&mut self) -> bool {
        if self.view == ActiveView::GameOver {
            return false;
        }
        let started = self.combat.start_next_wave();
        self.collect_events();
        started
    }

    /// Swaps between the tower-defence and safehouse views.
    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            ActiveView::TowerDefence => ActiveView::Safehouse,
            ActiveView::Safehouse => ActiveView::TowerDefence,
            ActiveView::GameOver => ActiveView::GameOver,
        };
    }

    /// Throws the current run away and starts a fresh one in the safehouse.
    pub fn restart(&mut self) {
        self.combat = CombatSimulation::new(self.grid.clone(), self.config.combat());
        self.safehouse = Safehouse::new(self.config.safehouse());
        self.view = ActiveView::Safehouse;
        self.player = self.player_start;
        self.stats = SessionStats::default();
        self.events.clear();
        tracing::info!("run restarted");
    }

    /// Returns and clears the combat events observed since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.events)
    }

    /// View currently receiving player input.
    #[must_use]
    pub const fn view(&self) -> ActiveView {
        self.view
    }

    /// Reports whether the run has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.view == ActiveView::GameOver
    }

    /// Lane combat simulation.
    #[must_use]
    pub const fn combat(&self) -> &CombatSimulation<G> {
        &self.combat
    }

    /// Safehouse simulation.
    #[must_use]
    pub const fn safehouse(&self) -> &Safehouse {
        &self.safehouse
    }

    /// World-space position of the player on the lane map.
    #[must_use]
    pub const fn player_position(&self) -> Vec2 {
        self.player
    }

    /// Tile under the player on the lane map.
    #[must_use]
    pub fn player_cell(&self) -> CellCoord {
        world::query::grid(&self.combat).cell_at(self.player)
    }

    /// Running totals for the current run.
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    fn move_map_player(&mut self, direction: Vec2, dt: f32) {
        let Some(direction) = direction.try_normalize() else {
            return;
        };
        let target = self.player + direction * PLAYER_SPEED * dt;
        let grid = world::query::grid(&self.combat);
        let walkable = matches!(
            grid.tile_kind_at(grid.cell_at(target)),
            Some(TileKind::Empty | TileKind::Start | TileKind::End)
        );
        if walkable {
            self.player = target;
        }
    }

    fn collect_events(&mut self) {
        for event in self.combat.drain_events() {
            self.stats.record(&event);
            self.events.push(event);
        }
    }
}
