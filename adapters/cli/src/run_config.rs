//! TOML description of a headless run.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use lane_defence_core::CellCoord;
use serde::Deserialize;

/// Settings for a headless run; every field may be omitted.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunConfig {
    /// Number of frames to simulate.
    pub(crate) frames: u64,
    /// Seconds of simulated time per frame.
    pub(crate) dt_seconds: f32,
    /// Seed for the wave director's generator.
    pub(crate) seed: u32,
    /// Edge length of a level tile in world units.
    pub(crate) tile_length: f32,
    /// Tiles that receive a turret before the first frame, as `[column, row]`.
    pub(crate) turrets: Vec<[i32; 2]>,
    /// Starts every wave as soon as the lane waits for the player.
    pub(crate) auto_start_waves: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 60 * 60,
            dt_seconds: 1.0 / 60.0,
            seed: lane_defence_world::Config::default().rng_seed(),
            tile_length: 50.0,
            turrets: Vec::new(),
            auto_start_waves: true,
        }
    }
}

impl RunConfig {
    /// Reads and validates a run configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read run config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid run config at {}", path.display()))
    }

    /// Parses and validates a run configuration from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse run config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the simulation cannot run with.
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.dt_seconds.is_finite() && self.dt_seconds > 0.0) {
            bail!("dt_seconds must be positive, got {}", self.dt_seconds);
        }
        if !(self.tile_length.is_finite() && self.tile_length > 0.0) {
            bail!("tile_length must be positive, got {}", self.tile_length);
        }
        Ok(())
    }

    /// Turret tiles as cell coordinates.
    pub(crate) fn turret_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.turrets
            .iter()
            .map(|[column, row]| CellCoord::new(*column, *row))
    }
}
