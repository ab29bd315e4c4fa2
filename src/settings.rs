//! Game settings
//!
//! Loaded from a JSON file through the persistence envelope. Missing fields
//! take their defaults, so older files keep working.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::StorageError;
use crate::persistence;
use crate::sim::{FixedTimestep, PongBindings, Playfield};

/// Name used when none is configured
pub const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Physics steps per second
    pub physics_hz: u32,
    /// Catch-up cap per rendered frame
    pub max_substeps: u32,
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,

    // === Fields ===
    pub pong_field: Playfield,
    pub shiba_field: Playfield,

    // === Controls ===
    pub pong_bindings: PongBindings,

    // === Player ===
    /// Name submitted with high scores
    pub player_name: String,
    /// Leaderboard file; `None` keeps scores in memory
    pub high_scores_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics_hz: PHYSICS_HZ,
            max_substeps: MAX_SUBSTEPS,
            seed: None,

            pong_field: Playfield::new(PONG_WIDTH, PONG_HEIGHT),
            shiba_field: Playfield::new(SHIBA_WIDTH, SHIBA_HEIGHT),

            pong_bindings: PongBindings::default(),

            player_name: ANONYMOUS.to_string(),
            high_scores_path: None,
        }
    }
}

impl Settings {
    /// Scheduler configured for this physics rate
    pub fn timestep(&self) -> FixedTimestep {
        FixedTimestep::from_hz(self.physics_hz, self.max_substeps)
    }

    /// Configured seed, or one derived from the wall clock
    pub fn seed_or_clock(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        self.physics_hz = self.physics_hz.clamp(1, 1000);
        self.max_substeps = self.max_substeps.max(1);
        self.pong_field = at_least_min_extent(self.pong_field);
        self.shiba_field = at_least_min_extent(self.shiba_field);
        if self.player_name.trim().is_empty() {
            self.player_name = ANONYMOUS.to_string();
        }
        self
    }

    pub fn load(path: &Path) -> Result<Self, StorageError> {
        persistence::load::<Self>(path).map(Self::sanitized)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.is_not_found() => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        persistence::save(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

/// Zero, negative and NaN extents would break wrapping and clamping
fn at_least_min_extent(field: Playfield) -> Playfield {
    Playfield::new(
        field.width.max(MIN_FIELD_EXTENT),
        field.height.max(MIN_FIELD_EXTENT),
    )
}
