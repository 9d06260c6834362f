//! Game settings and preferences
//!
//! Read from a JSON file next to the binary. Every field has a default, so a
//! partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::Rules;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Session ===
    pub starting_lives: u8,
    /// Level clock (seconds)
    pub level_time_secs: f32,
    /// Overworld input debounce (seconds)
    pub nav_cooldown_secs: f32,

    // === Levels ===
    /// Seed for generated levels; random per run when unset
    pub level_seed: Option<u64>,
    /// Extra level definitions merged over the built-in table
    pub levels_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            starting_lives: STARTING_LIVES,
            level_time_secs: LEVEL_TIME_SECS,
            nav_cooldown_secs: NAV_COOLDOWN_SECS,

            level_seed: None,
            levels_path: None,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "tile_quest_settings.json";

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable. Never fails.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Strict load; any problem is an error
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp values into usable ranges
    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.starting_lives = self.starting_lives.max(1);
        if self.level_time_secs.is_nan() || self.level_time_secs <= 0.0 {
            self.level_time_secs = LEVEL_TIME_SECS;
        }
        self.nav_cooldown_secs = self.nav_cooldown_secs.max(0.0);
        self
    }

    /// Session rules for the simulation
    pub fn rules(&self) -> Rules {
        Rules {
            starting_lives: self.starting_lives,
            level_time_secs: self.level_time_secs,
            nav_cooldown_secs: self.nav_cooldown_secs,
        }
    }
}
