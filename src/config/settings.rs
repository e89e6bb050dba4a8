// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{
    fs,
    path::{Path, PathBuf},
};

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ConfigError;

/// The audio drivers offered for the synthesizer. Drivers are passed through verbatim.
pub const DRIVER_CHOICES: [&str; 3] = ["dsound", "wasapi", "portaudio"];

/// The synthesizer used when no executable has been configured. Resolved through PATH.
pub const DEFAULT_SYNTH: &str = "fluidsynth";

pub const DEFAULT_GAIN: f64 = 0.8;
pub const MIN_GAIN: f64 = 0.2;
pub const MAX_GAIN: f64 = 1.2;

/// Returns the default audio driver for the current platform.
pub fn default_driver() -> String {
    if cfg!(windows) {
        "dsound".to_string()
    } else {
        "portaudio".to_string()
    }
}

/// Clamps the gain to the supported range and rounds it to two decimals.
pub fn normalize_gain(gain: f64) -> f64 {
    if gain.is_nan() {
        return DEFAULT_GAIN;
    }
    (gain.clamp(MIN_GAIN, MAX_GAIN) * 100.0).round() / 100.0
}

/// User settings for the player.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// The soundfont to play with.
    pub soundfont: Option<PathBuf>,
    /// The synthesizer executable. If unset, the default synthesizer is looked up on PATH.
    pub fluidsynth: Option<PathBuf>,
    /// The synthesizer audio driver.
    pub audio_driver: String,
    /// The synthesizer gain.
    pub gain: f64,
    pub dark_mode: bool,
    /// Last directories used when picking files.
    pub last_midi_dir: Option<PathBuf>,
    pub last_sf2_dir: Option<PathBuf>,
    pub last_fs_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            soundfont: None,
            fluidsynth: None,
            audio_driver: default_driver(),
            gain: DEFAULT_GAIN,
            dark_mode: false,
            last_midi_dir: None,
            last_sf2_dir: None,
            last_fs_dir: None,
        }
    }
}

impl Settings {
    /// Parses settings from a JSON file. A missing file yields the defaults. The gain is
    /// clamped to the supported range.
    pub fn deserialize(path: &Path) -> Result<Settings, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.gain = normalize_gain(settings.gain);
        Ok(settings)
    }

    /// Writes the settings to the given path as JSON.
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The synthesizer executable to launch.
    pub fn synth_executable(&self) -> PathBuf {
        self.fluidsynth
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYNTH))
    }

    /// The audio driver to pass to the synthesizer, falling back to the platform default.
    pub fn driver(&self) -> String {
        let driver = self.audio_driver.trim();
        if driver.is_empty() {
            default_driver()
        } else {
            driver.to_string()
        }
    }
}

/// Settings backed by a file. Every change is written out immediately. Load and save failures are
/// logged and otherwise ignored.
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Loads the settings at the given path, falling back to defaults if they can't be read.
    pub fn load(path: &Path) -> SettingsStore {
        let settings = match Settings::deserialize(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    err = %e,
                    "Unable to load settings, using defaults."
                );
                Settings::default()
            }
        };

        SettingsStore {
            path: path.to_path_buf(),
            settings,
        }
    }

    /// The current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The path the settings are saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the settings out.
    pub fn save(&self) {
        match self.settings.write(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Saved settings."),
            Err(e) => warn!(path = %self.path.display(), err = %e, "Unable to save settings."),
        }
    }

    /// Applies a change to the settings and saves them.
    pub fn update<F>(&mut self, change: F)
    where
        F: FnOnce(&mut Settings),
    {
        change(&mut self.settings);
        self.save();
    }

    pub fn set_soundfont(&mut self, path: &Path) {
        self.update(|settings| {
            settings.soundfont = Some(path.to_path_buf());
            settings.last_sf2_dir = parent_dir(path);
        });
    }

    pub fn set_synth_executable(&mut self, path: &Path) {
        self.update(|settings| {
            settings.fluidsynth = Some(path.to_path_buf());
            settings.last_fs_dir = parent_dir(path);
        });
    }

    /// Remembers the directory of a MIDI file that was picked.
    pub fn remember_midi(&mut self, path: &Path) {
        self.update(|settings| settings.last_midi_dir = parent_dir(path));
    }

    pub fn set_audio_driver(&mut self, driver: &str) {
        self.update(|settings| settings.audio_driver = driver.trim().to_string());
    }

    /// Sets the gain, clamped to the supported range.
    pub fn set_gain(&mut self, gain: f64) {
        self.update(|settings| settings.gain = normalize_gain(gain));
    }

    /// Flips the dark mode flag and returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.update(|settings| settings.dark_mode = !settings.dark_mode);
        self.settings.dark_mode
    }

    /// Forgets all settings.
    pub fn clear(&mut self) {
        self.settings = Settings::default();
        if let Err(e) = fs::write(&self.path, "{}") {
            warn!(path = %self.path.display(), err = %e, "Unable to clear settings.");
        }
    }
}

fn parent_dir(path: &Path) -> Option<PathBuf> {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
