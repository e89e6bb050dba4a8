// Copyright (C) 2024 Michael Wilson <mike@mdwn.dev>
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
use std::{env, path::PathBuf};

mod error;
mod settings;

pub use self::error::ConfigError;
pub use self::settings::{
    default_driver, normalize_gain, Settings, SettingsStore, DEFAULT_GAIN, DEFAULT_SYNTH,
    DRIVER_CHOICES, MAX_GAIN, MIN_GAIN,
};

/// The environment variable that overrides the settings file location.
pub const CONFIG_ENV: &str = "SMPLAYER_CONFIG";

/// The settings file name.
pub const CONFIG_NAME: &str = "smplayer.json";

/// Resolves the settings file location.
///
/// Priority:
/// 1. SMPLAYER_CONFIG environment variable
/// 2. Next to the executable
/// 3. The current directory
pub fn settings_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_NAME))
}
