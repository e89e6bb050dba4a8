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
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::config::Settings;

use super::PlayerError;

/// The synthesizer invocation for one playback session:
/// `<executable> -a <driver> -g <gain> -ni <soundfont> <midi>`.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthCommand {
    executable: PathBuf,
    driver: String,
    gain: f64,
    soundfont: PathBuf,
    midi: PathBuf,
}

impl SynthCommand {
    /// Builds the invocation for the given MIDI file. Both the soundfont and the MIDI file must
    /// exist.
    pub fn new(midi: &Path, settings: &Settings) -> Result<SynthCommand, PlayerError> {
        let soundfont = match settings.soundfont.as_ref() {
            Some(soundfont) if soundfont.exists() => soundfont.clone(),
            Some(soundfont) => {
                return Err(PlayerError::Configuration(format!(
                    "soundfont {} does not exist",
                    soundfont.display()
                )))
            }
            None => {
                return Err(PlayerError::Configuration(
                    "no soundfont selected".to_string(),
                ))
            }
        };

        if !midi.exists() {
            return Err(PlayerError::Configuration(format!(
                "MIDI file {} does not exist",
                midi.display()
            )));
        }

        Ok(SynthCommand {
            executable: settings.synth_executable(),
            driver: settings.driver(),
            gain: settings.gain,
            soundfont,
            midi: midi.to_path_buf(),
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn midi(&self) -> &Path {
        &self.midi
    }

    /// The arguments passed to the executable.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-a".into(),
            self.driver.clone().into(),
            "-g".into(),
            format!("{:.2}", self.gain).into(),
            "-ni".into(),
            self.soundfont.clone().into(),
            self.midi.clone().into(),
        ]
    }

    /// Creates the process command. Standard streams are discarded so the synthesizer never
    /// blocks on unread output.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl fmt::Display for SynthCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable.display())?;
        for arg in self.args() {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
