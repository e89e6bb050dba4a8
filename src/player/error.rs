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
use std::{io, path::PathBuf};

/// Errors surfaced by the player. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The soundfont or MIDI file is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(
        "synthesizer {} not found, add it to PATH or configure its location",
        .0.display()
    )]
    ExecutableNotFound(PathBuf),

    #[error("unable to launch synthesizer: {0}")]
    Launch(#[source] io::Error),

    #[error("unable to pause playback: {0}")]
    Pause(#[source] io::Error),

    #[error("unable to resume playback: {0}")]
    Resume(#[source] io::Error),
}
