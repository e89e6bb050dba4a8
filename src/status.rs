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
use std::fmt;

use tracing::info;

/// Status changes reported by the player.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// Playback of the given MIDI file started.
    Playing {
        midi: String,
        driver: String,
        gain: f64,
    },
    /// The synthesizer process was suspended.
    Paused,
    /// The synthesizer process was resumed.
    Resumed,
    /// A caller is blocked until the synthesizer exits.
    Waiting,
    /// Playback was stopped explicitly.
    Stopped,
    /// The synthesizer exited on its own.
    Finished,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::Playing { midi, driver, gain } => {
                write!(f, "Playing: {}  | drv={}  gain={:.2}", midi, driver, gain)
            }
            StatusEvent::Paused => write!(f, "Paused"),
            StatusEvent::Resumed => write!(f, "Resumed"),
            StatusEvent::Waiting => write!(f, "Waiting for playback to finish..."),
            StatusEvent::Stopped => write!(f, "Stopped"),
            StatusEvent::Finished => write!(f, "Finished"),
        }
    }
}

/// Receives status changes from the player.
pub trait StatusReporter: Send + Sync {
    fn report(&self, event: StatusEvent);
}

/// Reports status through the log.
#[derive(Default)]
pub struct LogReporter {}

impl LogReporter {
    pub fn new() -> LogReporter {
        LogReporter {}
    }
}

impl StatusReporter for LogReporter {
    fn report(&self, event: StatusEvent) {
        info!(status = %event, "Status changed.");
    }
}
