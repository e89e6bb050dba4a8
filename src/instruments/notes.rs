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

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Returns the scientific pitch name of a MIDI key, where key 60 is C4.
pub fn note_name(key: u8) -> String {
    let octave = i16::from(key / 12) - 1;
    format!("{}{}", PITCH_CLASSES[usize::from(key % 12)], octave)
}

/// The notes played on a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRange {
    /// The lowest key played.
    pub lowest: u8,
    /// The highest key played.
    pub highest: u8,
    /// The number of note-on events.
    pub count: usize,
}

impl NoteRange {
    pub(super) fn new(key: u8) -> NoteRange {
        NoteRange {
            lowest: key,
            highest: key,
            count: 1,
        }
    }

    pub(super) fn add(&mut self, key: u8) {
        self.lowest = self.lowest.min(key);
        self.highest = self.highest.max(key);
        self.count += 1;
    }
}

impl fmt::Display for NoteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} ({} notes)",
            note_name(self.lowest),
            note_name(self.highest),
            self.count
        )
    }
}
