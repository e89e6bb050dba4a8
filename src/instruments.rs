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
use std::{collections::BTreeMap, fmt, fs, path::Path};

use midly::{MidiMessage, Smf, TrackEventKind};
use tracing::debug;

mod error;
mod gm;
mod notes;

pub use error::ScanError;
pub use gm::{program_name, PROGRAM_NAMES};
pub use notes::{note_name, NoteRange};

/// The number of MIDI channels.
const CHANNELS: usize = 16;

/// Controller numbers for bank select.
const BANK_SELECT_MSB: u8 = 0;
const BANK_SELECT_LSB: u8 = 32;

/// The display channel reserved for percussion by General MIDI.
pub const PERCUSSION_CHANNEL: u8 = 10;

/// The instrument assigned to a channel when playback starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentBinding {
    /// The bank, computed as MSB * 128 + LSB.
    pub bank: u16,
    /// The program number.
    pub program: u8,
    /// The display name of the program.
    pub name: String,
}

impl InstrumentBinding {
    /// The standard drum kit forced onto the percussion channel.
    pub fn percussion() -> InstrumentBinding {
        InstrumentBinding {
            bank: 128,
            program: 0,
            name: "Drums (Standard Kit)".to_string(),
        }
    }
}

/// Instrument bindings for all 16 channels, keyed by display channel (1-16).
///
/// Channels that never receive a program change report Acoustic Grand Piano, so a binding
/// does not imply that the channel is actually used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruments {
    bindings: BTreeMap<u8, InstrumentBinding>,
}

impl Instruments {
    /// Gets the binding for a display channel.
    pub fn get(&self, channel: u8) -> Option<&InstrumentBinding> {
        self.bindings.get(&channel)
    }

    /// Iterates over the bindings in channel order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &InstrumentBinding)> {
        self.bindings.iter().map(|(channel, binding)| (*channel, binding))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Instruments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>3}  {:>5}  {:>4}  Name", "Ch", "Bank", "Prog")?;
        for (channel, binding) in self.iter() {
            writeln!(
                f,
                "{:>3}  {:>5}  {:>4}  {}",
                channel, binding.bank, binding.program, binding.name
            )?;
        }
        Ok(())
    }
}

/// Bank select and program state gathered for one channel.
#[derive(Default, Clone, Copy)]
struct ChannelState {
    bank_msb: u8,
    bank_lsb: u8,
    program: Option<u8>,
}

impl ChannelState {
    fn binding(&self) -> InstrumentBinding {
        let program = self.program.unwrap_or(0);
        InstrumentBinding {
            bank: u16::from(self.bank_msb) * 128 + u16::from(self.bank_lsb),
            program,
            name: program_name(program),
        }
    }
}

/// Scans the MIDI file at the given path for the instruments bound to each channel.
pub fn scan(path: &Path) -> Result<Instruments, ScanError> {
    scan_bytes(&read(path)?)
}

/// Scans raw MIDI file data for the instruments bound to each channel.
///
/// Tracks are read in file order and bank select state is shared by all tracks. Only the first
/// program change on a channel counts.
pub fn scan_bytes(data: &[u8]) -> Result<Instruments, ScanError> {
    let smf = Smf::parse(data)?;
    let mut channels = [ChannelState::default(); CHANNELS];

    for track in smf.tracks.iter() {
        for event in track.iter() {
            let (channel, message) = match event.kind {
                TrackEventKind::Midi { channel, message } => (channel, message),
                _ => continue,
            };
            let state = &mut channels[usize::from(channel.as_int())];

            match message {
                MidiMessage::Controller { controller, value } => match controller.as_int() {
                    BANK_SELECT_MSB => state.bank_msb = value.as_int(),
                    BANK_SELECT_LSB => state.bank_lsb = value.as_int(),
                    _ => {}
                },
                MidiMessage::ProgramChange { program } => {
                    if state.program.is_none() {
                        state.program = Some(program.as_int());
                    }
                }
                _ => {}
            }
        }
    }

    let bindings = channels
        .iter()
        .zip(1u8..)
        .map(|(state, channel)| {
            if channel == PERCUSSION_CHANNEL {
                (channel, InstrumentBinding::percussion())
            } else {
                (channel, state.binding())
            }
        })
        .collect::<BTreeMap<u8, InstrumentBinding>>();

    debug!(tracks = smf.tracks.len(), "Scanned instruments.");

    Ok(Instruments { bindings })
}

/// Returns the range of notes played on each channel of the MIDI file at the given path,
/// keyed by display channel. Channels without notes are omitted.
pub fn note_ranges(path: &Path) -> Result<BTreeMap<u8, NoteRange>, ScanError> {
    note_ranges_bytes(&read(path)?)
}

/// Returns the range of notes played on each channel of the raw MIDI file data.
pub fn note_ranges_bytes(data: &[u8]) -> Result<BTreeMap<u8, NoteRange>, ScanError> {
    let smf = Smf::parse(data)?;
    let mut ranges: BTreeMap<u8, NoteRange> = BTreeMap::new();

    for track in smf.tracks.iter() {
        for event in track.iter() {
            if let TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn { key, vel },
            } = event.kind
            {
                // A note on with zero velocity is a note off.
                if vel.as_int() == 0 {
                    continue;
                }
                let key = key.as_int();
                ranges
                    .entry(channel.as_int() + 1)
                    .and_modify(|range| range.add(key))
                    .or_insert_with(|| NoteRange::new(key));
            }
        }
    }

    Ok(ranges)
}

fn read(path: &Path) -> Result<Vec<u8>, ScanError> {
    fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })
}
