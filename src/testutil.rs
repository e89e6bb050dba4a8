// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
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
    error::Error,
    fs,
    path::{Path, PathBuf},
    thread,
    time::{Duration, SystemTime},
};

use midly::{
    num::{u15, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

/// Wait for the given predicate to return true or fail.
#[inline]
pub fn eventually<F>(predicate: F, error_msg: &str)
where
    F: Fn() -> bool,
{
    let start = SystemTime::now();
    let tick = Duration::from_millis(10);
    let timeout = Duration::from_secs(3);

    loop {
        let elapsed = start.elapsed();
        if elapsed.is_err() {
            panic!("System time error");
        }
        let elapsed = elapsed.unwrap();

        if elapsed > timeout {
            panic!("{}", error_msg);
        }
        if predicate() {
            return;
        }
        thread::sleep(tick);
    }
}

/// Builds a parallel MIDI file where each track is a list of (channel, message) pairs.
pub fn midi_bytes(tracks: Vec<Vec<(u8, MidiMessage)>>) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut smf = Smf::new(Header::new(Format::Parallel, Timing::Metrical(u15::from(480u16))));

    for track in tracks {
        let mut events: Vec<TrackEvent<'static>> = track
            .into_iter()
            .map(|(channel, message)| TrackEvent {
                delta: u28::from(10u32),
                kind: TrackEventKind::Midi {
                    channel: u4::from(channel),
                    message,
                },
            })
            .collect();
        events.push(TrackEvent {
            delta: u28::from(0u32),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(events);
    }

    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Writes a parallel MIDI file to the given path.
pub fn write_midi(path: &Path, tracks: Vec<Vec<(u8, MidiMessage)>>) -> Result<(), Box<dyn Error>> {
    fs::write(path, midi_bytes(tracks)?)?;
    Ok(())
}

/// Writes an executable shell script standing in for the synthesizer. The script ignores its
/// arguments.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf, Box<dyn Error>> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// A synthesizer stand-in along with the files it plays.
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub soundfont: PathBuf,
    pub midi: PathBuf,
}

impl Fixture {
    /// Creates a temporary directory with a soundfont and a MIDI file.
    pub fn new() -> Result<Fixture, Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let soundfont = dir.path().join("test.sf2");
        fs::write(&soundfont, b"sfbk")?;
        let midi = dir.path().join("test.mid");
        write_midi(
            &midi,
            vec![vec![(
                0,
                MidiMessage::ProgramChange {
                    program: u7::from(40u8),
                },
            )]],
        )?;

        Ok(Fixture {
            dir,
            soundfont,
            midi,
        })
    }

    /// Settings pointing at the fixture's soundfont and the given synthesizer.
    pub fn settings(&self, synth: &Path) -> crate::config::Settings {
        let mut settings = crate::config::Settings::default();
        settings.soundfont = Some(self.soundfont.clone());
        settings.fluidsynth = Some(synth.to_path_buf());
        settings
    }
}
