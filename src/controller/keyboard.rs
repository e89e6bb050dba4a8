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
use std::{io, thread};

use tokio::sync::mpsc::Sender;
use tracing::{info, span, warn, Level};

use super::Event;

const PAUSE: &str = "pause";
const RESUME: &str = "resume";
const TOGGLE: &str = "toggle";
const STOP: &str = "stop";
const WAIT: &str = "wait";
const INSTRUMENTS: &str = "instruments";
const QUIT: &str = "quit";

/// A controller that controls a player using the keyboard.
#[derive(Default)]
pub struct Driver {}

impl Driver {
    pub fn new() -> Driver {
        Driver {}
    }

    /// Reads a single command. Returns false once the input is closed.
    fn monitor_io<R, W>(
        events_tx: &Sender<Event>,
        mut reader: R,
        mut writer: W,
    ) -> Result<bool, io::Error>
    where
        R: io::BufRead,
        W: io::Write,
    {
        write!(
            writer,
            "Command ({}, {}, {}, {}, {}, {}, {}): ",
            PAUSE, RESUME, TOGGLE, STOP, WAIT, INSTRUMENTS, QUIT,
        )?;
        writer.flush()?;
        let mut input: String = String::default();
        if reader.read_line(&mut input)? == 0 {
            return Ok(false);
        }

        match input.trim().to_lowercase().as_str() {
            PAUSE => events_tx.blocking_send(Event::Pause),
            RESUME => events_tx.blocking_send(Event::Resume),
            TOGGLE => events_tx.blocking_send(Event::Toggle),
            STOP => events_tx.blocking_send(Event::Stop),
            WAIT => events_tx.blocking_send(Event::Wait),
            INSTRUMENTS => events_tx.blocking_send(Event::Instruments),
            QUIT => events_tx.blocking_send(Event::Quit),
            _ => {
                warn!(input = input.trim(), "Unrecognized input");
                Ok(())
            }
        }
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(true)
    }
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> thread::JoinHandle<Result<(), io::Error>> {
        thread::spawn(move || {
            let span = span!(Level::INFO, "keyboard driver");
            let _enter = span.enter();

            info!("Keyboard driver started.");

            while Self::monitor_io(&events_tx, io::stdin().lock(), io::stdout())? {}

            info!("Keyboard input closed.");
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, BufReader, BufWriter};

    use tokio::sync::mpsc;

    use crate::controller::{keyboard::*, Event};

    use super::{Driver, PAUSE};

    fn get_event(event: &str) -> Result<Option<Event>, io::Error> {
        let (sender, mut receiver) = mpsc::channel::<Event>(1);

        let reader_bytes = format!("{}\n", event);
        let reader = BufReader::new(reader_bytes.as_bytes());

        let writer_bytes: Vec<u8> = vec![0; 255];
        let writer = BufWriter::new(writer_bytes);
        assert!(Driver::monitor_io(&sender, reader, writer)?);

        // Force the sender to close.
        drop(sender);
        Ok(receiver.blocking_recv())
    }

    #[test]
    fn test_keyboard_events() -> Result<(), io::Error> {
        assert_eq!(Some(Event::Pause), get_event(PAUSE)?);
        assert_eq!(Some(Event::Resume), get_event(RESUME)?);
        assert_eq!(Some(Event::Toggle), get_event(TOGGLE)?);
        assert_eq!(Some(Event::Stop), get_event(STOP)?);
        assert_eq!(Some(Event::Wait), get_event(WAIT)?);
        assert_eq!(Some(Event::Instruments), get_event(INSTRUMENTS)?);
        assert_eq!(Some(Event::Quit), get_event(QUIT)?);
        assert_eq!(Some(Event::Stop), get_event("  STOP ")?);
        assert_eq!(None, get_event("unrecognized")?);
        Ok(())
    }

    #[test]
    fn test_closed_input() -> Result<(), io::Error> {
        let (sender, _receiver) = mpsc::channel::<Event>(1);
        let mut prompt: Vec<u8> = Vec::new();

        assert!(!Driver::monitor_io(&sender, BufReader::new(&b""[..]), &mut prompt)?);
        assert!(String::from_utf8_lossy(&prompt).starts_with("Command (pause, resume"));
        Ok(())
    }
}
