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
use std::{io, path::Path, sync::Arc, thread};

use tokio::{
    sync::mpsc::{self, Sender},
    task::JoinHandle,
};
use tracing::{debug, error, info, span, warn, Instrument, Level, Span};

use crate::{
    config::SettingsStore,
    instruments::{self, Instruments},
    player::{spawn_liveness_poll, Player, PlayerError},
    util::filename_display,
};

pub mod keyboard;

/// Controller events that will trigger behavior in the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Suspends playback. If nothing is playing, does nothing.
    Pause,

    /// Resumes paused playback. If playback isn't paused, does nothing.
    Resume,

    /// Pauses or resumes playback depending on the current state.
    Toggle,

    /// Stops playback. If nothing is playing, does nothing.
    Stop,

    /// Waits for playback to finish on its own.
    Wait,

    /// Prints the instruments of the current MIDI file.
    Instruments,

    /// Stops playback and exits the controller.
    Quit,
}

pub trait Driver: Send + Sync + 'static {
    /// Starts monitoring for events. The monitor runs on its own thread and is abandoned if it
    /// is still running when the controller exits.
    fn monitor_events(&self, events_tx: Sender<Event>) -> thread::JoinHandle<Result<(), io::Error>>;
}

/// Drives a player from user events.
pub struct Controller {
    player: Arc<Player>,
    settings: SettingsStore,
    /// The instruments of the MIDI file being played, if they could be read.
    instruments: Option<Instruments>,
    /// The liveness poll for the current session.
    poll: Option<JoinHandle<()>>,
    span: Span,
}

impl Controller {
    /// Creates a new controller for the given player.
    pub fn new(player: Arc<Player>, settings: SettingsStore) -> Controller {
        Controller {
            player,
            settings,
            instruments: None,
            poll: None,
            span: span!(Level::INFO, "controller"),
        }
    }

    /// Starts playing the given MIDI file. The instruments are scanned right before playback
    /// starts. A file that can't be scanned is still played.
    pub fn play(&mut self, midi: &Path) -> Result<(), PlayerError> {
        let _enter = self.span.enter();

        self.settings.remember_midi(midi);
        self.instruments = match instruments::scan(midi) {
            Ok(instruments) => {
                debug!(midi = filename_display(midi), "Scanned instruments.");
                Some(instruments)
            }
            Err(e) => {
                warn!(
                    midi = filename_display(midi),
                    err = %e,
                    "Unable to scan instruments."
                );
                None
            }
        };

        self.player.start(midi, self.settings.settings())?;

        if let Some(previous) = self.poll.replace(spawn_liveness_poll(self.player.clone())) {
            previous.abort();
        }
        Ok(())
    }

    /// The player being controlled.
    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    /// The settings used for playback.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// The instruments of the current MIDI file.
    pub fn instruments(&self) -> Option<&Instruments> {
        self.instruments.as_ref()
    }

    /// Dispatches events from the driver to the player until the current session ends or the
    /// driver asks to quit.
    pub async fn run(&mut self, driver: Arc<dyn Driver>) {
        let span = self.span.clone();
        self.dispatch(driver).instrument(span).await
    }

    async fn dispatch(&mut self, driver: Arc<dyn Driver>) {
        let mut poll = match self.poll.take() {
            Some(poll) => poll,
            None => {
                info!("Nothing is playing.");
                return;
            }
        };

        let (events_tx, mut events_rx) = mpsc::channel(1);
        let monitor = driver.monitor_events(events_tx);
        let mut driver_open = true;

        info!("Controller started.");

        loop {
            tokio::select! {
                result = &mut poll => {
                    if let Err(e) = result {
                        error!(err = %e, "Error waiting for liveness poll.");
                    }
                    info!("Playback ended.");
                    break;
                }
                event = events_rx.recv(), if driver_open => match event {
                    Some(event) => {
                        info!(event = format!("{:?}", event), "Received event.");
                        if self.handle(event) {
                            poll.abort();
                            break;
                        }
                    }
                    None => {
                        debug!("Event driver closed, waiting for playback to end.");
                        driver_open = false;
                    }
                },
            }
        }

        info!("Controller closing.");
        if monitor.is_finished() {
            match monitor.join() {
                Ok(Err(e)) => error!(err = %e, "Event driver failed."),
                Err(_) => error!("Event driver panicked."),
                Ok(Ok(())) => {}
            }
        }
    }

    /// Applies an event to the player. Returns true if the controller should exit.
    fn handle(&self, event: Event) -> bool {
        let result = match event {
            Event::Pause => self.player.pause(),
            Event::Resume => self.player.resume(),
            Event::Toggle => self.player.toggle_pause(),
            Event::Stop => {
                self.player.stop();
                Ok(())
            }
            Event::Wait => {
                let player = self.player.clone();
                tokio::spawn(async move {
                    if let Err(e) = player.wait_until_finished_async().await {
                        error!(err = %e, "Error waiting for playback to finish.");
                    }
                });
                Ok(())
            }
            Event::Instruments => {
                match self.instruments.as_ref() {
                    Some(instruments) => println!("{}", instruments),
                    None => println!("No instruments available."),
                }
                Ok(())
            }
            Event::Quit => {
                self.player.stop();
                return true;
            }
        };

        if let Err(e) = result {
            error!("Error talking to player: {}", e);
        }
        false
    }
}
