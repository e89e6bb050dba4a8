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
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{crate_version, Parser, Subcommand};
use smplayer::config::{self, SettingsStore, DRIVER_CHOICES};
use smplayer::controller::{keyboard, Controller};
use smplayer::instruments;
use smplayer::player::Player;
use smplayer::status::LogReporter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A simple MIDI player backed by a soundfont synthesizer."
)]
struct Cli {
    /// The path to the settings file. Defaults to smplayer.json next to the executable.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plays a MIDI file through the synthesizer. Any options given are saved to the settings.
    Play {
        /// The MIDI file to play.
        midi: PathBuf,
        /// The soundfont to play with.
        #[arg(short, long)]
        soundfont: Option<PathBuf>,
        /// The synthesizer executable.
        #[arg(long)]
        synth: Option<PathBuf>,
        /// The synthesizer audio driver.
        #[arg(short, long)]
        driver: Option<String>,
        /// The synthesizer gain, between 0.2 and 1.2.
        #[arg(short, long)]
        gain: Option<f64>,
    },
    /// Lists the instrument on each channel of a MIDI file.
    Instruments {
        /// The MIDI file to scan.
        midi: PathBuf,
    },
    /// Lists the audio drivers that can be passed to the synthesizer.
    Drivers {},
    /// Shows or changes the settings.
    Settings {
        #[clap(subcommand)]
        command: Option<SettingsCommands>,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Prints the current settings.
    Show {},
    /// Sets the soundfont.
    Soundfont { path: PathBuf },
    /// Sets the synthesizer executable.
    Synth { path: PathBuf },
    /// Sets the audio driver.
    Driver { driver: String },
    /// Sets the gain.
    Gain { gain: f64 },
    /// Toggles dark mode.
    DarkMode {},
    /// Resets every setting to its default.
    Clear {},
}

fn show_settings(store: &SettingsStore) -> Result<(), Box<dyn Error>> {
    println!("Settings ({}):", store.path().display());
    println!("{}", serde_json::to_string_pretty(store.settings())?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings_path = cli.config.unwrap_or_else(config::settings_path);
    let mut store = SettingsStore::load(&settings_path);

    match cli.command {
        Commands::Play {
            midi,
            soundfont,
            synth,
            driver,
            gain,
        } => {
            if let Some(soundfont) = soundfont {
                store.set_soundfont(&soundfont);
            }
            if let Some(synth) = synth {
                store.set_synth_executable(&synth);
            }
            if let Some(driver) = driver {
                store.set_audio_driver(&driver);
            }
            if let Some(gain) = gain {
                store.set_gain(gain);
            }

            let player = Arc::new(Player::native(Arc::new(LogReporter::new())));
            let mut controller = Controller::new(player, store);
            controller.play(&midi)?;
            controller.run(Arc::new(keyboard::Driver::new())).await;
        }
        Commands::Instruments { midi } => {
            let instruments = instruments::scan(&midi)?;
            println!("{}", instruments);

            let ranges = instruments::note_ranges(&midi)?;
            if ranges.is_empty() {
                println!("No notes found.");
                return Ok(());
            }

            println!("Note ranges:");
            for (channel, range) in ranges.iter() {
                println!("{:>3}  {}", channel, range);
            }
        }
        Commands::Drivers {} => {
            let configured = store.settings().driver();
            println!("Drivers:");
            for driver in DRIVER_CHOICES {
                let marker = if driver == configured { "*" } else { " " };
                println!("{} {}", marker, driver);
            }
            if !DRIVER_CHOICES.contains(&configured.as_str()) {
                println!("* {} (custom)", configured);
            }
        }
        Commands::Settings { command } => match command.unwrap_or(SettingsCommands::Show {}) {
            SettingsCommands::Show {} => show_settings(&store)?,
            SettingsCommands::Soundfont { path } => {
                store.set_soundfont(&path);
                show_settings(&store)?;
            }
            SettingsCommands::Synth { path } => {
                store.set_synth_executable(&path);
                show_settings(&store)?;
            }
            SettingsCommands::Driver { driver } => {
                store.set_audio_driver(&driver);
                show_settings(&store)?;
            }
            SettingsCommands::Gain { gain } => {
                store.set_gain(gain);
                show_settings(&store)?;
            }
            SettingsCommands::DarkMode {} => {
                let enabled = store.toggle_dark_mode();
                println!("Dark mode {}.", if enabled { "enabled" } else { "disabled" });
            }
            SettingsCommands::Clear {} => {
                store.clear();
                show_settings(&store)?;
            }
        },
    }

    Ok(())
}
