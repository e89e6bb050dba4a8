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
    fmt, io,
    path::Path,
    process::Child,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, span, warn, Level, Span};

use crate::{
    config::Settings,
    process::{self, ProcessControl},
    status::{StatusEvent, StatusReporter},
    util::filename_display,
};

mod command;
mod error;

pub use command::SynthCommand;
pub use error::PlayerError;

/// How often the liveness poll checks whether the synthesizer has exited.
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

/// How often blocking waits check on the synthesizer.
const WAIT_TICK: Duration = Duration::from_millis(50);

/// The lifecycle state of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// A running synthesizer process. Only exists while playing or paused.
struct Session {
    /// Identifies the session so waiters can tell when it has been replaced.
    id: u64,
    child: Child,
    paused: bool,
    command: SynthCommand,
}

impl Session {
    fn state(&self) -> PlaybackState {
        if self.paused {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        }
    }

    /// Returns true if the process has exited. A process whose status can't be determined is
    /// treated as exited.
    fn has_exited(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => false,
            Ok(Some(status)) => {
                info!(
                    pid = self.child.id(),
                    status = %status,
                    "Synthesizer exited."
                );
                true
            }
            Err(e) => {
                warn!(
                    pid = self.child.id(),
                    err = %e,
                    "Unable to check synthesizer status, releasing it."
                );
                true
            }
        }
    }
}

/// Plays MIDI files through an external synthesizer process.
///
/// The player owns at most one synthesizer process at a time. All transitions happen under a
/// single lock, so the player may be shared between an event loop, a liveness poll and a thread
/// blocked in `wait_until_finished`.
pub struct Player {
    /// Suspends, resumes and terminates the synthesizer.
    control: Arc<dyn ProcessControl>,
    /// Receives status changes.
    status: Arc<dyn StatusReporter>,
    /// The active session, if any.
    session: Mutex<Option<Session>>,
    next_id: AtomicU64,
    /// The logging span.
    span: Span,
}

impl Player {
    /// Creates a new player.
    pub fn new(control: Arc<dyn ProcessControl>, status: Arc<dyn StatusReporter>) -> Player {
        Player {
            control,
            status,
            session: Mutex::new(None),
            next_id: AtomicU64::new(0),
            span: span!(Level::INFO, "player"),
        }
    }

    /// Creates a new player using the process control for the current platform.
    pub fn native(status: Arc<dyn StatusReporter>) -> Player {
        Player::new(process::native(), status)
    }

    /// Starts playing the given MIDI file. Any active session is stopped first.
    pub fn start(&self, midi: &Path, settings: &Settings) -> Result<(), PlayerError> {
        let _enter = self.span.enter();

        let mut session = self.session.lock();
        if let Some(previous) = session.take() {
            info!(
                midi = filename_display(previous.command.midi()),
                "Stopping previous session."
            );
            self.shutdown(previous);
            self.status.report(StatusEvent::Stopped);
        }

        let command = SynthCommand::new(midi, settings)?;
        let mut process = command.command();
        self.control.configure(&mut process);

        let child = process.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                PlayerError::ExecutableNotFound(command.executable().to_path_buf())
            }
            _ => PlayerError::Launch(e),
        })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            session = id,
            pid = child.id(),
            command = %command,
            "Started synthesizer."
        );
        self.status.report(StatusEvent::Playing {
            midi: filename_display(midi).to_string(),
            driver: command.driver().to_string(),
            gain: command.gain(),
        });

        *session = Some(Session {
            id,
            child,
            paused: false,
            command,
        });
        Ok(())
    }

    /// Suspends the synthesizer. Does nothing unless playing.
    pub fn pause(&self) -> Result<(), PlayerError> {
        let _enter = self.span.enter();

        let mut session = self.session.lock();
        match session.as_mut() {
            Some(current) if !current.paused => {
                self.control
                    .suspend(&current.child)
                    .map_err(PlayerError::Pause)?;
                current.paused = true;
                info!(pid = current.child.id(), "Paused playback.");
                self.status.report(StatusEvent::Paused);
            }
            _ => debug!("Player is not playing, nothing to pause."),
        }
        Ok(())
    }

    /// Resumes a suspended synthesizer. Does nothing unless paused.
    pub fn resume(&self) -> Result<(), PlayerError> {
        let _enter = self.span.enter();

        let mut session = self.session.lock();
        match session.as_mut() {
            Some(current) if current.paused => {
                self.control
                    .resume(&current.child)
                    .map_err(PlayerError::Resume)?;
                current.paused = false;
                info!(pid = current.child.id(), "Resumed playback.");
                self.status.report(StatusEvent::Resumed);
            }
            _ => debug!("Player is not paused, nothing to resume."),
        }
        Ok(())
    }

    /// Pauses if playing, resumes if paused.
    pub fn toggle_pause(&self) -> Result<(), PlayerError> {
        match self.state() {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Stopped => Ok(()),
        }
    }

    /// Stops the synthesizer. Always succeeds: termination errors are logged and the session is
    /// released regardless.
    pub fn stop(&self) {
        let _enter = self.span.enter();

        let mut session = self.session.lock();
        let current = match session.take() {
            Some(current) => current,
            None => {
                debug!("Player is not active, nothing to stop.");
                return;
            }
        };

        info!(
            midi = filename_display(current.command.midi()),
            "Stopping playback."
        );
        self.shutdown(current);
        self.status.report(StatusEvent::Stopped);
    }

    /// Blocks until the synthesizer exits on its own, then releases it. Returns early if the
    /// session is stopped or replaced from another thread. Must not be called from the thread
    /// driving the liveness poll.
    pub fn wait_until_finished(&self) {
        let _enter = self.span.enter();

        let id = match self.session.lock().as_ref() {
            Some(current) => current.id,
            None => {
                debug!("Player is not active, nothing to wait for.");
                return;
            }
        };

        info!(session = id, "Waiting for playback to finish.");
        self.status.report(StatusEvent::Waiting);

        loop {
            {
                let mut session = self.session.lock();
                let exited = match session.as_mut() {
                    Some(current) if current.id == id => current.has_exited(),
                    _ => {
                        debug!(session = id, "Session ended elsewhere, done waiting.");
                        return;
                    }
                };

                if exited {
                    self.release(&mut session);
                    return;
                }
            }
            thread::sleep(WAIT_TICK);
        }
    }

    /// Waits for the synthesizer to exit without blocking the async runtime.
    pub async fn wait_until_finished_async(self: &Arc<Self>) -> Result<(), JoinError> {
        let player = Arc::clone(self);
        tokio::task::spawn_blocking(move || player.wait_until_finished()).await
    }

    /// Checks whether the synthesizer has exited without blocking and returns the resulting
    /// state. Hosts call this periodically to notice the end of playback.
    pub fn poll_status(&self) -> PlaybackState {
        let mut session = self.session.lock();
        let exited = match session.as_mut() {
            Some(current) => current.has_exited(),
            None => return PlaybackState::Stopped,
        };

        if exited {
            let _enter = self.span.enter();
            self.release(&mut session);
        }
        session.as_ref().map_or(PlaybackState::Stopped, Session::state)
    }

    /// The current state.
    pub fn state(&self) -> PlaybackState {
        self.session
            .lock()
            .as_ref()
            .map_or(PlaybackState::Stopped, Session::state)
    }

    /// The id of the active session.
    pub fn session_id(&self) -> Option<u64> {
        self.session.lock().as_ref().map(|current| current.id)
    }

    /// The process id of the synthesizer.
    pub fn pid(&self) -> Option<u32> {
        self.session.lock().as_ref().map(|current| current.child.id())
    }

    /// The invocation of the active session.
    pub fn command(&self) -> Option<SynthCommand> {
        self.session
            .lock()
            .as_ref()
            .map(|current| current.command.clone())
    }

    /// Releases a session whose process has exited.
    fn release(&self, session: &mut Option<Session>) {
        if let Some(finished) = session.take() {
            info!(
                session = finished.id,
                midi = filename_display(finished.command.midi()),
                "Playback finished."
            );
            reap(finished.child);
            self.status.report(StatusEvent::Finished);
        }
    }

    /// Terminates the session's process.
    fn shutdown(&self, mut session: Session) {
        // A suspended process won't act on termination until it is resumed.
        if session.paused {
            if let Err(e) = self.control.resume(&session.child) {
                debug!(err = %e, "Unable to resume synthesizer before stopping.");
            }
        }

        if let Err(e) = self.control.terminate(&mut session.child) {
            debug!(err = %e, "Unable to terminate synthesizer.");
        }

        if let Some(grace_period) = self.control.grace_period() {
            let start = Instant::now();
            let mut exited = false;
            while start.elapsed() < grace_period {
                match session.child.try_wait() {
                    Ok(Some(_)) => {
                        exited = true;
                        break;
                    }
                    Ok(None) => thread::sleep(WAIT_TICK),
                    Err(_) => break,
                }
            }

            if !exited {
                warn!(
                    pid = session.child.id(),
                    "Synthesizer did not exit in time, killing it."
                );
                if let Err(e) = self.control.kill(&mut session.child) {
                    debug!(err = %e, "Unable to kill synthesizer.");
                }
            }
        }

        reap(session.child);
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Collects the exit status of a process so that it doesn't linger as a zombie. Processes that
/// haven't exited yet are waited on from a detached thread.
fn reap(mut child: Child) {
    if let Ok(Some(_)) = child.try_wait() {
        return;
    }

    let pid = child.id();
    thread::spawn(move || match child.wait() {
        Ok(status) => debug!(pid, status = %status, "Reaped synthesizer."),
        Err(e) => error!(pid, err = %e, "Error waiting for synthesizer to exit."),
    });
}

/// Periodically polls the player until the current session ends. This is how the end of
/// playback is noticed without anyone blocking on the process.
pub fn spawn_liveness_poll(player: Arc<Player>) -> JoinHandle<()> {
    spawn_liveness_poll_every(player, POLL_INTERVAL)
}

/// Periodically polls the player at the given interval until the current session ends.
pub fn spawn_liveness_poll_every(player: Arc<Player>, interval: Duration) -> JoinHandle<()> {
    let armed_for = player.session_id();
    tokio::spawn(async move {
        let id = match armed_for {
            Some(id) => id,
            None => return,
        };

        loop {
            tokio::time::sleep(interval).await;
            player.poll_status();
            if player.session_id() != Some(id) {
                debug!(session = id, "Liveness poll finished.");
                return;
            }
        }
    })
}

#[cfg(all(test, unix))]
mod test {
    use std::{
        error::Error,
        fs, io,
        process::Child,
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        thread,
        time::Duration,
    };

    use serial_test::serial;

    use crate::{
        process::{self, ProcessControl},
        status::{test::Recorder, StatusEvent},
        testutil::{eventually, write_script, Fixture},
    };

    use super::{spawn_liveness_poll_every, PlaybackState, Player, PlayerError};

    const LONG: &str = "exec sleep 30";
    const SHORT: &str = "exit 0";

    fn player() -> (Arc<Player>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::new());
        (
            Arc::new(Player::new(process::native(), recorder.clone())),
            recorder,
        )
    }

    fn alive(pid: u32) -> bool {
        // SAFETY: signal 0 only checks for the existence of the process.
        unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
    }

    /// Delegates to the native control, failing on demand.
    struct FlakyControl {
        fail_suspend: AtomicBool,
        fail_resume: AtomicBool,
    }

    impl FlakyControl {
        fn new() -> FlakyControl {
            FlakyControl {
                fail_suspend: AtomicBool::new(false),
                fail_resume: AtomicBool::new(false),
            }
        }
    }

    impl ProcessControl for FlakyControl {
        fn suspend(&self, child: &Child) -> Result<(), io::Error> {
            if self.fail_suspend.load(Ordering::Relaxed) {
                return Err(io::Error::new(io::ErrorKind::Other, "suspend failed"));
            }
            process::native().suspend(child)
        }

        fn resume(&self, child: &Child) -> Result<(), io::Error> {
            if self.fail_resume.load(Ordering::Relaxed) {
                return Err(io::Error::new(io::ErrorKind::Other, "resume failed"));
            }
            process::native().resume(child)
        }

        fn terminate(&self, child: &mut Child) -> Result<(), io::Error> {
            process::native().terminate(child)
        }
    }

    #[test]
    #[serial]
    fn test_start_stop() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", LONG)?;
        let (player, recorder) = player();

        assert_eq!(PlaybackState::Stopped, player.state());
        player.start(&fixture.midi, &fixture.settings(&synth))?;
        assert_eq!(PlaybackState::Playing, player.state());
        let pid = player.pid().expect("expected a process");
        assert!(player.command().is_some());

        player.stop();
        assert_eq!(PlaybackState::Stopped, player.state());
        assert!(player.pid().is_none());
        assert!(player.session_id().is_none());
        eventually(|| !alive(pid), "Synthesizer never exited");

        let events = recorder.events();
        assert!(matches!(events[0], StatusEvent::Playing { .. }));
        assert_eq!(StatusEvent::Stopped, events[1]);

        // Stopping again does nothing.
        player.stop();
        assert_eq!(2, recorder.events().len());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_pause_resume() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", LONG)?;
        let (player, recorder) = player();

        // Nothing to resume or pause yet.
        player.resume()?;
        player.pause()?;
        assert_eq!(PlaybackState::Stopped, player.state());

        player.start(&fixture.midi, &fixture.settings(&synth))?;
        player.pause()?;
        player.pause()?;
        assert_eq!(PlaybackState::Paused, player.state());

        player.resume()?;
        player.resume()?;
        assert_eq!(PlaybackState::Playing, player.state());

        player.toggle_pause()?;
        assert_eq!(PlaybackState::Paused, player.state());
        player.toggle_pause()?;
        assert_eq!(PlaybackState::Playing, player.state());

        let pauses = recorder
            .events()
            .into_iter()
            .filter(|e| *e == StatusEvent::Paused)
            .count();
        assert_eq!(2, pauses);

        player.stop();
        Ok(())
    }

    #[test]
    #[serial]
    fn test_stop_while_paused() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", LONG)?;
        let (player, _) = player();

        player.start(&fixture.midi, &fixture.settings(&synth))?;
        let pid = player.pid().expect("expected a process");
        player.pause()?;
        player.stop();

        assert_eq!(PlaybackState::Stopped, player.state());
        eventually(|| !alive(pid), "Paused synthesizer never exited");
        Ok(())
    }

    #[test]
    #[serial]
    fn test_start_replaces_active_session() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", LONG)?;
        let (player, recorder) = player();
        let settings = fixture.settings(&synth);

        player.start(&fixture.midi, &settings)?;
        let first_pid = player.pid().expect("expected a process");
        let first_id = player.session_id();
        player.pause()?;

        player.start(&fixture.midi, &settings)?;
        assert_eq!(PlaybackState::Playing, player.state());
        assert_ne!(first_id, player.session_id());
        assert_ne!(Some(first_pid), player.pid());
        eventually(|| !alive(first_pid), "First synthesizer never exited");

        assert!(recorder.saw(&StatusEvent::Stopped));
        player.stop();
        Ok(())
    }

    #[test]
    #[serial]
    fn test_missing_soundfont() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", LONG)?;
        let (player, recorder) = player();

        let mut settings = fixture.settings(&synth);
        settings.soundfont = Some(fixture.dir.path().join("missing.sf2"));

        assert!(matches!(
            player.start(&fixture.midi, &settings),
            Err(PlayerError::Configuration(_))
        ));
        assert_eq!(PlaybackState::Stopped, player.state());
        assert!(recorder.events().is_empty());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_missing_executable() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = fixture.dir.path().join("no-such-synth");
        let (player, recorder) = player();

        match player.start(&fixture.midi, &fixture.settings(&synth)) {
            Err(PlayerError::ExecutableNotFound(path)) => assert_eq!(synth, path),
            other => panic!("expected ExecutableNotFound, got {:?}", other),
        }
        assert_eq!(PlaybackState::Stopped, player.state());
        assert!(player.pid().is_none());
        assert!(recorder.events().is_empty());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_launch_error() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        // Not executable.
        let synth = fixture.dir.path().join("synth");
        fs::write(&synth, "#!/bin/sh\nexit 0\n")?;
        let (player, _) = player();

        assert!(matches!(
            player.start(&fixture.midi, &fixture.settings(&synth)),
            Err(PlayerError::Launch(_))
        ));
        assert_eq!(PlaybackState::Stopped, player.state());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_pause_and_resume_failures() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", LONG)?;
        let control = Arc::new(FlakyControl::new());
        let recorder = Arc::new(Recorder::new());
        let player = Player::new(control.clone(), recorder.clone());

        player.start(&fixture.midi, &fixture.settings(&synth))?;

        control.fail_suspend.store(true, Ordering::Relaxed);
        assert!(matches!(player.pause(), Err(PlayerError::Pause(_))));
        assert_eq!(PlaybackState::Playing, player.state());

        control.fail_suspend.store(false, Ordering::Relaxed);
        player.pause()?;

        control.fail_resume.store(true, Ordering::Relaxed);
        assert!(matches!(player.resume(), Err(PlayerError::Resume(_))));
        assert_eq!(PlaybackState::Paused, player.state());

        // Stop still succeeds when the process can't be resumed first.
        let pid = player.pid().expect("expected a process");
        control.fail_resume.store(false, Ordering::Relaxed);
        player.resume()?;
        control.fail_resume.store(true, Ordering::Relaxed);
        player.pause()?;
        player.stop();
        assert_eq!(PlaybackState::Stopped, player.state());

        // The process was stopped and never continued, so clean it up here.
        // SAFETY: plain signal delivery.
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGCONT);
        }
        eventually(|| !alive(pid), "Synthesizer never exited");
        Ok(())
    }

    #[test]
    #[serial]
    fn test_poll_detects_natural_exit() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", SHORT)?;
        let (player, recorder) = player();

        player.start(&fixture.midi, &fixture.settings(&synth))?;
        eventually(
            || player.poll_status() == PlaybackState::Stopped,
            "Natural exit never detected",
        );
        assert!(player.pid().is_none());
        assert!(recorder.saw(&StatusEvent::Finished));
        assert!(!recorder.saw(&StatusEvent::Stopped));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_wait_until_finished() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", "sleep 1")?;
        let (player, recorder) = player();

        // Nothing to wait for.
        player.wait_until_finished();
        assert!(recorder.events().is_empty());

        player.start(&fixture.midi, &fixture.settings(&synth))?;
        player.wait_until_finished();

        assert_eq!(PlaybackState::Stopped, player.state());
        assert!(recorder.saw(&StatusEvent::Waiting));
        assert!(recorder.saw(&StatusEvent::Finished));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_stop_unblocks_wait() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", LONG)?;
        let (player, recorder) = player();

        player.start(&fixture.midi, &fixture.settings(&synth))?;
        let waiter = {
            let player = player.clone();
            thread::spawn(move || player.wait_until_finished())
        };

        eventually(
            || recorder.saw(&StatusEvent::Waiting),
            "Waiter never started",
        );
        thread::sleep(Duration::from_millis(100));
        player.stop();

        assert!(waiter.join().is_ok());
        assert_eq!(PlaybackState::Stopped, player.state());
        assert!(!recorder.saw(&StatusEvent::Finished));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_liveness_poll() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", SHORT)?;
        let (player, recorder) = player();

        player.start(&fixture.midi, &fixture.settings(&synth))?;
        let poll = spawn_liveness_poll_every(player.clone(), Duration::from_millis(20));

        tokio::time::timeout(Duration::from_secs(3), poll).await??;
        assert_eq!(PlaybackState::Stopped, player.state());
        assert!(recorder.saw(&StatusEvent::Finished));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_liveness_poll_ends_on_stop() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", LONG)?;
        let (player, _) = player();

        // Nothing to poll for.
        let idle = spawn_liveness_poll_every(player.clone(), Duration::from_millis(20));
        tokio::time::timeout(Duration::from_secs(1), idle).await??;

        player.start(&fixture.midi, &fixture.settings(&synth))?;
        let poll = spawn_liveness_poll_every(player.clone(), Duration::from_millis(20));
        player.stop();

        tokio::time::timeout(Duration::from_secs(3), poll).await??;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_wait_until_finished_async() -> Result<(), Box<dyn Error>> {
        let fixture = Fixture::new()?;
        let synth = write_script(fixture.dir.path(), "synth", SHORT)?;
        let (player, _) = player();

        player.start(&fixture.midi, &fixture.settings(&synth))?;
        tokio::time::timeout(Duration::from_secs(3), player.wait_until_finished_async())
            .await??;
        assert_eq!(PlaybackState::Stopped, player.state());
        Ok(())
    }
}
