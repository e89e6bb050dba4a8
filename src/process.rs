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
    io,
    process::{Child, Command},
    sync::Arc,
    time::Duration,
};

use tracing::debug;

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

/// Operating system control over a spawned synthesizer process.
pub trait ProcessControl: Send + Sync {
    /// Adjusts the command before it is spawned.
    fn configure(&self, _command: &mut Command) {}

    /// Suspends the process. The process must not make progress until resumed.
    fn suspend(&self, child: &Child) -> Result<(), io::Error>;

    /// Resumes a suspended process.
    fn resume(&self, child: &Child) -> Result<(), io::Error>;

    /// Requests termination of the process.
    fn terminate(&self, child: &mut Child) -> Result<(), io::Error>;

    /// Forcefully kills the process.
    fn kill(&self, child: &mut Child) -> Result<(), io::Error> {
        child.kill()
    }

    /// How long to wait after `terminate` before falling back to `kill`. None means
    /// a single terminate request is issued.
    fn grace_period(&self) -> Option<Duration> {
        None
    }
}

/// Returns the process control for the current platform.
#[cfg(unix)]
pub fn native() -> Arc<dyn ProcessControl> {
    Arc::new(posix::Signals::new())
}

/// Returns the process control for the current platform.
#[cfg(windows)]
pub fn native() -> Arc<dyn ProcessControl> {
    Arc::new(windows::Threads::new())
}

/// Applies an operation to each listed thread of a process. Threads that can't be updated,
/// usually because they exited after being listed, are skipped. Fails only if no thread was
/// updated, in which case the process is left unchanged.
#[cfg_attr(not(windows), allow(dead_code))]
fn update_threads<I, F>(pid: u32, threads: I, mut op: F) -> Result<usize, io::Error>
where
    I: IntoIterator<Item = u32>,
    F: FnMut(u32) -> Result<(), io::Error>,
{
    let mut updated = 0;
    let mut last_error = None;
    for thread in threads {
        match op(thread) {
            Ok(()) => updated += 1,
            Err(e) => {
                debug!(pid, thread, err = %e, "Skipping thread.");
                last_error = Some(e);
            }
        }
    }

    if updated == 0 {
        return Err(last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("process {} not found", pid))
        }));
    }
    Ok(updated)
}
