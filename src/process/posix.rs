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
use std::{io, process::Child};

use tracing::debug;

/// Controls processes with POSIX job control signals.
pub struct Signals {}

impl Signals {
    pub fn new() -> Signals {
        Signals {}
    }

    fn signal(child: &Child, signal: libc::c_int) -> Result<(), io::Error> {
        let pid = libc::pid_t::try_from(child.id())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        debug!(pid, signal, "Sending signal.");

        // SAFETY: kill takes no pointers and reports failure through errno.
        if unsafe { libc::kill(pid, signal) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl super::ProcessControl for Signals {
    fn suspend(&self, child: &Child) -> Result<(), io::Error> {
        Signals::signal(child, libc::SIGSTOP)
    }

    fn resume(&self, child: &Child) -> Result<(), io::Error> {
        Signals::signal(child, libc::SIGCONT)
    }

    fn terminate(&self, child: &mut Child) -> Result<(), io::Error> {
        Signals::signal(child, libc::SIGTERM)
    }
}
