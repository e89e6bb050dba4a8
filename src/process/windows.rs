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
    io, mem,
    os::windows::process::CommandExt,
    process::{Child, Command},
    time::Duration,
};

use tracing::debug;
use windows_sys::Win32::{
    Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE},
    System::{
        Diagnostics::ToolHelp::{
            CreateToolhelp32Snapshot, Thread32First, Thread32Next, TH32CS_SNAPTHREAD,
            THREADENTRY32,
        },
        Threading::{
            OpenThread, ResumeThread, SuspendThread, CREATE_NEW_PROCESS_GROUP,
            THREAD_SUSPEND_RESUME,
        },
    },
};

/// How long a terminated process gets to exit before it is killed.
const GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Controls processes by suspending and resuming each of their threads.
pub struct Threads {}

impl Threads {
    pub fn new() -> Threads {
        Threads {}
    }

    /// Applies the given thread operation to every thread owned by the process.
    fn for_each_thread<F>(pid: u32, op: F) -> Result<(), io::Error>
    where
        F: Fn(HANDLE) -> u32,
    {
        let threads = Threads::list_threads(pid)?;
        let updated = super::update_threads(pid, threads, |thread_id| {
            // SAFETY: the thread handle is checked and closed below.
            let thread = unsafe { OpenThread(THREAD_SUSPEND_RESUME, 0, thread_id) };
            if thread.is_null() {
                return Err(io::Error::last_os_error());
            }
            let previous = op(thread);
            let result = if previous == u32::MAX {
                Err(io::Error::last_os_error())
            } else {
                Ok(())
            };
            // SAFETY: thread is a valid handle opened above.
            unsafe { CloseHandle(thread) };
            result
        })?;

        debug!(pid, threads = updated, "Updated process threads.");
        Ok(())
    }

    /// Lists the ids of the threads owned by the process.
    fn list_threads(pid: u32) -> Result<Vec<u32>, io::Error> {
        // SAFETY: the snapshot handle is checked and closed before returning.
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPTHREAD, 0) };
        if snapshot == INVALID_HANDLE_VALUE {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: THREADENTRY32 is plain data and valid when zeroed.
        let mut entry: THREADENTRY32 = unsafe { mem::zeroed() };
        entry.dwSize = mem::size_of::<THREADENTRY32>() as u32;

        let mut threads = Vec::new();
        // SAFETY: entry is a properly sized THREADENTRY32.
        let mut more = unsafe { Thread32First(snapshot, &mut entry) } != 0;
        while more {
            if entry.th32OwnerProcessID == pid {
                threads.push(entry.th32ThreadID);
            }
            // SAFETY: entry is a properly sized THREADENTRY32.
            more = unsafe { Thread32Next(snapshot, &mut entry) } != 0;
        }

        // SAFETY: snapshot is a valid handle owned by this function.
        unsafe { CloseHandle(snapshot) };
        Ok(threads)
    }
}

impl super::ProcessControl for Threads {
    fn configure(&self, command: &mut Command) {
        command.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }

    fn suspend(&self, child: &Child) -> Result<(), io::Error> {
        // SAFETY: SuspendThread is called with a handle opened with THREAD_SUSPEND_RESUME.
        Threads::for_each_thread(child.id(), |thread| unsafe { SuspendThread(thread) })
    }

    fn resume(&self, child: &Child) -> Result<(), io::Error> {
        // SAFETY: ResumeThread is called with a handle opened with THREAD_SUSPEND_RESUME.
        Threads::for_each_thread(child.id(), |thread| unsafe { ResumeThread(thread) })
    }

    fn terminate(&self, child: &mut Child) -> Result<(), io::Error> {
        child.kill()
    }

    fn grace_period(&self) -> Option<Duration> {
        Some(GRACE_PERIOD)
    }
}
