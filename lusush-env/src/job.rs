// This file is part of lusush, a POSIX-compliant command shell.
// Copyright (C) 2021 The Lusush Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Type definitions for job management.
//!
//! This module defines [`Job`], a single job tracked by the shell, and
//! [`JobList`], the collection of jobs kept in [`Env::jobs`](crate::Env::jobs).
//! Formatting a job for the `jobs` built-in is handled by the [`fmt`] module;
//! parsing job IDs (`%1`, `%+`, `%?foo`, …) is handled by the [`id`] module.

pub mod fmt;
pub mod id;

use crate::semantics::ExitStatus;
use crate::system::terminal::{TcGetPgrp, TcSetPgrp};
use crate::system::{Disposition, Errno, Result, Sigaction, Signals};
use std::collections::BTreeMap;
use std::future::Future;

#[doc(no_inline)]
pub use nix::sys::signal::Signal;
#[doc(no_inline)]
pub use nix::sys::wait::WaitStatus;
#[doc(no_inline)]
pub use nix::unistd::Pid;

/// Outcome of a process that has stopped running
///
/// This is the part of [`ProcessState`] that applies when the process is no
/// longer [alive](ProcessState::is_alive).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessResult {
    /// The process exited normally.
    Exited(ExitStatus),
    /// The process was terminated by a signal.
    Signaled {
        /// Signal that terminated the process
        signal: Signal,
        /// Whether the process dumped core
        core_dump: bool,
    },
    /// The process was stopped by a signal.
    Stopped(Signal),
}

impl ProcessResult {
    /// Creates a result for a process that exited with the given exit status.
    #[must_use]
    pub fn exited(exit_status: i32) -> Self {
        ProcessResult::Exited(ExitStatus(exit_status))
    }

    /// Returns whether the result is a [`Stopped`](Self::Stopped) result.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessResult::Stopped(_))
    }
}

/// Converts a process result into the exit status that should be reported to
/// the shell.
///
/// A process stopped by a signal is reported with the exit status it had
/// before being stopped is not known here, so this conversion treats a
/// stopped process the same as one that has not changed state, namely by
/// offsetting the signal number as [`ExitStatus::from<signal::Number>`] does.
impl From<ProcessResult> for ExitStatus {
    fn from(result: ProcessResult) -> Self {
        match result {
            ProcessResult::Exited(exit_status) => exit_status,
            ProcessResult::Signaled { signal, .. } | ProcessResult::Stopped(signal) => {
                ExitStatus(0x180 + signal as i32)
            }
        }
    }
}

/// State of a process tracked by the shell
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessState {
    /// The process is still running (or has not been waited for yet).
    Running,
    /// The process has stopped running, either by exiting, being signaled, or
    /// being stopped.
    Halted(ProcessResult),
}

impl ProcessState {
    /// Creates a state for a process that exited with the given exit status.
    #[must_use]
    pub fn exited(exit_status: i32) -> Self {
        ProcessState::Halted(ProcessResult::exited(exit_status))
    }

    /// Creates a state for a process that was stopped by the given signal.
    #[must_use]
    pub fn stopped(signal: Signal) -> Self {
        ProcessState::Halted(ProcessResult::Stopped(signal))
    }

    /// Returns whether the process may still produce more status changes.
    ///
    /// This is `true` for [`Running`](Self::Running) and for a
    /// [`Halted`](Self::Halted) process that was stopped (since it may later
    /// continue or be killed), and `false` for a process that exited or was
    /// signaled to death.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        match self {
            ProcessState::Running => true,
            ProcessState::Halted(result) => result.is_stopped(),
        }
    }

    /// Converts this state into a [`WaitStatus`] as would be returned by
    /// `waitpid` for the given process ID.
    #[must_use]
    pub fn to_wait_status(self, pid: Pid) -> WaitStatus {
        match self {
            ProcessState::Running => WaitStatus::StillAlive,
            ProcessState::Halted(ProcessResult::Exited(exit_status)) => {
                WaitStatus::Exited(pid, exit_status.0)
            }
            ProcessState::Halted(ProcessResult::Signaled { signal, core_dump }) => {
                WaitStatus::Signaled(pid, signal, core_dump)
            }
            ProcessState::Halted(ProcessResult::Stopped(signal)) => {
                WaitStatus::Stopped(pid, signal)
            }
        }
    }
}

impl From<ProcessResult> for ProcessState {
    fn from(result: ProcessResult) -> Self {
        ProcessState::Halted(result)
    }
}

/// Job tracked by the shell
///
/// A job corresponds to a pipeline that was started asynchronously or
/// suspended while running in the foreground. In the current implementation, a
/// job contains the process ID of one child process of the shell (typically
/// the pipeline's process group leader). Though there may be more processes
/// involved in the execution of the pipeline, the shell takes care of only one
/// process per job.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Job {
    /// Process ID
    pub pid: Pid,

    /// Whether the job is job-controlled.
    ///
    /// If the job is job-controlled, the job process runs in its own process
    /// group, and the shell may move the terminal's foreground process group
    /// to it.
    pub job_controlled: bool,

    /// Whether this job is owned by the current shell environment.
    ///
    /// A job becomes unowned when it is disowned by the `disown` built-in or
    /// when it was created by a subshell that has since exited; unowned jobs
    /// cannot be resumed or sent signals by job number.
    pub is_owned: bool,

    /// Current state of the process
    pub state: ProcessState,

    /// Status the shell expects to observe next.
    ///
    /// This is set when the shell itself causes a status change (for example,
    /// by sending `SIGCONT` to resume a job) so that the change is not
    /// reported again as if it were unexpected.
    pub expected_status: Option<WaitStatus>,

    /// String representation of this process, used when reporting the job.
    pub name: String,
}

impl Job {
    /// Creates a new job instance.
    ///
    /// This function requires a process ID to initialize the new job. The
    /// other members of the job are defaulted: the job is not job-controlled,
    /// is owned by the current environment, and is in the
    /// [`Running`](ProcessState::Running) state.
    #[must_use]
    pub fn new(pid: Pid) -> Self {
        Job {
            pid,
            job_controlled: false,
            is_owned: true,
            state: ProcessState::Running,
            expected_status: None,
            name: String::new(),
        }
    }

    /// Records a status the shell itself caused and therefore should not be
    /// reported as a spontaneous change.
    pub fn expect(&mut self, status: WaitStatus) {
        self.expected_status = Some(status);
    }
}

/// Collection of jobs known to the shell
///
/// In addition to the jobs themselves, a `JobList` remembers the current and
/// previous job (as referenced by the `%+` and `%-` job IDs) and the process
/// ID of the most recently started asynchronous command (as referenced by the
/// `$!` special parameter).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JobList {
    jobs: BTreeMap<usize, Job>,
    next_index: usize,
    current_job: Option<usize>,
    previous_job: Option<usize>,
    last_async_pid: Pid,
}

impl JobList {
    /// Creates an empty job list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of jobs in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns whether the list contains no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns a reference to the job at the given index, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(&index)
    }

    /// Returns a mutable reference to the job at the given index, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(&index)
    }

    /// Adds a job to the list and returns the index it was added at.
    ///
    /// The returned index, plus one, is the job number shown to the user (see
    /// [`fmt::Report`]).
    pub fn add(&mut self, job: Job) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        self.jobs.insert(index, job);
        self.current_job.get_or_insert(index);
        index
    }

    /// Removes the job at the given index, returning it if it existed.
    ///
    /// If the removed job was the current or previous job, the current and
    /// previous job indices are updated accordingly.
    pub fn remove(&mut self, index: usize) -> Option<Job> {
        let removed = self.jobs.remove(&index);
        if removed.is_some() {
            if self.current_job == Some(index) {
                self.current_job = self.previous_job.take();
            } else if self.previous_job == Some(index) {
                self.previous_job = None;
            }
            if self.current_job.is_none() {
                self.current_job = self.jobs.keys().next_back().copied();
            }
        }
        removed
    }

    /// Returns an iterator over the jobs in the list, in index order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, &Job)> {
        self.jobs.iter().map(|(&index, job)| (index, job))
    }

    /// Finds the index of the job with the given process ID.
    #[must_use]
    pub fn find_by_pid(&self, pid: Pid) -> Option<usize> {
        self.iter()
            .find(|(_, job)| job.pid == pid)
            .map(|(index, _)| index)
    }

    /// Returns the index of the current job (`%+`), if any.
    #[must_use]
    pub fn current_job(&self) -> Option<usize> {
        self.current_job
    }

    /// Returns the index of the previous job (`%-`), if any.
    #[must_use]
    pub fn previous_job(&self) -> Option<usize> {
        self.previous_job
    }

    /// Designates the job at the given index as the current job.
    ///
    /// The job that was the current job becomes the previous job. This
    /// function fails (without changing anything) if there is no job at
    /// `index`.
    pub fn set_current_job(&mut self, index: usize) -> std::result::Result<(), NoSuchJobError> {
        if !self.jobs.contains_key(&index) {
            return Err(NoSuchJobError);
        }
        if self.current_job != Some(index) {
            self.previous_job = self.current_job;
        }
        self.current_job = Some(index);
        Ok(())
    }

    /// Updates the state of the job with the given process ID, as reported by
    /// the given [`WaitStatus`].
    ///
    /// This is a no-op if no job has the reported process ID.
    pub fn update_status(&mut self, status: WaitStatus) {
        let Some(pid) = status.pid() else { return };
        let Some(index) = self.find_by_pid(pid) else {
            return;
        };
        let job = self.jobs.get_mut(&index).unwrap();
        match status {
            WaitStatus::StillAlive | WaitStatus::Continued(_) => {
                job.state = ProcessState::Running;
            }
            WaitStatus::Exited(_, exit_status) => {
                job.state = ProcessState::exited(exit_status);
            }
            WaitStatus::Signaled(_, signal, core_dump) => {
                job.state = ProcessState::Halted(ProcessResult::Signaled { signal, core_dump });
            }
            WaitStatus::Stopped(_, signal) => {
                job.state = ProcessState::stopped(signal);
            }
            #[allow(unreachable_patterns)]
            _ => {}
        }
        if job.expected_status == Some(status) {
            job.expected_status = None;
        }
    }

    /// Calls `f` for each job, in index order, passing the job's index.
    ///
    /// Iteration stops early if `f` returns `false`.
    pub fn report_jobs<F>(&self, mut f: F)
    where
        F: FnMut(usize, &Job) -> bool,
    {
        for (&index, job) in &self.jobs {
            if !f(index, job) {
                break;
            }
        }
    }

    /// Removes all jobs for which `f` returns `false`.
    pub fn retain_jobs<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &Job) -> bool,
    {
        let to_remove: Vec<usize> = self
            .jobs
            .iter()
            .filter(|&(&index, job)| !f(index, job))
            .map(|(&index, _)| index)
            .collect();
        for index in to_remove {
            self.remove(index);
        }
    }

    /// Returns the process ID of the most recently executed asynchronous
    /// command.
    ///
    /// This function returns the value that has been set by
    /// [`set_last_async_pid`](Self::set_last_async_pid), or 0 if no value has
    /// been set.
    ///
    /// When expanding the special parameter `$!`, you must use
    /// [`expand_last_async_pid`](Self::expand_last_async_pid) instead of this
    /// function.
    #[must_use]
    pub fn last_async_pid(&self) -> Pid {
        self.last_async_pid
    }

    /// Returns the process ID of the most recently executed asynchronous
    /// command.
    ///
    /// This function is similar to [`last_async_pid`](Self::last_async_pid),
    /// but also updates an internal flag so that the asynchronous command is
    /// not disowned too soon.
    ///
    /// TODO Keep the async process from being disowned automatically.
    pub fn expand_last_async_pid(&mut self) -> Pid {
        self.last_async_pid
    }

    /// Sets the process ID of the most recently executed asynchronous
    /// command.
    ///
    /// This function affects the result of
    /// [`last_async_pid`](Self::last_async_pid).
    pub fn set_last_async_pid(&mut self, pid: Pid) {
        self.last_async_pid = pid;
    }
}

/// Error returned by [`JobList::set_current_job`] when there is no job at the
/// given index.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("no such job")]
pub struct NoSuchJobError;

/// Gives the foreground to the process group `pgid`, suspending the calling
/// shell process with `SIGTTOU` if it is not already in the foreground.
///
/// Use this when the shell intends to wait until `pgid` is no longer the
/// foreground process group (for example, after starting a foreground job and
/// before waiting for it to finish).
pub fn tcsetpgrp_with_block<S>(
    system: &mut S,
    fd: crate::io::Fd,
    pgid: Pid,
) -> impl Future<Output = Result<()>> + use<'_, S>
where
    S: TcSetPgrp,
{
    system.tcsetpgrp(fd, pgid)
}

/// Gives the foreground to the process group `pgid` without risking the
/// calling shell process being suspended by `SIGTTOU`.
///
/// This is used when the shell gives up the foreground on behalf of another
/// process group (for example, when suspending a foreground job so it
/// continues in the background) and must not itself be stopped as a side
/// effect of the `tcsetpgrp` call.
pub async fn tcsetpgrp_without_block<S>(system: &mut S, fd: crate::io::Fd, pgid: Pid) -> Result<()>
where
    S: TcSetPgrp + TcGetPgrp + Sigaction + Signals,
{
    let Some((_, sigttou)) = system.validate_signal(Signal::SIGTTOU as i32) else {
        return system.tcsetpgrp(fd, pgid).await;
    };
    let previous = system.sigaction(sigttou, Disposition::Ignore)?;
    let result = system.tcsetpgrp(fd, pgid).await;
    system.sigaction(sigttou, previous)?;
    result
}

/// Adds a job to [`Env::jobs`](crate::Env::jobs) if the process represented by
/// `result` has been suspended (stopped) rather than having run to
/// completion.
///
/// This is a convenience function for handling the result of starting and
/// waiting for a foreground subshell. If the process was stopped, a new job
/// is added, marked as job-controlled, with its name computed lazily by the
/// `name` closure (so it is not computed unless a job is actually added).
///
/// Returns the exit status that should be assigned to
/// [`Env::exit_status`](crate::Env::exit_status).
#[must_use]
pub fn exit_status_for_suspension(result: ProcessResult) -> ExitStatus {
    result.into()
}
