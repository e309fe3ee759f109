// This file is part of lusush, a POSIX-compliant command shell.
// Copyright (C) 2023 The Lusush Contributors
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

//! Utility for starting subshells
//!
//! This module defines [`Subshell`], a builder for starting a subshell. It is
//! [constructed](Subshell::new) with a function you want to run in a subshell.
//! After configuring the builder with some options, you can
//! [start](Subshell::start) the subshell.
//!
//! [`Subshell`] is implemented as a wrapper around
//! [`System::new_child_process`]. You should prefer `Subshell` for the purpose
//! of creating a subshell because it helps to arrange the child process
//! properly.

use crate::job::Pid;
use crate::job::ProcessState;
use crate::stack::Frame;
use crate::system::ChildProcessTask;
use crate::system::Errno;
use crate::system::SigSet;
use crate::system::SigmaskHow::{SIG_BLOCK, SIG_SETMASK};
use crate::system::System;
use crate::system::SystemEx;
use crate::trap::Signal::{SIGINT, SIGQUIT};
use crate::Env;
use std::future::Future;
use std::pin::Pin;

/// Job state of a newly created subshell
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobControl {
    /// The subshell becomes the foreground process group.
    Foreground,
    /// The subshell becomes a background process group.
    Background,
}

/// Subshell builder
///
/// See the [module documentation](self) for details.
#[must_use = "a subshell is not started unless you call `Subshell::start`"]
pub struct Subshell<F> {
    task: F,
    job_control: Option<JobControl>,
    ignores_sigint_sigquit: bool,
}

impl<F> std::fmt::Debug for Subshell<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subshell").finish_non_exhaustive()
    }
}

impl<F> Subshell<F>
where
    F: for<'a> FnOnce(&'a mut Env, Option<JobControl>) -> Pin<Box<dyn Future<Output = ()> + 'a>>
        + 'static,
    // TODO Revisit to simplify this function type when impl Future is allowed in return type
{
    /// Creates a new subshell builder with a task.
    ///
    /// The task will run in a subshell after it is started. The task takes two
    /// arguments:
    ///
    /// 1. The environment in which the subshell runs, and
    /// 2. Job control status for the subshell.
    ///
    /// If the task returns an `Err(Divert::...)`, it is handled as follows:
    ///
    /// - `Interrupt` and `Exit` with `Some(exit_status)` override the exit
    ///   status in `Env`.
    /// - Other `Divert` values are ignored.
    pub fn new(task: F) -> Self {
        Subshell {
            task,
            job_control: None,
            ignores_sigint_sigquit: false,
        }
    }

    /// Specifies disposition of the subshell with respect to job control.
    ///
    /// If the argument is `None` (which is the default), the subshell runs in
    /// the same process group as the parent process. If it is `Some(_)`, the
    /// subshell becomes a new process group. For `JobControl::Foreground`, it
    /// also brings itself to the foreground.
    ///
    /// This parameter is ignored if the shell is not [controlling
    /// jobs](Env::controls_jobs) when starting the subshell. You can tell the
    /// actual job control status of the subshell by the second return value of
    /// [`start`](Self::start) in the parent environment and the second argument
    /// passed to the task in the subshell environment.
    ///
    /// If the parent process is a job-controlling interactive shell, but the
    /// subshell is not job-controlled, the subshell's signal handlings for
    /// SIGTSTP, SIGTTIN, and SIGTTOU are set to `Ignore`. This is to prevent
    /// the subshell from being stopped by a job-stopping signal. Were the
    /// subshell stopped, you could never resume it since it is not
    /// job-controlled.
    pub fn job_control<J: Into<Option<JobControl>>>(mut self, job_control: J) -> Self {
        self.job_control = job_control.into();
        self
    }

    /// Makes the subshell ignore SIGINT and SIGQUIT.
    ///
    /// If `ignore` is true and the subshell is not job-controlled, the subshell
    /// sets its signal handlings for SIGINT and SIGQUIT to `Ignore`.
    ///
    /// The default is `false`.
    pub fn ignore_sigint_sigquit(mut self, ignore: bool) -> Self {
        self.ignores_sigint_sigquit = ignore;
        self
    }

    /// Starts the subshell.
    ///
    /// This function creates a new child process that runs the task contained
    /// in this builder.
    ///
    /// Although this function is `async`, it does not wait for the child to
    /// finish, which means the parent and child processes will run
    /// concurrently. To wait for the child to finish, you need to call
    /// [`Env::wait_for_subshell`] or [`Env::wait_for_subshell_to_finish`]. If
    /// job control is active, you may want to add the process ID to `env.jobs`
    /// before waiting.
    ///
    /// If you set [`job_control`](Self::job_control) to
    /// `JobControl::Foreground`, this function opens `env.tty` by calling
    /// [`Env::get_tty`]. The `tty` is used to change the foreground job to the
    /// new subshell. However, `job_control` is effective only when the shell is
    /// [controlling jobs](Env::controls_jobs).
    ///
    /// If the subshell started successfully, the return value is a pair of the
    /// child process ID and the actual job control. Otherwise, it indicates the
    /// error.
    pub async fn start(self, env: &mut Env) -> Result<(Pid, Option<JobControl>), Errno> {
        // Do some preparation before starting a child process
        let job_control = env.controls_jobs().then_some(self.job_control).flatten();
        let tty = match job_control {
            None | Some(JobControl::Background) => None,
            // Open the tty in the parent process so we can reuse the FD for other jobs
            Some(JobControl::Foreground) => Some(env.get_tty()?),
        };
        // Block SIGINT and SIGQUIT before forking the child process to prevent
        // the child from being killed by those signals until the child starts
        // ignoring them.
        let mut mask_guard = MaskGuard::new(env);
        let ignores_sigint_sigquit = self.ignores_sigint_sigquit
            && job_control.is_none()
            && mask_guard.block_sigint_sigquit();
        let keeps_stopper_handlers = job_control.is_none();

        // Define the child process task
        const ME: Pid = Pid(0);
        let task: ChildProcessTask = Box::new(move |env| {
            Box::pin(async move {
                let mut env = env.push_frame(Frame::Subshell);
                let env = &mut *env;

                if let Some(job_control) = job_control {
                    if let Ok(()) = env.system.setpgid(ME, ME) {
                        match job_control {
                            JobControl::Background => (),
                            JobControl::Foreground => {
                                if let Some(tty) = tty {
                                    let pgid = env.system.getpgrp();
                                    let _ = env.system.tcsetpgrp_with_block(tty, pgid);
                                }
                            }
                        }
                    }
                }
                env.jobs.disown_all();

                env.traps.enter_subshell(
                    &mut env.system,
                    ignores_sigint_sigquit,
                    keeps_stopper_handlers,
                );

                (self.task)(env, job_control).await
            })
        });

        // Start the child
        let child = mask_guard.env.system.new_child_process()?;
        let child_pid = child(mask_guard.env, task).await;

        // The finishing
        if job_control.is_some() {
            // We should setpgid not only in the child but also in the parent to
            // make sure the child is in a new process group before the parent
            // returns from the start function.
            let _ = mask_guard.env.system.setpgid(child_pid, ME);

            // We don't tcsetpgrp in the parent. It would mess up the child
            // which may have started another shell doing its own job control.
        }

        Ok((child_pid, job_control))
    }

    /// Starts the subshell and waits for it to finish.
    ///
    /// This function [starts](Self::start) `self` and
    /// [waits](Env::wait_for_subshell) for it to finish. This function returns
    /// when the subshell process exits or is killed by a signal. If the
    /// subshell is job-controlled, the function also returns when the job is
    /// suspended.
    ///
    /// If the subshell started successfully, the return value is the process ID
    /// and the process state of the subshell, which is `Exited`, `Signaled`, or
    /// `Stopped`. If there was an error starting the subshell, this function
    /// returns the error.
    ///
    /// If you set [`job_control`](Self::job_control) to
    /// `JobControl::Foreground` and job control is effective as per
    /// [`Env::controls_jobs`], this function makes the shell the foreground job
    /// after the subshell terminated or suspended.
    ///
    /// When a job-controlled subshell suspends, this function does not add it
    /// to `env.jobs`. You have to do it for yourself if necessary.
    pub async fn start_and_wait(self, env: &mut Env) -> Result<(Pid, ProcessState), Errno> {
        let (pid, job_control) = self.start(env).await?;
        let result = loop {
            let (pid, state) = env.wait_for_subshell(pid).await?;
            let is_done = match state {
                ProcessState::Running => false,
                _ => todo!(),
                // ProcessState::Stopped(_) => job_control.is_some(),
                // ProcessState::Exited(_) | ProcessState::Signaled { .. } => true,
            };
            if is_done {
                break Ok((pid, state));
            }
        };

        if job_control == Some(JobControl::Foreground) {
            if let Some(tty) = env.tty {
                env.system.tcsetpgrp_with_block(tty, env.main_pgid).ok();
            }
        }

        result
    }
}

/// Guard object for temporarily blocking signals
///
/// This object blocks SIGINT and SIGQUIT and remembers the previous signal
/// blocking mask, which is restored when the object is dropped.
#[derive(Debug)]
struct MaskGuard<'a> {
    env: &'a mut Env,
    old_mask: Option<SigSet>,
}

impl<'a> MaskGuard<'a> {
    fn new(env: &'a mut Env) -> Self {
        let old_mask = None;
        Self { env, old_mask }
    }

    fn block_sigint_sigquit(&mut self) -> bool {
        assert_eq!(self.old_mask, None);

        let mut sigint_sigquit = SigSet::empty();
        let mut old_mask = SigSet::empty();
        sigint_sigquit.add(SIGINT);
        sigint_sigquit.add(SIGQUIT);

        let success = self
            .env
            .system
            .sigmask(SIG_BLOCK, Some(&sigint_sigquit), Some(&mut old_mask))
            .is_ok();
        if success {
            self.old_mask = Some(old_mask);
        }
        success
    }
}

impl<'a> Drop for MaskGuard<'a> {
    fn drop(&mut self) {
        if let Some(old_mask) = &self.old_mask {
            self.env
                .system
                .sigmask(SIG_SETMASK, Some(old_mask), None)
                .ok();
        }
    }
}
