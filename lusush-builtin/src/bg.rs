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

//! Bg built-in
//!
//! The **`bg`** built-in resumes a suspended job in the background.
//!
//! # Synopsis
//!
//! ```sh
//! bg [job_idâ€¦]
//! ```
//!
//! # Description
//!
//! The built-in resumes the specified jobs by sending the `SIGCONT` signal to
//! them.
//!
//! # Options
//!
//! None.
//!
//! # Operands
//!
//! Operands specify which jobs to resume. See the module documentation of
//! [`lusush_env::job::id`] for the format of job IDs. If omitted, the built-in
//! resumes the [current job](JobList::current_job).
//!
//! (TODO: allow omitting the leading `%`)
//!
//! # Standard output
//!
//! The built-in writes the job number and name of each resumed job to the
//! standard output.
//!
//! # Errors
//!
//! It is an error if the specified job is not found, not job-controlled, or
//! not [owned] by the current shell environment.
//!
//! # Exit status
//!
//! Zero unless an error occurs.
//!
//! # Portability
//!
//! Many implementations allow omitting the leading `%` from job IDs, though it
//! is not required by POSIX.
//!
//! Some implementations (including the previous version of lusush, but not this
//! version) regard it is an error to resume a job that has already terminated.
//!
//! # Implementation notes
//!
//! This implementation sends the `SIGCONT` signal even to jobs that are already
//! running. The signal is not sent to jobs that have already terminated, to
//! prevent unrelated processes that happen to have the same process IDs as the
//! jobs from receiving the signal.
//!
//! The built-in sets the [expected status] of the resumed jobs to
//! [`WaitStatus::Continued`] so that the status changes are not reported again
//! on the next command prompt.
//!
//! [owned]: lusush_env::job::Job::is_owned
//! [expected status]: lusush_env::job::Job::expected_status

use crate::common::report_error;
use crate::common::report_failure;
use crate::common::report_simple_failure;
use crate::common::syntax::parse_arguments;
use crate::common::syntax::Mode;
use crate::common::to_single_message;
use std::borrow::Cow;
use std::fmt::Display;
use thiserror::Error;
use lusush_env::io::Fd;
use lusush_env::job::fmt::Marker;
use lusush_env::job::fmt::Report;
use lusush_env::job::id::parse;
use lusush_env::job::id::FindError;
use lusush_env::job::id::ParseError;
#[cfg(doc)]
use lusush_env::job::JobList;
use lusush_env::job::Pid;
use lusush_env::job::WaitStatus;
use lusush_env::semantics::Field;
use lusush_env::system::Errno;
use lusush_env::trap::Signal;
use lusush_env::Env;
use lusush_env::System;
use lusush_syntax::source::pretty::Annotation;
use lusush_syntax::source::pretty::AnnotationType;
use lusush_syntax::source::pretty::MessageBase;

// Some definitions in this module are shared with the `fg` built-in.

/// Errors that may occur when resuming a job
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub(crate) enum ResumeError {
    #[error("target job is not controlled by the current shell environment")]
    Unowned,
    #[error("target job is not job-controlled")]
    Unmonitored,
    #[error("system error: {0}")]
    SystemError(#[from] Errno),
}

/// Errors that may occur when processing an operand
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub(crate) enum OperandErrorKind {
    /// The operand is not a job ID.
    #[error(transparent)]
    InvalidJobId(#[from] ParseError),
    /// The job ID does not specify a single job.
    #[error(transparent)]
    UnidentifiedJob(#[from] FindError),
    /// The job cannot be resumed.
    #[error(transparent)]
    CannotResume(#[from] ResumeError),
}

/// An operand and the error that occurred when processing it
#[derive(Clone, Debug, Error, Eq, PartialEq)]
struct OperandError(Field, OperandErrorKind);

impl Display for OperandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.value, self.1)
    }
}

impl MessageBase for OperandError {
    fn message_title(&self) -> Cow<str> {
        "cannot resume job".into()
    }

    fn main_annotation(&self) -> Annotation<'_> {
        let label = format!("{}: {}", self.0.value, self.1).into();
        Annotation::new(AnnotationType::Error, label, &self.0.origin)
    }
}

/// Resumes the job at the specified index.
///
/// This function panics if there is no job at the specified index.
async fn resume_job_by_index(env: &mut Env, index: usize) -> Result<(), ResumeError> {
    let mut job = env.jobs.get_mut(index).unwrap();
    if !job.is_owned {
        return Err(ResumeError::Unowned);
    }
    if !job.job_controlled {
        return Err(ResumeError::Unmonitored);
    }

    let report = Report {
        index,
        marker: Marker::None,
        job: &job,
    };
    let line = format!("[{}] {}\n", report.number(), job.name);
    env.system.write_all(Fd::STDOUT, line.as_bytes()).await?;
    drop(line);

    if job.state.is_alive() {
        let pgid = Pid::from_raw(-job.pid.as_raw());
        env.system.kill(pgid, Signal::SIGCONT.into()).await?;

        // We've just reported that the job is resumed, so there is no need to
        // report the same thing in the usual pre-prompt message.
        job.expect(WaitStatus::Continued(job.pid));
    }

    // The resumed job becomes the current job. This is only relevant when all
    // jobs are running since the current job is not changed if there is another
    // suspended job, but it is simpler to always update the current job.
    env.jobs.set_current_job(index).ok();

    Ok(())
}

/// Resumes the job specified by the operand.
async fn resume_job_by_id(env: &mut Env, job_id: &str) -> Result<(), OperandErrorKind> {
    let job_id = parse(job_id)?;
    let index = job_id.find(&env.jobs)?;
    resume_job_by_index(env, index).await?;
    Ok(())
}

/// Entry point of the `bg` built-in
pub async fn main(env: &mut Env, args: Vec<Field>) -> crate::Result {
    let (options, operands) = match parse_arguments(&[], Mode::with_env(env), args) {
        Ok(result) => result,
        Err(error) => return report_error(env, &error).await,
    };
    debug_assert_eq!(options, []);

    if operands.is_empty() {
        if let Some(index) = env.jobs.current_job() {
            match resume_job_by_index(env, index).await {
                Ok(()) => crate::Result::default(),
                Err(error) => report_simple_failure(env, &error.to_string()).await,
            }
        } else {
            report_simple_failure(env, "there is no job").await
        }
    } else {
        let mut errors = Vec::new();
        for operand in operands {
            match resume_job_by_id(env, &operand.value).await {
                Ok(()) => {}
                Err(error) => errors.push(OperandError(operand, error)),
            }
        }
        match to_single_message(&{ errors }) {
            None => crate::Result::default(),
            Some(message) => report_failure(env, message).await,
        }
    }
}
