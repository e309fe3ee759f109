// This file is part of lusush, a POSIX-compliant command shell.
// Copyright (C) 2022 The Lusush Contributors
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

//! Semantics of subshell compound commands

use crate::command::Command;
use crate::trap::run_exit_trap;
use std::ops::ControlFlow::Break;
use std::rc::Rc;
use lusush_env::Env;
use lusush_env::io::print_error;
use lusush_env::job::add_job_if_suspended;
use lusush_env::semantics::Divert;
use lusush_env::semantics::ExitStatus;
use lusush_env::semantics::Result;
use lusush_env::subshell::JobControl;
use lusush_env::subshell::Subshell;
use lusush_env::system::System;
use lusush_syntax::source::Location;
use lusush_syntax::syntax::List;

/// Executes a subshell command
pub async fn execute<S: System + 'static>(
    env: &mut Env<S>,
    body: Rc<List>,
    location: &Location,
) -> Result {
    let body_2 = Rc::clone(&body);
    let subshell = Subshell::new(|sub_env, _job_control| Box::pin(subshell_main(sub_env, body_2)));
    let subshell = subshell.job_control(JobControl::Foreground);
    match subshell.start_and_wait(env).await {
        Ok((pid, result)) => {
            env.exit_status = add_job_if_suspended(env, pid, result, || body.to_string())?;
            env.apply_errexit()
        }
        Err(errno) => {
            print_error(
                env,
                "cannot start subshell".into(),
                errno.to_string().into(),
                location,
            )
            .await;
            Break(Divert::Interrupt(Some(ExitStatus::ERROR)))
        }
    }
}

/// Executes the content of the shell.
async fn subshell_main<S: System + 'static>(env: &mut Env<S>, body: Rc<List>) {
    let result = body.execute(env).await;
    env.apply_result(result);

    run_exit_trap(env).await;
}
