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

//! Execution of the if command

use super::evaluate_condition;
use crate::command::Command;
use std::ops::ControlFlow::Continue;
use lusush_env::Env;
use lusush_env::semantics::ExitStatus;
use lusush_env::semantics::Result;
use lusush_env::system::System;
use lusush_syntax::syntax::ElifThen;
use lusush_syntax::syntax::List;

/// Executes the if command.
pub async fn execute<S: System + 'static>(
    env: &mut Env<S>,
    condition: &List,
    body: &List,
    elifs: &[ElifThen],
    r#else: &Option<List>,
) -> Result {
    if evaluate_condition(env, condition).await? {
        return body.execute(env).await;
    }
    for ElifThen { condition, body } in elifs {
        if evaluate_condition(env, condition).await? {
            return body.execute(env).await;
        }
    }
    if let Some(r#else) = r#else {
        r#else.execute(env).await
    } else {
        env.exit_status = ExitStatus::SUCCESS;
        Continue(())
    }
}
