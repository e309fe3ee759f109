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

//! Implementation of the compound command semantics.

mod subshell;

use super::perform_redirs;
use super::Command;
use crate::redir::RedirGuard;
use async_trait::async_trait;
use std::ops::ControlFlow::Continue;
use lusush_env::semantics::Result;
use lusush_env::Env;
use lusush_syntax::syntax;

/// Executes the compound command.
#[async_trait(?Send)]
impl Command for syntax::FullCompoundCommand {
    async fn execute(&self, env: &mut Env) -> Result {
        let mut env = RedirGuard::new(env);
        perform_redirs(&mut env, &self.redirs).await?;
        self.command.execute(&mut env).await
    }
}

/// Executes the compound command.
///
/// # Grouping
///
/// A grouping is executed by running the contained list.
///
/// # Subshell
///
/// A subshell is executed by running the contained list in a
/// [subshell](Env::run_in_subshell).
///
/// TODO Elaborate
#[async_trait(?Send)]
impl Command for syntax::CompoundCommand {
    async fn execute(&self, env: &mut Env) -> Result {
        use syntax::CompoundCommand::*;
        match self {
            Grouping(list) => list.execute(env).await,
            Subshell(list) => subshell::execute(env, list).await,
            // TODO execute for loop
            // TODO execute while/until loop
            // TODO execute case
            // TODO execute if
            _ => {
                env.print_error(&format!("Not implemented: {}\n", self))
                    .await;
                Continue(())
            }
        }
    }
}
