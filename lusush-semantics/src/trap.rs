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

//! Handling traps

use crate::read_eval_loop;
use std::ops::ControlFlow::Continue;
use lusush_env::exec::Result;
use lusush_env::trap::Trap;
#[cfg(doc)]
use lusush_env::trap::TrapSet;
use lusush_env::Env;
use lusush_syntax::parser::lex::Lexer;
use lusush_syntax::source::Source;

/// Runs trap commands for signals that have been caught.
///
/// This function resets the `pending` flag of caught signals by calling
/// [`TrapSet::take_caught_signal`].
pub async fn run_traps_for_caught_signals(env: &mut Env) -> Result {
    env.poll_signals();

    // TODO Prevent running traps while running another

    while let Some((signal, state)) = env.traps.take_caught_signal() {
        let code = if let Trap::Command(command) = &state.action {
            command.clone()
        } else {
            continue;
        };
        let condition = signal.to_string();
        let origin = state.origin.clone();
        let mut lexer = Lexer::from_memory(&code, Source::Trap { condition, origin });
        let previous_exit_status = env.exit_status;
        // TODO Update control flow stack
        read_eval_loop(env, &mut lexer).await;
        env.exit_status = previous_exit_status;
    }

    Continue(())
}
