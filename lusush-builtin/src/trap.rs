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

//! Trap built-in.
//!
//! TODO Elaborate

use crate::common::Print;
use crate::common::Stderr;
use crate::common::Stdout;
use std::fmt::Write;
use std::future::Future;
use std::ops::ControlFlow::Continue;
use std::pin::Pin;
use lusush_env::builtin::Result;
use lusush_env::semantics::ExitStatus;
use lusush_env::semantics::Field;
use lusush_env::trap::Iter;
use lusush_env::trap::SetTrapError;
use lusush_env::trap::Signal;
use lusush_env::trap::Trap;
use lusush_env::trap::TrapState;
use lusush_quote::quote;
use lusush_syntax::source::Location;

/// Part of the shell execution environment the trap built-in depends on.
pub trait Env: Stdout + Stderr {
    /// Returns an iterator for currently configured trap actions.
    fn iter(&self) -> Iter;

    /// Returns the trap action for a signal.
    ///
    /// This function returns a pair of optional trap states. The first is the
    /// currently configured trap action, and the second is the action set
    /// before entering the current subshell environment.
    ///
    /// This function does not reflect the initial signal actions the shell
    /// inherited on startup.
    fn get_trap(&self, signal: Signal) -> (Option<&TrapState>, Option<&TrapState>);

    /// Sets a trap action for a signal.
    ///
    /// This function installs a signal handler to the specified underlying
    /// system.
    ///
    /// If `override_ignore` is `false`, you cannot set a trap for a signal that
    /// has been ignored since the shell startup. An interactive shell should
    /// set `override_ignore` to `true` to bypass this restriction.
    ///
    /// You can never set a trap for `SIGKILL` or `SIGSTOP`.
    ///
    /// `origin` should be the location of the command performing this trap
    /// update. It is only informative: It does not affect the signal handling
    /// behavior and can be referenced later by [`get_trap`](Self::get_trap).
    fn set_trap(
        &mut self,
        signal: Signal,
        action: Trap,
        origin: Location,
        override_ignore: bool,
    ) -> std::result::Result<(), SetTrapError>;
}

impl Env for lusush_env::Env {
    fn iter(&self) -> Iter {
        self.traps.iter()
    }

    fn get_trap(&self, signal: Signal) -> (Option<&TrapState>, Option<&TrapState>) {
        self.traps.get_trap(signal)
    }

    fn set_trap(
        &mut self,
        signal: Signal,
        action: Trap,
        origin: Location,
        override_ignore: bool,
    ) -> std::result::Result<(), SetTrapError> {
        self.traps
            .set_trap(&mut self.system, signal, action, origin, override_ignore)
    }
}

/// Prints the currently configured traps.
pub async fn print_traps<E: Env>(env: &mut E) -> Result {
    let mut output = String::new();
    for (&signal, current, parent) in env.iter() {
        let trap = match (current, parent) {
            (Some(trap), _) => trap,
            (None, Some(trap)) => trap,
            (None, None) => continue,
        };
        let command = match &trap.action {
            Trap::Default => continue,
            Trap::Ignore => "",
            Trap::Command(command) => command,
        };
        let signal = &signal.as_str()[3..];
        writeln!(output, "trap -- {} {}", &quote(command), signal).ok();
    }
    (env.print(&output).await, Continue(()))
}

/// Implementation of the readonly built-in.
pub async fn builtin_body<E: Env>(env: &mut E, mut args: Vec<Field>) -> Result {
    if args.len() != 3 {
        // TODO Support full syntax
        if args.len() == 1 {
            return print_traps(env).await;
        }
        return (ExitStatus::ERROR, Continue(()));
    }

    let Field { value, origin } = args.remove(1);

    let signal_name = format!("SIG{}", args[1].value);
    // TODO Support real-time signals
    let signal = match signal_name.parse() {
        Ok(signal) => signal,
        // TODO Print error message for the unknown signal
        Err(_) => return (ExitStatus::FAILURE, Continue(())),
    };
    let action = match value.as_str() {
        "-" => Trap::Default,
        "" => Trap::Ignore,
        _ => Trap::Command(value),
    };

    match env.set_trap(signal, action, origin, false) {
        Ok(()) => (ExitStatus::SUCCESS, Continue(())),
        // TODO Print error message
        Err(_) => (ExitStatus::ERROR, Continue(())),
    }
}

/// Implementation of the trap built-in.
///
/// This function calls [`builtin_body`] and wraps the result in a pinned box.
pub fn builtin_main(
    env: &mut lusush_env::Env,
    args: Vec<Field>,
) -> Pin<Box<dyn Future<Output = Result> + '_>> {
    Box::pin(builtin_body(env, args))
}
