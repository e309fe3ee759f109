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

//! Continue built-in
//!
//! The **`continue`** built-in skips the execution of a loop to the next
//! iteration.
//!
//! # Syntax
//!
//! ```sh
//! continue [n]
//! ```
//!
//! # Semantics
//!
//! `continue n` interrupts the execution of the *n*th innermost for, while, or
//! until loop and resumes its next iteration.
//! The specified loop must lexically enclose the continue command, that is:
//!
//! - The loop is running in the same execution environment as the continue
//!   command; and
//! - The continue command appears inside the condition or body of the loop but
//!   not in the body of a function definition command appearing inside the
//!   loop.
//!
//! It is an error if there is no loop enclosing the continue command.
//! If *n* is greater than the number of enclosing loops, the built-in affects
//! the outermost one.
//!
//! # Options
//!
//! None.
//!
//! (TODO: the -i option)
//!
//! # Operands
//!
//! Operand *n* specifies the nest level of the affected loop.
//! If omitted, it defaults to 1. It is an error if the value is not a positive
//! decimal integer.
//!
//! # Exit status
//!
//! `ExitStatus::SUCCESS` or `ExitStatus::FAILURE` depending on the results
//!
//! # Portability
//!
//! The behavior is unspecified in POSIX when the continue built-in is used
//! without an enclosing loop, in which case the current implementation returns
//! an error.
//!
//! POSIX allows the built-in to restart a loop running in the current execution
//! environment that does not lexically enclose the continue command.
//! Our implementation declines to do that.
//!
//! # Implementation notes
//!
//! A successful invocation of the built-in returns
//! `Break(Divert::Continue(n-1))` as the second element of the returned tuple.
//! The caller must pass the value to enclosing loops so that the target loop
//! can handle it.
//!
//! The implementation of the continue built-in is shared with the
//! break built-in.
//! The [`semantics`] module computes the divert value, and command line
//! arguments are parsed by reusing [`super::break::syntax`].

use crate::common::report_error;
use crate::common::report_simple_error;
use lusush_env::builtin::Result;
use lusush_env::semantics::Field;
use lusush_env::Env;

pub mod semantics;
pub use super::r#break::syntax;

async fn report_semantics_error(env: &mut Env, error: &semantics::Error) -> Result {
    report_simple_error(env, &format!("cannot continue: {}", error)).await
}

/// Entry point for executing the `continue` built-in
///
/// This function uses the [`syntax`] and [`semantics`] modules to execute the built-in.
pub async fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match syntax::parse(env, args) {
        Ok(count) => match semantics::run(&env.stack, count) {
            Ok(result) => result,
            Err(e) => report_semantics_error(env, &e).await,
        },
        Err(e) => report_error(env, &e).await,
    }
}
