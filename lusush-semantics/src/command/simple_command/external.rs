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

//! Simple command semantics for external utilities

use super::perform_assignments;
use crate::Handle;
use crate::command::search::search_path;
use crate::redir::RedirGuard;
use crate::xtrace::XTrace;
use crate::xtrace::print;
use crate::xtrace::trace_fields;
use std::ffi::CString;
use std::ops::ControlFlow::Continue;
use lusush_env::Env;
use lusush_env::io::print_error;
use lusush_env::io::print_report;
use lusush_env::semantics::ExitStatus;
use lusush_env::semantics::Field;
use lusush_env::semantics::Result;
use lusush_env::semantics::command::ReplaceCurrentProcessError;
use lusush_env::semantics::command::run_external_utility_in_subshell;
use lusush_env::variable::Context;
use lusush_syntax::syntax::Assign;
use lusush_syntax::syntax::Redir;

pub async fn execute_external_utility(
    env: &mut Env,
    assigns: &[Assign],
    fields: Vec<Field>,
    redirs: &[Redir],
) -> Result {
    let mut xtrace = XTrace::from_options(&env.options);

    let env = &mut RedirGuard::new(env);
    if let Err(e) = env.perform_redirs(redirs, xtrace.as_mut()).await {
        return e.handle(env).await;
    };

    let mut env = env.push_context(Context::Volatile);
    perform_assignments(&mut env, assigns, true, xtrace.as_mut()).await?;

    trace_fields(xtrace.as_mut(), &fields);
    print(&mut env, xtrace).await;

    let name = &fields[0];
    let path = if name.value.contains('/') {
        CString::new(&*name.value).ok()
    } else {
        search_path(&mut *env, &name.value)
    };

    if let Some(path) = path {
        env.exit_status =
            start_external_utility_in_subshell_and_wait(&mut env, path, fields).await?;
    } else {
        print_error(
            &mut env,
            format!("cannot execute external utility {:?}", name.value).into(),
            format!("utility {:?} not found", name.value).into(),
            &name.origin,
        )
        .await;
        env.exit_status = ExitStatus::NOT_FOUND;
    }

    Continue(())
}

/// Starts an external utility in a subshell and waits for it to finish.
///
/// `path` is the path to the external utility. `fields` are the command line
/// words of the utility. The first field must exist and be the name of the
/// utility as it is used for error messages.
///
/// This function starts the utility in a subshell and waits for it to finish.
/// The subshell is a foreground job if job control is enabled.
///
/// This function returns the exit status of the utility. In case of an error,
/// it prints an error message to the standard error before returning an
/// appropriate exit status.
pub async fn start_external_utility_in_subshell_and_wait(
    env: &mut Env,
    path: CString,
    fields: Vec<Field>,
) -> Result<ExitStatus> {
    run_external_utility_in_subshell(
        env,
        path,
        fields,
        |env, error| Box::pin(async move { print_report(env, &(&error).into()).await }),
        |env, ReplaceCurrentProcessError { path, errno }, location| {
            Box::pin(async move {
                print_error(
                    env,
                    format!("cannot execute external utility {:?}", path).into(),
                    format!("{:?}: {}", path, errno).into(),
                    &location,
                )
                .await;
            })
        },
    )
    .await
}

/// Converts fields to C strings.
///
/// # Deprecated
///
/// This function is deprecated because it does not handle null bytes in field
/// values. If a field contains a null byte, the field is simply skipped, which
/// may lead to unexpected behavior. Users are encouraged to implement their own
/// conversion that handles null bytes appropriately.
#[deprecated(since = "0.11.0")]
pub fn to_c_strings(s: Vec<Field>) -> Vec<CString> {
    s.into_iter()
        .filter_map(|f| {
            let bytes = f.value.into_bytes();
            // TODO Return NulError if the field contains a null byte
            CString::new(bytes).ok()
        })
        .collect()
}
