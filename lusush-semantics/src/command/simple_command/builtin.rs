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

//! Simple command semantics for built-ins

use super::perform_assignments;
use crate::redir::RedirGuard;
use crate::xtrace::print;
use crate::xtrace::trace_fields;
use crate::xtrace::XTrace;
use crate::Handle;
use std::ops::ControlFlow::{Break, Continue};
use lusush_env::builtin::Builtin;
use lusush_env::semantics::Divert;
use lusush_env::semantics::Field;
use lusush_env::semantics::Result;
use lusush_env::stack::Frame;
use lusush_env::variable::Context;
use lusush_env::Env;
use lusush_syntax::syntax::Assign;
use lusush_syntax::syntax::Redir;

pub async fn execute_builtin(
    env: &mut Env,
    builtin: Builtin,
    assigns: &[Assign],
    mut fields: Vec<Field>,
    redirs: &[Redir],
) -> Result {
    use lusush_env::builtin::Type::*;

    let mut xtrace = XTrace::from_options(&env.options);
    trace_fields(xtrace.as_mut(), &fields);

    let name = fields.remove(0);
    let is_special = builtin.r#type == Special;
    let env = &mut env.push_frame(Frame::Builtin { name, is_special });

    let env = &mut RedirGuard::new(env);
    if let Err(e) = env.perform_redirs(redirs, xtrace.as_mut()).await {
        e.handle(env).await?;
        return match builtin.r#type {
            Special => Break(Divert::Interrupt(None)),
            Mandatory | Elective | Extension | Substitutive => Continue(()),
        };
    };

    let result = match builtin.r#type {
        Special => {
            perform_assignments(env, assigns, false, xtrace.as_mut()).await?;
            print(env, xtrace).await;
            (builtin.execute)(env, fields).await
        }
        // TODO Reject elective and extension built-ins in POSIX mode
        Mandatory | Elective | Extension | Substitutive => {
            let mut env = env.push_context(Context::Volatile);
            perform_assignments(&mut env, assigns, true, xtrace.as_mut()).await?;
            print(&mut env, xtrace).await;
            (builtin.execute)(&mut env, fields).await
        }
    };

    if result.should_retain_redirs() {
        env.preserve_redirs();
    }
    env.exit_status = result.exit_status();
    result.divert()
}
