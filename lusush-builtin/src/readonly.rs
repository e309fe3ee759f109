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

//! Readonly built-in
//!
//! The **`readonly`** built-in makes shell variables read-only.
//!
//! # Synopsis
//!
//! ```sh
//! readonly [-p] [name[=value]…]
//! ```
//!
//! # Description
//!
//! The readonly built-in (without the `-p` option) makes each of the specified
//! names read-only, with optional values. If no names are given, or if the
//! `-p` option is given, the names and values of all read-only variables are
//! displayed.
//!
//! # Options
//!
//! The **`-p`** (**`--print`**) option causes the shell to display the names
//! and values of all read-only variables in a format that can be reused as
//! input to restore the state of these variables. When used with operands, the
//! option limits the output to the specified variables.
//!
//! # Operands
//!
//! The operands are names of shell variables to be made read-only. Each name
//! may optionally be followed by `=` and a *value* to assign to the variable
//! before it is made read-only.
//!
//! # Exit status
//!
//! Zero unless an error occurs.
//!
//! # Errors
//!
//! It is an error to assign a value to a variable that is already read-only.
//!
//! # Portability
//!
//! This built-in is part of the POSIX standard. Printing variables is portable
//! only when the `-p` option is used without operands.
//!
//! # Implementation notes
//!
//! The implementation of this built-in depends on that of the
//! [`typeset`](crate::typeset) built-in.

use crate::common::output;
use crate::common::report_error;
use crate::common::report_failure;
use crate::typeset::syntax::interpret;
use crate::typeset::syntax::parse;
use crate::typeset::syntax::OptionSpec;
use crate::typeset::syntax::PRINT_OPTION;
use crate::typeset::to_message;
use crate::typeset::Command;
use crate::typeset::PrintContext;
use crate::typeset::Scope::Global;
use crate::typeset::VariableAttr::ReadOnly;
use lusush_env::option::State::On;
use lusush_env::semantics::Field;
use lusush_env::Env;

/// List of portable options applicable to the readonly built-in
pub static PORTABLE_OPTIONS: &[OptionSpec<'static>] = &[PRINT_OPTION];

/// Variable printing context for the readonly built-in
pub const PRINT_VARIABLES_CONTEXT: PrintContext<'static> = PrintContext {
    builtin_name: "readonly",
    builtin_is_significant: true,
    options_allowed: PORTABLE_OPTIONS,
};

/// Entry point of the readonly built-in
pub async fn main(env: &mut Env, args: Vec<Field>) -> lusush_env::builtin::Result {
    match parse(PORTABLE_OPTIONS, args) {
        Ok((options, operands)) => match interpret(options, operands) {
            Ok(mut command) => {
                match &mut command {
                    Command::SetVariables(sv) => {
                        sv.attrs.push((ReadOnly, On));
                        sv.scope = Global;
                    }
                    Command::PrintVariables(pv) => {
                        pv.attrs.push((ReadOnly, On));
                        pv.scope = Global;
                    }
                    Command::SetFunctions(sf) => unreachable!("{sf:?}"),
                    Command::PrintFunctions(pf) => unreachable!("{pf:?}"),
                }
                match command.execute(env, &PRINT_VARIABLES_CONTEXT) {
                    Ok(result) => output(env, &result).await,
                    Err(errors) => report_failure(env, to_message(&errors)).await,
                }
            }
            Err(error) => report_error(env, &error).await,
        },
        Err(error) => report_error(env, &error).await,
    }
}
