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

use super::*;
use std::fmt::Write;
use lusush_env::variable::{Value, VariableSet};

impl PrintVariables {
    /// Executes the command.
    pub fn execute(
        self,
        variables: &VariableSet,
        context: &PrintContext,
    ) -> Result<String, Vec<ExecuteError>> {
        let mut output = String::new();
        let mut errors = Vec::new();

        if self.variables.is_empty() {
            let mut variables = variables.iter(self.scope.into()).collect::<Vec<_>>();
            // TODO Honor the collation order in the locale.
            variables.sort_unstable_by_key(|&(name, _)| name);
            for (name, var) in variables {
                print_one(name, var, &self.attrs, context, &mut output);
            }
        } else {
            for name in self.variables {
                match variables.get_scoped(&name.value, self.scope.into()) {
                    Some(var) => print_one(&name.value, var, &self.attrs, context, &mut output),
                    None => errors.push(ExecuteError::PrintUnsetVariable(name)),
                }
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }
}

/// Formats a variable for printing.
fn print_one(
    name: &str,
    var: &Variable,
    filter_attrs: &[(VariableAttr, State)],
    context: &PrintContext,
    output: &mut String,
) {
    // Skip if the variable name contains `=`.
    // Such variables should not be printed since the output would be
    // re-interpreted as a variable with a different name.
    if name.contains('=') {
        return;
    }

    // Skip if the variable does not match the filter.
    if filter_attrs
        .iter()
        .any(|&(attr, state)| attr.test(var) != state)
    {
        return;
    }

    // Do the formatting.
    let options = AttributeOption {
        var,
        options_allowed: context.options_allowed,
    };
    let quoted_name = lusush_quote::quoted(name);
    match &var.value {
        Some(value @ Value::Scalar(_)) => writeln!(
            output,
            "{} {}{}={}",
            context.builtin_name,
            options,
            quoted_name,
            value.quote()
        )
        .unwrap(),

        Some(value @ Value::Array(_)) => {
            writeln!(output, "{}={}", quoted_name, value.quote()).unwrap();

            let options = options.to_string();
            if !options.is_empty() || context.builtin_is_significant {
                writeln!(
                    output,
                    "{} {}{}",
                    context.builtin_name, options, quoted_name
                )
                .unwrap();
            }
        }

        None => writeln!(
            output,
            "{} {}{}",
            context.builtin_name, options, quoted_name
        )
        .unwrap(),
    }
}

/// `Display` implementor for printing command line options that reproduce the
/// variable attributes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct AttributeOption<'a> {
    /// Variable to be printed
    var: &'a Variable,
    /// Options that are printed if they are set
    options_allowed: &'a [OptionSpec<'a>],
}

impl std::fmt::Display for AttributeOption<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for option in self.options_allowed {
            if let Some(attr) = option.attr {
                if let Ok(attr) = VariableAttr::try_from(attr) {
                    if attr.test(self.var).into() {
                        write!(f, "-{} ", option.short)?;
                    }
                }
            }
        }
        Ok(())
    }
}
