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
use lusush_env::variable::Value;

impl From<Scope> for lusush_env::variable::Scope {
    fn from(value: Scope) -> Self {
        match value {
            Scope::Local => Self::Local,
            Scope::Global => Self::Global,
        }
    }
}

impl SetVariables {
    /// Executes the command.
    pub fn execute<S>(self, env: &mut Env<S>) -> Result<String, Vec<ExecuteError>> {
        let mut errors = Vec::new();

        'field: for mut field in self.variables {
            // Split the field into the name and the value.
            let mut value_to_assign = None;
            if let Some((name, value)) = field.value.split_once('=') {
                value_to_assign = Some(Value::scalar(value));

                // Modify the field value so that it contains only the name.
                field.value.truncate(name.len());
            }

            let mut variable = env.get_or_create_variable(&field.value, self.scope.into());

            // Assign the value to the variable.
            if let Some(value) = value_to_assign {
                if let Err(error) = variable.assign(value, field.origin.clone()) {
                    errors.push(ExecuteError::AssignReadOnlyVariable(AssignReadOnlyError {
                        name: field.value,
                        new_value: error.new_value,
                        assigned_location: error.assigned_location.unwrap(),
                        read_only_location: error.read_only_location,
                    }));
                    continue;
                }
            }

            // Apply the attributes to the variable.
            for &(attr, state) in &self.attrs {
                match (attr, state) {
                    (VariableAttr::ReadOnly, State::On) => {
                        variable.make_read_only(field.origin.clone())
                    }
                    (VariableAttr::ReadOnly, State::Off) => {
                        if let Some(read_only_location) = variable.read_only_location.clone() {
                            errors.push(ExecuteError::UndoReadOnlyVariable(UndoReadOnlyError {
                                name: field,
                                read_only_location,
                            }));
                            continue 'field;
                        }
                    }
                    (VariableAttr::Export, State::On) => variable.export(true),
                    (VariableAttr::Export, State::Off) => variable.export(false),
                }
            }
        }

        if errors.is_empty() {
            Ok(String::new())
        } else {
            Err(errors)
        }
    }
}
