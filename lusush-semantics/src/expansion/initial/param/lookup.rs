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

//! Parameter lookup

use super::*;
use std::num::IntErrorKind;
use std::num::NonZeroUsize;
use lusush_env::variable::VariableSet;
use lusush_env::Env;

/// Result of parameter lookup
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lookup<'a> {
    Unset,
    Scalar(Cow<'a, str>),
    Array(Cow<'a, [String]>),
}

impl From<String> for Lookup<'static> {
    fn from(value: String) -> Self {
        Lookup::Scalar(Cow::Owned(value))
    }
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(value: &'a str) -> Self {
        Lookup::Scalar(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(value: &'a String) -> Self {
        Lookup::Scalar(Cow::Borrowed(value))
    }
}

impl From<Vec<String>> for Lookup<'static> {
    fn from(values: Vec<String>) -> Self {
        Lookup::Array(Cow::Owned(values))
    }
}

impl<'a> From<&'a [String]> for Lookup<'a> {
    fn from(values: &'a [String]) -> Self {
        Lookup::Array(Cow::Borrowed(values))
    }
}

impl<'a> From<&'a Vec<String>> for Lookup<'a> {
    fn from(values: &'a Vec<String>) -> Self {
        Lookup::Array(Cow::Borrowed(values))
    }
}

impl From<Value> for Lookup<'static> {
    fn from(value: Value) -> Self {
        match value {
            Value::Scalar(value) => Lookup::from(value),
            Value::Array(values) => Lookup::from(values),
        }
    }
}

impl<'a> From<&'a Value> for Lookup<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Scalar(value) => Lookup::from(value),
            Value::Array(values) => Lookup::from(values),
        }
    }
}

impl Lookup<'_> {
    /// Converts into an owned value
    pub fn into_owned(self) -> Option<Value> {
        match self {
            Lookup::Unset => None,
            Lookup::Scalar(value) => Some(Value::Scalar(value.into_owned())),
            Lookup::Array(values) => Some(Value::Array(values.into_owned())),
        }
    }
}

/// Looks up for a special parameter.
///
/// Returns `None` if the `name` does not name a special parameter.
///
/// This function requires a mutable reference to `Env` because it needs to
/// update an internal flag if `name` is `!`.
pub fn look_up_special_parameter<'a>(env: &'a mut Env, name: &str) -> Option<Lookup<'a>> {
    let mut chars = name.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match first {
        '@' => Some((&env.variables.positional_params().value).into()),
        '*' => todo!(),
        '#' => todo!(),
        '?' => Some(env.exit_status.to_string().into()),
        '-' => todo!(),
        '$' => Some(env.main_pid.to_string().into()),
        '!' => Some(env.jobs.expand_last_async_pid().to_string().into()),
        '0' => todo!(),
        _ => None,
    }
}

/// Looks up for a positional parameter or variable.
pub fn look_up_ordinary_parameter<'a>(vars: &'a VariableSet, name: &str) -> Lookup<'a> {
    look_up_positional_parameter(vars, name).unwrap_or_else(|| look_up_variable(vars, name))
}

/// Looks up for a positional parameter.
///
/// Returns `None` if the `name` is not a positive integer.
fn look_up_positional_parameter<'a>(vars: &'a VariableSet, name: &str) -> Option<Lookup<'a>> {
    let index = match name.parse::<NonZeroUsize>() {
        Ok(index) => index,
        Err(error) => {
            return match error.kind() {
                IntErrorKind::PosOverflow => Some(Lookup::Unset),
                _ => None,
            }
        }
    };
    let params = vars.positional_params();
    let index = index.get() - 1;
    match &params.value {
        Value::Scalar(_) => Some(Lookup::Unset),
        Value::Array(params) => match params.get(index) {
            Some(value) => Some(value.into()),
            None => Some(Lookup::Unset),
        },
    }
}

/// Looks up for a variable.
fn look_up_variable<'a>(vars: &'a VariableSet, name: &str) -> Lookup<'a> {
    match vars.get(name) {
        Some(var) => (&var.value).into(),
        None => Lookup::Unset,
    }
}
