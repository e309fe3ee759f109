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

//! Parameter expansion switch semantics

use super::Env;
use super::Error;
use super::Phrase;
use crate::expansion::attr::Origin;
use crate::expansion::attr_strip::Strip;
use crate::expansion::expand_word;
use crate::expansion::initial::expand;
use crate::expansion::ErrorCause;
use lusush_env::variable::Scope;
use lusush_env::variable::Value;
use lusush_env::variable::Variable;
use lusush_syntax::source::Location;
use lusush_syntax::syntax::Switch;
use lusush_syntax::syntax::SwitchCondition;
use lusush_syntax::syntax::SwitchType;
use lusush_syntax::syntax::Word;

/// Physical state of a [value](Value) that may be considered as "not set"
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ValueState {
    /// The variable is not set.
    Unset,
    /// The value is a scalar with no characters.
    EmptyScalar,
    /// The value is an array with no elements.
    ValuelessArray,
    /// The value is an array with one element containing no characters.
    EmptyValueArray,
}

impl ValueState {
    /// Computes the state of a value.
    ///
    /// Returns `None` if the value does not fall under any of the `ValueState`
    /// variants.
    #[must_use]
    pub fn of<'a, I: Into<Option<&'a Value>>>(value: I) -> Option<ValueState> {
        fn inner(value: Option<&Value>) -> Option<ValueState> {
            use ValueState::*;
            match value {
                None => Some(Unset),
                Some(Value::Scalar(scalar)) if scalar.is_empty() => Some(EmptyScalar),
                Some(Value::Array(array)) if array.is_empty() => Some(ValuelessArray),
                Some(Value::Array(array)) if array.len() == 1 && array[0].is_empty() => {
                    Some(EmptyValueArray)
                }
                Some(_) => None,
            }
        }
        inner(value.into())
    }

    pub fn description(&self) -> &'static str {
        use ValueState::*;
        match self {
            Unset => "unset variable",
            EmptyScalar => "empty string",
            ValuelessArray => "empty array",
            EmptyValueArray => "array with empty string",
        }
    }
}

impl std::fmt::Display for ValueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.description().fmt(f)
    }
}

/// Error caused by an error switch
///
/// `UnsetError` is an error that occurs when you apply a switch with
/// `SwitchCondition::Error` to an empty value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct EmptyError {
    /// State of the variable value that caused this error
    pub state: ValueState,
    /// Error message specified in the switch
    pub message: Option<String>,
}

impl EmptyError {
    /// Returns the message.
    ///
    /// If `self.message` is `Some(_)`, its content is returned. Otherwise, the
    /// default message is returned.
    #[must_use]
    pub fn message_or_default(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or("parameter expansion with empty value")
    }
}

impl std::fmt::Display for EmptyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.message_or_default(),
            self.state.description()
        )
    }
}

impl std::error::Error for EmptyError {}

/// Abstract state of a [value](Value) that determines the effect of a switch
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum ValueCondition {
    Set,
    Unset(ValueState),
}

impl ValueCondition {
    fn with<S: Into<Option<ValueState>>>(cond: SwitchCondition, state: S) -> Self {
        fn inner(cond: SwitchCondition, state: Option<ValueState>) -> ValueCondition {
            match (cond, state) {
                (_, None) => ValueCondition::Set,
                (SwitchCondition::UnsetOrEmpty, Some(state)) => ValueCondition::Unset(state),
                (_, Some(ValueState::Unset)) => ValueCondition::Unset(ValueState::Unset),
                (SwitchCondition::Unset, Some(ValueState::EmptyScalar)) => ValueCondition::Set,
                (SwitchCondition::Unset, Some(ValueState::ValuelessArray)) => ValueCondition::Set,
                (SwitchCondition::Unset, Some(ValueState::EmptyValueArray)) => ValueCondition::Set,
            }
        }
        inner(cond, state.into())
    }
}

/// Modifies the origin of characters in the phrase to `SoftExpansion`.
///
/// This function updates the result of [`expand`]. Since the switch modifier is
/// part of a parameter expansion, the substitution produced by the switch
/// should be regarded as originating from a parameter expansion.
fn attribute(mut phrase: Phrase) -> Phrase {
    phrase.for_each_char_mut(|c| match c.origin {
        Origin::Literal => c.origin = Origin::SoftExpansion,
        Origin::HardExpansion | Origin::SoftExpansion => (),
    });
    phrase
}

/// Assigns the expansion of `value` to variable `name`.
async fn assign(
    env: &mut Env<'_>,
    name: &str,
    value: &Word,
    location: &Location,
) -> Result<Phrase, Error> {
    let value_phrase = attribute(expand(env, value).await?);
    let variable_value = value_phrase.clone().ifs_join(&env.inner.variables);
    let variable = Variable::new(variable_value.into_iter().strip().collect::<String>())
        .set_assigned_location(location.clone());
    env.inner
        .variables
        .assign(Scope::Global, name.to_owned(), variable)
        .map_err(|e| Error {
            cause: ErrorCause::AssignReadOnly(e),
            location: location.clone(),
        })?;
    Ok(value_phrase)
}

/// Expands a word to be used as an empty expansion error message.
async fn empty_expansion_error_message(
    env: &mut Env<'_>,
    message_word: &Word,
) -> Result<Option<String>, Error> {
    if message_word.units.is_empty() {
        return Ok(None);
    }

    let (message_field, exit_status) = expand_word(env.inner, message_word).await?;
    if exit_status.is_some() {
        env.last_command_subst_exit_status = exit_status;
    }
    Ok(Some(message_field.value))
}

/// Constructs an empty expansion error.
async fn empty_expansion_error(
    env: &mut Env<'_>,
    state: ValueState,
    message_word: &Word,
    location: Location,
) -> Error {
    let message = match empty_expansion_error_message(env, message_word).await {
        Ok(message) => message,
        Err(error) => return error,
    };
    let cause = ErrorCause::EmptyExpansion(EmptyError { state, message });
    Error { cause, location }
}

/// Applies a switch.
///
/// If this function returns `Some(_)`, that should be the result of the whole
/// parameter expansion containing the switch. Otherwise, the parameter
/// expansion should continue processing other modifiers.
pub async fn apply(
    env: &mut Env<'_>,
    switch: &Switch,
    name: &str,
    value: &mut Option<Value>,
    location: &Location,
) -> Option<Result<Phrase, Error>> {
    use SwitchType::*;
    use ValueCondition::*;
    let cond = ValueCondition::with(switch.condition, ValueState::of(&*value));
    match (switch.r#type, cond) {
        (Alter, Unset(_)) | (Default, Set) | (Assign, Set) | (Error, Set) => None,
        (Alter, Set) | (Default, Unset(_)) => Some(expand(env, &switch.word).await.map(attribute)),
        (Assign, Unset(_)) => Some(assign(env, name, &switch.word, location).await),
        (Error, Unset(state)) => Some(Err(empty_expansion_error(
            env,
            state,
            &switch.word,
            location.clone(),
        )
        .await)),
    }
}
