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

//! Command-line argument parser
//!
//! This module provides functionalities for parsing command-line arguments into
//! options and operands.
//!
//! This module's parser can parse command lines that adhere to POSIX Utility
//! Syntax Guidelines and support non-standard syntax extensions such as long
//! options and options after operands.
//!
//! # Example
//!
//! TODO

#[doc(no_inline)]
pub use lusush_env::semantics::Field;

/// Specification of an option
///
/// This structure may contain the following properties:
///
/// - Short option name (a single character)
/// - Long option name (a string)
/// - Whether this option takes an argument
///
/// All of these are optional, but either or both of the short and long names
/// should be set for the option spec to have meaningful effect.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OptionSpec {
    short: Option<char>,
}

impl OptionSpec {
    /// Creates a new empty option spec.
    pub const fn new() -> Self {
        OptionSpec { short: None }
    }

    /// Returns the short option name.
    pub const fn get_short(&self) -> Option<char> {
        self.short
    }

    /// Gives a short name for this option.
    pub fn set_short(&mut self, name: char) {
        self.short = Some(name);
    }

    /// Chained version of [`set_short`](Self::set_short)
    pub const fn short(mut self, name: char) -> Self {
        self.short = Some(name);
        self
    }
}

/// TODO
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq)]
pub struct Mode {}

/// Occurrence of an option
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionOccurrence<'a> {
    /// Specification for this option.
    pub spec: &'a OptionSpec,
}

/// TODO
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {}

/// TODO impl std::error::Error for Error

/// Parses short options in an argument.
///
/// Returns true iff one or more options were found.
fn parse_short_options<'a>(
    option_specs: &'a [OptionSpec],
    argument: &Field,
    option_occurrences: &mut Vec<OptionOccurrence<'a>>,
) -> bool {
    let mut i = argument.value.chars();
    if i.next() != Some('-') {
        return false;
    }

    for c in i {
        if let Some(spec) = option_specs.iter().find(|spec| spec.get_short() == Some(c)) {
            option_occurrences.push(OptionOccurrence { spec });
        }
    }
    // TODO Return false if no options were found
    true
}

/// Parses command-line arguments into options and operands.
///
/// The first argument is always dropped and the remaining arguments are parsed.
///
/// If successful, returns a pair of option occurrences and operands.
pub fn parse_arguments(
    option_specs: &[OptionSpec],
    _mode: Mode,
    mut arguments: Vec<Field>,
) -> Result<(Vec<OptionOccurrence<'_>>, Vec<Field>), Error> {
    if !arguments.is_empty() {
        arguments.remove(0);
    }
    if let Some(argument) = arguments.first() {
        if argument.value == "--" {
            arguments.remove(0);
        }
    }

    let mut option_occurrences = vec![];
    while let Some(argument) = arguments.first() {
        if parse_short_options(option_specs, argument, &mut option_occurrences) {
            arguments.remove(0);
        } else {
            break;
        }
    }
    Ok((option_occurrences, arguments))
}
