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

//! Parameter name

use std::num::IntErrorKind::PosOverflow;
use lusush_syntax::parser::lex::is_name_char;
use lusush_syntax::parser::lex::is_special_parameter_char;

/// Parameter name
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Name<'a> {
    /// Variable
    ///
    /// The name must be a non-empty alphanumeric string that may contain `_`
    /// but cannot start with a digit.
    Variable(&'a str),

    /// Special parameter
    ///
    /// The character must be one of `@*#?-$!0`.
    Special(char),

    /// Positional parameter
    ///
    /// Note that positional parameters count starting from 1.
    /// `Positional(0)`, which results from `"00"`, etc., should be regarded as
    /// a non-existing parameter.
    ///
    /// Positional parameters with a too large index are represented by
    /// `Positional(usize::MAX)`, which should also regarded as non-existing.
    Positional(usize),
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct InvalidName;

impl<'a> TryFrom<&'a str> for Name<'a> {
    type Error = InvalidName;

    fn try_from(s: &'a str) -> Result<Self, InvalidName> {
        let mut cs = s.chars();
        let first = cs.next().ok_or(InvalidName)?;
        if cs.next() == None && is_special_parameter_char(first) {
            return Ok(Name::Special(first));
        }

        if first.is_ascii_digit() {
            match s.parse() {
                Ok(index) => Ok(Name::Positional(index)),
                Err(e) => {
                    if e.kind() == &PosOverflow {
                        Ok(Name::Positional(usize::MAX))
                    } else {
                        Err(InvalidName)
                    }
                }
            }
        } else if s.chars().all(is_name_char) {
            Ok(Name::Variable(s))
        } else {
            Err(InvalidName)
        }
    }
}
