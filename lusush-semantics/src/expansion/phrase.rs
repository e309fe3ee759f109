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

//! Array of fields as an intermediate expansion result
//!
//! This module defines [`Phrase`], a data type for holding intermediate
//! expansion results. A phrase is an array of (optional, possibly zero) fields,
//! and a field is a string of attributed characters ([`AttrChar`]).
//!
//! The most general form of a phrase is represented by `Vec<Vec<AttrChar>>`.
//! However, many expansion results in a phrase of only one field. The `Phrase`
//! type can represent a single-field phrase by only holding a `Vec<AttrChar>`
//! or `AttrChar` instance to reduce memory allocation overheads.
//!
//! You can join two or more phrases into a single by using the
//! [`append`](Phrase::append) method and the `+` and `+=` operators. Phrase
//! concatenation is not the same as appending a `Vec<Vec<AttrChar>>` to
//! another. When phrases are joined, the last field of the first phrase and the
//! first field of the second phrase are concatenated while other fields remain
//! intact.

use crate::expansion::attr::AttrChar;
use crate::expansion::attr::Origin;
use std::iter::FusedIterator;
use std::ops::Add;
use std::ops::AddAssign;
use lusush_env::variable::Value;
use lusush_env::variable::VariableSet;

/// Array of fields with optimized data structure
///
/// See the [module documentation](self).
#[derive(Clone, Debug, Eq)]
pub enum Phrase {
    /// Phrase having one field containing one character
    ///
    /// `Phrase::Char(c)` is equivalent to `Phrase::Field(vec![c])`, which in
    /// turn equals `Phrase::Full(vec![vec![c]])`.
    Char(AttrChar),
    /// Phrase made up of one field
    ///
    /// `Phrase::Field(chars)` is equivalent to `Phrase::Full(vec![chars])`.
    Field(Vec<AttrChar>),
    /// Phrase containing any number of fields
    Full(Vec<Vec<AttrChar>>),
}

use Phrase::*;

impl PartialEq for Phrase {
    #[must_use]
    fn eq(&self, other: &Phrase) -> bool {
        match (self, other) {
            (Char(left), Char(right)) => left == right,
            (Field(left), Field(right)) => left == right,
            (Full(left), Full(right)) => left == right,
            (Char(c), Field(f)) | (Field(f), Char(c)) => [*c].as_slice() == f.as_slice(),
            (Char(c), Full(v)) | (Full(v), Char(c)) => {
                matches!(v.as_slice(), [f] if [*c].as_slice() == f.as_slice())
            }
            (Field(f), Full(v)) | (Full(v), Field(f)) => {
                matches!(v.as_slice(), [fv] if f == fv)
            }
        }
    }
}

impl Phrase {
    /// Returns a phrase containing no fields.
    ///
    /// This function requires no heap allocation.
    #[inline]
    #[must_use]
    pub fn zero_fields() -> Self {
        Full(Vec::new())
    }

    /// Returns a phrase containing one empty field.
    ///
    /// This function requires no heap allocation.
    #[inline]
    #[must_use]
    pub fn one_empty_field() -> Self {
        Field(Vec::new())
    }

    /// Tests whether the phrase has no fields.
    #[must_use]
    pub fn is_zero_fields(&self) -> bool {
        matches!(self, Full(fields) if fields.is_empty())
    }

    /// Returns the number of fields in the phrase.
    #[must_use]
    pub fn field_count(&self) -> usize {
        match self {
            Char(_) | Field(_) => 1,
            Full(fields) => fields.len(),
        }
    }

    /// Moves all fields of `other` into `self`, leaving `other` empty.
    ///
    /// This function joins two phrases into one. It concatenates the last field
    /// of `self` and the first field of `other`. Other fields are left intact
    /// in the new phrase.
    ///
    /// ```
    /// # use lusush_semantics::expansion::{attr::{AttrChar, Origin}, phrase::Phrase};
    /// # let a = AttrChar {
    /// #     value: 'a',
    /// #     origin: Origin::Literal,
    /// #     is_quoted: false,
    /// #     is_quoting: false,
    /// # };
    /// # let b = AttrChar { value: 'b', ..a };
    /// # let c = AttrChar { value: 'c', ..a };
    /// # let d = AttrChar { value: 'd', ..a };
    /// # let e = AttrChar { value: 'e', ..a };
    /// # let f = AttrChar { value: 'f', ..a };
    /// let mut left = Phrase::Full(vec![vec![a], vec![b], vec![c]]);
    /// let mut right = Phrase::Full(vec![vec![d], vec![e], vec![f]]);
    /// left.append(&mut right);
    /// assert_eq!(
    ///     left,
    ///     Phrase::Full(vec![vec![a], vec![b], vec![c, d], vec![e], vec![f]])
    /// );
    /// assert!(right.is_zero_fields());
    /// ```
    ///
    /// That implies joining two single-field phrases results in another
    /// single-field phrase.
    ///
    /// ```
    /// # use lusush_semantics::expansion::{attr::{AttrChar, Origin}, phrase::Phrase};
    /// # let a = AttrChar {
    /// #     value: 'a',
    /// #     origin: Origin::Literal,
    /// #     is_quoted: false,
    /// #     is_quoting: false,
    /// # };
    /// # let b = AttrChar { value: 'b', ..a };
    /// # let c = AttrChar { value: 'c', ..a };
    /// # let d = AttrChar { value: 'd', ..a };
    /// # let e = AttrChar { value: 'e', ..a };
    /// # let f = AttrChar { value: 'f', ..a };
    /// let mut left = Phrase::Field(vec![a, b, c]);
    /// let mut right = Phrase::Field(vec![d, e, f]);
    /// left.append(&mut right);
    /// assert_eq!(left, Phrase::Field(vec![a, b, c, d, e, f]));
    /// assert!(right.is_zero_fields());
    /// ```
    ///
    /// ```
    /// # use lusush_semantics::expansion::{attr::{AttrChar, Origin}, phrase::Phrase};
    /// # let a = AttrChar {
    /// #     value: 'a',
    /// #     origin: Origin::Literal,
    /// #     is_quoted: false,
    /// #     is_quoting: false,
    /// # };
    /// # let b = AttrChar { value: 'b', ..a };
    /// let mut left = Phrase::Char(a);
    /// let mut right = Phrase::Char(b);
    /// left.append(&mut right);
    /// assert_eq!(left, Phrase::Field(vec![a, b]));
    /// assert!(right.is_zero_fields());
    /// ```
    ///
    /// ```
    /// # use lusush_semantics::expansion::phrase::Phrase;
    /// let mut left = Phrase::one_empty_field();
    /// let mut right = Phrase::one_empty_field();
    /// left.append(&mut right);
    /// assert_eq!(left, Phrase::one_empty_field());
    /// assert_eq!(right, Phrase::zero_fields());
    /// ```
    ///
    /// If either phrase is zero fields, the result is the other.
    pub fn append(&mut self, other: &mut Phrase) {
        match (&mut *self, &mut *other) {
            (Char(left), Char(right)) => {
                *self = Field(vec![*left, *right]);
                *other = Phrase::zero_fields();
            }
            (Char(left), Field(right)) => {
                right.insert(0, *left);
                *self = std::mem::replace(other, Phrase::zero_fields());
            }
            (Field(left), Char(right)) => {
                left.push(*right);
                *other = Phrase::zero_fields();
            }
            (Field(left), Field(right)) => {
                left.append(right);
                *other = Phrase::zero_fields();
            }
            (left, Full(right)) => {
                if let Some(right_first) = right.first_mut() {
                    match left {
                        Char(left) => {
                            right_first.insert(0, *left);
                            *self = std::mem::replace(other, Phrase::zero_fields());
                        }
                        Field(left) => {
                            left.append(right_first);
                            std::mem::swap(left, right_first);
                            *self = std::mem::replace(other, Phrase::zero_fields());
                        }
                        Full(left) => {
                            if let Some(left_last) = left.last_mut() {
                                left_last.append(right_first);
                                left.extend(right.drain(1..));
                                right.clear();
                            } else {
                                std::mem::swap(left, right);
                            }
                        }
                    }
                } else {
                    // Nothing to do
                }
            }
            (Full(left), right) => {
                if let Some(left_last) = left.last_mut() {
                    match right {
                        Char(right) => left_last.push(*right),
                        Field(right) => left_last.append(right),
                        Full(_right) => unreachable!(),
                    }
                    *other = Phrase::zero_fields();
                } else {
                    std::mem::swap(self, other);
                }
            }
        }
    }

    /// Joins this phrase into a single field, separated by the first IFS character.
    ///
    /// This function joins `self` into a single field, separating each original
    /// field by the first character of variable `IFS`. If the variable is not
    /// set, fields are separated by a space. If the variable is set but has an
    /// empty value, fields are joined without separation.
    pub fn ifs_join(self, vars: &VariableSet) -> Vec<AttrChar> {
        match self {
            Char(c) => vec![c],
            Field(field) => field,
            Full(mut fields) => match fields.len() {
                0 => vec![],
                1 => fields.swap_remove(0),
                _ => {
                    let separator = match vars.get("IFS").and_then(|v| v.value.as_ref()) {
                        Some(Value::Scalar(value)) => value.chars().next(),
                        Some(Value::Array(values)) => {
                            values.first().and_then(|value| value.chars().next())
                        }
                        None => Some(' '),
                    }
                    .map(|c| AttrChar {
                        value: c,
                        origin: Origin::SoftExpansion,
                        is_quoted: false,
                        is_quoting: false,
                    });

                    let mut i = fields.into_iter();
                    let mut result = i.next().unwrap();
                    result.reserve_exact(
                        i.as_slice().iter().map(|field| field.len()).sum::<usize>()
                            + i.as_slice().len(),
                    );
                    for field in i {
                        if let Some(separator) = separator {
                            result.push(separator);
                        }
                        result.extend(field);
                    }
                    result
                }
            },
        }
    }

    /// Applies a function to every character in the phrase.
    pub fn for_each_char_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut AttrChar),
    {
        match self {
            Char(c) => f(c),
            Field(field) => field.iter_mut().for_each(f),
            Full(fields) => fields.iter_mut().flatten().for_each(f),
        }
    }
}

impl From<AttrChar> for Phrase {
    #[inline]
    #[must_use]
    fn from(c: AttrChar) -> Self {
        Char(c)
    }
}

impl From<Vec<AttrChar>> for Phrase {
    #[inline]
    #[must_use]
    fn from(chars: Vec<AttrChar>) -> Self {
        Field(chars)
    }
}

impl From<Vec<Vec<AttrChar>>> for Phrase {
    #[inline]
    #[must_use]
    fn from(fields: Vec<Vec<AttrChar>>) -> Self {
        Full(fields)
    }
}

impl From<Phrase> for Vec<Vec<AttrChar>> {
    #[must_use]
    fn from(phrase: Phrase) -> Self {
        match phrase {
            Char(c) => vec![vec![c]],
            Field(f) => vec![f],
            Full(v) => v,
        }
    }
}

/// Private implementation detail of [`IntoIter`]
#[derive(Clone, Debug)]
enum IntoIterState {
    None,
    Char(AttrChar),
    Field(Vec<AttrChar>),
    Full(std::vec::IntoIter<Vec<AttrChar>>),
}

/// Iterator of fields
///
/// You can turn a [`Phrase`] into an iterator by
/// [`into_iter`](Phrase::into_iter).
#[derive(Clone, Debug)]
pub struct IntoIter(IntoIterState);

impl Iterator for IntoIter {
    type Item = Vec<AttrChar>;
    fn next(&mut self) -> Option<Vec<AttrChar>> {
        match &mut self.0 {
            IntoIterState::None => None,
            IntoIterState::Char(c) => {
                let f = vec![*c];
                self.0 = IntoIterState::None;
                Some(f)
            }
            IntoIterState::Field(f) => {
                let f = std::mem::take(f);
                self.0 = IntoIterState::None;
                Some(f)
            }
            IntoIterState::Full(i) => i.next(),
        }
    }

    #[must_use]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            IntoIterState::None => (0, Some(0)),
            IntoIterState::Char(_) | IntoIterState::Field(_) => (1, Some(1)),
            IntoIterState::Full(i) => i.size_hint(),
        }
    }

    #[inline]
    #[must_use]
    fn count(self) -> usize {
        self.len()
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Vec<AttrChar>> {
        match &mut self.0 {
            IntoIterState::None => None,
            IntoIterState::Char(c) => {
                let f = vec![*c];
                self.0 = IntoIterState::None;
                Some(f)
            }
            IntoIterState::Field(f) => {
                let f = std::mem::take(f);
                self.0 = IntoIterState::None;
                Some(f)
            }
            IntoIterState::Full(i) => i.next_back(),
        }
    }
}

impl ExactSizeIterator for IntoIter {}

impl FusedIterator for IntoIter {}

impl IntoIterator for Phrase {
    type Item = Vec<AttrChar>;
    type IntoIter = IntoIter;
    #[must_use]
    fn into_iter(self) -> IntoIter {
        IntoIter(match self {
            Char(c) => IntoIterState::Char(c),
            Field(f) => IntoIterState::Field(f),
            Full(f) => IntoIterState::Full(f.into_iter()),
        })
    }
}

// We do not implement FromIterator or Extend for Phrase because their behavior
// would be confusing compared with that of AddAssign and Add.
// You should directly manipulate Vec<Vec<AttrChar>>.

/// See [`Phrase::append`].
impl AddAssign for Phrase {
    fn add_assign(&mut self, mut other: Phrase) {
        self.append(&mut other)
    }
}

/// See [`Phrase::append`].
impl Add for Phrase {
    type Output = Phrase;
    #[inline]
    #[must_use]
    fn add(mut self, other: Phrase) -> Self {
        self.add_assign(other);
        self
    }
}

// We do not implement std::iter::Sum for Phrase because it is not obvious
// what the sum of an empty iterator should be.
