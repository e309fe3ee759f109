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

//! Extracting ranges of split fields

use super::super::attr::AttrChar;
use super::ifs::Class::*;
use super::ifs::Ifs;
use std::iter::FusedIterator;
use std::ops::Range;

/// State of a field-splitting iterator
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
enum State {
    Midfield {
        start_index: usize,
    },

    AfterIfsWhitespace,

    #[default]
    AfterIfsNonWhitespace,
}

use State::*;

/// Iterator that yields index ranges of separated fields
///
/// This iterator can be created with [`Ifs::ranges`] and is used by
/// [`split_into`](super::split_into).
#[derive(Clone, Debug)]
pub struct Ranges<'a, I: Iterator<Item = AttrChar>> {
    inner: I,
    next_index: usize,
    ifs: &'a Ifs<'a>,
    state: Option<State>,
}

impl<'a> Ifs<'a> {
    /// Creates a field-splitting iterator.
    pub fn ranges<I>(&'a self, field_chars: I) -> Ranges<'a, I::IntoIter>
    where
        I: IntoIterator<Item = AttrChar>,
    {
        Ranges {
            inner: field_chars.into_iter(),
            next_index: 0,
            ifs: self,
            state: Some(State::default()),
        }
    }
}

impl<I> Iterator for Ranges<'_, I>
where
    I: Iterator<Item = AttrChar>,
{
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        while let Some(state) = self.state {
            let index = self.next_index;
            let class = self.inner.next().map(|c| self.ifs.classify_attr(c));
            self.next_index += 1;

            let (next_state, field_range) = match (state, class) {
                (Midfield { start_index }, Some(IfsNonWhitespace) | None) => {
                    (Some(AfterIfsNonWhitespace), Some(start_index..index))
                }
                (Midfield { start_index }, Some(IfsWhitespace)) => {
                    (Some(AfterIfsWhitespace), Some(start_index..index))
                }
                (Midfield { .. }, Some(NonIfs)) => (Some(state), None),
                (AfterIfsWhitespace, Some(IfsNonWhitespace)) => (Some(AfterIfsNonWhitespace), None),
                (AfterIfsNonWhitespace, Some(IfsNonWhitespace)) => {
                    (Some(state), Some(index..index))
                }
                (_, Some(NonIfs)) => (Some(Midfield { start_index: index }), None),
                (_, Some(IfsWhitespace)) => (Some(state), None),
                (_, None) => (None, None),
            };

            self.state = next_state;
            if field_range.is_some() {
                return field_range;
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, mut upper_bound) = self.inner.size_hint();

        if self.ifs.chars().is_empty() {
            // No splitting performed. The result will be no more than one field.
            if upper_bound != Some(0) {
                upper_bound = Some(1);
            }
        } else if self.ifs.non_whitespaces().is_empty() {
            // All separators are whitespace. An alternating sequence of
            // separators and non-separators will produce the most fields.
            if let Some(ref mut upper_bound) = upper_bound {
                // We can't do this because of possible overflow:
                // *upper_bound = (*upper_bound + 1) / 2;
                if *upper_bound > 0 {
                    *upper_bound = (*upper_bound - 1) / 2 + 1;
                }
            }
        } else {
            // The field may contain non-whitespace separators. When all the
            // input characters are separators, there will be as many fields as
            // the separators.
            // TODO When the last-empty-field option applies, there may be one more field.
            // upper_bound = upper_bound.and_then(|ub| ub.checked_add(1));
        }

        (0, upper_bound)
    }
}

impl<I> FusedIterator for Ranges<'_, I> where I: Iterator<Item = AttrChar> {}
