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

//! Initial expansion of words and word units.

use super::super::Error;
use super::super::attr::AttrChar;
use super::super::attr::Origin;
use super::Env;
use super::Expand;
use super::Phrase;
use crate::Runtime;
use lusush_syntax::syntax::Unquote as _;
use lusush_syntax::syntax::Word;
use lusush_syntax::syntax::WordUnit::{self, *};

const SINGLE_QUOTE: AttrChar = AttrChar {
    value: '\'',
    origin: Origin::Literal,
    is_quoted: false,
    is_quoting: true,
};

/// Adds single quotes around the string.
fn single_quote(value: &str) -> Phrase {
    let mut field = Vec::with_capacity(value.chars().count() + 2);
    field.push(SINGLE_QUOTE);
    field.extend(value.chars().map(|c| AttrChar {
        value: c,
        origin: Origin::Literal,
        is_quoted: true,
        is_quoting: false,
    }));
    field.push(SINGLE_QUOTE);
    Phrase::Field(field)
}

/// Adds dollar-single-quotes around the string.
fn dollar_single_quote(s: &str) -> Phrase {
    const DOLLAR: AttrChar = AttrChar {
        value: '$',
        origin: Origin::Literal,
        is_quoted: false,
        is_quoting: true,
    };
    let mut field = Vec::with_capacity(s.chars().count() + 3);
    field.push(DOLLAR);
    field.push(SINGLE_QUOTE);
    field.extend(s.chars().map(|c| AttrChar {
        value: c,
        origin: Origin::Literal,
        is_quoted: true,
        is_quoting: false,
    }));
    field.push(SINGLE_QUOTE);
    Phrase::Field(field)
}

/// Add double quotes around each field in the phrase.
///
/// This function sets the `is_quoted` flag of the characters in the phrase.
fn double_quote(phrase: &mut Phrase) {
    const QUOTE: AttrChar = AttrChar {
        value: '"',
        origin: Origin::Literal,
        is_quoted: false,
        is_quoting: true,
    };

    fn quote_field(chars: &mut Vec<AttrChar>) {
        for c in chars.iter_mut() {
            c.is_quoted = true;
        }
        chars.reserve_exact(2);
        chars.insert(0, QUOTE);
        chars.push(QUOTE);
    }

    match phrase {
        Phrase::Char(c) => {
            let is_quoted = true;
            let c = AttrChar { is_quoted, ..*c };
            *phrase = Phrase::Field(vec![QUOTE, c, QUOTE]);
        }
        Phrase::Field(chars) => quote_field(chars),
        Phrase::Full(fields) => fields.iter_mut().for_each(quote_field),
    }
}

/// Expands the word unit.
///
/// # Unquoted
///
/// Expansion of `Unquoted(text_unit)` delegates to expansion of `text_unit`.
///
/// # Single quote
///
/// `SingleQuote(value)` expands to `value` surrounded by `'`.
///
/// # Double quote
///
/// A double-quoted text expands to a phrase in a non-splitting context and
/// surrounds each field in the phrase with `"`.
///
/// # Dollar-single-quote
///
/// `DollarSingleQuote(string)` expands to
/// `dollar_single_quote(&string.unquote().0)` surrounded by `$'` and `'`.
///
/// # Tilde
///
/// `Tilde("")` expands to the value of the `HOME` scalar variable.
///
/// `Tilde(user)` expands to the `user`'s home directory.
///
/// TODO: `~+`, `~-`, `~+n`, `~-n`
///
/// In all cases, if the result would be empty, it expands to a dummy quote to
/// prevent it from being removed in field splitting. The quote is expected to
/// be removed by quote removal.
impl<S: Runtime + 'static> Expand<S> for WordUnit {
    async fn expand(&self, env: &mut Env<'_, S>) -> Result<Phrase, Error> {
        match self {
            Unquoted(text_unit) => text_unit.expand(env).await,
            SingleQuote(value) => Ok(single_quote(value)),
            DoubleQuote(text) => {
                let would_split = std::mem::replace(&mut env.will_split, false);
                let result = text.expand(env).await;
                env.will_split = would_split;

                let mut phrase = result?;
                double_quote(&mut phrase);
                Ok(phrase)
            }
            DollarSingleQuote(string) => Ok(dollar_single_quote(&string.unquote().0)),
            Tilde {
                name,
                followed_by_slash,
            } => Ok(super::tilde::expand(name, *followed_by_slash, env.inner).into()),
        }
    }
}

/// Expands a word.
///
/// This implementation delegates to `[WordUnit] as Expand`.
impl<S: Runtime + 'static> Expand<S> for Word {
    #[inline]
    async fn expand(&self, env: &mut Env<'_, S>) -> Result<Phrase, Error> {
        self.units.expand(env).await
    }
}
