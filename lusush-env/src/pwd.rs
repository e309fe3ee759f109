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

//! Working directory path handling

use super::Env;
use crate::path::Path;
use crate::system::Errno;
use crate::system::AT_FDCWD;
use crate::variable::AssignError;
use crate::variable::Scope::Global;
use crate::variable::PWD;
use crate::System;
use std::ffi::CString;
use thiserror::Error;

/// Tests whether a path contains a dot (`.`) or dot-dot (`..`) component.
fn has_dot_or_dot_dot(path: &str) -> bool {
    path.split('/').any(|c| c == "." || c == "..")
}

/// Error in [`Env::prepare_pwd`]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PreparePwdError {
    /// Error assigning to the `$PWD` variable
    #[error(transparent)]
    AssignError(#[from] AssignError),

    /// Error obtaining the current working directory path
    #[error("cannot obtain the current working directory path: {0}")]
    GetCwdError(#[from] Errno),
}

impl Env {
    /// Returns the value of the `$PWD` variable if it is correct.
    ///
    /// The variable is correct if:
    ///
    /// - it is a scalar variable,
    /// - its value is a pathname of the current working directory (possibly
    ///   including symbolic link components), and
    /// - there is no dot (`.`) or dot-dot (`..`) component in the pathname.
    #[must_use]
    pub fn get_pwd_if_correct(&self) -> Option<&str> {
        self.variables.get_scalar(PWD).filter(|pwd| {
            if !Path::new(pwd).is_absolute() {
                return false;
            }
            if has_dot_or_dot_dot(pwd) {
                return false;
            }
            let Ok(cstr_pwd) = CString::new(pwd.as_bytes()) else {
                return false;
            };
            let Ok(s1) = self.system.fstatat(AT_FDCWD, &cstr_pwd, true) else {
                return false;
            };
            let Ok(s2) = self.system.fstatat(AT_FDCWD, c".", true) else {
                return false;
            };
            s1.identity() == s2.identity()
        })
    }

    /// Tests if the `$PWD` variable is correct.
    #[inline]
    #[must_use]
    fn has_correct_pwd(&self) -> bool {
        self.get_pwd_if_correct().is_some()
    }

    /// Updates the `$PWD` variable with the current working directory.
    ///
    /// If the value of `$PWD` is [correct](Self::get_pwd_if_correct), this
    /// function does not modify it. Otherwise, this function sets the value to
    /// `self.system.getcwd()`.
    ///
    /// This function is meant for initializing the `$PWD` variable when the
    /// shell starts.
    pub fn prepare_pwd(&mut self) -> Result<(), PreparePwdError> {
        if !self.has_correct_pwd() {
            let dir = self
                .system
                .getcwd()?
                .into_unix_string()
                .into_string()
                .map_err(|_| Errno::EILSEQ)?;
            let mut var = self.variables.get_or_new(PWD, Global);
            var.assign(dir, None)?;
            var.export(true);
        }
        Ok(())
    }
}
