// This file is part of lusush, a POSIX-compliant command shell.
// Copyright (C) 2024 The Lusush Contributors
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

//! Setting resource limits

use super::{Error, ResourceExt as _, SetLimitType, SetLimitValue};
use std::io::ErrorKind;
use lusush_env::system::resource::{LimitPair, Resource, RLIM_INFINITY};
use lusush_env::System;

/// Environment for setting resource limits
///
/// This trait is a subset of [`System`] that is used for
/// setting resource limits.
pub trait Env {
    /// See [`System::getrlimit`]
    fn getrlimit(&self, resource: Resource) -> Result<LimitPair, std::io::Error>;
    /// See [`System::setrlimit`]
    fn setrlimit(&mut self, resource: Resource, limits: LimitPair) -> Result<(), std::io::Error>;
}

impl<T: System> Env for T {
    #[inline(always)]
    fn getrlimit(&self, resource: Resource) -> Result<LimitPair, std::io::Error> {
        System::getrlimit(self, resource)
    }

    #[inline(always)]
    fn setrlimit(&mut self, resource: Resource, limits: LimitPair) -> Result<(), std::io::Error> {
        System::setrlimit(self, resource, limits)
    }
}

/// Sets the limit for a specific resource.
pub fn set<E: Env>(
    env: &mut E,
    resource: Resource,
    limit_type: SetLimitType,
    new_limit: SetLimitValue,
) -> Result<(), super::Error> {
    let old_limits = env.getrlimit(resource).map_err(|e| {
        if e.kind() == ErrorKind::InvalidInput {
            Error::UnsupportedResource
        } else {
            Error::Unknown(e)
        }
    })?;

    let new_limit = match new_limit {
        SetLimitValue::Number(limit) => limit
            .checked_mul(resource.scale())
            .filter(|limit| *limit != RLIM_INFINITY)
            .ok_or(Error::Overflow)?,
        SetLimitValue::Unlimited => RLIM_INFINITY,
        SetLimitValue::CurrentSoft => old_limits.soft,
        SetLimitValue::CurrentHard => old_limits.hard,
    };

    let new_limits = match limit_type {
        SetLimitType::Soft => LimitPair {
            soft: new_limit,
            hard: old_limits.hard,
        },
        SetLimitType::Hard => LimitPair {
            soft: old_limits.soft,
            hard: new_limit,
        },
        SetLimitType::Both => LimitPair {
            soft: new_limit,
            hard: new_limit,
        },
    };

    if new_limits.soft_exceeds_hard() {
        return Err(Error::SoftLimitExceedsHardLimit);
    }

    match env.setrlimit(resource, new_limits) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(Error::NoPermissionToRaiseHardLimit)
        }
        Err(e) => Err(Error::Unknown(e)),
    }
}
