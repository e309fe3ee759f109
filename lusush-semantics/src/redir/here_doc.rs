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

//! Here-documents

use super::Error;
use super::ErrorCause;
use super::FdSpec;
use crate::expansion::expand_text;
use std::path::Path;
use lusush_env::io::Fd;
use lusush_env::semantics::ExitStatus;
use lusush_env::system::Errno;
use lusush_env::Env;
use lusush_env::System;
use lusush_syntax::source::Location;
use lusush_syntax::syntax::HereDoc;

async fn fill_content(env: &mut Env, fd: Fd, content: &str) -> Result<(), Errno> {
    env.system.write_all(fd, content.as_bytes()).await?;
    env.system.lseek(fd, std::io::SeekFrom::Start(0))?;
    Ok(())
}

/// Opens a here-document.
///
/// This function writes the here-document content to an anonymous temporary
/// file and returns a file descriptor to the file you can read the content
/// from.
pub(super) async fn open_fd(env: &mut Env, content: String) -> Result<Fd, ErrorCause> {
    // TODO Use a pipe for short content
    let fd = match env.system.open_tmpfile(Path::new("/tmp")) {
        Ok(fd) => fd,
        Err(errno) => return Err(ErrorCause::TemporaryFileUnavailable(errno)),
    };
    match fill_content(env, fd, &content).await {
        Ok(()) => Ok(fd),
        Err(errno) => {
            let _ = env.system.close(fd);
            Err(ErrorCause::TemporaryFileUnavailable(errno))
        }
    }
}

/// Opens a here-document.
///
/// This function expands the here-document content to an anonymous temporary
/// file and returns a file descriptor to the file you can read the content
/// from.
#[allow(clippy::await_holding_refcell_ref)]
pub(super) async fn open(
    env: &mut Env,
    here_doc: &HereDoc,
) -> Result<(FdSpec, Location, Option<ExitStatus>), Error> {
    let (content, exit_status) = expand_text(env, &here_doc.content.borrow()).await?;
    let location = here_doc.delimiter.location.clone();
    match open_fd(env, content).await {
        Ok(fd) => Ok((FdSpec::Owned(fd), location, exit_status)),
        Err(cause) => Err(Error { cause, location }),
    }
}
