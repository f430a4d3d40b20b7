//! Output destinations: standard output, or a file created exclusively.
//!
//! A file given with `-o` is opened with `create_new`, so an existing key is
//! never clobbered, and on Unix it is created with mode 0600.

use anyhow::{Context, Result};
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Where generated or converted keys are written.
pub enum Output {
    Stdout(io::Stdout),
    File(File),
}

impl Output {
    /// Standard output when `path` is `None`, otherwise a freshly created file.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Output::Stdout(io::stdout())),
            Some(path) => {
                let file = create_exclusive(path)
                    .with_context(|| format!("Failed to open output file {:?}", path))?;
                tracing::debug!(path = %path.display(), "created output file");
                Ok(Output::File(file))
            }
        }
    }

    /// Whether a human is (probably) looking at this output.
    pub fn is_terminal(&self) -> bool {
        match self {
            Output::Stdout(stdout) => stdout.is_terminal(),
            Output::File(file) => file.is_terminal(),
        }
    }

    /// Whether the destination is a regular file anyone on the system can read.
    pub fn is_world_readable(&self) -> bool {
        let metadata = match self {
            Output::Stdout(_) => stdout_metadata(),
            Output::File(file) => file.metadata().ok(),
        };
        metadata.as_ref().map_or(false, is_world_readable)
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(stdout) => stdout.write(buf),
            Output::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(stdout) => stdout.flush(),
            Output::File(file) => file.flush(),
        }
    }
}

fn create_exclusive(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(unix)]
fn stdout_metadata() -> Option<Metadata> {
    use std::os::fd::AsFd;
    fd_metadata(io::stdout().as_fd())
}

/// Metadata of whatever `fd` points at, without going through a path.
#[cfg(unix)]
fn fd_metadata(fd: std::os::fd::BorrowedFd<'_>) -> Option<Metadata> {
    let owned = fd.try_clone_to_owned().ok()?;
    File::from(owned).metadata().ok()
}

#[cfg(not(unix))]
fn stdout_metadata() -> Option<Metadata> {
    None
}

#[cfg(unix)]
fn is_world_readable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o004 != 0
}

#[cfg(not(unix))]
fn is_world_readable(_metadata: &Metadata) -> bool {
    false
}
