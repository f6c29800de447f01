//! Process identity file management.
//!
//! The pid file is the daemon's only externally visible liveness record:
//! `start` writes it, `stop` and `status` read it, and the supervisor
//! removes it as the last step of shutdown, no matter how shutdown went.

use crate::domain::errors::PidFileError;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle on the process identity file at a fixed path.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `pid` as a decimal line, creating parent directories.
    pub fn write(&self, pid: i32) -> Result<(), PidFileError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| PidFileError::Io {
                    path: self.path.display().to_string(),
                    source,
                })?;
            }
        }

        fs::write(&self.path, format!("{pid}\n")).map_err(|source| PidFileError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!(path = %self.path.display(), pid, "Wrote pid file");
        Ok(())
    }

    /// Read the recorded pid.
    ///
    /// Only strictly positive values pass: `kill(0)` addresses the caller's
    /// own process group and negative pids address arbitrary groups, so a
    /// zeroed or corrupted file must never reach a signal call.
    pub fn read(&self) -> Result<i32, PidFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PidFileError::NotFound(self.path.display().to_string()));
            }
            Err(source) => {
                return Err(PidFileError::Io {
                    path: self.path.display().to_string(),
                    source,
                });
            }
        };

        let trimmed = content.trim();
        let malformed = || PidFileError::Malformed {
            path: self.path.display().to_string(),
            content: trimmed.to_string(),
        };

        let pid = trimmed.parse::<i32>().map_err(|_| malformed())?;
        if pid <= 0 {
            return Err(malformed());
        }
        Ok(pid)
    }

    /// Remove the file. Absence is not an error: removal must be safe to
    /// repeat from both the drain path and `stop`'s cleanup path.
    pub fn remove(&self) -> Result<(), PidFileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed pid file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PidFileError::Io {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }

    /// Whether the recorded pid names a live process (signal-0 probe).
    /// A missing or malformed file reads as not running.
    pub fn is_running(&self) -> bool {
        match self.read() {
            Ok(pid) => kill(Pid::from_raw(pid), None).is_ok(),
            Err(_) => false,
        }
    }
}
