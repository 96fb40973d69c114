//! Host actions on a finished output file
//!
//! Opening and printing are capabilities of the host, not of the merge.
//! Callers receive an `Option` and report "unavailable" when it is `None`,
//! so nothing outside this module branches on the platform.

use std::path::Path;
use std::process::Command;
use tracing::debug;
use crate::error::{Error, Result};

/// Something the host can do with a file
pub trait FileAction {
    /// Short name used in messages, e.g. "Print"
    fn name(&self) -> &'static str;

    fn run(&self, path: &Path) -> Result<()>;
}

/// Open a file with the system default application
#[derive(Debug, Default, Clone, Copy)]
pub struct Opener;

impl FileAction for Opener {
    fn name(&self) -> &'static str {
        "Open"
    }

    fn run(&self, path: &Path) -> Result<()> {
        #[cfg(target_os = "macos")]
        let mut command = {
            let mut c = Command::new("open");
            c.arg(path);
            c
        };
        #[cfg(target_os = "windows")]
        let mut command = {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]).arg(path);
            c
        };
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let mut command = {
            let mut c = Command::new("xdg-open");
            c.arg(path);
            c
        };

        debug!("Opening {}", path.display());
        command.spawn().map_err(|e| Error::HostAction {
            action: self.name(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// Send a file to the default printer through the shell "print" verb
#[derive(Debug, Default, Clone, Copy)]
pub struct Printer;

impl FileAction for Printer {
    fn name(&self) -> &'static str {
        "Print"
    }

    fn run(&self, path: &Path) -> Result<()> {
        let target = path.display().to_string().replace('\'', "''");
        let script = format!("Start-Process -FilePath '{}' -Verb Print", target);

        debug!("Printing {}", path.display());
        let status = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .status()
            .map_err(|e| Error::HostAction {
                action: self.name(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::HostAction {
                action: self.name(),
                message: format!("print command exited with {}", status),
            });
        }
        Ok(())
    }
}

/// The print capability of this host, if it has one
pub fn printer() -> Option<Printer> {
    if cfg!(target_os = "windows") {
        Some(Printer)
    } else {
        None
    }
}

/// What happened when an optional action was attempted
#[derive(Debug)]
pub enum ActionOutcome {
    Done,
    Unavailable,
    Failed(Error),
}

/// Run `action` on `path` if the host offers it
///
/// Failures are returned as data: callers report them without undoing the
/// work that produced the file.
pub fn attempt(action: Option<&dyn FileAction>, path: &Path) -> ActionOutcome {
    match action {
        None => ActionOutcome::Unavailable,
        Some(action) => match action.run(path) {
            Ok(()) => ActionOutcome::Done,
            Err(e) => ActionOutcome::Failed(e),
        },
    }
}
