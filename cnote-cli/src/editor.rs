//! Launching the user's editor on a note file.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Opens a file for editing and returns once the user is done.
pub trait Editor {
    /// `command` is the configured editor command line, e.g. `"code --wait"`.
    fn open(&mut self, command: &str, path: &Path) -> Result<()>;
}

/// Runs the editor as a child process and waits for it to exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalEditor;

impl Editor for ExternalEditor {
    fn open(&mut self, command: &str, path: &Path) -> Result<()> {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            bail!("No editor configured; set one with `config set editor <command>`");
        };

        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .with_context(|| format!("Failed to start editor {program:?}"))?;

        if !status.success() {
            log::warn!("editor {program:?} exited with {status}");
        }
        Ok(())
    }
}
