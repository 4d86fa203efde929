//! Error types for the cnote core library.

use std::path::PathBuf;
use thiserror::Error;

use crate::NoteId;

/// All errors that can occur within the cnote core library.
#[derive(Debug, Error)]
pub enum CnoteError {
    /// An I/O operation on a note file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Walking the note directory failed.
    #[error("Scan error: {0}")]
    Scan(#[from] walkdir::Error),

    /// A note ID was used that is no longer part of the collection.
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    /// A new note was about to be written over an existing file.
    #[error("File already exists: {}", .0.display())]
    DuplicateTarget(PathBuf),

    /// A search query could not be parsed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A note path cannot be placed under the note folder.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Convenience alias that pins the error type to [`CnoteError`].
pub type Result<T> = std::result::Result<T, CnoteError>;

impl CnoteError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("File error: {e}"),
            Self::Scan(e) => format!("Could not read the note folder: {e}"),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::DuplicateTarget(path) => format!("{} already exists", path.display()),
            Self::InvalidQuery(msg) => msg.clone(),
            Self::InvalidPath(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let e: CnoteError = io.into();
        assert!(matches!(e, CnoteError::Io(_)));
        assert!(e.user_message().starts_with("File error"));
    }

    #[test]
    fn test_duplicate_target_mentions_path() {
        let e = CnoteError::DuplicateTarget(PathBuf::from("/notes/todo.md"));
        assert!(e.to_string().contains("todo.md"));
        assert!(e.user_message().contains("already exists"));
    }
}
