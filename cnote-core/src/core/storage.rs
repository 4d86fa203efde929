//! Filesystem access for the note folder.
//!
//! Notes are plain `.md` files somewhere below a root directory. All writes
//! replace the whole file through a temporary sibling so a failed write never
//! leaves a half-written note behind.

use crate::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::{DirEntry, WalkDir};

/// Extension of note files.
pub const NOTE_EXTENSION: &str = "md";

/// The note folder on disk.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns every note file below the root, sorted by path.
    ///
    /// Hidden files and directories are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CnoteError::Scan`] if the root cannot be walked.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = entry?;
            if entry.file_type().is_file() && is_note_file(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        log::debug!("scanned {} note files under {}", paths.len(), self.root.display());
        Ok(paths)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Whether `path` has the note extension.
pub fn is_note_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == NOTE_EXTENSION)
}

/// Reads a note file as UTF-8 text.
pub fn read_note(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Returns the file's modification time.
pub fn modified_time(path: &Path) -> Result<DateTime<Local>> {
    let mtime = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(mtime))
}

/// Replaces the contents of `path` with `contents`.
///
/// The text goes to a temporary file in the same directory which is then
/// renamed over the target. An existing file keeps its permissions, and a
/// symlinked note is written through to the file it points at.
///
/// # Errors
///
/// Returns [`crate::CnoteError::Io`] if the directory is not writable or the
/// rename fails. The original file is untouched in that case.
pub fn write_note(path: &Path, contents: &str) -> Result<()> {
    let target = match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path)?,
        _ => path.to_path_buf(),
    };
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    if let Ok(meta) = fs::metadata(&target) {
        temp.as_file().set_permissions(meta.permissions())?;
    }
    temp.as_file().sync_all()?;
    temp.persist(&target).map_err(|e| e.error)?;
    log::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Deletes a note file.
pub fn remove_note(path: &Path) -> Result<()> {
    fs::remove_file(path)?;
    log::debug!("removed {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_finds_markdown_recursively() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("work/deep")).unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("work/a.md"), "a").unwrap();
        fs::write(dir.path().join("work/deep/c.md"), "c").unwrap();
        fs::write(dir.path().join("work/readme.txt"), "not a note").unwrap();

        let paths = Storage::new(dir.path()).scan().unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("b.md"),
                PathBuf::from("work/a.md"),
                PathBuf::from("work/deep/c.md"),
            ]
        );
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/x.md"), "x").unwrap();
        fs::write(dir.path().join(".draft.md"), "d").unwrap();
        fs::write(dir.path().join("real.md"), "r").unwrap();

        let paths = Storage::new(dir.path()).scan().unwrap();
        assert_eq!(paths, vec![dir.path().join("real.md")]);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let result = Storage::new(dir.path().join("nope")).scan();
        assert!(result.is_err());
    }

    #[test]
    fn test_write_note_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("n.md");
        fs::write(&path, "old old old").unwrap();

        write_note(&path, "new").unwrap();

        assert_eq!(read_note(&path).unwrap(), "new");
        // No temporary files left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_note_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared.md");
        fs::write(&path, "before").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_note(&path, "after").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_note_through_symlink() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.txt");
        let link = dir.path().join("link.md");
        fs::write(&real, "before").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_note(&link, "after").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(read_note(&real).unwrap(), "after");
    }

    #[test]
    fn test_write_note_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/n.md");
        assert!(write_note(&path, "x").is_err());
    }

    #[test]
    fn test_remove_note() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("n.md");
        fs::write(&path, "x").unwrap();

        remove_note(&path).unwrap();
        assert!(!path.exists());
        assert!(remove_note(&path).is_err());
    }
}
