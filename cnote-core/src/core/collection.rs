//! The set of loaded notes and the list the user is currently looking at.

use crate::core::storage::{self, NOTE_EXTENSION};
use crate::{CnoteError, Note, NoteId, Result, SearchQuery, Selection, Storage};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// All notes under one note folder, plus the filtered view.
///
/// Every note gets a [`NoteId`] when it is loaded. The filtered view is an
/// ordered list of those ids; ordinal `n` refers to entry `n - 1`. Commands
/// that display notes replace the view, so an ordinal always refers to the
/// most recent listing. Deleting a note keeps its slot in the view, so the
/// remaining ordinals stay where the user saw them.
#[derive(Debug)]
pub struct NoteCollection {
    storage: Storage,
    notes: BTreeMap<NoteId, Note>,
    next_id: u64,
    filtered: Vec<NoteId>,
}

impl NoteCollection {
    /// Loads every note below `root`.
    ///
    /// The root is canonicalized first, so relative folders and absolute
    /// note names can be compared. Files that cannot be read are logged and
    /// skipped. The filtered view starts out as every note in path order.
    ///
    /// # Errors
    ///
    /// Returns [`CnoteError::Scan`] if `root` cannot be walked.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let storage = Storage::new(fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf()));
        let paths = storage.scan()?;

        let mut collection = Self {
            storage,
            notes: BTreeMap::new(),
            next_id: 1,
            filtered: Vec::new(),
        };
        for path in paths {
            if let Err(e) = collection.insert(&path) {
                log::warn!("skipping {}: {e}", path.display());
            }
        }
        collection.filtered = collection.notes.keys().copied().collect();
        log::debug!(
            "loaded {} notes from {}",
            collection.notes.len(),
            collection.root().display()
        );
        Ok(collection)
    }

    pub fn root(&self) -> &Path {
        self.storage.root()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    /// Every live note in id order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    /// Loads the note at `path` under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`CnoteError::Io`] if the file cannot be read.
    pub fn insert(&mut self, path: &Path) -> Result<NoteId> {
        let id = NoteId(self.next_id);
        let note = Note::load(id, path)?;
        self.next_id += 1;
        self.notes.insert(id, note);
        Ok(id)
    }

    // --- filtered view ---

    /// The displayed list as `(ordinal, note)` pairs, skipping deleted slots.
    pub fn filtered(&self) -> Vec<(usize, &Note)> {
        self.filtered
            .iter()
            .enumerate()
            .filter_map(|(i, id)| self.notes.get(id).map(|n| (i + 1, n)))
            .collect()
    }

    /// Replaces the displayed list.
    pub fn set_filtered(&mut self, ids: Vec<NoteId>) {
        self.filtered = ids;
    }

    /// Shows every note, most recently modified first.
    pub fn list(&mut self) -> Vec<NoteId> {
        let mut notes: Vec<&Note> = self.notes.values().collect();
        notes.sort_by(|a, b| b.modified().cmp(&a.modified()));
        let ids: Vec<NoteId> = notes.iter().map(|n| n.id()).collect();
        self.set_filtered(ids.clone());
        ids
    }

    /// Shows the notes matching `query`, in id order.
    pub fn search(&mut self, query: &SearchQuery) -> Vec<NoteId> {
        let ids: Vec<NoteId> = self
            .notes
            .values()
            .filter(|n| query.matches(n))
            .map(|n| n.id())
            .collect();
        self.set_filtered(ids.clone());
        ids
    }

    /// Resolves ordinals such as `"2,4"` against the displayed list.
    pub fn resolve(&self, input: &str) -> Selection {
        Selection::resolve(input, &self.filtered, |id| self.notes.contains_key(&id))
    }

    /// Resolves a single ordinal.
    pub fn resolve_one(&self, input: &str) -> Option<NoteId> {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n >= 1)
            .and_then(|n| self.filtered.get(n - 1).copied())
            .filter(|id| self.notes.contains_key(id))
    }

    // --- mutations ---

    pub fn add_tags(&mut self, id: NoteId, tags: &[String]) -> Result<()> {
        self.note_mut(id)?.add_tags(tags)
    }

    pub fn remove_tags(&mut self, id: NoteId, tags: &[String]) -> Result<()> {
        self.note_mut(id)?.remove_tags(tags)
    }

    /// Bumps `modified` and rewrites the footer, picking up edits made on disk.
    pub fn touch(&mut self, id: NoteId) -> Result<()> {
        self.note_mut(id)?.update()
    }

    /// Marks `id` as created now and rewrites it.
    pub fn mark_created(&mut self, id: NoteId) -> Result<()> {
        let note = self.note_mut(id)?;
        note.set_created(crate::core::note::now())?;
        note.update()
    }

    /// Deletes the note's file and drops it from the collection.
    ///
    /// # Errors
    ///
    /// Returns [`CnoteError::NoteNotFound`] for a dead id, or
    /// [`CnoteError::Io`] if the file cannot be removed (the note is kept).
    pub fn delete(&mut self, id: NoteId) -> Result<Note> {
        let path = self
            .notes
            .get(&id)
            .ok_or(CnoteError::NoteNotFound(id))?
            .path()
            .to_path_buf();
        storage::remove_note(&path)?;
        self.notes.remove(&id).ok_or(CnoteError::NoteNotFound(id))
    }

    fn note_mut(&mut self, id: NoteId) -> Result<&mut Note> {
        self.notes.get_mut(&id).ok_or(CnoteError::NoteNotFound(id))
    }

    // --- new notes ---

    /// Maps a user-typed name to the file a new note should live in.
    ///
    /// The result is always `<root>/<dirs>/<stem>.md`. An absolute path inside
    /// the root is made relative first.
    ///
    /// # Errors
    ///
    /// Returns [`CnoteError::InvalidPath`] if the name has no file stem,
    /// climbs out of the root with `..`, or is absolute outside the root.
    pub fn new_note_path(&self, input: &str) -> Result<PathBuf> {
        let input = Path::new(input.trim());
        let relative = if input.is_absolute() {
            input.strip_prefix(self.root()).map_err(|_| {
                CnoteError::InvalidPath(format!(
                    "{} is outside the note folder {}",
                    input.display(),
                    self.root().display()
                ))
            })?
        } else {
            input
        };

        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(CnoteError::InvalidPath(format!(
                "{} must stay inside the note folder",
                input.display()
            )));
        }

        let stem = relative
            .file_stem()
            .ok_or_else(|| CnoteError::InvalidPath("Please enter a file name".to_string()))?;
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(NOTE_EXTENSION);

        let mut path = self.root().to_path_buf();
        if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
            path.push(parent);
        }
        path.push(file_name);
        Ok(path)
    }

    /// Fails with [`CnoteError::DuplicateTarget`] if `path` already exists.
    pub fn check_vacant(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(CnoteError::DuplicateTarget(path.to_path_buf()));
        }
        Ok(())
    }

    /// Removes the file at `path` and forgets any note loaded from it.
    pub fn discard_path(&mut self, path: &Path) -> Result<()> {
        if path.exists() {
            storage::remove_note(path)?;
        }
        self.notes.retain(|_, n| n.path() != path);
        Ok(())
    }

    // --- statistics ---

    /// Each tag with the number of notes carrying it, sorted by tag.
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for note in self.notes.values() {
            for tag in note.tags() {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        counts.into_iter().map(|(t, c)| (t.to_string(), c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)]) -> (TempDir, NoteCollection) {
        let dir = TempDir::new().unwrap();
        for (name, text) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, text).unwrap();
        }
        let collection = NoteCollection::open(dir.path()).unwrap();
        (dir, collection)
    }

    fn titles(c: &NoteCollection) -> Vec<String> {
        c.filtered().iter().map(|(_, n)| n.title().to_string()).collect()
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_open_loads_notes_in_path_order() {
        let (_dir, c) = setup(&[("b.md", "# Bravo\n"), ("a.md", "# Alpha\n"), ("sub/c.md", "# Charlie\n")]);
        assert_eq!(c.len(), 3);
        assert_eq!(titles(&c), vec!["Alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let (dir, mut c) = setup(&[("a.md", "A\n")]);
        let first = c.resolve_one("1").unwrap();
        c.delete(first).unwrap();

        let path = dir.path().join("again.md");
        fs::write(&path, "Again\n").unwrap();
        let second = c.insert(&path).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_list_orders_by_modified_descending() {
        let (_dir, mut c) = setup(&[
            ("old.md", "Old\n<!--- modified: 2001-01-01T00:00:00+00:00 -->\n"),
            ("new.md", "New\n<!--- modified: 2021-01-01T00:00:00+00:00 -->\n"),
            ("mid.md", "Mid\n<!--- modified: 2011-01-01T00:00:00+00:00 -->\n"),
        ]);
        c.list();
        assert_eq!(titles(&c), vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn test_search_rebuilds_ordinals() {
        let (_dir, mut c) = setup(&[
            ("w.md", "Work plan\n<!--- tags: work -->\n"),
            ("h.md", "Home plan\n<!--- tags: home -->\n"),
            ("u.md", "Untagged plan\n"),
        ]);

        c.search(&SearchQuery::parse("-t home").unwrap());
        assert_eq!(titles(&c), vec!["Untagged plan", "Work plan"]);

        let first = c.resolve_one("1").unwrap();
        assert_eq!(c.get(first).unwrap().title(), "Untagged plan");
        assert!(c.resolve_one("3").is_none());
    }

    #[test]
    fn test_resolve_reports_missing_per_item() {
        let (_dir, c) = setup(&[("a.md", "A\n"), ("b.md", "B\n"), ("c.md", "C\n")]);
        let sel = c.resolve("1,5,3");
        assert_eq!(sel.ids().len(), 2);
        assert_eq!(sel.missing(), vec!["5"]);
    }

    #[test]
    fn test_delete_keeps_other_ordinals_stable() {
        let (dir, mut c) = setup(&[("a.md", "A\n"), ("b.md", "B\n"), ("c.md", "C\n")]);
        let second = c.resolve_one("2").unwrap();
        let deleted = c.delete(second).unwrap();

        assert!(!dir.path().join("b.md").exists());
        assert_eq!(deleted.title(), "B");
        assert!(c.resolve_one("2").is_none());
        assert_eq!(c.get(c.resolve_one("3").unwrap()).unwrap().title(), "C");
        assert!(matches!(c.delete(second), Err(CnoteError::NoteNotFound(_))));
    }

    #[test]
    fn test_tag_and_untag_through_collection() {
        let (dir, mut c) = setup(&[("a.md", "A\n")]);
        let id = c.resolve_one("1").unwrap();

        c.add_tags(id, &tags(&["x", "y"])).unwrap();
        c.remove_tags(id, &tags(&["x"])).unwrap();
        assert_eq!(c.get(id).unwrap().tags(), ["y"]);

        let reopened = NoteCollection::open(dir.path()).unwrap();
        assert_eq!(reopened.notes().next().unwrap().tags(), ["y"]);
    }

    #[test]
    fn test_tag_counts_sorted_by_tag() {
        let (_dir, c) = setup(&[
            ("a.md", "A\n<!--- tags: work, urgent -->\n"),
            ("b.md", "B\n<!--- tags: work -->\n"),
        ]);
        assert_eq!(
            c.tag_counts(),
            vec![("urgent".to_string(), 1), ("work".to_string(), 2)]
        );
    }

    #[test]
    fn test_new_note_path_forces_markdown_extension() {
        let (_dir, c) = setup(&[]);
        let root = c.root().to_path_buf();
        assert_eq!(c.new_note_path("ideas.txt").unwrap(), root.join("ideas.md"));
        assert_eq!(c.new_note_path("work/plan").unwrap(), root.join("work").join("plan.md"));

        let absolute = root.join("deep/x.md");
        assert_eq!(
            c.new_note_path(absolute.to_str().unwrap()).unwrap(),
            root.join("deep").join("x.md")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_root_accepts_absolute_note_names() {
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        let cwd = std::env::current_dir().unwrap();
        let mut relative = PathBuf::new();
        for _ in 1..cwd.components().count() {
            relative.push("..");
        }
        relative.push(root.strip_prefix("/").unwrap());

        let c = NoteCollection::open(&relative).unwrap();
        assert_eq!(c.root(), root.as_path());

        let absolute = root.join("inbox/idea.md");
        assert_eq!(c.new_note_path(absolute.to_str().unwrap()).unwrap(), absolute);
    }

    #[test]
    fn test_new_note_path_rejects_escapes() {
        let (_dir, c) = setup(&[]);
        assert!(matches!(c.new_note_path("../x"), Err(CnoteError::InvalidPath(_))));
        assert!(matches!(c.new_note_path(""), Err(CnoteError::InvalidPath(_))));
    }

    #[test]
    fn test_check_vacant_and_discard() {
        let (_dir, mut c) = setup(&[("a.md", "A\n")]);
        let path = c.root().join("a.md");

        assert!(matches!(c.check_vacant(&path), Err(CnoteError::DuplicateTarget(_))));
        c.discard_path(&path).unwrap();
        assert!(c.check_vacant(&path).is_ok());
        assert!(c.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let (dir, _) = setup(&[("ok.md", "Ok\n")]);
        fs::write(dir.path().join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();

        let c = NoteCollection::open(dir.path()).unwrap();
        assert_eq!(c.len(), 1);
    }
}
