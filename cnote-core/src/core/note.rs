//! A single note file and the metadata parsed out of it.

use crate::core::footer::{self, FooterKey};
use crate::core::storage;
use crate::Result;
use chrono::{DateTime, Local, Timelike};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Characters that never survive into a title.
static TITLE_JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9 .\-]").expect("valid title regex"));

/// Number of characters kept by [`Note::excerpt`].
const EXCERPT_LEN: usize = 80;

/// Session-stable identifier of a loaded note.
///
/// Assigned by [`NoteCollection`](crate::NoteCollection) and never reused
/// while the collection lives, even after the note is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(pub u64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything recovered from a note's text, before file-system fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created: Option<DateTime<Local>>,
    pub modified: Option<DateTime<Local>>,
}

impl ParsedNote {
    /// Parses raw note text. `fallback_title` is used when no line qualifies
    /// as a title.
    ///
    /// A footer timestamp that does not parse is logged and left as `None`.
    pub fn parse(text: &str, fallback_title: &str) -> Self {
        let split = footer::split(text);

        let mut tags = Vec::new();
        let mut created = None;
        let mut modified = None;
        for line in &split.footer {
            match line.key {
                FooterKey::Tags => tags = footer::parse_tags(line.value),
                FooterKey::Created | FooterKey::Modified => {
                    let Some(t) = footer::parse_timestamp(line.value) else {
                        log::warn!(
                            "ignoring malformed {} timestamp {:?}",
                            line.key.name(),
                            line.value
                        );
                        continue;
                    };
                    if line.key == FooterKey::Created {
                        created = Some(t);
                    } else {
                        modified = Some(t);
                    }
                }
            }
        }

        let mut title: Option<String> = None;
        let mut content = String::new();
        for raw in &split.body {
            let line = raw.trim();
            if title.is_none() && !line.is_empty() {
                let cleaned = clean_title(line);
                if !cleaned.is_empty() {
                    title = Some(cleaned);
                    continue;
                }
            }
            content.push_str(line);
            content.push('\n');
        }

        Self {
            title: title.unwrap_or_else(|| fallback_title.to_string()),
            content,
            tags,
            created,
            modified,
        }
    }
}

/// Strips heading markers and punctuation from a title line.
pub fn clean_title(line: &str) -> String {
    let without_hashes = line.trim_start_matches('#');
    TITLE_JUNK.replace_all(without_hashes, "").trim().to_string()
}

/// The current time at the precision stored in footers.
pub fn now() -> DateTime<Local> {
    let t = Local::now();
    t.with_nanosecond(0).unwrap_or(t)
}

/// A note file loaded from disk.
#[derive(Debug, Clone)]
pub struct Note {
    id: NoteId,
    path: PathBuf,
    title: String,
    content: String,
    tags: Vec<String>,
    created: DateTime<Local>,
    modified: DateTime<Local>,
}

impl Note {
    /// Reads and parses the note at `path`.
    ///
    /// Without a stored `modified` timestamp the file's mtime is used;
    /// `created` defaults to `modified`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CnoteError::Io`] if the file cannot be read.
    pub fn load<P: AsRef<Path>>(id: NoteId, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let text = storage::read_note(&path)?;
        let parsed = ParsedNote::parse(&text, &file_stem(&path));

        let modified = match parsed.modified {
            Some(t) => t,
            None => storage::modified_time(&path)?,
        };
        let created = parsed.created.unwrap_or(modified);

        Ok(Self {
            id,
            path,
            title: parsed.title,
            content: parsed.content,
            tags: parsed.tags,
            created,
            modified,
        })
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name including its extension.
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created(&self) -> DateTime<Local> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Local> {
        self.modified
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Appends `tags` (duplicates included) and rewrites the footer.
    pub fn add_tags(&mut self, tags: &[String]) -> Result<()> {
        let mut new_tags = self.tags.clone();
        new_tags.extend_from_slice(tags);
        self.write_footer(self.created, now(), &new_tags)
    }

    /// Removes every occurrence of each of `tags` and rewrites the footer.
    pub fn remove_tags(&mut self, tags: &[String]) -> Result<()> {
        let new_tags: Vec<String> = self
            .tags
            .iter()
            .filter(|t| !tags.contains(t))
            .cloned()
            .collect();
        self.write_footer(self.created, now(), &new_tags)
    }

    /// Bumps `modified` and rewrites the footer (e.g. after an edit session).
    pub fn update(&mut self) -> Result<()> {
        let tags = self.tags.clone();
        self.write_footer(self.created, now(), &tags)
    }

    /// Stores a new creation time without touching `modified`.
    pub fn set_created(&mut self, created: DateTime<Local>) -> Result<()> {
        let tags = self.tags.clone();
        self.write_footer(created, self.modified, &tags)
    }

    /// The content without Markdown decoration, cut to 80 characters.
    pub fn excerpt(&self) -> String {
        let stripped: String = self
            .content
            .chars()
            .filter(|c| !matches!(c, '#' | '*' | '-' | '~'))
            .collect();
        stripped.trim().chars().take(EXCERPT_LEN).collect()
    }

    /// The title shortened with `...` so it fits in `length` characters.
    pub fn title_limit(&self, length: usize) -> String {
        if self.title.chars().count() >= length {
            let kept: String = self
                .title
                .trim()
                .chars()
                .take(length.saturating_sub(3))
                .collect();
            format!("{kept}...")
        } else {
            self.title.clone()
        }
    }

    /// Writes the footer from the current disk text, then refreshes every
    /// field from what was written. On error nothing in `self` changes.
    fn write_footer(
        &mut self,
        created: DateTime<Local>,
        modified: DateTime<Local>,
        tags: &[String],
    ) -> Result<()> {
        let current = storage::read_note(&self.path)?;
        let updated = footer::rewrite(&current, &created, &modified, tags);
        storage::write_note(&self.path, &updated)?;

        let parsed = ParsedNote::parse(&updated, &file_stem(&self.path));
        self.title = parsed.title;
        self.content = parsed.content;
        self.tags = parsed.tags;
        self.modified = parsed.modified.unwrap_or(modified);
        self.created = parsed.created.unwrap_or(created);
        log::debug!("updated footer of {}", self.path.display());
        Ok(())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
