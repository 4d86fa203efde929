//! Plain-text rendering of note lists, previews and help.

use chrono::{DateTime, Local};
use cnote_core::Note;
use std::io::{self, Write};
use std::path::Path;

const INDENT: &str = "    ";
const LIST_TIME_FORMAT: &str = "%a, %b %e %Y, %l:%M%P";
const INFO_TIME_FORMAT: &str = "%A, %B %e %Y, %l:%M:%S%p";
const PEEK_LINES: usize = 15;
const RULE_WIDTH: usize = 40;

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// `"1 note"`, `"3 notes"`.
pub fn count(n: usize, noun: &str) -> String {
    format!("{n} {noun}{}", plural(n))
}

fn heading<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{INDENT}{title}")?;
    writeln!(out, "{INDENT}{}", "-".repeat(title.chars().count()))?;
    writeln!(out)
}

fn when(t: DateTime<Local>, format: &str) -> String {
    t.format(format).to_string()
}

/// Prints numbered notes. `detailed` adds the file name, full timestamps
/// and an excerpt.
pub fn print_list<W: Write>(
    out: &mut W,
    title: &str,
    entries: &[(usize, &Note)],
    root: &Path,
    detailed: bool,
) -> io::Result<()> {
    heading(out, title)?;

    for (ordinal, note) in entries {
        let location = note.path().strip_prefix(root).unwrap_or(note.path());
        writeln!(out, "{:<4}{}", format!("{ordinal}."), note.title())?;
        writeln!(out, "{INDENT}{}", location.display())?;
        if note.tags().is_empty() {
            writeln!(out, "{INDENT}<no tags>")?;
        } else {
            writeln!(out, "{INDENT}tags: [{}]", note.tags().join("] ["))?;
        }
        let format = if detailed { INFO_TIME_FORMAT } else { LIST_TIME_FORMAT };
        writeln!(out, "{INDENT}modified: {}", when(note.modified(), format))?;
        writeln!(out, "{INDENT}created:  {}", when(note.created(), format))?;
        if detailed {
            writeln!(out, "{INDENT}file:     {}", note.filename())?;
            let excerpt = note.excerpt();
            if !excerpt.is_empty() {
                writeln!(out, "{INDENT}{}", excerpt.replace('\n', " "))?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "{INDENT}Listed {}", count(entries.len(), "Note"))?;
    writeln!(out)
}

/// Prints a note's title and the start of its content.
pub fn print_peek<W: Write>(out: &mut W, note: &Note) -> io::Result<()> {
    let lines: Vec<&str> = note.content().lines().collect();
    let rule = "-".repeat(RULE_WIDTH);

    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{}", note.title())?;
    for line in lines.iter().take(PEEK_LINES) {
        writeln!(out, "{line}")?;
    }
    if lines.len() > PEEK_LINES {
        let more = lines.len() - PEEK_LINES;
        writeln!(out)?;
        writeln!(out, "({} more line{}...)", more, plural(more))?;
    }
    writeln!(out, "{rule}")?;
    writeln!(out)
}

/// Prints every tag with the number of notes carrying it.
pub fn print_tags<W: Write>(out: &mut W, counts: &[(String, usize)]) -> io::Result<()> {
    heading(out, "All Tags")?;
    let longest = counts.iter().map(|(t, _)| t.chars().count()).max().unwrap_or(0);
    for (tag, n) in counts {
        let dots = ".".repeat(longest + 3 - tag.chars().count());
        writeln!(out, "{INDENT}{tag} {dots} {}", count(*n, "note"))?;
    }
    writeln!(out)
}

/// Prints the command overview.
pub fn print_help<W: Write>(out: &mut W, prompt: &str) -> io::Result<()> {
    writeln!(
        out,
        "
Enter a command with the structure:
    {prompt} action parameter(s)

Actions:
    - new filename [+t tag...]
    - edit note_number
    - delete note_number(s)
    - peek note_number
    - tag note_number(s) tag...
    - untag note_number(s) tag...
    - search search_term [+t tag... | -t tag...]
    - info note_number(s)
    - list
    - tags
    - config (set/get) key [value]
    - exit
    - help

Alternate actions:
  Most actions also have aliases that do the same thing.
  These are listed for each command:
    - new: create, c, n
    - edit: e, open, o
    - delete: d, rm
    - peek: p
    - tag: t
    - untag: ut
    - search: find, f, s
    - info: i
    - list: l, ls
    - exit: quit, q, close
    - help: h
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnote_core::NoteCollection;
    use std::fs;
    use tempfile::TempDir;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_print_list_shows_ordinals_and_tags() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("work")).unwrap();
        fs::write(dir.path().join("work/plan.md"), "# Plan\n<!--- tags: work, q3 -->\n").unwrap();
        fs::write(dir.path().join("z.md"), "Zed\n").unwrap();
        let c = NoteCollection::open(dir.path()).unwrap();

        let text = render(|out| print_list(out, "All Notes", &c.filtered(), c.root(), false));

        assert!(text.contains("    All Notes\n    ---------\n"));
        assert!(text.contains("1.  Plan\n"));
        assert!(text.contains("tags: [work] [q3]"));
        assert!(text.contains("2.  Zed\n"));
        assert!(text.contains("<no tags>"));
        assert!(text.contains("Listed 2 Notes"));
    }

    #[test]
    fn test_print_peek_truncates() {
        let dir = TempDir::new().unwrap();
        let body: String = (1..=20).map(|i| format!("line {i}\n")).collect();
        fs::write(dir.path().join("long.md"), format!("# Long\n{body}")).unwrap();
        let c = NoteCollection::open(dir.path()).unwrap();
        let note = c.notes().next().unwrap();

        let text = render(|out| print_peek(out, note));

        assert!(text.contains("Long\nline 1\n"));
        assert!(text.contains("line 15\n"));
        assert!(!text.contains("line 16"));
        assert!(text.contains("(5 more lines...)"));
    }

    #[test]
    fn test_print_tags_aligns_counts() {
        let counts = vec![("a".to_string(), 1), ("work".to_string(), 3)];
        let text = render(|out| print_tags(out, &counts));
        assert!(text.contains("    a ...... 1 note\n"));
        assert!(text.contains("    work ... 3 notes\n"));
    }

    #[test]
    fn test_count() {
        assert_eq!(count(1, "note"), "1 note");
        assert_eq!(count(0, "note"), "0 notes");
    }
}
