//! The trailing metadata footer stored inside every note file.
//!
//! A footer is a run of HTML comments at the very end of a note:
//!
//! ```text
//! <!--- created: 2026-10-14T09:30:00+02:00 -->
//! <!--- modified: 2026-10-14T10:05:12+02:00 -->
//! <!--- tags: work, urgent -->
//! ```
//!
//! Lines are classified by a two-state machine ([`split`]). Only comments
//! keyed `created`, `modified` or `tags` are metadata; any other comment is
//! ordinary text. A metadata line can end up above other text, for example
//! when the user types below the footer in an editor. Such a line still
//! carries metadata and is dropped from the body, so a rewrite always leaves
//! exactly one footer at the end of the file.

use chrono::{DateTime, Local, SecondsFormat};

/// Opening marker of a footer line.
pub const FOOTER_OPEN: &str = "<!---";

/// Closing marker of a footer line.
pub const FOOTER_CLOSE: &str = "-->";

/// Format accepted for timestamps written by older versions of the tool.
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// The keys that may appear in a footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterKey {
    Created,
    Modified,
    Tags,
}

impl FooterKey {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "created" => Some(Self::Created),
            "modified" => Some(Self::Modified),
            "tags" => Some(Self::Tags),
            _ => None,
        }
    }

    /// The key as written to disk.
    pub fn name(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Tags => "tags",
        }
    }
}

/// One classified footer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterLine<'a> {
    pub key: FooterKey,
    /// Trimmed text after the colon.
    pub value: &'a str,
}

/// Classifies a single line, returning `Some` if it is a footer line.
///
/// Comments with a key other than `created`, `modified` or `tags` are not
/// footer lines.
pub fn classify(line: &str) -> Option<FooterLine<'_>> {
    let inner = line
        .trim()
        .strip_prefix(FOOTER_OPEN)?
        .strip_suffix(FOOTER_CLOSE)?;
    let (key, value) = inner.split_once(':')?;
    Some(FooterLine {
        key: FooterKey::from_name(key)?,
        value: value.trim(),
    })
}

/// A note's text separated into body lines and metadata lines.
#[derive(Debug, Default)]
pub struct Split<'a> {
    /// Body lines exactly as they appear in the file, line endings included.
    ///
    /// Metadata lines are never part of the body. When the file ends in a
    /// footer, blank lines directly in front of it are dropped as well.
    pub body: Vec<&'a str>,
    /// Every metadata line in file order. Later lines override earlier ones,
    /// so the trailing footer wins over stray lines above it.
    pub footer: Vec<FooterLine<'a>>,
}

#[derive(Clone, Copy)]
enum State {
    Body,
    Footer,
}

/// Splits `text` into body and metadata.
pub fn split(text: &str) -> Split<'_> {
    let mut body = Vec::new();
    let mut footer = Vec::new();
    let mut blanks: Vec<&str> = Vec::new();
    let mut state = State::Body;

    for line in text.split_inclusive('\n') {
        let meta = classify(line);
        match (state, meta) {
            (_, Some(meta)) => {
                footer.push(meta);
                state = State::Footer;
            }
            (State::Footer, None) if line.trim().is_empty() => blanks.push(line),
            (State::Footer, None) => {
                // Not the end of the file after all.
                log::debug!("metadata line found above note text");
                body.append(&mut blanks);
                body.push(line);
                state = State::Body;
            }
            (State::Body, None) => body.push(line),
        }
    }

    if !footer.is_empty() {
        trim_trailing_blank(&mut body);
    }

    Split { body, footer }
}

/// Renders `body` followed by a fresh footer.
///
/// Body lines keep their line endings; a CRLF body gets a CRLF footer.
/// Trailing blank body lines are dropped and exactly one blank line separates
/// the body from the footer (none when the body is empty).
pub fn render(
    body: &[&str],
    created: &DateTime<Local>,
    modified: &DateTime<Local>,
    tags: &[String],
) -> String {
    let mut body = body.to_vec();
    trim_trailing_blank(&mut body);
    let eol = if body.iter().any(|l| l.ends_with("\r\n")) {
        "\r\n"
    } else {
        "\n"
    };

    let mut out = String::new();
    for line in &body {
        out.push_str(line);
        if !line.ends_with('\n') {
            out.push_str(eol);
        }
    }
    if !body.is_empty() {
        out.push_str(eol);
    }
    for (key, value) in [
        (FooterKey::Created, format_timestamp(created)),
        (FooterKey::Modified, format_timestamp(modified)),
        (FooterKey::Tags, tags.join(", ")),
    ] {
        out.push_str(&footer_line(key, &value));
        out.push_str(eol);
    }
    out
}

/// Replaces whatever footer `text` carries with a fresh one.
pub fn rewrite(
    text: &str,
    created: &DateTime<Local>,
    modified: &DateTime<Local>,
    tags: &[String],
) -> String {
    render(&split(text).body, created, modified, tags)
}

fn footer_line(key: FooterKey, value: &str) -> String {
    format!("{FOOTER_OPEN} {}: {value} {FOOTER_CLOSE}", key.name())
}

fn trim_trailing_blank(lines: &mut Vec<&str>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
}

/// Formats a timestamp the way it is stored in a footer (RFC 3339, seconds).
pub fn format_timestamp(t: &DateTime<Local>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parses a footer timestamp, accepting RFC 3339 and the legacy
/// `YYYY-MM-DD HH:MM:SS +ZZZZ` form.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, LEGACY_TIMESTAMP_FORMAT))
        .ok()
        .map(|t| t.with_timezone(&Local))
}

/// Parses the value of a `tags` footer line.
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
