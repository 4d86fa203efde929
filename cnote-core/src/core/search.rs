//! Search queries: a case-insensitive term plus an optional tag qualifier.

use crate::{CnoteError, Note, Result};

/// Token that introduces a required tag list.
pub const WITH_TAGS: &str = "+t";

/// Token that introduces an excluded tag list.
pub const WITHOUT_TAGS: &str = "-t";

/// The tag part of a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    /// No qualifier.
    #[default]
    Any,
    /// `+t tag...`: every listed tag must be present. With no tags listed,
    /// the note must carry at least one tag.
    With(Vec<String>),
    /// `-t tag...`: none of the listed tags may be present. With no tags
    /// listed, the note must be untagged.
    Without(Vec<String>),
}

impl TagFilter {
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Self::Any => true,
            Self::With(tags) if tags.is_empty() => !note.tags().is_empty(),
            Self::With(tags) => tags.iter().all(|t| note.has_tag(t)),
            Self::Without(tags) if tags.is_empty() => note.tags().is_empty(),
            Self::Without(tags) => !tags.iter().any(|t| note.has_tag(t)),
        }
    }
}

/// A parsed `search` argument.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    /// Lowercased search term; empty matches everything.
    pub term: String,
    pub tags: TagFilter,
}

impl SearchQuery {
    /// Parses e.g. `"meeting notes +t work q3"`.
    ///
    /// # Errors
    ///
    /// Returns [`CnoteError::InvalidQuery`] if both `+t` and `-t` (or either
    /// one twice) appear.
    pub fn parse(input: &str) -> Result<Self> {
        let mut term: Vec<&str> = Vec::new();
        let mut qualifier: Option<(&str, Vec<String>)> = None;

        for token in input.split_whitespace() {
            let is_qualifier = token == WITH_TAGS || token == WITHOUT_TAGS;
            if let Some((_, tags)) = qualifier.as_mut() {
                if is_qualifier {
                    return Err(CnoteError::InvalidQuery(format!(
                        "Only one of {WITH_TAGS} or {WITHOUT_TAGS} may be used per search"
                    )));
                }
                tags.push(token.to_string());
            } else if is_qualifier {
                qualifier = Some((token, Vec::new()));
            } else {
                term.push(token);
            }
        }

        let tags = match qualifier {
            None => TagFilter::Any,
            Some((WITH_TAGS, tags)) => TagFilter::With(tags),
            Some((_, tags)) => TagFilter::Without(tags),
        };

        Ok(Self {
            term: term.join(" ").to_lowercase(),
            tags,
        })
    }

    /// Whether `note` satisfies both the term and the tag filter.
    pub fn matches(&self, note: &Note) -> bool {
        self.tags.matches(note) && self.matches_term(note)
    }

    fn matches_term(&self, note: &Note) -> bool {
        self.term.is_empty()
            || note.title().to_lowercase().contains(&self.term)
            || note.content().to_lowercase().contains(&self.term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoteId;
    use std::fs;
    use tempfile::TempDir;

    fn note(dir: &TempDir, name: &str, text: &str) -> Note {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        Note::load(NoteId(0), path).unwrap()
    }

    #[test]
    fn test_parse_plain_term() {
        let q = SearchQuery::parse("  Meeting   Notes ").unwrap();
        assert_eq!(q.term, "meeting notes");
        assert_eq!(q.tags, TagFilter::Any);
    }

    #[test]
    fn test_parse_with_tags() {
        let q = SearchQuery::parse("plan +t work Q3").unwrap();
        assert_eq!(q.term, "plan");
        assert_eq!(q.tags, TagFilter::With(vec!["work".into(), "Q3".into()]));
    }

    #[test]
    fn test_parse_without_tags_and_empty_term() {
        let q = SearchQuery::parse("-t home").unwrap();
        assert_eq!(q.term, "");
        assert_eq!(q.tags, TagFilter::Without(vec!["home".into()]));
    }

    #[test]
    fn test_parse_bare_qualifier() {
        assert_eq!(SearchQuery::parse("+t").unwrap().tags, TagFilter::With(vec![]));
        assert_eq!(SearchQuery::parse("x -t").unwrap().tags, TagFilter::Without(vec![]));
    }

    #[test]
    fn test_parse_rejects_two_qualifiers() {
        let err = SearchQuery::parse("x +t a -t b").unwrap_err();
        assert!(matches!(err, CnoteError::InvalidQuery(_)));
    }

    #[test]
    fn test_term_matches_title_or_content_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let n = note(&dir, "a.md", "# Weekly Review\nCall the PLUMBER\n");

        assert!(SearchQuery::parse("review").unwrap().matches(&n));
        assert!(SearchQuery::parse("plumber").unwrap().matches(&n));
        assert!(SearchQuery::parse("").unwrap().matches(&n));
        assert!(!SearchQuery::parse("electrician").unwrap().matches(&n));
    }

    #[test]
    fn test_exclude_tag_filter() {
        let dir = TempDir::new().unwrap();
        let work = note(&dir, "w.md", "W\n<!--- tags: work -->\n");
        let home = note(&dir, "h.md", "H\n<!--- tags: home -->\n");
        let none = note(&dir, "n.md", "N\n");

        let q = SearchQuery::parse("-t home").unwrap();
        assert!(q.matches(&work));
        assert!(!q.matches(&home));
        assert!(q.matches(&none));
    }

    #[test]
    fn test_include_tag_filter_requires_all() {
        let dir = TempDir::new().unwrap();
        let both = note(&dir, "b.md", "B\n<!--- tags: work, urgent -->\n");
        let one = note(&dir, "o.md", "O\n<!--- tags: work -->\n");
        let none = note(&dir, "n.md", "N\n");

        let q = SearchQuery::parse("+t work urgent").unwrap();
        assert!(q.matches(&both));
        assert!(!q.matches(&one));

        let any_tag = SearchQuery::parse("+t").unwrap();
        assert!(any_tag.matches(&one));
        assert!(!any_tag.matches(&none));

        let untagged = SearchQuery::parse("-t").unwrap();
        assert!(untagged.matches(&none));
        assert!(!untagged.matches(&both));
    }
}
