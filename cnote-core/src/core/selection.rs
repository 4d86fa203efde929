//! Resolving user-typed ordinals against the last displayed list.

use crate::NoteId;

/// The outcome of resolving one ordinal token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    /// The token named a live note.
    Note { ordinal: usize, id: NoteId },
    /// The token did not resolve; holds the token as typed.
    Missing(String),
}

/// Resolved ordinals, in the order the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub picks: Vec<Pick>,
}

impl Selection {
    /// Resolves a comma-separated ordinal list such as `"2,4,7"`.
    ///
    /// `slots` is the displayed list (ordinal `n` is `slots[n - 1]`) and
    /// `is_live` reports whether an id still refers to a note. Tokens that are
    /// not positive integers, are out of range, or point at a dead slot become
    /// [`Pick::Missing`]. Empty tokens are skipped.
    ///
    /// ```rust
    /// use cnote_core::{NoteId, Selection};
    ///
    /// let shown = [NoteId(7), NoteId(9)];
    /// let sel = Selection::resolve("2,3", &shown, |_| true);
    /// assert_eq!(sel.ids(), vec![NoteId(9)]);
    /// assert_eq!(sel.missing(), vec!["3"]);
    /// ```
    pub fn resolve<F>(input: &str, slots: &[NoteId], is_live: F) -> Self
    where
        F: Fn(NoteId) -> bool,
    {
        let picks = input
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n >= 1)
                    .and_then(|n| slots.get(n - 1).map(|&id| (n, id)))
                    .filter(|&(_, id)| is_live(id))
                    .map(|(ordinal, id)| Pick::Note { ordinal, id })
                    .unwrap_or_else(|| Pick::Missing(token.to_string()))
            })
            .collect();
        Self { picks }
    }

    /// The resolved note ids, in input order.
    pub fn ids(&self) -> Vec<NoteId> {
        self.picks
            .iter()
            .filter_map(|p| match p {
                Pick::Note { id, .. } => Some(*id),
                Pick::Missing(_) => None,
            })
            .collect()
    }

    /// The tokens that did not resolve, in input order.
    pub fn missing(&self) -> Vec<&str> {
        self.picks
            .iter()
            .filter_map(|p| match p {
                Pick::Missing(token) => Some(token.as_str()),
                Pick::Note { .. } => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}
