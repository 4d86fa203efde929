//! Core library for cnote, a note manager that keeps Markdown notes as plain
//! files and stores their metadata in a trailing comment footer.
//!
//! The primary entry point is [`NoteCollection`], which loads a note folder
//! and tracks the list the user last looked at so that commands can refer to
//! notes by ordinal.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    collection::NoteCollection,
    error::{CnoteError, Result},
    footer::{format_timestamp, parse_timestamp},
    note::{Note, NoteId, ParsedNote},
    search::{SearchQuery, TagFilter},
    selection::{Pick, Selection},
    storage::Storage,
};
