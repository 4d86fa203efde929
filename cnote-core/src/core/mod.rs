//! Internal domain modules for the cnote core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod collection;
pub mod error;
pub mod footer;
pub mod note;
pub mod search;
pub mod selection;
pub mod storage;

#[doc(inline)]
pub use collection::NoteCollection;
#[doc(inline)]
pub use error::{CnoteError, Result};
#[doc(inline)]
pub use note::{Note, NoteId, ParsedNote};
#[doc(inline)]
pub use search::{SearchQuery, TagFilter};
#[doc(inline)]
pub use selection::{Pick, Selection};
#[doc(inline)]
pub use storage::Storage;
