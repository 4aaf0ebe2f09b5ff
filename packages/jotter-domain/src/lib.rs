pub mod note;
pub mod query;

pub use note::{MAX_PER_USER, NewNote, Note, NoteId, NotePatch, TITLE_MAX_CHARS, Title, TitleError};
pub use query::{ArchivedFilter, NoteQuery, PAGE_SIZE, Page, listing_order};
