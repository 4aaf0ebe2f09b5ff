pub mod db;
pub mod memory;
pub mod models;
pub mod pg;
pub mod schema;

mod error;

pub use error::Error;
pub use memory::MemoryNoteStore;
pub use pg::PgNoteStore;

use std::{future::Future, pin::Pin};

use time::OffsetDateTime;

use jotter_domain::{NewNote, Note, NoteId, NotePatch, NoteQuery, Page};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence seam for notes. Filters arrive as a [`NoteQuery`] so each backend decides how to
/// evaluate them; results must agree with [`NoteQuery::matches`] and
/// [`jotter_domain::listing_order`].
pub trait NoteStore
where
	Self: Send + Sync,
{
	fn find_by_id<'a>(&'a self, id: NoteId) -> BoxFuture<'a, Result<Option<Note>>>;

	fn count_by_owner<'a>(&'a self, owner_id: &'a str) -> BoxFuture<'a, Result<u64>>;

	/// Persists a new note unless its owner already holds `limit` notes, in which case
	/// [`Error::QuotaExceeded`] is returned and nothing is written. The check and the write are
	/// atomic per owner.
	fn insert<'a>(
		&'a self,
		note: NewNote,
		limit: u64,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Note>>;

	/// Writes the fields an already validated patch names onto the stored row and returns the
	/// row as stored. `archived` and the owner are never written here.
	fn update_content<'a>(
		&'a self,
		id: NoteId,
		patch: &'a NotePatch,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Note>>;

	/// Flips `archived` to true in a single conditional write. `None` when the row is already
	/// archived or missing; nothing is written then.
	fn archive<'a>(
		&'a self,
		id: NoteId,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Option<Note>>>;

	fn query_page<'a>(&'a self, query: &'a NoteQuery) -> BoxFuture<'a, Result<Page<Note>>>;
}
