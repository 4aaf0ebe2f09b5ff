use std::{
	collections::BTreeMap,
	sync::{Mutex, MutexGuard},
};

use time::OffsetDateTime;

use crate::{BoxFuture, Error, NoteStore, Result};
use jotter_domain::{NewNote, Note, NoteId, NotePatch, NoteQuery, Page, listing_order};

/// Process-local backend. Every operation runs under one lock, which also makes the quota check
/// in [`NoteStore::insert`] atomic.
#[derive(Default)]
pub struct MemoryNoteStore {
	state: Mutex<State>,
}

#[derive(Default)]
struct State {
	last_id: NoteId,
	notes: BTreeMap<NoteId, Note>,
}

impl MemoryNoteStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.lock().notes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn insert_now(&self, note: NewNote, limit: u64, now: OffsetDateTime) -> Result<Note> {
		let mut state = self.lock();
		let owned =
			state.notes.values().filter(|existing| existing.owner_id() == note.owner_id).count();

		if owned as u64 >= limit {
			return Err(Error::QuotaExceeded { limit });
		}

		state.last_id += 1;

		let note = note.into_note(state.last_id, now);

		state.notes.insert(note.id(), note.clone());

		Ok(note)
	}

	fn update_content_now(
		&self,
		id: NoteId,
		patch: &NotePatch,
		now: OffsetDateTime,
	) -> Result<Note> {
		let mut state = self.lock();
		let Some(stored) = state.notes.get_mut(&id) else {
			return Err(Error::NotFound(format!("Note {id} does not exist.")));
		};

		// Applied to the current row, so fields the patch leaves out keep their latest values.
		stored.apply(patch, now).map_err(|err| Error::InvalidArgument(err.to_string()))?;

		Ok(stored.clone())
	}

	fn archive_now(&self, id: NoteId, now: OffsetDateTime) -> Option<Note> {
		let mut state = self.lock();
		let stored = state.notes.get_mut(&id)?;

		stored.archive(now).then(|| stored.clone())
	}

	fn query_now(&self, query: &NoteQuery) -> Page<Note> {
		let state = self.lock();
		let mut matched =
			state.notes.values().filter(|note| query.matches(note)).cloned().collect::<Vec<_>>();

		matched.sort_by(listing_order);

		let total = matched.len() as u64;
		let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
		let items = matched.into_iter().skip(offset).take(query.per_page() as usize).collect();

		query.into_page(items, total)
	}
}

impl NoteStore for MemoryNoteStore {
	fn find_by_id<'a>(&'a self, id: NoteId) -> BoxFuture<'a, Result<Option<Note>>> {
		let found = self.lock().notes.get(&id).cloned();

		Box::pin(async move { Ok(found) })
	}

	fn count_by_owner<'a>(&'a self, owner_id: &'a str) -> BoxFuture<'a, Result<u64>> {
		let count =
			self.lock().notes.values().filter(|note| note.owner_id() == owner_id).count() as u64;

		Box::pin(async move { Ok(count) })
	}

	fn insert<'a>(
		&'a self,
		note: NewNote,
		limit: u64,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Note>> {
		let result = self.insert_now(note, limit, now);

		Box::pin(async move { result })
	}

	fn update_content<'a>(
		&'a self,
		id: NoteId,
		patch: &'a NotePatch,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Note>> {
		let result = self.update_content_now(id, patch, now);

		Box::pin(async move { result })
	}

	fn archive<'a>(
		&'a self,
		id: NoteId,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Option<Note>>> {
		let archived = self.archive_now(id, now);

		Box::pin(async move { Ok(archived) })
	}

	fn query_page<'a>(&'a self, query: &'a NoteQuery) -> BoxFuture<'a, Result<Page<Note>>> {
		let page = self.query_now(query);

		Box::pin(async move { Ok(page) })
	}
}
