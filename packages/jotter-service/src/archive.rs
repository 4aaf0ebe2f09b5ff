use time::OffsetDateTime;

use jotter_domain::{Note, NoteId};

use crate::{Action, Actor, NoteService, Result};

impl NoteService {
	/// Succeeds for notes that are already archived without writing anything.
	pub async fn archive(&self, actor: &Actor, note_id: NoteId) -> Result<Note> {
		let note = self.load(note_id).await?;

		self.authorize(actor, Action::Archive(&note)).await?;

		if note.is_archived() {
			return Ok(note);
		}

		match self.store.archive(note_id, OffsetDateTime::now_utc()).await? {
			Some(archived) => {
				tracing::debug!(actor_id = actor.id(), note_id, "Note archived.");

				Ok(archived)
			},
			// Archived by another request since the load.
			None => self.load(note_id).await,
		}
	}
}
