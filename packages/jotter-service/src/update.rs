use time::OffsetDateTime;

use jotter_domain::{Note, NoteId, NotePatch};

use crate::{Action, Actor, Error, NoteService, Result};

impl NoteService {
	pub async fn update(&self, actor: &Actor, note_id: NoteId, patch: NotePatch) -> Result<Note> {
		let mut note = self.load(note_id).await?;

		self.authorize(actor, Action::Update(&note)).await?;

		if patch.is_empty() {
			return Err(Error::Validation {
				fields: vec!["title".to_string(), "body".to_string()],
				message: "No updates provided.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();

		// Validates against the loaded row; the store then writes only the patched columns.
		if !note.apply(&patch, now)? {
			return Ok(note);
		}

		let note = self.store.update_content(note_id, &patch, now).await?;

		tracing::debug!(actor_id = actor.id(), note_id, "Note updated.");

		Ok(note)
	}
}
