use jotter_domain::{Note, NoteId};

use crate::{Action, Actor, NoteService, Result};

impl NoteService {
	/// Only the owner may read a note; anyone else gets forbidden, not not-found.
	pub async fn get(&self, actor: &Actor, note_id: NoteId) -> Result<Note> {
		let note = self.load(note_id).await?;

		self.authorize(actor, Action::View(&note)).await?;

		Ok(note)
	}
}
