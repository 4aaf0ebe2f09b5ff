use serde::Deserialize;
use time::OffsetDateTime;

use jotter_domain::{NewNote, Note, Title};

use crate::{Action, Actor, NoteService, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNote {
	/// Optional here so a missing title surfaces as a validation error on `title`.
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub body: Option<String>,
}
impl CreateNote {
	pub fn new(title: impl Into<String>, body: Option<String>) -> Self {
		Self { title: Some(title.into()), body }
	}
}

impl NoteService {
	pub async fn create(&self, actor: &Actor, req: CreateNote) -> Result<Note> {
		self.authorize(actor, Action::Create).await?;

		let title = Title::parse(req.title.as_deref().unwrap_or_default())?;
		let note = self
			.store
			.insert(
				NewNote::new(actor.id(), title, req.body),
				self.policy.max_per_user(),
				OffsetDateTime::now_utc(),
			)
			.await?;

		tracing::debug!(actor_id = actor.id(), note_id = note.id(), "Note created.");

		Ok(note)
	}
}
