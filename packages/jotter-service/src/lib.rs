pub mod archive;
pub mod create;
pub mod list;
pub mod notes;
pub mod policy;
pub mod query;
pub mod update;

mod error;

pub use create::CreateNote;
pub use error::{Error, Result};
pub use list::ListNotes;
pub use policy::{Action, Decision, Denial, NotePolicy};

use std::sync::Arc;

use jotter_domain::{Note, NoteId};
use jotter_storage::NoteStore;

/// The authenticated identity a request runs as. Identity proofs are checked upstream; by the
/// time an `Actor` exists the subject is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
	id: String,
}
impl Actor {
	/// `None` for a blank subject, which callers treat as unauthenticated.
	pub fn new(id: impl Into<String>) -> Option<Self> {
		let id = id.into();
		let trimmed = id.trim();

		if trimmed.is_empty() {
			return None;
		}

		Some(Self { id: trimmed.to_string() })
	}

	pub fn id(&self) -> &str {
		&self.id
	}
}

pub struct NoteService {
	pub store: Arc<dyn NoteStore>,
	pub policy: NotePolicy,
}
impl NoteService {
	pub fn new(store: Arc<dyn NoteStore>) -> Self {
		Self { store, policy: NotePolicy::default() }
	}

	pub fn with_policy(store: Arc<dyn NoteStore>, policy: NotePolicy) -> Self {
		Self { store, policy }
	}

	pub(crate) async fn authorize(&self, actor: &Actor, action: Action<'_>) -> Result<()> {
		self.policy.authorize(self.store.as_ref(), actor, action).await.into_result()
	}

	pub(crate) async fn load(&self, note_id: NoteId) -> Result<Note> {
		self.store
			.find_by_id(note_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("Note {note_id} not found.") })
	}
}
