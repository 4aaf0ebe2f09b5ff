use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

/// Maximum number of notes a single owner may hold, archived notes included.
pub const MAX_PER_USER: u64 = 100;
pub const TITLE_MAX_CHARS: usize = 255;

pub type NoteId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
	#[error("The title field is required.")]
	Empty,
	#[error("The title field must not be greater than 255 characters.")]
	TooLong,
}

/// A title that has passed validation. Surrounding whitespace is stripped before the length
/// check, so the stored value is what gets counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);
impl Title {
	pub fn parse(raw: &str) -> Result<Self, TitleError> {
		let trimmed = raw.trim();

		if trimmed.is_empty() {
			return Err(TitleError::Empty);
		}
		if trimmed.chars().count() > TITLE_MAX_CHARS {
			return Err(TitleError::TooLong);
		}

		Ok(Self(trimmed.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_inner(self) -> String {
		self.0
	}
}

/// Creation input. A note always starts unarchived and its owner is fixed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
	pub owner_id: String,
	pub title: Title,
	pub body: Option<String>,
}
impl NewNote {
	pub fn new(owner_id: impl Into<String>, title: Title, body: Option<String>) -> Self {
		Self { owner_id: owner_id.into(), title, body }
	}

	pub fn into_note(self, id: NoteId, now: OffsetDateTime) -> Note {
		Note {
			id,
			owner_id: self.owner_id,
			title: self.title.into_inner(),
			body: self.body,
			archived: false,
			created_at: now,
			updated_at: now,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
	id: NoteId,
	owner_id: String,
	title: String,
	body: Option<String>,
	archived: bool,
	created_at: OffsetDateTime,
	updated_at: OffsetDateTime,
}
impl Note {
	/// Rebuilds a note from persisted state.
	pub fn hydrate(
		id: NoteId,
		owner_id: String,
		title: String,
		body: Option<String>,
		archived: bool,
		created_at: OffsetDateTime,
		updated_at: OffsetDateTime,
	) -> Self {
		Self { id, owner_id, title, body, archived, created_at, updated_at }
	}

	pub fn id(&self) -> NoteId {
		self.id
	}

	pub fn owner_id(&self) -> &str {
		&self.owner_id
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn body(&self) -> Option<&str> {
		self.body.as_deref()
	}

	pub fn is_archived(&self) -> bool {
		self.archived
	}

	pub fn created_at(&self) -> OffsetDateTime {
		self.created_at
	}

	pub fn updated_at(&self) -> OffsetDateTime {
		self.updated_at
	}

	pub fn is_owned_by(&self, actor_id: &str) -> bool {
		self.owner_id == actor_id
	}

	/// Returns `false` without touching anything when the note is already archived.
	pub fn archive(&mut self, now: OffsetDateTime) -> bool {
		if self.archived {
			return false;
		}

		self.archived = true;
		self.updated_at = now;

		true
	}

	/// Applies the provided fields and reports whether anything changed. Nothing is written when
	/// the patch carries an invalid title.
	pub fn apply(&mut self, patch: &NotePatch, now: OffsetDateTime) -> Result<bool, TitleError> {
		let title = patch.validated_title()?;
		let mut changed = false;

		if let Some(title) = title
			&& title.as_str() != self.title
		{
			self.title = title.into_inner();
			changed = true;
		}
		if let Some(body) = patch.body.as_ref()
			&& *body != self.body
		{
			self.body = body.clone();
			changed = true;
		}
		if changed {
			self.updated_at = now;
		}

		Ok(changed)
	}
}

/// The only fields a client may change after creation. An explicit `null` is kept apart from an
/// absent field: `body: null` clears the body, `title: null` is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotePatch {
	#[serde(default, deserialize_with = "present")]
	pub title: Option<Option<String>>,
	#[serde(default, deserialize_with = "present")]
	pub body: Option<Option<String>>,
}
impl NotePatch {
	pub fn title(title: impl Into<String>) -> Self {
		Self { title: Some(Some(title.into())), body: None }
	}

	pub fn body(body: Option<String>) -> Self {
		Self { title: None, body: Some(body) }
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(Some(title.into()));

		self
	}

	pub fn with_body(mut self, body: Option<String>) -> Self {
		self.body = Some(body);

		self
	}

	pub fn is_empty(&self) -> bool {
		self.title.is_none() && self.body.is_none()
	}

	pub fn validated_title(&self) -> Result<Option<Title>, TitleError> {
		match self.title.as_ref() {
			None => Ok(None),
			Some(None) => Err(TitleError::Empty),
			Some(Some(raw)) => Title::parse(raw).map(Some),
		}
	}
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<String>::deserialize(deserializer).map(Some)
}
