use time::OffsetDateTime;

use jotter_domain::Note;

pub(crate) const NOTE_COLUMNS: &str = "id, owner_id, title, body, archived, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub struct NoteRow {
	pub id: i64,
	pub owner_id: String,
	pub title: String,
	pub body: Option<String>,
	pub archived: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl From<NoteRow> for Note {
	fn from(row: NoteRow) -> Self {
		Note::hydrate(
			row.id,
			row.owner_id,
			row.title,
			row.body,
			row.archived,
			row.created_at,
			row.updated_at,
		)
	}
}
