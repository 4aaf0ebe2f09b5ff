use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::{
	BoxFuture, Error, NoteStore, Result,
	db::Db,
	models::{NOTE_COLUMNS, NoteRow},
};
use jotter_domain::{NewNote, Note, NoteId, NotePatch, NoteQuery, Page};

/// First key of the two-key advisory lock serializing note creation per owner.
const QUOTA_LOCK_CLASS: i32 = 7_301;

#[derive(Clone)]
pub struct PgNoteStore {
	pool: PgPool,
}
impl PgNoteStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}

	pub fn from_db(db: &Db) -> Self {
		Self::new(db.pool.clone())
	}
}

impl NoteStore for PgNoteStore {
	fn find_by_id<'a>(&'a self, id: NoteId) -> BoxFuture<'a, Result<Option<Note>>> {
		Box::pin(find_by_id(&self.pool, id))
	}

	fn count_by_owner<'a>(&'a self, owner_id: &'a str) -> BoxFuture<'a, Result<u64>> {
		Box::pin(count_by_owner(&self.pool, owner_id))
	}

	fn insert<'a>(
		&'a self,
		note: NewNote,
		limit: u64,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Note>> {
		Box::pin(insert(&self.pool, note, limit, now))
	}

	fn update_content<'a>(
		&'a self,
		id: NoteId,
		patch: &'a NotePatch,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Note>> {
		Box::pin(update_content(&self.pool, id, patch, now))
	}

	fn archive<'a>(
		&'a self,
		id: NoteId,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Option<Note>>> {
		Box::pin(archive(&self.pool, id, now))
	}

	fn query_page<'a>(&'a self, query: &'a NoteQuery) -> BoxFuture<'a, Result<Page<Note>>> {
		Box::pin(query_page(&self.pool, query))
	}
}

async fn find_by_id(pool: &PgPool, id: NoteId) -> Result<Option<Note>> {
	let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1");
	let row: Option<NoteRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;

	Ok(row.map(Note::from))
}

async fn count_by_owner(pool: &PgPool, owner_id: &str) -> Result<u64> {
	let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE owner_id = $1")
		.bind(owner_id)
		.fetch_one(pool)
		.await?;

	Ok(count.max(0) as u64)
}

async fn insert(pool: &PgPool, note: NewNote, limit: u64, now: OffsetDateTime) -> Result<Note> {
	let mut tx = pool.begin().await?;

	// Held until commit or rollback, so concurrent creates for one owner see each other's rows.
	sqlx::query("SELECT pg_advisory_xact_lock($1, hashtext($2))")
		.bind(QUOTA_LOCK_CLASS)
		.bind(note.owner_id.as_str())
		.execute(&mut *tx)
		.await?;

	let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE owner_id = $1")
		.bind(note.owner_id.as_str())
		.fetch_one(&mut *tx)
		.await?;

	if count.max(0) as u64 >= limit {
		return Err(Error::QuotaExceeded { limit });
	}

	let sql = format!(
		"\
INSERT INTO notes (owner_id, title, body, archived, created_at, updated_at)
VALUES ($1, $2, $3, FALSE, $4, $4)
RETURNING {NOTE_COLUMNS}"
	);
	let row: NoteRow = sqlx::query_as(&sql)
		.bind(note.owner_id.as_str())
		.bind(note.title.as_str())
		.bind(note.body.as_deref())
		.bind(now)
		.fetch_one(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(row.into())
}

async fn update_content(
	pool: &PgPool,
	id: NoteId,
	patch: &NotePatch,
	now: OffsetDateTime,
) -> Result<Note> {
	let title = patch.validated_title().map_err(|err| Error::InvalidArgument(err.to_string()))?;
	let mut update = QueryBuilder::<Postgres>::new("UPDATE notes SET updated_at = ");

	update.push_bind(now);

	if let Some(title) = title {
		update.push(", title = ");
		update.push_bind(title.into_inner());
	}
	if let Some(body) = patch.body.as_ref() {
		update.push(", body = ");
		update.push_bind(body.clone());
	}

	update.push(" WHERE id = ");
	update.push_bind(id);
	update.push(format!(" RETURNING {NOTE_COLUMNS}"));

	let row: Option<NoteRow> = update.build_query_as().fetch_optional(pool).await?;

	row.map(Note::from).ok_or_else(|| Error::NotFound(format!("Note {id} does not exist.")))
}

async fn archive(pool: &PgPool, id: NoteId, now: OffsetDateTime) -> Result<Option<Note>> {
	let sql = format!(
		"\
UPDATE notes
SET archived = TRUE, updated_at = $2
WHERE id = $1 AND archived = FALSE
RETURNING {NOTE_COLUMNS}"
	);
	let row: Option<NoteRow> = sqlx::query_as(&sql).bind(id).bind(now).fetch_optional(pool).await?;

	Ok(row.map(Note::from))
}

async fn query_page(pool: &PgPool, query: &NoteQuery) -> Result<Page<Note>> {
	let mut count = QueryBuilder::new("SELECT COUNT(*) FROM notes");

	push_filters(&mut count, query);

	let total: i64 = count.build_query_scalar().fetch_one(pool).await?;
	let total = total.max(0) as u64;

	if query.offset() >= total {
		return Ok(query.empty_page(total));
	}

	let offset = i64::try_from(query.offset())
		.map_err(|_| Error::InvalidArgument("Page offset is out of range.".to_string()))?;
	let mut select = QueryBuilder::new(format!("SELECT {NOTE_COLUMNS} FROM notes"));

	push_filters(&mut select, query);

	select.push(" ORDER BY created_at DESC, id DESC LIMIT ");
	select.push_bind(i64::from(query.per_page()));
	select.push(" OFFSET ");
	select.push_bind(offset);

	let rows: Vec<NoteRow> = select.build_query_as().fetch_all(pool).await?;

	Ok(query.into_page(rows.into_iter().map(Note::from).collect(), total))
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &NoteQuery) {
	builder.push(" WHERE owner_id = ");
	builder.push_bind(query.owner_id().to_string());

	if let Some(archived) = query.archived_filter().archived() {
		builder.push(" AND archived = ");
		builder.push_bind(archived);
	}
	if let Some(term) = query.search_term() {
		let pattern = format!("%{}%", escape_like(term));

		builder.push(" AND (title ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" ESCAPE '\\' OR body ILIKE ");
		builder.push_bind(pattern);
		builder.push(" ESCAPE '\\')");
	}
}

/// Makes `%`, `_` and `\` match literally inside an `ILIKE` pattern.
fn escape_like(term: &str) -> String {
	let mut escaped = String::with_capacity(term.len());

	for ch in term.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			escaped.push('\\');
		}

		escaped.push(ch);
	}

	escaped
}
