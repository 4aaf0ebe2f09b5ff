use jotter_domain::{ArchivedFilter, Note, Page};

use crate::{Actor, NoteService, Result, query};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotes {
	pub archived: ArchivedFilter,
	pub search: Option<String>,
	/// 1-based. Zero is read as the first page.
	pub page: u32,
}
impl Default for ListNotes {
	fn default() -> Self {
		Self { archived: ArchivedFilter::default(), search: None, page: 1 }
	}
}

impl NoteService {
	pub async fn list(&self, actor: &Actor, req: ListNotes) -> Result<Page<Note>> {
		let query = query::build(actor, &req);
		let page = self.store.query_page(&query).await?;

		tracing::debug!(
			actor_id = actor.id(),
			total = page.total,
			page = page.current_page,
			"Listed notes."
		);

		Ok(page)
	}
}
