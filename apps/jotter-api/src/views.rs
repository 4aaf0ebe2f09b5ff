use serde::Serialize;
use time::OffsetDateTime;

use jotter_domain::{ArchivedFilter, Note, NoteId, Page};
use jotter_service::ListNotes;

pub const NOTES_PATH: &str = "/notes";

#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
	pub id: NoteId,
	pub title: String,
	pub body: Option<String>,
	pub archived: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Note> for NoteView {
	fn from(note: Note) -> Self {
		Self {
			id: note.id(),
			title: note.title().to_string(),
			body: note.body().map(str::to_string),
			archived: note.is_archived(),
			created_at: note.created_at(),
			updated_at: note.updated_at(),
		}
	}
}

/// Single-resource envelope: `{"data": {...}}`.
#[derive(Debug, Serialize)]
pub struct NoteEnvelope {
	pub data: NoteView,
}
impl From<Note> for NoteEnvelope {
	fn from(note: Note) -> Self {
		Self { data: note.into() }
	}
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
	pub data: Vec<NoteView>,
	pub links: PageLinks,
	pub meta: PageMeta,
}
impl ListResponse {
	pub fn new(req: &ListNotes, page: Page<Note>) -> Self {
		let page = page.map(NoteView::from);
		let link = |number: u32| page_url(req, number);
		let links = PageLinks {
			first: link(1),
			last: link(page.last_page()),
			prev: page.prev_page().map(link),
			next: page.next_page().map(link),
		};
		let meta = PageMeta {
			current_page: page.current_page,
			from: page.from(),
			last_page: page.last_page(),
			path: NOTES_PATH.to_string(),
			per_page: page.per_page,
			to: page.to(),
			total: page.total,
		};

		Self { data: page.items, links, meta }
	}
}

#[derive(Debug, Serialize)]
pub struct PageLinks {
	pub first: String,
	pub last: String,
	pub prev: Option<String>,
	pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
	pub current_page: u32,
	pub from: Option<u64>,
	pub last_page: u32,
	pub path: String,
	pub per_page: u32,
	pub to: Option<u64>,
	pub total: u64,
}

/// Page links keep the caller's filters so following them stays inside the same listing.
fn page_url(req: &ListNotes, page: u32) -> String {
	let mut url = format!("{NOTES_PATH}?");

	if req.archived != ArchivedFilter::default() {
		url.push_str("archived=");
		url.push_str(req.archived.as_query_value());
		url.push('&');
	}
	if let Some(search) = req.search.as_deref().map(str::trim).filter(|term| !term.is_empty()) {
		url.push_str("search=");
		url.push_str(&urlencoding::encode(search));
		url.push('&');
	}

	url.push_str("page=");
	url.push_str(&page.to_string());

	url
}
