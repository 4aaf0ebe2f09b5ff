use std::cmp::Ordering;

use crate::note::Note;

pub const PAGE_SIZE: u32 = 5;

/// Which archive state a listing is restricted to. Listings default to active notes only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchivedFilter {
	#[default]
	Active,
	Archived,
	Any,
}
impl ArchivedFilter {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"0" | "false" => Some(Self::Active),
			"1" | "true" => Some(Self::Archived),
			"all" => Some(Self::Any),
			_ => None,
		}
	}

	/// The query-string form, so a parsed filter can be written back into links.
	pub fn as_query_value(self) -> &'static str {
		match self {
			Self::Active => "0",
			Self::Archived => "1",
			Self::Any => "all",
		}
	}

	/// `None` means no restriction on the archived column.
	pub fn archived(self) -> Option<bool> {
		match self {
			Self::Active => Some(false),
			Self::Archived => Some(true),
			Self::Any => None,
		}
	}

	pub fn matches(self, archived: bool) -> bool {
		self.archived().is_none_or(|wanted| wanted == archived)
	}
}

/// Filters for one page of a listing, combined with AND. The owner restriction cannot be
/// left out: there is no constructor without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
	owner_id: String,
	archived: ArchivedFilter,
	search: Option<String>,
	page: u32,
	per_page: u32,
}
impl NoteQuery {
	pub fn for_owner(owner_id: impl Into<String>) -> Self {
		Self {
			owner_id: owner_id.into(),
			archived: ArchivedFilter::default(),
			search: None,
			page: 1,
			per_page: PAGE_SIZE,
		}
	}

	pub fn archived(mut self, filter: ArchivedFilter) -> Self {
		self.archived = filter;

		self
	}

	/// Blank terms are treated as no search at all.
	pub fn search(mut self, term: Option<&str>) -> Self {
		self.search = term.map(str::trim).filter(|term| !term.is_empty()).map(str::to_string);

		self
	}

	pub fn page(mut self, page: u32) -> Self {
		self.page = page.max(1);

		self
	}

	pub fn owner_id(&self) -> &str {
		&self.owner_id
	}

	pub fn archived_filter(&self) -> ArchivedFilter {
		self.archived
	}

	pub fn search_term(&self) -> Option<&str> {
		self.search.as_deref()
	}

	pub fn current_page(&self) -> u32 {
		self.page
	}

	pub fn per_page(&self) -> u32 {
		self.per_page
	}

	pub fn offset(&self) -> u64 {
		u64::from(self.page - 1) * u64::from(self.per_page)
	}

	/// Reference semantics of the filter set. Storage backends that cannot evaluate this
	/// directly must produce the same rows.
	pub fn matches(&self, note: &Note) -> bool {
		if note.owner_id() != self.owner_id {
			return false;
		}
		if !self.archived.matches(note.is_archived()) {
			return false;
		}

		match self.search.as_deref() {
			None => true,
			Some(term) => {
				let needle = term.to_lowercase();

				note.title().to_lowercase().contains(&needle)
					|| note.body().is_some_and(|body| body.to_lowercase().contains(&needle))
			},
		}
	}

	pub fn empty_page<T>(&self, total: u64) -> Page<T> {
		Page { items: Vec::new(), total, current_page: self.page, per_page: self.per_page }
	}

	pub fn into_page<T>(&self, items: Vec<T>, total: u64) -> Page<T> {
		Page { items, total, current_page: self.page, per_page: self.per_page }
	}
}

/// Most recent first, ties broken by the higher id.
pub fn listing_order(a: &Note, b: &Note) -> Ordering {
	b.created_at().cmp(&a.created_at()).then_with(|| b.id().cmp(&a.id()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: u64,
	pub current_page: u32,
	pub per_page: u32,
}
impl<T> Page<T> {
	pub fn last_page(&self) -> u32 {
		let pages = self.total.div_ceil(u64::from(self.per_page.max(1)));

		u32::try_from(pages).unwrap_or(u32::MAX).max(1)
	}

	/// 1-based position of the first item on this page.
	pub fn from(&self) -> Option<u64> {
		if self.items.is_empty() {
			return None;
		}

		Some(u64::from(self.current_page - 1) * u64::from(self.per_page) + 1)
	}

	pub fn to(&self) -> Option<u64> {
		self.from().map(|from| from + self.items.len() as u64 - 1)
	}

	pub fn prev_page(&self) -> Option<u32> {
		(self.current_page > 1).then(|| self.current_page - 1)
	}

	pub fn next_page(&self) -> Option<u32> {
		(self.current_page < self.last_page()).then(|| self.current_page + 1)
	}

	pub fn map<U, F>(self, f: F) -> Page<U>
	where
		F: FnMut(T) -> U,
	{
		Page {
			items: self.items.into_iter().map(f).collect(),
			total: self.total,
			current_page: self.current_page,
			per_page: self.per_page,
		}
	}
}
