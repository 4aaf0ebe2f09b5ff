//! Turns a listing request into the filter set a store evaluates.

use jotter_domain::NoteQuery;

use crate::{Actor, ListNotes};

/// The owner filter always comes from the actor, never from request input.
pub fn build(actor: &Actor, req: &ListNotes) -> NoteQuery {
	NoteQuery::for_owner(actor.id())
		.archived(req.archived)
		.search(req.search.as_deref())
		.page(req.page)
}

#[cfg(test)]
mod tests {
	use jotter_domain::{ArchivedFilter, PAGE_SIZE};

	use super::*;

	#[test]
	fn defaults_to_active_first_page_of_the_actor() {
		let actor = Actor::new("alice").expect("non-empty actor id");
		let query = build(&actor, &ListNotes::default());

		assert_eq!(query.owner_id(), "alice");
		assert_eq!(query.archived_filter(), ArchivedFilter::Active);
		assert_eq!(query.search_term(), None);
		assert_eq!(query.current_page(), 1);
		assert_eq!(query.per_page(), PAGE_SIZE);
	}

	#[test]
	fn carries_every_requested_filter() {
		let actor = Actor::new("alice").expect("non-empty actor id");
		let req = ListNotes {
			archived: ArchivedFilter::Archived,
			search: Some("  Laravel ".to_string()),
			page: 3,
		};
		let query = build(&actor, &req);

		assert_eq!(query.archived_filter(), ArchivedFilter::Archived);
		assert_eq!(query.search_term(), Some("Laravel"));
		assert_eq!(query.current_page(), 3);
	}
}
