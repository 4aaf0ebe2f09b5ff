use time::{Duration, OffsetDateTime, macros::datetime};

use jotter_domain::{ArchivedFilter, NewNote, NotePatch, NoteQuery, Title};
use jotter_storage::{Error, MemoryNoteStore, NoteStore};

const T0: OffsetDateTime = datetime!(2026-05-01 09:00 UTC);

fn new_note(owner: &str, title: &str, body: Option<&str>) -> NewNote {
	NewNote::new(owner, Title::parse(title).expect("valid title"), body.map(str::to_string))
}

#[tokio::test]
async fn insert_assigns_increasing_ids() {
	let store = MemoryNoteStore::new();
	let first = store.insert(new_note("alice", "one", None), 100, T0).await.expect("insert");
	let second = store.insert(new_note("bob", "two", None), 100, T0).await.expect("insert");

	assert!(second.id() > first.id());
	assert_eq!(store.len(), 2);
	assert_eq!(store.find_by_id(first.id()).await.expect("find"), Some(first));
}

#[tokio::test]
async fn insert_refuses_once_owner_reaches_limit() {
	let store = MemoryNoteStore::new();

	for i in 0..3 {
		store.insert(new_note("alice", &format!("n{i}"), None), 3, T0).await.expect("insert");
	}

	let err = store.insert(new_note("alice", "extra", None), 3, T0).await.expect_err("over limit");

	assert!(matches!(err, Error::QuotaExceeded { limit: 3 }));
	assert_eq!(store.count_by_owner("alice").await.expect("count"), 3);

	store.insert(new_note("bob", "other owner", None), 3, T0).await.expect("bob is under limit");
}

#[tokio::test]
async fn archived_notes_still_count_toward_the_limit() {
	let store = MemoryNoteStore::new();
	let note = store.insert(new_note("alice", "old", None), 1, T0).await.expect("insert");

	store.archive(note.id(), T0 + Duration::minutes(1)).await.expect("archive");

	let err = store.insert(new_note("alice", "new", None), 1, T0).await.expect_err("at limit");

	assert!(matches!(err, Error::QuotaExceeded { .. }));
}

#[tokio::test]
async fn update_content_writes_only_patched_fields() {
	let store = MemoryNoteStore::new();
	let note =
		store.insert(new_note("alice", "draft", Some("keep")), 100, T0).await.expect("insert");

	store.archive(note.id(), T0 + Duration::minutes(1)).await.expect("archive");

	let updated = store
		.update_content(note.id(), &NotePatch::title("final"), T0 + Duration::minutes(5))
		.await
		.expect("update");
	let stored = store.find_by_id(note.id()).await.expect("find").expect("present");

	assert_eq!(updated, stored);
	assert_eq!(stored.title(), "final");
	assert_eq!(stored.body(), Some("keep"));
	assert!(stored.is_archived());
	assert_eq!(stored.updated_at(), T0 + Duration::minutes(5));
}

#[tokio::test]
async fn update_content_rejects_unknown_notes_and_invalid_titles() {
	let store = MemoryNoteStore::new();
	let err = store.update_content(42, &NotePatch::title("x"), T0).await.expect_err("unknown id");

	assert!(matches!(err, Error::NotFound(_)));

	let note = store.insert(new_note("alice", "draft", None), 100, T0).await.expect("insert");
	let err = store.update_content(note.id(), &NotePatch::title("  "), T0).await;

	assert!(matches!(err, Err(Error::InvalidArgument(_))));
	assert_eq!(store.find_by_id(note.id()).await.expect("find"), Some(note));
}

#[tokio::test]
async fn archive_writes_once() {
	let store = MemoryNoteStore::new();
	let note = store.insert(new_note("alice", "draft", None), 100, T0).await.expect("insert");
	let archived = store
		.archive(note.id(), T0 + Duration::minutes(1))
		.await
		.expect("archive")
		.expect("newly archived");

	assert!(archived.is_archived());
	assert_eq!(archived.title(), "draft");
	assert_eq!(archived.updated_at(), T0 + Duration::minutes(1));
	assert_eq!(store.archive(note.id(), T0 + Duration::minutes(2)).await.expect("archive"), None);
	assert_eq!(store.find_by_id(note.id()).await.expect("find"), Some(archived));
	assert_eq!(store.archive(404, T0).await.expect("archive"), None);
}

#[tokio::test]
async fn query_page_filters_sorts_and_paginates() {
	let store = MemoryNoteStore::new();

	for i in 0..7 {
		store
			.insert(new_note("alice", &format!("note {i}"), None), 100, T0 + Duration::minutes(i))
			.await
			.expect("insert");
	}

	let archived = store
		.insert(new_note("alice", "archived", None), 100, T0 + Duration::hours(1))
		.await
		.expect("insert");

	store.archive(archived.id(), T0 + Duration::hours(2)).await.expect("archive");
	store.insert(new_note("bob", "bob's", None), 100, T0).await.expect("insert");

	let first = store.query_page(&NoteQuery::for_owner("alice")).await.expect("page 1");
	let titles = first.items.iter().map(|note| note.title()).collect::<Vec<_>>();

	assert_eq!(first.total, 7);
	assert_eq!(titles, vec!["note 6", "note 5", "note 4", "note 3", "note 2"]);

	let second = store.query_page(&NoteQuery::for_owner("alice").page(2)).await.expect("page 2");
	let titles = second.items.iter().map(|note| note.title()).collect::<Vec<_>>();

	assert_eq!(titles, vec!["note 1", "note 0"]);

	let beyond = store.query_page(&NoteQuery::for_owner("alice").page(9)).await.expect("page 9");

	assert!(beyond.items.is_empty());
	assert_eq!(beyond.total, 7);

	let only_archived = store
		.query_page(&NoteQuery::for_owner("alice").archived(ArchivedFilter::Archived))
		.await
		.expect("archived page");

	assert_eq!(only_archived.total, 1);
	assert_eq!(only_archived.items[0].title(), "archived");
}
