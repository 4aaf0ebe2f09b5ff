use time::{Duration, OffsetDateTime};

use jotter_domain::{ArchivedFilter, NewNote, NotePatch, NoteQuery, Title};
use jotter_storage::{Error, NoteStore, PgNoteStore, db::Db};
use jotter_testkit::TestDatabase;

fn new_note(owner: &str, title: &str, body: Option<&str>) -> NewNote {
	NewNote::new(owner, Title::parse(title).expect("valid title"), body.map(str::to_string))
}

async fn test_store() -> Option<(TestDatabase, PgNoteStore)> {
	let test_db = TestDatabase::from_env().await.expect("Failed to create test database.")?;
	let store = test_db.note_store().await.expect("Failed to prepare note store.");

	Some((test_db, store))
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTTER_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some((test_db, _store)) = test_store().await else {
		return;
	};
	let db = Db::connect(&test_db.postgres(1)).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Schema bootstrap must be idempotent.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTTER_PG_DSN to run."]
async fn insert_and_find_round_trip() {
	let Some((test_db, store)) = test_store().await else {
		return;
	};
	let now = OffsetDateTime::now_utc();
	let note = store
		.insert(new_note("alice", "My first note", Some("Some content")), 100, now)
		.await
		.expect("Failed to insert note.");
	let found = store.find_by_id(note.id()).await.expect("Failed to load note.");

	assert_eq!(found.as_ref().map(|note| note.title()), Some("My first note"));
	assert_eq!(found.as_ref().and_then(|note| note.body()), Some("Some content"));
	assert!(!note.is_archived());
	assert_eq!(store.find_by_id(note.id() + 1_000).await.expect("Failed to query."), None);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTTER_PG_DSN to run."]
async fn concurrent_inserts_never_exceed_limit() {
	let Some((test_db, store)) = test_store().await else {
		return;
	};
	let now = OffsetDateTime::now_utc();
	let attempts = (0..8).map(|i| {
		let store = store.clone();

		async move { store.insert(new_note("alice", &format!("n{i}"), None), 3, now).await }
	});
	let mut handles = Vec::new();

	for attempt in attempts {
		handles.push(tokio::spawn(attempt));
	}

	let mut quota_errors = 0;

	for handle in handles {
		match handle.await.expect("Insert task panicked.") {
			Ok(_) => {},
			Err(Error::QuotaExceeded { limit: 3 }) => quota_errors += 1,
			Err(err) => panic!("Unexpected insert error: {err}"),
		}
	}

	assert_eq!(quota_errors, 5);
	assert_eq!(store.count_by_owner("alice").await.expect("Failed to count."), 3);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTTER_PG_DSN to run."]
async fn query_page_matches_in_memory_semantics() {
	let Some((test_db, store)) = test_store().await else {
		return;
	};
	let base = OffsetDateTime::now_utc();

	store
		.insert(new_note("alice", "Laravel notes", None), 100, base)
		.await
		.expect("Failed to insert.");
	store
		.insert(new_note("alice", "API", Some("mentions LARAVEL in the body")), 100, base)
		.await
		.expect("Failed to insert.");
	store
		.insert(new_note("alice", "100% literal_match", None), 100, base + Duration::seconds(1))
		.await
		.expect("Failed to insert.");

	let archived = store
		.insert(new_note("alice", "Laravel archived", None), 100, base + Duration::seconds(2))
		.await
		.expect("Failed to insert.");

	store.archive(archived.id(), base + Duration::seconds(3)).await.expect("Failed to archive.");
	store
		.insert(new_note("bob", "Laravel for bob", None), 100, base)
		.await
		.expect("Failed to insert.");

	let search = NoteQuery::for_owner("alice").search(Some("laravel"));
	let page = store.query_page(&search).await.expect("Failed to query.");
	let titles = page.items.iter().map(|note| note.title()).collect::<Vec<_>>();

	// Equal timestamps fall back to the higher id first.
	assert_eq!(titles, vec!["API", "Laravel notes"]);

	let page = store
		.query_page(&search.clone().archived(ArchivedFilter::Any))
		.await
		.expect("Failed to query.");

	assert_eq!(page.total, 3);

	let literal = NoteQuery::for_owner("alice").search(Some("0%_l"));
	let page = store.query_page(&literal).await.expect("Failed to query.");

	assert_eq!(page.total, 0);

	let literal = NoteQuery::for_owner("alice").search(Some("100% literal_"));
	let page = store.query_page(&literal).await.expect("Failed to query.");

	assert_eq!(page.total, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTTER_PG_DSN to run."]
async fn content_and_archive_writes_touch_only_their_columns() {
	let Some((test_db, store)) = test_store().await else {
		return;
	};
	let base = OffsetDateTime::now_utc();
	let note = store
		.insert(new_note("alice", "Draft", Some("Keep me")), 100, base)
		.await
		.expect("Failed to insert.");
	let archived = store
		.archive(note.id(), base + Duration::seconds(1))
		.await
		.expect("Failed to archive.")
		.expect("Note should be newly archived.");

	assert!(archived.is_archived());
	assert_eq!(
		store.archive(note.id(), base + Duration::seconds(2)).await.expect("Failed to archive."),
		None
	);

	let updated = store
		.update_content(note.id(), &NotePatch::title("Final"), base + Duration::seconds(3))
		.await
		.expect("Failed to update.");

	assert!(updated.is_archived());
	assert_eq!(updated.title(), "Final");
	assert_eq!(updated.body(), Some("Keep me"));

	let cleared = store
		.update_content(note.id(), &NotePatch::body(None), base + Duration::seconds(4))
		.await
		.expect("Failed to update.");

	assert_eq!(cleared.title(), "Final");
	assert_eq!(cleared.body(), None);

	let err = store
		.update_content(note.id() + 1_000, &NotePatch::title("Ghost"), base)
		.await
		.expect_err("Unknown note must not be updated.");

	assert!(matches!(err, Error::NotFound(_)));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
