use jotter_domain::{MAX_PER_USER, Note};
use jotter_storage::NoteStore;

use crate::{Actor, Error, Result};

/// What an actor is attempting. Actions on an existing note carry the loaded note, so ownership
/// is decided against stored state rather than client input.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
	Create,
	View(&'a Note),
	Update(&'a Note),
	Archive(&'a Note),
}
impl Action<'_> {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Create => "create",
			Self::View(_) => "view",
			Self::Update(_) => "update",
			Self::Archive(_) => "archive",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
	QuotaExceeded,
	/// The owned-note count could not be read; creation fails closed.
	QuotaUnknown,
	NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
	Allow,
	Deny(Denial),
}
impl Decision {
	pub fn is_allowed(self) -> bool {
		matches!(self, Self::Allow)
	}

	/// Every denial reaches the caller as the same forbidden error.
	pub fn into_result(self) -> Result<()> {
		if self.is_allowed() { Ok(()) } else { Err(Error::forbidden()) }
	}
}

#[derive(Debug, Clone, Copy)]
pub struct NotePolicy {
	max_per_user: u64,
}
impl NotePolicy {
	pub fn new(max_per_user: u64) -> Self {
		Self { max_per_user }
	}

	pub fn max_per_user(&self) -> u64 {
		self.max_per_user
	}

	pub async fn authorize(
		&self,
		store: &dyn NoteStore,
		actor: &Actor,
		action: Action<'_>,
	) -> Decision {
		let decision = match action {
			Action::Create => match store.count_by_owner(actor.id()).await {
				Ok(owned) => self.create(owned),
				Err(err) => {
					tracing::warn!(
						actor_id = actor.id(),
						error = %err,
						"Failed to count owned notes; denying create."
					);

					Decision::Deny(Denial::QuotaUnknown)
				},
			},
			Action::View(note) => Self::view(actor, note),
			Action::Update(note) => Self::update(actor, note),
			Action::Archive(note) => Self::archive(actor, note),
		};

		if let Decision::Deny(reason) = decision {
			tracing::debug!(actor_id = actor.id(), action = action.name(), ?reason, "Policy denied.");
		}

		decision
	}

	pub fn create(&self, owned: u64) -> Decision {
		if owned < self.max_per_user {
			Decision::Allow
		} else {
			Decision::Deny(Denial::QuotaExceeded)
		}
	}

	pub fn view(actor: &Actor, note: &Note) -> Decision {
		Self::owner_only(actor, note)
	}

	pub fn update(actor: &Actor, note: &Note) -> Decision {
		Self::owner_only(actor, note)
	}

	pub fn archive(actor: &Actor, note: &Note) -> Decision {
		Self::owner_only(actor, note)
	}

	fn owner_only(actor: &Actor, note: &Note) -> Decision {
		if note.is_owned_by(actor.id()) { Decision::Allow } else { Decision::Deny(Denial::NotOwner) }
	}
}
impl Default for NotePolicy {
	fn default() -> Self {
		Self::new(MAX_PER_USER)
	}
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use jotter_domain::{NewNote, Title};
	use jotter_storage::{BoxFuture, MemoryNoteStore};

	use super::*;

	struct UnreadableCounts;
	impl NoteStore for UnreadableCounts {
		fn find_by_id<'a>(
			&'a self,
			_id: jotter_domain::NoteId,
		) -> BoxFuture<'a, jotter_storage::Result<Option<Note>>> {
			Box::pin(async { Ok(None) })
		}

		fn count_by_owner<'a>(
			&'a self,
			_owner_id: &'a str,
		) -> BoxFuture<'a, jotter_storage::Result<u64>> {
			Box::pin(async {
				Err(jotter_storage::Error::InvalidArgument("count unavailable".to_string()))
			})
		}

		fn insert<'a>(
			&'a self,
			_note: NewNote,
			_limit: u64,
			_now: time::OffsetDateTime,
		) -> BoxFuture<'a, jotter_storage::Result<Note>> {
			Box::pin(async { Err(jotter_storage::Error::InvalidArgument("read only".to_string())) })
		}

		fn update_content<'a>(
			&'a self,
			_id: jotter_domain::NoteId,
			_patch: &'a jotter_domain::NotePatch,
			_now: time::OffsetDateTime,
		) -> BoxFuture<'a, jotter_storage::Result<Note>> {
			Box::pin(async { Err(jotter_storage::Error::InvalidArgument("read only".to_string())) })
		}

		fn archive<'a>(
			&'a self,
			_id: jotter_domain::NoteId,
			_now: time::OffsetDateTime,
		) -> BoxFuture<'a, jotter_storage::Result<Option<Note>>> {
			Box::pin(async { Ok(None) })
		}

		fn query_page<'a>(
			&'a self,
			query: &'a jotter_domain::NoteQuery,
		) -> BoxFuture<'a, jotter_storage::Result<jotter_domain::Page<Note>>> {
			Box::pin(async move { Ok(query.empty_page(0)) })
		}
	}

	fn actor(id: &str) -> Actor {
		Actor::new(id).expect("non-empty actor id")
	}

	fn note_of(owner: &str) -> Note {
		NewNote::new(owner, Title::parse("t").expect("valid title"), None)
			.into_note(1, datetime!(2026-01-01 00:00 UTC))
	}

	#[test]
	fn create_allowed_strictly_below_limit() {
		let policy = NotePolicy::default();

		assert_eq!(policy.create(MAX_PER_USER - 1), Decision::Allow);
		assert_eq!(policy.create(MAX_PER_USER), Decision::Deny(Denial::QuotaExceeded));
		assert_eq!(policy.create(MAX_PER_USER + 1), Decision::Deny(Denial::QuotaExceeded));
	}

	#[tokio::test]
	async fn authorize_routes_note_actions_through_ownership() {
		let store = MemoryNoteStore::new();
		let note = note_of("alice");
		let policy = NotePolicy::default();

		for action in [Action::View(&note), Action::Update(&note), Action::Archive(&note)] {
			assert!(policy.authorize(&store, &actor("alice"), action).await.is_allowed());
			assert_eq!(
				policy.authorize(&store, &actor("bob"), action).await,
				Decision::Deny(Denial::NotOwner),
				"{} must be owner-only",
				action.name()
			);
		}
	}

	#[test]
	fn update_and_archive_require_ownership() {
		let note = note_of("alice");

		assert!(NotePolicy::update(&actor("alice"), &note).is_allowed());
		assert!(NotePolicy::archive(&actor("alice"), &note).is_allowed());
		assert_eq!(NotePolicy::update(&actor("bob"), &note), Decision::Deny(Denial::NotOwner));
		assert_eq!(NotePolicy::archive(&actor("bob"), &note), Decision::Deny(Denial::NotOwner));
	}

	#[tokio::test]
	async fn create_fails_closed_when_count_is_unavailable() {
		let decision =
			NotePolicy::default().authorize(&UnreadableCounts, &actor("alice"), Action::Create).await;

		assert_eq!(decision, Decision::Deny(Denial::QuotaUnknown));
		assert!(matches!(decision.into_result(), Err(Error::Forbidden { .. })));
	}

	#[tokio::test]
	async fn create_uses_the_owned_count() {
		let store = MemoryNoteStore::new();
		let policy = NotePolicy::new(1);
		let alice = actor("alice");

		assert!(policy.authorize(&store, &alice, Action::Create).await.is_allowed());

		store
			.insert(
				NewNote::new("alice", Title::parse("only").expect("valid title"), None),
				1,
				datetime!(2026-01-01 00:00 UTC),
			)
			.await
			.expect("insert");

		assert_eq!(
			policy.authorize(&store, &alice, Action::Create).await,
			Decision::Deny(Denial::QuotaExceeded)
		);
		assert!(policy.authorize(&store, &actor("bob"), Action::Create).await.is_allowed());
	}
}
