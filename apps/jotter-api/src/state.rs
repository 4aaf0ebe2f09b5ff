use std::sync::Arc;

use color_eyre::eyre;

use crate::auth::AuthSettings;
use jotter_config::{Config, Security, StorageBackend};
use jotter_service::NoteService;
use jotter_storage::{MemoryNoteStore, NoteStore, PgNoteStore, db::Db};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NoteService>,
	pub auth: Arc<AuthSettings>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let store: Arc<dyn NoteStore> = match config.storage.backend {
			StorageBackend::Postgres => {
				let postgres = config.storage.postgres.as_ref().ok_or_else(|| {
					eyre::eyre!("storage.postgres is required when storage.backend is postgres.")
				})?;
				let db = Db::connect(postgres).await?;

				db.ensure_schema().await?;

				Arc::new(PgNoteStore::from_db(&db))
			},
			StorageBackend::Memory => {
				tracing::warn!("Using in-memory storage. Notes are lost on restart.");

				Arc::new(MemoryNoteStore::new())
			},
		};

		Self::with_service(&config.security, NoteService::new(store))
	}

	pub fn with_service(security: &Security, service: NoteService) -> color_eyre::Result<Self> {
		let auth = AuthSettings::new(security)?;

		Ok(Self { service: Arc::new(service), auth: Arc::new(auth) })
	}
}
