//! Disposable Postgres databases carrying the notes schema, for tests that need the real backend.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use jotter_config::Postgres;
use jotter_storage::{PgNoteStore, db::Db};

pub const DSN_ENV: &str = "JOTTER_PG_DSN";

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];
const STORE_POOL_CONNS: u32 = 4;

/// One uniquely named notes database. Dropped on [`TestDatabase::cleanup`], or on drop as a
/// fallback when a test panics first.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	/// `None` when [`DSN_ENV`] is unset, so callers can skip instead of failing.
	pub async fn from_env() -> Result<Option<Self>> {
		let Some(base_dsn) = env_dsn() else {
			eprintln!("Skipping Postgres-backed test; set {DSN_ENV} to run it.");

			return Ok(None);
		};

		Self::new(&base_dsn).await.map(Some)
	}

	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn).map_err(Error::InvalidDsn)?;
		let (admin, mut conn) = connect_admin(&base).await?;
		let name = format!("jotter_notes_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await.map_err(|source| {
			Error::Admin { action: "create", name: name.clone(), source }
		})?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Storage settings pointing at this database.
	pub fn postgres(&self, pool_max_conns: u32) -> Postgres {
		Postgres { dsn: self.dsn.clone(), pool_max_conns }
	}

	/// A note store over this database with the schema already bootstrapped.
	pub async fn note_store(&self) -> Result<PgNoteStore> {
		let db = Db::connect(&self.postgres(STORE_POOL_CONNS)).await?;

		db.ensure_schema().await?;

		Ok(PgNoteStore::from_db(&db))
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin = self.admin.clone();
		// The test's runtime may already be shutting down, so the drop runs on its own.
		let worker = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|runtime| {
					runtime.block_on(drop_database(&name, &admin)).map_err(|err| err.to_string())
				});

			if let Err(err) = result {
				eprintln!("Failed to drop test database {name}: {err}.");
			}
		});
		let _ = worker.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

async fn connect_admin(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut failures = Vec::new();

	for database in ADMIN_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => failures.push(format!("{database}: {err}")),
		}
	}

	Err(Error::AdminUnavailable(failures.join("; ")))
}

async fn drop_database(name: &str, admin: &PgConnectOptions) -> Result<()> {
	let admin_error =
		|source| Error::Admin { action: "drop", name: name.to_string(), source };
	let mut conn = PgConnection::connect_with(admin).await.map_err(admin_error)?;

	// Pools from the test may still hold connections.
	sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.execute(&mut conn)
	.await
	.map_err(admin_error)?;
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str())
		.await
		.map_err(admin_error)?;

	Ok(())
}
