pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("JOTTER_PG_DSN is not a valid Postgres DSN: {0}")]
	InvalidDsn(#[source] sqlx::Error),
	#[error("No admin database is reachable: {0}")]
	AdminUnavailable(String),
	#[error("Failed to {action} test database {name}: {source}")]
	Admin { action: &'static str, name: String, source: sqlx::Error },
	#[error(transparent)]
	Storage(#[from] jotter_storage::Error),
}
