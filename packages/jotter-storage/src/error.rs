#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Quota exceeded: owner already holds {limit} notes.")]
	QuotaExceeded { limit: u64 },
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}
