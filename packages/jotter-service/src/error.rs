use jotter_domain::TitleError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) const FORBIDDEN_MESSAGE: &str = "This action is unauthorized.";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Input rejected before anything was written. `fields` names every offending field.
	#[error("Validation failed: {message}")]
	Validation { fields: Vec<String>, message: String },
	#[error("Forbidden: {message}")]
	Forbidden { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn forbidden() -> Self {
		Self::Forbidden { message: FORBIDDEN_MESSAGE.to_string() }
	}

	pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
		Self::Validation { fields: vec![field.to_string()], message: message.into() }
	}
}

impl From<TitleError> for Error {
	fn from(err: TitleError) -> Self {
		Self::validation("title", err.to_string())
	}
}

impl From<jotter_storage::Error> for Error {
	fn from(err: jotter_storage::Error) -> Self {
		match err {
			jotter_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			jotter_storage::Error::NotFound(message) => Self::NotFound { message },
			jotter_storage::Error::QuotaExceeded { .. } => Self::forbidden(),
			jotter_storage::Error::InvalidArgument(message) => Self::Storage { message },
		}
	}
}
