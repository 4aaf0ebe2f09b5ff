use axum::{
	extract::FromRequestParts,
	http::{
		HeaderMap, HeaderName,
		header::{AUTHORIZATION, InvalidHeaderName},
		request::Parts,
	},
};

use crate::{routes::ApiError, state::AppState};
use jotter_service::Actor;

/// How a request proves who it runs as.
#[derive(Debug, Clone)]
pub struct AuthSettings {
	pub user_header: HeaderName,
	/// Shared gateway token. `None` skips the bearer check.
	pub bearer_token: Option<String>,
}
impl AuthSettings {
	pub fn new(security: &jotter_config::Security) -> Result<Self, InvalidHeaderName> {
		Ok(Self {
			user_header: HeaderName::from_bytes(security.user_header.trim().as_bytes())?,
			bearer_token: security.api_auth_token.clone(),
		})
	}

	pub fn authenticate(&self, headers: &HeaderMap) -> Result<Actor, ApiError> {
		if let Some(expected) = self.bearer_token.as_deref()
			&& !read_bearer_token(headers).is_some_and(|token| token == expected)
		{
			return Err(ApiError::unauthenticated());
		}

		headers
			.get(&self.user_header)
			.and_then(|raw| raw.to_str().ok())
			.and_then(Actor::new)
			.ok_or_else(ApiError::unauthenticated)
	}
}

/// Extracts the acting user, rejecting the request with 401 before the handler runs.
pub struct Authenticated(pub Actor);

impl FromRequestParts<AppState> for Authenticated {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		state.auth.authenticate(&parts.headers).map(Self)
	}
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}
