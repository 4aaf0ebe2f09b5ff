use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
	auth::Authenticated,
	state::AppState,
	views::{ListResponse, NoteEnvelope},
};
use jotter_domain::{ArchivedFilter, NoteId, NotePatch};
use jotter_service::{CreateNote, Error as ServiceError, ListNotes};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/notes", get(list_notes).post(create_note))
		.route("/notes/{id}", get(get_note).patch(update_note))
		.route("/notes/{id}/archive", post(archive_note))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// Raw listing parameters. Kept as strings so malformed values get domain-specific handling.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
	pub archived: Option<String>,
	pub search: Option<String>,
	pub page: Option<String>,
}
impl ListParams {
	pub fn into_request(self) -> Result<ListNotes, ApiError> {
		let archived = match self.archived.as_deref() {
			None => ArchivedFilter::default(),
			Some(raw) => ArchivedFilter::parse(raw).ok_or_else(|| {
				ApiError::new(
					StatusCode::UNPROCESSABLE_ENTITY,
					"VALIDATION_FAILED",
					"The archived filter must be one of 0, 1, true, false, or all.",
					Some(vec!["archived".to_string()]),
				)
			})?,
		};
		// An unreadable page number falls back to the first page.
		let page = self
			.page
			.as_deref()
			.and_then(|raw| raw.trim().parse::<u32>().ok())
			.filter(|page| *page >= 1)
			.unwrap_or(1);

		Ok(ListNotes { archived, search: self.search, page })
	}
}

async fn list_notes(
	State(state): State<AppState>,
	Authenticated(actor): Authenticated,
	params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
	let Query(params) = params.map_err(ApiError::from)?;
	let req = params.into_request()?;
	let page = state.service.list(&actor, req.clone()).await?;

	Ok(Json(ListResponse::new(&req, page)))
}

async fn create_note(
	State(state): State<AppState>,
	Authenticated(actor): Authenticated,
	payload: Result<Json<CreateNote>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteEnvelope>), ApiError> {
	let Json(payload) = payload.map_err(ApiError::from)?;
	let note = state.service.create(&actor, payload).await?;

	Ok((StatusCode::CREATED, Json(note.into())))
}

async fn get_note(
	State(state): State<AppState>,
	Authenticated(actor): Authenticated,
	id: Result<Path<NoteId>, PathRejection>,
) -> Result<Json<NoteEnvelope>, ApiError> {
	let Path(id) = id.map_err(ApiError::from)?;
	let note = state.service.get(&actor, id).await?;

	Ok(Json(note.into()))
}

async fn update_note(
	State(state): State<AppState>,
	Authenticated(actor): Authenticated,
	id: Result<Path<NoteId>, PathRejection>,
	payload: Result<Json<NotePatch>, JsonRejection>,
) -> Result<Json<NoteEnvelope>, ApiError> {
	let Path(id) = id.map_err(ApiError::from)?;
	let Json(patch) = payload.map_err(ApiError::from)?;
	let note = state.service.update(&actor, id, patch).await?;

	Ok(Json(note.into()))
}

async fn archive_note(
	State(state): State<AppState>,
	Authenticated(actor): Authenticated,
	id: Result<Path<NoteId>, PathRejection>,
) -> Result<Json<NoteEnvelope>, ApiError> {
	let Path(id) = id.map_err(ApiError::from)?;
	let note = state.service.archive(&actor, id).await?;

	Ok(Json(note.into()))
}

/// Writable note fields. Both are strings, so a data error on one is a type mismatch.
const BODY_FIELDS: [&str; 2] = ["title", "body"];

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	pub fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	pub fn unauthenticated() -> Self {
		Self::new(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "Unauthenticated.", None)
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Validation { fields, message } => Self::new(
				StatusCode::UNPROCESSABLE_ENTITY,
				"VALIDATION_FAILED",
				message,
				Some(fields),
			),
			ServiceError::Forbidden { message } =>
				Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message, None),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			ServiceError::Storage { message } => {
				tracing::warn!(error = %message, "Storage failure while serving request.");

				Self::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL",
					"Internal server error.",
					None,
				)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		let text = rejection.body_text();

		match rejection {
			JsonRejection::MissingJsonContentType(_) =>
				Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "INVALID_BODY", text, None),
			JsonRejection::JsonDataError(_) => match rejected_field(&text) {
				Some(field) => Self::new(
					StatusCode::UNPROCESSABLE_ENTITY,
					"VALIDATION_FAILED",
					format!("The {field} field must be a string."),
					Some(vec![field.to_string()]),
				),
				None => Self::new(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_BODY", text, None),
			},
			_ => Self::new(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_BODY", text, None),
		}
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::new(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_QUERY", rejection.body_text(), None)
	}
}

impl From<PathRejection> for ApiError {
	fn from(_: PathRejection) -> Self {
		Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Note not found.", None)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

/// Data errors read `<summary>: <field path>: <cause>`; only top-level note fields are reported.
fn rejected_field(text: &str) -> Option<&'static str> {
	text.split(": ").find_map(|segment| BODY_FIELDS.into_iter().find(|field| *field == segment))
}
