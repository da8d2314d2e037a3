use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::adapters::repositories::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
	/// A required form field was empty; the message names the first one in
	/// priority order. Nothing was persisted.
	#[error("{0}")]
	Validation(&'static str),

	#[error("Not exist question")]
	QuestionNotFound,

	/// Rejected upload type. Dormant until the image attachment path is
	/// wired back up; kept so the allow-list contract has a home.
	#[error("Only image files are allowed!")]
	UnsupportedMedia,

	#[error(transparent)]
	Store(#[from] StoreError),
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let (status, message) = match &self {
			ServiceError::Validation(message) => (StatusCode::BAD_REQUEST, message.to_string()),
			ServiceError::QuestionNotFound => (StatusCode::NOT_FOUND, self.to_string()),
			ServiceError::UnsupportedMedia => (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string()),
			ServiceError::Store(err) => {
				tracing::error!("store failure: {err}");
				(StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
			}
		};
		// Errors send the caller back where they came from.
		(status, Json(ActionOutcome::new(message, "back"))).into_response()
	}
}

/// What a mutating operation hands the presentation layer: a user-facing
/// message to flash and a location to navigate to next.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
	pub message: String,
	pub location: String,
}

impl ActionOutcome {
	pub fn new(
		message: impl Into<String>,
		location: impl Into<String>,
	) -> Self {
		Self {
			message: message.into(),
			location: location.into(),
		}
	}
}

impl IntoResponse for ActionOutcome {
	fn into_response(self) -> Response {
		Json(self).into_response()
	}
}
