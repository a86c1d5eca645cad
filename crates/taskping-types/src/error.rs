//! Shared error type for the taskping crates

use axum::{Json, http::StatusCode, response::IntoResponse};

pub type TpResult<T> = std::result::Result<T, Error>;

/// Errors shared across the dispatcher crates.
///
/// Failures are always values; nothing in the workspace is allowed to panic
/// on a bad event, a missing row, or a misbehaving provider.
#[derive(Debug)]
pub enum Error {
	/// A referenced row (task, profile) does not exist
	NotFound,
	/// The event payload or a looked-up row is unusable
	ValidationError(String),
	/// The deployment configuration is broken (bad credential, bad URL)
	ConfigError(String),
	/// An outbound call failed or was rejected
	NetworkError(String),
	/// The metadata store failed
	DbError(String),
	Internal(String),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::NetworkError(msg) => write!(f, "network error: {}", msg),
			Error::DbError(msg) => write!(f, "database error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Internal(err.to_string())
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::ValidationError(err.to_string())
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let (status, msg) = match self {
			Error::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
			Error::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
			Error::NetworkError(msg) => (StatusCode::BAD_GATEWAY, msg),
			Error::ConfigError(_) | Error::DbError(_) | Error::Internal(_) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
			}
		};
		(status, Json(serde_json::json!({ "error": msg }))).into_response()
	}
}

// vim: ts=4
