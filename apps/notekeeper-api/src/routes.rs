use axum::{
	Json, Router,
	body::Body,
	extract::State,
	http::{HeaderMap, StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use notekeeper_config::Security;
use notekeeper_service::{ChatRequest, Error as ServiceError};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/chat", post(chat))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<ChatRequest>,
) -> Result<Response, ApiError> {
	let Some(user_id) = resolve_user_id(&state.service.cfg.security, &headers) else {
		tracing::warn!("Rejected chat request without a caller identity.");

		return Err(ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized"));
	};
	let relay = state.service.chat(&user_id, payload).await?;

	Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], Body::from_stream(relay))
		.into_response())
}

/// The identity header wins; the configured default covers single-user deployments.
fn resolve_user_id(security: &Security, headers: &HeaderMap) -> Option<String> {
	let from_header = headers
		.get(security.user_id_header.as_str())
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty());

	from_header.or(security.default_user_id.as_deref()).map(ToString::to_string)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: &'static str,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: &'static str,
}
impl ApiError {
	fn new(status: StatusCode, message: &'static str) -> Self {
		Self { status, message }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => {
				tracing::warn!(%message, "Rejected chat request.");

				Self::new(StatusCode::BAD_REQUEST, "Invalid request")
			},
			err => {
				tracing::error!(error = %err, "Chat request failed before streaming started.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.message })).into_response()
	}
}

#[cfg(test)]
mod tests {
	use axum::http::HeaderValue;

	use super::*;

	fn security(default_user_id: Option<&str>) -> Security {
		Security {
			bind_localhost_only: true,
			user_id_header: "x-notekeeper-user-id".to_string(),
			default_user_id: default_user_id.map(ToString::to_string),
		}
	}

	#[test]
	fn header_identity_takes_precedence_over_default() {
		let mut headers = HeaderMap::new();

		headers.insert("x-notekeeper-user-id", HeaderValue::from_static(" user_a "));

		assert_eq!(
			resolve_user_id(&security(Some("owner")), &headers).as_deref(),
			Some("user_a")
		);
	}

	#[test]
	fn blank_header_falls_back_to_default_or_nothing() {
		let mut headers = HeaderMap::new();

		headers.insert("x-notekeeper-user-id", HeaderValue::from_static("  "));

		assert_eq!(resolve_user_id(&security(Some("owner")), &headers).as_deref(), Some("owner"));
		assert_eq!(resolve_user_id(&security(None), &headers), None);
	}
}
