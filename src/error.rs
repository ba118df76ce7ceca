use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{header, Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

use crate::store;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// The body sent for any unexpected failure. Nothing else leaks to the client.
pub const SERVER_ERROR: &str = "Server error";

/// The message for a body that is not a JSON object. Parser details stay in the logs.
pub const INVALID_JSON: &str = "Invalid JSON body";

/// Errors shared by every route.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
	#[error("rate limit error: {0}")]
	RateLimit(#[from] GovernorError),
}

/// An error returned from a route, either one shared by the whole
/// application or one specific to the route module.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<E> {
	#[error(transparent)]
	App(#[from] AppError),
	#[error(transparent)]
	Route(E),
}

/// Error responses are documented once, as the default response in [`crate::openapi::docs`].
impl<E> aide::OperationOutput for RouteError<E> {
	type Inner = ();
}

impl<E> From<store::Error> for RouteError<E> {
	fn from(error: store::Error) -> Self {
		Self::App(error.into())
	}
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;
}

/// A single client-facing error entry.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A human-readable description of the error.
	#[serde(rename = "msg")]
	pub content: Cow<'a, str>,
	/// The request field the error refers to, if any.
	#[serde(rename = "param", skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Where the field was read from, e.g. `body`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<Cow<'a, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			location: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'a, str>>, location: &'static str) -> Self {
		self.field = Some(field.into());
		self.location = Some(location.into());
		self
	}

	pub fn detail(mut self, key: &str, value: impl Serialize) -> Self {
		let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);

		self.details
			.get_or_insert_with(|| Cow::Owned(Map::new()))
			.to_mut()
			.insert(key.into(), value);
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub errors: Vec<Message<'a>>,
}

fn respond(status: StatusCode, errors: Vec<Message<'_>>) -> Response<Body> {
	(status, Json(ErrorResponse { errors })).into_response()
}

fn server_error(error: &dyn std::error::Error) -> Response<Body> {
	tracing::error!(%error, "request failed");

	(
		StatusCode::INTERNAL_SERVER_ERROR,
		[(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
		SERVER_ERROR,
	)
		.into_response()
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Validation(errors) => {
				let mut fields = errors
					.field_errors()
					.into_iter()
					.map(|(field, errors)| (field.to_string(), errors.clone()))
					.collect::<Vec<_>>();

				fields.sort_by(|a, b| a.0.cmp(&b.0));

				let messages = fields
					.into_iter()
					.flat_map(|(field, errors)| {
						errors.into_iter().map(move |error| {
							let content = error
								.message
								.map_or_else(|| format!("{field} is invalid"), |m| m.into_owned());

							Message::new(content).field(field.clone(), "body")
						})
					})
					.collect();

				respond(StatusCode::BAD_REQUEST, messages)
			}
			Self::Json(error) => {
				tracing::debug!(%error, "rejected request body");

				respond(
					StatusCode::BAD_REQUEST,
					Message::new(INVALID_JSON).into_vec(),
				)
			}
			Self::RateLimit(GovernorError::TooManyRequests { wait_time, .. }) => respond(
				StatusCode::TOO_MANY_REQUESTS,
				Message::new("Too many requests")
					.detail("retry_after", wait_time)
					.into_vec(),
			),
			error @ (Self::Store(..) | Self::RateLimit(..)) => server_error(&error),
		}
	}
}

impl<E> IntoResponse for RouteError<E>
where
	E: ErrorShape,
{
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				let status = error.status();

				if status.is_server_error() {
					return server_error(&error);
				}

				respond(status, error.errors())
			}
		}
	}
}

#[cfg(test)]
mod test {
	use std::time::Duration;

	use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
	use validator::Validate;

	use super::*;

	#[derive(Validate)]
	struct Input {
		#[validate(length(min = 1, message = "Name is required"))]
		name: String,
		#[validate(length(min = 1, message = "Avatar is required"))]
		avatar: String,
	}

	async fn body(response: Response<Body>) -> serde_json::Value {
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

		serde_json::from_slice(&bytes).unwrap()
	}

	#[tokio::test]
	async fn test_validation_errors_are_sorted_by_field() {
		let errors = Input {
			name: String::new(),
			avatar: String::new(),
		}
		.validate()
		.unwrap_err();

		let response = AppError::Validation(errors).into_response();

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			body(response).await,
			serde_json::json!({
				"errors": [
					{ "msg": "Avatar is required", "param": "avatar", "location": "body" },
					{ "msg": "Name is required", "param": "name", "location": "body" },
				]
			})
		);
	}

	#[tokio::test]
	async fn test_store_error_hides_details() {
		let response = AppError::Store(store::Error::Timeout(Duration::from_millis(5))).into_response();

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

		assert_eq!(&bytes[..], SERVER_ERROR.as_bytes());
	}

	#[test]
	fn test_message_detail() {
		let message = Message::new("Post not found").detail("post", "abc");
		let value = serde_json::to_value(&message).unwrap();

		assert_eq!(value["details"]["post"], "abc");
		assert!(value.get("param").is_none());
	}
}
