use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{
	auth,
	error::RouteError,
	openapi::{SECURITY_SCHEME_BEARER, SECURITY_SCHEME_TOKEN},
};

pub const TOKEN_HEADER: &str = "x-auth-token";
pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// The authenticated user making the request.
///
/// The token is read from the `x-auth-token` header, falling back to
/// `Authorization: Bearer <token>`. Without either, [`auth::Error::NoToken`]
/// is returned; an unverifiable token gives [`auth::Error::InvalidToken`].
///
/// Place it before any body extractor so that unauthenticated requests are
/// rejected before their input is looked at.
///
/// ```rust
/// async fn route(caller: Caller) {
///   println!("{}", caller.id);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Caller {
	pub id: Uuid,
}

fn token(parts: &request::Parts) -> Result<&str, auth::Error> {
	if let Some(token) = parts.headers.get(TOKEN_HEADER) {
		return token.to_str().map_err(|_| auth::Error::InvalidToken);
	}

	let authorization = parts
		.headers
		.get(header::AUTHORIZATION)
		.ok_or(auth::Error::NoToken)?;

	authorization
		.to_str()
		.ok()
		.and_then(|value| value.strip_prefix(AUTHORIZATION_PREFIX))
		.ok_or(auth::Error::InvalidToken)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Caller
where
	auth::Keys: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let token = token(parts)?;
		let id = auth::Keys::from_ref(state).verify(token)?;

		tracing::Span::current().record("user", tracing::field::display(id));

		Ok(Self { id })
	}
}

impl OperationInput for Caller {
	/// Adds the token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([
			[(SECURITY_SCHEME_TOKEN.to_string(), Vec::new())]
				.into_iter()
				.collect(),
			[(SECURITY_SCHEME_BEARER.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		]);
	}
}
