use axum::http::StatusCode;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{self, RouteError};

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("No token, authorization denied")]
	NoToken,
	#[error("Token is not valid")]
	InvalidToken,
}

impl From<Error> for RouteError<Error> {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		StatusCode::UNAUTHORIZED
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		error::Message::new(self.to_string()).into_vec()
	}
}

/// The claims carried by an access token. `sub` is the id of the user.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
	pub sub: Uuid,
	pub iat: i64,
	pub exp: i64,
}

/// Verifies HS256 access tokens issued with the shared secret.
#[derive(Clone)]
pub struct Keys {
	decoding: DecodingKey,
	validation: Validation,
}

impl Keys {
	pub fn new(secret: &[u8]) -> Self {
		Self {
			decoding: DecodingKey::from_secret(secret),
			validation: Validation::new(Algorithm::HS256),
		}
	}

	/// Returns the id of the user the token was issued to.
	pub fn verify(&self, token: &str) -> Result<Uuid, Error> {
		jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
			.map(|data| data.claims.sub)
			.map_err(|error| {
				tracing::debug!(%error, "rejected access token");
				Error::InvalidToken
			})
	}
}
