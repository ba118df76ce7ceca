use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;
pub mod workflow;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	#[error("Comment not found")]
	UnknownComment(String),
	#[error("Post not found")]
	UnknownPost(String),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_comments, get_comments_docs).post_with(create_comment, create_comment_docs),
		)
		.api_route("/:id", get_with(get_comment, get_comment_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownComment(..) | Self::UnknownPost(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::UnknownComment(id) => message.detail("comment", id),
			Self::UnknownPost(id) => message.detail("post", id),
		}
		.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn body(post: &str) -> Value {
		json!({
			"text": "nice post",
			"post": post,
			"name": "Alice",
			"avatar": "a.png",
		})
	}

	#[tokio::test]
	async fn test_comment_flow() {
		let app = app();
		let user = Uuid::new_v4();
		let post = create_post(&app, Uuid::new_v4()).await;

		let mut spoofed = body(&post);
		spoofed["user"] = json!(Uuid::new_v4());

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), token(user))
			.json(&spoofed)
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let first = response.json::<Value>();

		assert_eq!(first["user"], json!(user));
		assert_eq!(first["post"], json!(post));
		assert_eq!(first["text"], "nice post");
		assert_eq!(first["name"], "Alice");
		assert_eq!(first["avatar"], "a.png");
		assert!(first["date"].is_string());

		let second = app
			.post("/api/comments")
			.add_header(auth_header(), token(user))
			.json(&body(&post))
			.await
			.json::<Value>();

		let comments = app.get(&format!("/api/posts/{post}")).await.json::<Value>()["comments"].clone();

		assert_eq!(comments.as_array().unwrap().len(), 2);
		assert_eq!(comments[0]["_id"], second["_id"]);
		assert_eq!(comments[1]["_id"], first["_id"]);

		let id = first["_id"].as_str().unwrap();
		let response = app.get(&format!("/api/comments/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>(), first);

		let all = app.get("/api/comments").await.json::<Value>();

		assert_eq!(all.as_array().unwrap().len(), 2);
	}

	#[tokio::test]
	async fn test_one_error_per_missing_field() {
		let app = app();

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), token(Uuid::new_v4()))
			.json(&json!({}))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>(),
			json!({
				"errors": [
					{ "msg": "Avatar is required", "param": "avatar", "location": "body" },
					{ "msg": "Name is required", "param": "name", "location": "body" },
					{ "msg": "Post is required", "param": "post", "location": "body" },
					{ "msg": "Text is required", "param": "text", "location": "body" },
				]
			})
		);

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), token(Uuid::new_v4()))
			.json(&json!({ "text": "hi", "post": "", "name": "Alice" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

		let errors = response.json::<Value>()["errors"].clone();
		let params = errors
			.as_array()
			.unwrap()
			.iter()
			.map(|error| error["param"].as_str().unwrap().to_owned())
			.collect::<Vec<_>>();

		assert_eq!(params, ["avatar", "post"]);
	}

	#[tokio::test]
	async fn test_null_and_mistyped_fields_are_validation_errors() {
		let app = app();

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), token(Uuid::new_v4()))
			.json(&json!({ "text": null, "post": null, "name": null, "avatar": null }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(response.json::<Value>()["errors"].as_array().unwrap().len(), 4);

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), token(Uuid::new_v4()))
			.json(&json!({ "text": 5, "post": null, "name": {}, "avatar": "a.png" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

		let errors = response.json::<Value>()["errors"].clone();
		let params = errors
			.as_array()
			.unwrap()
			.iter()
			.map(|error| error["param"].as_str().unwrap().to_owned())
			.collect::<Vec<_>>();

		assert_eq!(params, ["name", "post"]);
		assert!(app.get("/api/comments").await.json::<Vec<Value>>().is_empty());
	}

	#[tokio::test]
	async fn test_unreadable_body_is_bad_request() {
		let app = app();

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), token(Uuid::new_v4()))
			.text("text=hi")
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>(),
			json!({ "errors": [{ "msg": "Invalid JSON body" }] })
		);

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), token(Uuid::new_v4()))
			.json(&json!("not an object"))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

		let body = response.text();

		assert!(body.contains("Invalid JSON body"));
		assert!(!body.contains("line"));
	}

	#[tokio::test]
	async fn test_unauthenticated_writes_nothing() {
		let app = app();
		let post = create_post(&app, Uuid::new_v4()).await;

		let response = app.post("/api/comments").json(&body(&post)).await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.json::<Value>()["errors"][0]["msg"],
			"No token, authorization denied"
		);

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), HeaderValue::from_static("not-a-token"))
			.json(&body(&post))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.json::<Value>()["errors"][0]["msg"], "Token is not valid");

		// Authentication is checked before the body is validated.
		let response = app.post("/api/comments").json(&json!({})).await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

		let response = app.get("/api/comments").await;

		assert_eq!(response.json::<Value>(), json!([]));

		let comments = app.get(&format!("/api/posts/{post}")).await.json::<Value>()["comments"].clone();

		assert_eq!(comments, json!([]));
	}

	#[tokio::test]
	async fn test_bearer_token() {
		let app = app();
		let user = Uuid::new_v4();
		let post = create_post(&app, user).await;
		let bearer = format!("Bearer {}", token(user).to_str().unwrap());

		let response = app
			.post("/api/comments")
			.add_header(
				HeaderName::from_static("authorization"),
				HeaderValue::from_str(&bearer).unwrap(),
			)
			.json(&body(&post))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["user"], json!(user));
	}

	#[tokio::test]
	async fn test_empty_list() {
		let response = app().get("/api/comments").await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>(), json!([]));
	}

	#[tokio::test]
	async fn test_unknown_comment() {
		let app = app();

		for id in [Uuid::new_v4().to_string(), "garbage".to_owned()] {
			let response = app.get(&format!("/api/comments/{id}")).await;

			assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
			assert_eq!(response.json::<Value>()["errors"][0]["msg"], "Comment not found");
		}
	}

	#[tokio::test]
	async fn test_unknown_post_writes_nothing() {
		let app = app();

		let response = app
			.post("/api/comments")
			.add_header(auth_header(), token(Uuid::new_v4()))
			.json(&body(&Uuid::new_v4().to_string()))
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(response.json::<Value>()["errors"][0]["msg"], "Post not found");

		let response = app.get("/api/comments").await;

		assert_eq!(response.json::<Value>(), json!([]));
	}

	#[tokio::test]
	async fn test_request_id_is_returned() {
		let response = app().get("/api/comments").await;

		assert!(!response.header("x-request-id").is_empty());
	}
}
