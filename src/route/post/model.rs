use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::route::comment::model::Comment;

/// A single post, created by a user.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(rename = "_id")]
	pub id: Uuid,
	/// The user that created the post.
	pub user: Uuid,
	/// The content of the post.
	pub text: String,
	/// The display name of the author.
	pub name: String,
	/// The avatar of the author.
	pub avatar: String,
	/// Snapshots of the comments on this post, newest first.
	pub comments: Vec<Comment>,
	/// The creation time of the post.
	pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
	pub user: Uuid,
	pub text: String,
	pub name: String,
	pub avatar: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreatePostInput {
	/// The content of the post.
	#[serde(default, deserialize_with = "crate::route::model::lenient_string")]
	#[validate(length(min = 1, message = "Text is required"))]
	pub text: String,
	/// The display name of the author.
	#[serde(default, deserialize_with = "crate::route::model::lenient_string")]
	#[validate(length(min = 1, message = "Name is required"))]
	pub name: String,
	/// The avatar of the author.
	#[serde(default, deserialize_with = "crate::route::model::lenient_string")]
	#[validate(length(min = 1, message = "Avatar is required"))]
	pub avatar: String,
}
