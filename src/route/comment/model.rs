use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single comment, written by a user on a post.
///
/// The same shape is embedded in [`Post::comments`](crate::route::post::model::Post)
/// as a snapshot taken when the comment was attached.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(rename = "_id")]
	pub id: Uuid,
	/// The content of the comment.
	pub text: String,
	/// The post the comment belongs to.
	#[sqlx(rename = "post_id")]
	pub post: Uuid,
	/// The display name of the author.
	pub name: String,
	/// The avatar of the author.
	pub avatar: String,
	/// The user that wrote the comment.
	#[sqlx(rename = "user_id")]
	pub user: Uuid,
	/// The creation time of the comment.
	#[sqlx(rename = "created_at")]
	pub date: DateTime<Utc>,
}

/// A comment that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewComment {
	pub text: String,
	pub post: Uuid,
	pub name: String,
	pub avatar: String,
	pub user: Uuid,
}

impl NewComment {
	/// Assigns the identity and timestamp a store gives a comment on insert.
	pub fn persist(self, id: Uuid, date: DateTime<Utc>) -> Comment {
		Comment {
			id,
			text: self.text,
			post: self.post,
			name: self.name,
			avatar: self.avatar,
			user: self.user,
			date,
		}
	}
}

/// Missing and `null` fields deserialize as empty strings so that every one of them
/// is reported by validation, instead of failing on the first.
///
/// Any `user` field sent by the client is ignored.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreateCommentInput {
	/// The content of the comment.
	#[serde(default, deserialize_with = "crate::route::model::lenient_string")]
	#[validate(length(min = 1, message = "Text is required"))]
	pub text: String,
	/// The id of the post to comment on.
	#[serde(default, deserialize_with = "crate::route::model::lenient_string")]
	#[validate(length(min = 1, message = "Post is required"))]
	pub post: String,
	/// The display name of the author.
	#[serde(default, deserialize_with = "crate::route::model::lenient_string")]
	#[validate(length(min = 1, message = "Name is required"))]
	pub name: String,
	/// The avatar of the author.
	#[serde(default, deserialize_with = "crate::route::model::lenient_string")]
	#[validate(length(min = 1, message = "Avatar is required"))]
	pub avatar: String,
}

#[cfg(test)]
mod test {
	use validator::Validate;

	use super::*;

	#[test]
	fn test_missing_fields_fail_individually() {
		let input: CreateCommentInput =
			serde_json::from_value(serde_json::json!({ "text": "hello" })).unwrap();

		let errors = input.validate().unwrap_err();
		let fields = errors.field_errors();

		assert_eq!(fields.len(), 3);
		assert!(!fields.keys().any(|field| field.to_string() == "text"));
	}

	#[test]
	fn test_serializes_mongo_style_id() {
		let comment = NewComment {
			text: "nice post".into(),
			post: Uuid::new_v4(),
			name: "Alice".into(),
			avatar: "a.png".into(),
			user: Uuid::new_v4(),
		}
		.persist(Uuid::new_v4(), Utc::now());

		let value = serde_json::to_value(&comment).unwrap();

		assert_eq!(value["_id"], serde_json::json!(comment.id));
		assert_eq!(value["user"], serde_json::json!(comment.user));
		assert!(value.get("id").is_none());
	}
}
