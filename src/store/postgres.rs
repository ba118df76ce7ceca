use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json};
use uuid::Uuid;

use super::{Backend, Error};
use crate::{
	route::{
		comment::model::{Comment, NewComment},
		post::model::{NewPost, Post},
	},
	Database,
};

const COMMENT_COLUMNS: &str = "id, text, post_id, name, avatar, user_id, created_at";
const POST_COLUMNS: &str = "id, user_id, text, name, avatar, comments, created_at";

/// A post as stored, with its comment snapshots in a JSONB array.
#[derive(sqlx::FromRow)]
struct PostRow {
	id: Uuid,
	user_id: Uuid,
	text: String,
	name: String,
	avatar: String,
	comments: Json<Vec<Comment>>,
	created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
	fn from(row: PostRow) -> Self {
		Self {
			id: row.id,
			user: row.user_id,
			text: row.text,
			name: row.name,
			avatar: row.avatar,
			comments: row.comments.0,
			date: row.created_at,
		}
	}
}

/// A Postgres backend. Posts embed their comments as a JSONB document.
pub struct Postgres {
	database: Database,
}

impl Postgres {
	/// Connects to the database and applies any pending migrations.
	pub async fn connect(url: &str, acquire_timeout: Duration) -> Result<Self, Error> {
		let database = PgPoolOptions::new()
			.acquire_timeout(acquire_timeout)
			.connect(url)
			.await?;

		sqlx::migrate!().run(&database).await?;

		Ok(Self { database })
	}

	#[cfg(test)]
	pub fn from_pool(database: Database) -> Self {
		Self { database }
	}
}

#[axum::async_trait]
impl Backend for Postgres {
	async fn insert_comment(&self, comment: NewComment) -> Result<Comment, Error> {
		let comment = sqlx::query_as::<_, Comment>(&format!(
			r#"
				INSERT INTO comment (text, post_id, name, avatar, user_id)
				VALUES ($1, $2, $3, $4, $5)
				RETURNING {COMMENT_COLUMNS}
			"#
		))
		.bind(comment.text)
		.bind(comment.post)
		.bind(comment.name)
		.bind(comment.avatar)
		.bind(comment.user)
		.fetch_one(&self.database)
		.await?;

		Ok(comment)
	}

	async fn delete_comment(&self, id: Uuid) -> Result<bool, Error> {
		let status = sqlx::query("DELETE FROM comment WHERE id = $1")
			.bind(id)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, Error> {
		let comment = sqlx::query_as::<_, Comment>(&format!(
			"SELECT {COMMENT_COLUMNS} FROM comment WHERE id = $1"
		))
		.bind(id)
		.fetch_optional(&self.database)
		.await?;

		Ok(comment)
	}

	async fn find_comments(&self) -> Result<Vec<Comment>, Error> {
		let comments = sqlx::query_as::<_, Comment>(&format!("SELECT {COMMENT_COLUMNS} FROM comment"))
			.fetch_all(&self.database)
			.await?;

		Ok(comments)
	}

	async fn insert_post(&self, post: NewPost) -> Result<Post, Error> {
		let post = sqlx::query_as::<_, PostRow>(&format!(
			r#"
				INSERT INTO post (user_id, text, name, avatar)
				VALUES ($1, $2, $3, $4)
				RETURNING {POST_COLUMNS}
			"#
		))
		.bind(post.user)
		.bind(post.text)
		.bind(post.name)
		.bind(post.avatar)
		.fetch_one(&self.database)
		.await?;

		Ok(post.into())
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		let post = sqlx::query_as::<_, PostRow>(&format!(
			"SELECT {POST_COLUMNS} FROM post WHERE id = $1"
		))
		.bind(id)
		.fetch_optional(&self.database)
		.await?;

		Ok(post.map(Post::from))
	}

	async fn prepend_comment(&self, post: Uuid, comment: &Comment) -> Result<bool, Error> {
		// A single statement, so concurrent prepends to one post cannot lose each other.
		let status = sqlx::query(
			r#"
				UPDATE post
				SET comments = jsonb_build_array($2::jsonb) || comments
				WHERE id = $1
			"#,
		)
		.bind(post)
		.bind(Json(comment))
		.execute(&self.database)
		.await?;

		Ok(status.rows_affected() > 0)
	}
}
