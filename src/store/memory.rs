use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Backend, Error};
use crate::route::{
	comment::model::{Comment, NewComment},
	post::model::{NewPost, Post},
};

#[derive(Default)]
struct Collections {
	/// Kept in insertion order, which is the iteration order of the collection.
	comments: Vec<Comment>,
	posts: HashMap<Uuid, Post>,
}

/// An in-process backend, used when no database is configured.
///
/// Nothing is persisted across restarts.
#[derive(Default)]
pub struct Memory {
	collections: RwLock<Collections>,
}

impl Memory {
	pub fn new() -> Self {
		Self::default()
	}
}

#[axum::async_trait]
impl Backend for Memory {
	async fn insert_comment(&self, comment: NewComment) -> Result<Comment, Error> {
		let comment = comment.persist(Uuid::new_v4(), Utc::now());

		self.collections.write().await.comments.push(comment.clone());

		Ok(comment)
	}

	async fn delete_comment(&self, id: Uuid) -> Result<bool, Error> {
		let mut collections = self.collections.write().await;
		let before = collections.comments.len();

		collections.comments.retain(|comment| comment.id != id);

		Ok(collections.comments.len() != before)
	}

	async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, Error> {
		let collections = self.collections.read().await;

		Ok(collections
			.comments
			.iter()
			.find(|comment| comment.id == id)
			.cloned())
	}

	async fn find_comments(&self) -> Result<Vec<Comment>, Error> {
		Ok(self.collections.read().await.comments.clone())
	}

	async fn insert_post(&self, post: NewPost) -> Result<Post, Error> {
		let post = Post {
			id: Uuid::new_v4(),
			user: post.user,
			text: post.text,
			name: post.name,
			avatar: post.avatar,
			comments: Vec::new(),
			date: Utc::now(),
		};

		self.collections
			.write()
			.await
			.posts
			.insert(post.id, post.clone());

		Ok(post)
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		Ok(self.collections.read().await.posts.get(&id).cloned())
	}

	async fn prepend_comment(&self, post: Uuid, comment: &Comment) -> Result<bool, Error> {
		let mut collections = self.collections.write().await;

		let Some(post) = collections.posts.get_mut(&post) else {
			return Ok(false);
		};

		post.comments.insert(0, comment.clone());

		Ok(true)
	}
}
