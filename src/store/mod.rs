mod memory;
mod postgres;

pub use memory::Memory;
pub use postgres::Postgres;

use std::{future::Future, sync::Arc, time::Duration};

use uuid::Uuid;

use crate::route::{
	comment::model::{Comment, NewComment},
	post::model::{NewPost, Post},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("database migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
	#[error("store did not respond within {0:?}")]
	Timeout(Duration),
}

/// A persistence backend holding the comment and post collections.
#[axum::async_trait]
pub trait Backend: Send + Sync {
	async fn insert_comment(&self, comment: NewComment) -> Result<Comment, Error>;

	/// Returns `false` if no comment with the id existed.
	async fn delete_comment(&self, id: Uuid) -> Result<bool, Error>;

	async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, Error>;

	/// Returns every comment in the backend's iteration order.
	async fn find_comments(&self) -> Result<Vec<Comment>, Error>;

	async fn insert_post(&self, post: NewPost) -> Result<Post, Error>;

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error>;

	/// Places a snapshot of `comment` at the head of the post's comment list
	/// as one atomic operation. Returns `false` if the post does not exist.
	async fn prepend_comment(&self, post: Uuid, comment: &Comment) -> Result<bool, Error>;
}

/// A handle to the configured [`Backend`] where every call is bounded by
/// a timeout.
#[derive(Clone)]
pub struct Store {
	backend: Arc<dyn Backend>,
	timeout: Duration,
}

impl Store {
	pub fn new(backend: impl Backend + 'static, timeout: Duration) -> Self {
		Self {
			backend: Arc::new(backend),
			timeout,
		}
	}

	async fn bounded<T>(&self, call: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
		tokio::time::timeout(self.timeout, call)
			.await
			.map_err(|_| Error::Timeout(self.timeout))?
	}

	pub async fn insert_comment(&self, comment: NewComment) -> Result<Comment, Error> {
		self.bounded(self.backend.insert_comment(comment)).await
	}

	pub async fn delete_comment(&self, id: Uuid) -> Result<bool, Error> {
		self.bounded(self.backend.delete_comment(id)).await
	}

	pub async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, Error> {
		self.bounded(self.backend.find_comment(id)).await
	}

	pub async fn find_comments(&self) -> Result<Vec<Comment>, Error> {
		self.bounded(self.backend.find_comments()).await
	}

	pub async fn insert_post(&self, post: NewPost) -> Result<Post, Error> {
		self.bounded(self.backend.insert_post(post)).await
	}

	pub async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		self.bounded(self.backend.find_post(id)).await
	}

	pub async fn prepend_comment(&self, post: Uuid, comment: &Comment) -> Result<bool, Error> {
		self.bounded(self.backend.prepend_comment(post, comment))
			.await
	}
}
