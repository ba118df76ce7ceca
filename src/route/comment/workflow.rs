//! Creating a comment touches two independent documents: the comment itself
//! and the snapshot list embedded in its post. The post is checked before
//! anything is written, and the snapshot is attached with a single atomic
//! prepend so that concurrent comments on one post are never lost.

use uuid::Uuid;

use crate::{extract::Caller, store::Store};

use super::{
	model::{Comment, CreateCommentInput, NewComment},
	Error, RouteError,
};

/// Creates a comment owned by `caller` and places it at the head of its
/// post's comment list.
///
/// Fails with [`Error::UnknownPost`] without writing anything when the post
/// does not exist. If the post disappears between the check and the attach,
/// the comment is removed again before failing the same way.
#[tracing::instrument(skip_all, fields(post = %input.post, user = %caller.id))]
pub async fn create(
	store: &Store,
	caller: Caller,
	input: CreateCommentInput,
) -> Result<Comment, RouteError> {
	let post = Uuid::parse_str(&input.post).map_err(|_| Error::UnknownPost(input.post.clone()))?;

	if store.find_post(post).await?.is_none() {
		return Err(Error::UnknownPost(input.post).into());
	}

	let comment = store
		.insert_comment(NewComment {
			text: input.text,
			post,
			name: input.name,
			avatar: input.avatar,
			user: caller.id,
		})
		.await?;

	let attached = store
		.prepend_comment(post, &comment)
		.await
		.inspect_err(|error| {
			tracing::error!(%error, comment = %comment.id, "comment persisted but not attached to its post");
		})?;

	if !attached {
		tracing::warn!(comment = %comment.id, "post removed while commenting, rolling back");

		store.delete_comment(comment.id).await?;

		return Err(Error::UnknownPost(post.to_string()).into());
	}

	tracing::info!(monotonic_counter.comments_created = 1_u64, comment = %comment.id, "comment created");

	Ok(comment)
}

/// Returns every comment, in the store's iteration order.
pub async fn list_all(store: &Store) -> Result<Vec<Comment>, RouteError> {
	Ok(store.find_comments().await?)
}

/// Returns a single comment. A malformed id is reported as not found.
pub async fn get_by_id(store: &Store, id: &str) -> Result<Comment, RouteError> {
	let unknown = || Error::UnknownComment(id.to_owned());
	let comment_id = Uuid::parse_str(id).map_err(|_| unknown())?;

	Ok(store.find_comment(comment_id).await?.ok_or_else(unknown)?)
}
