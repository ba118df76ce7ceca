use axum::extract::{Path, State};
use macros::route;
use uuid::Uuid;

use crate::{
	error::ErrorResponse,
	extract::{Caller, Json},
	openapi::tag,
	store::Store,
};

use super::{model, Error, RouteError};

/// Get single post
/// Returns a single post by its unique id, with its comments newest first.
#[route(tag = tag::POST, response(status = 404, description = "The post does not exist.", shape = "Json<ErrorResponse<'static>>"))]
pub async fn get_post(
	State(store): State<Store>,
	Path(post_id): Path<String>,
) -> Result<Json<model::Post>, RouteError> {
	let unknown = || Error::UnknownPost(post_id.clone());
	let id = Uuid::parse_str(&post_id).map_err(|_| unknown())?;

	let post = store.find_post(id).await?;

	Ok(Json(post.ok_or_else(unknown)?))
}

/// Create post
/// Creates a new post with no comments.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(store): State<Store>,
	caller: Caller,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = store
		.insert_post(model::NewPost {
			user: caller.id,
			text: input.text,
			name: input.name,
			avatar: input.avatar,
		})
		.await?;

	tracing::info!(post = %post.id, "post created");

	Ok(Json(post))
}
