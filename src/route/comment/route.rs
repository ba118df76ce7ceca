use axum::extract::{Path, State};
use macros::route;

use crate::{
	error::ErrorResponse,
	extract::{Caller, Json},
	openapi::tag,
	store::Store,
};

use super::{model, workflow, RouteError};

/// Create comment
/// Creates a comment on a post as the authenticated user. The comment is
/// placed at the head of the post's comment list.
#[route(tag = tag::COMMENT, response(status = 404, description = "The post does not exist.", shape = "Json<ErrorResponse<'static>>"))]
pub async fn create_comment(
	State(store): State<Store>,
	caller: Caller,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = workflow::create(&store, caller, input).await?;

	Ok(Json(comment))
}

/// Get all comments
/// Returns every comment.
#[route(tag = tag::COMMENT)]
pub async fn get_comments(
	State(store): State<Store>,
) -> Result<Json<Vec<model::Comment>>, RouteError> {
	Ok(Json(workflow::list_all(&store).await?))
}

/// Get single comment
/// Returns a single comment by its unique id.
#[route(tag = tag::COMMENT, response(status = 404, description = "The comment does not exist.", shape = "Json<ErrorResponse<'static>>"))]
pub async fn get_comment(
	State(store): State<Store>,
	Path(comment_id): Path<String>,
) -> Result<Json<model::Comment>, RouteError> {
	Ok(Json(workflow::get_by_id(&store, &comment_id).await?))
}
