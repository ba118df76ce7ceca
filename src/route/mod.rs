use aide::axum::ApiRouter;

use crate::AppState;

pub mod comment;
pub mod model;
pub mod docs;
pub mod post;

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new()
		.nest("/api/comments", comment::routes())
		.nest("/api/posts", post::routes())
		.nest_api_service("/docs", docs::routes())
}
