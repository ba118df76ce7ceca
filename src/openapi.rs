use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{
	error::{ErrorResponse, Message},
	extract::{Json, TOKEN_HEADER},
};

pub const SECURITY_SCHEME_TOKEN: &str = "Token";
pub const SECURITY_SCHEME_BEARER: &str = "Bearer";

pub mod tag {
	pub const COMMENT: &str = "Comment";
	pub const POST: &str = "Post";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Comment Service")
		.summary("Comments attached to posts")
		.description("Create and read comments. New comments are placed at the head of their post's comment list.")
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comment management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Posts and their embedded comments".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_TOKEN,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: TOKEN_HEADER.into(),
				description: Some("A signed access token".into()),
				extensions: Default::default(),
			},
		)
		.security_scheme(
			SECURITY_SCHEME_BEARER,
			SecurityScheme::Http {
				scheme: "bearer".into(),
				bearer_format: Some("JWT".into()),
				description: Some("A signed access token".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<ErrorResponse<'static>>, _>(|res| {
			res.example(ErrorResponse {
				errors: Message::new("Text is required")
					.field("text", "body")
					.into_vec(),
			})
		})
}
