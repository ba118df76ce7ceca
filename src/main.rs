#![warn(clippy::pedantic)]

mod auth;
mod config;
mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod store;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::openapi::OpenApi;
use axum::{extract::Request, http::HeaderName, Extension, Router, ServiceExt};
use tower::{Layer, ServiceBuilder};
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use config::Config;
use store::Store;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// The shared application state.
///
/// Handlers pull the parts they need out of it with `State<Store>` and the
/// [`extract::Caller`] extractor.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
	pub keys: auth::Keys,
}

/// Builds the application with its per-request middleware.
///
/// Rate limiting needs the peer address, so it is added in [`main`] where
/// the connection info is available.
pub fn app(state: State) -> Router {
	let mut api = OpenApi::default();

	route::routes()
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
				.layer(
					TraceLayer::new_for_http().make_span_with(|request: &Request| {
						let request_id = request
							.headers()
							.get(REQUEST_ID_HEADER)
							.and_then(|value| value.to_str().ok())
							.unwrap_or_default();

						tracing::info_span!(
							"request",
							method = %request.method(),
							uri = %request.uri(),
							request_id,
							user = tracing::field::Empty,
						)
					}),
				)
				.layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
				.layer(CorsLayer::permissive())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");
	let _otel = trace::init_tracing_subscriber(&config);

	let store = match &config.database_url {
		Some(url) => Store::new(
			store::Postgres::connect(url, config.store_timeout)
				.await
				.expect("failed to connect to database"),
			config.store_timeout,
		),
		None => {
			tracing::warn!("DATABASE_URL is not set, comments and posts are kept in memory");

			Store::new(store::Memory::new(), config.store_timeout)
		}
	};

	let state = State {
		store,
		keys: auth::Keys::new(config.jwt_secret.as_bytes()),
	};

	let governor = ratelimit::default().expect("invalid rate limit configuration");
	ratelimit::cleanup_old_limits(&[&governor]);

	let app = app(state).layer(GovernorLayer { config: governor });
	let app = NormalizePathLayer::trim_trailing_slash().layer(app);

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(port = config.port, "listening");

	axum::serve(
		listener,
		ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
	)
	.await
	.expect("server error");
}
