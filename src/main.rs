#![warn(clippy::pedantic)]

mod config;
mod db;
mod error;
mod extract;
mod model;
mod route;
mod session;


use std::sync::Arc;

use argon2::Argon2;
use axum::{
	http::{header, Method},
	Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use error::Error;

use crate::config::Config;

pub type Database = sqlx::Pool<sqlx::Sqlite>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database connection pool, a hash configuration (if it's expensive to create),
/// or the resolved runtime configuration.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub config: Arc<Config>,
	pub hasher: Argon2<'static>,
}

/// Assembles the full application router.
///
/// Uploaded assets are served under `/uploads`, matching the relative
/// paths stored on posts. Cross-origin access is limited to the single
/// configured origin.
pub fn app(state: State) -> Router {
	let cors = CorsLayer::new()
		.allow_origin(state.config.allowed_origin.clone())
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
		.allow_headers([header::CONTENT_TYPE])
		.allow_credentials(true);

	Router::new()
		.nest("/api/auth", route::auth::routes())
		.nest("/api/blogs", route::blogs::routes())
		.nest("/api/courses", route::courses::routes())
		.nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();
	dotenvy::dotenv().ok();

	let config = Arc::new(Config::from_env().expect("invalid configuration"));
	let hasher = Argon2::default();

	let database = db::connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	db::ensure_admin(&database, &hasher, &config)
		.await
		.expect("failed to provision admin account");

	std::fs::create_dir_all(&config.upload_dir).expect("failed to create upload directory");

	let app = app(State {
		database,
		config: config.clone(),
		hasher,
	});

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", config.port);

	axum::serve(listener, app).await.unwrap();
}
