use std::path::PathBuf;

use axum::http::HeaderValue;

/// Runtime configuration, resolved from the environment once at startup.
///
/// Everything that used to be a hardcoded origin or directory lives
/// here, and anything required must be present before the server
/// starts serving traffic.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub port: u16,
	/// The single cross-origin source allowed to call the API.
	pub allowed_origin: HeaderValue,
	/// Directory uploaded images are written to; served under `/uploads`.
	pub upload_dir: PathBuf,
	pub admin_email: String,
	pub admin_password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{0} is invalid: {1}")]
	Invalid(&'static str, String),
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		Ok(Self {
			database_url: require("DATABASE_URL")?,
			port: match std::env::var("PORT") {
				Ok(port) => port
					.parse()
					.map_err(|_| ConfigError::Invalid("PORT", port.clone()))?,
				Err(_) => 5000,
			},
			allowed_origin: require("ALLOWED_ORIGIN").and_then(|origin| {
				origin
					.parse()
					.map_err(|_| ConfigError::Invalid("ALLOWED_ORIGIN", origin))
			})?,
			upload_dir: std::env::var("UPLOAD_DIR")
				.map_or_else(|_| PathBuf::from("uploads"), PathBuf::from),
			admin_email: require("ADMIN_EMAIL")?,
			admin_password: require("ADMIN_PASSWORD")?,
		})
	}
}

fn require(name: &'static str) -> Result<String, ConfigError> {
	std::env::var(name).map_err(|_| ConfigError::Missing(name))
}
