use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use serde::Serialize;

use crate::route::auth::AuthError;

/// Error type for the application.
///
/// The Display trait is not sent to the client for the 500-class
/// variants, so it can show sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("auth error: {0}")]
	Auth(#[from] AuthError),
	#[error("admin role required")]
	Forbidden,
	#[error("unknown {0} {1}")]
	NotFound(&'static str, String),
	#[error("multipart error: {0}")]
	Multipart(#[from] axum::extract::multipart::MultipartError),
	#[error("missing image field")]
	MissingImage,
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub success: bool,
	pub errors: Vec<String>,
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		let (status, errors) = match self {
			Error::Validation(errors) => (
				StatusCode::BAD_REQUEST,
				errors
					.field_errors()
					.into_iter()
					.flat_map(|(field, errors)| {
						errors
							.iter()
							.map(move |error| format!("{field}: {error}"))
					})
					.collect(),
			),
			Error::Json(error) => (StatusCode::BAD_REQUEST, vec![error.to_string()]),
			Error::Multipart(error) => (StatusCode::BAD_REQUEST, vec![error.to_string()]),
			Error::MissingImage => (
				StatusCode::BAD_REQUEST,
				vec!["image: a file named `image` is required".to_string()],
			),
			Error::Auth(error) => (error.status(), vec![error.to_string()]),
			Error::Forbidden => (
				StatusCode::FORBIDDEN,
				vec!["admin role required".to_string()],
			),
			Error::NotFound(resource, id) => (
				StatusCode::NOT_FOUND,
				vec![format!("unknown {resource} {id}")],
			),
			Error::Database(error) => {
				tracing::error!("database error: {error}");
				(StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
			}
			Error::Io(error) => {
				tracing::error!("io error: {error}");
				(StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
			}
		};

		(
			status,
			Json(ErrorResponse {
				success: false,
				errors,
			}),
		)
			.into_response()
	}
}
