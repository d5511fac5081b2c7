use axum::{
	body::Body,
	extract::{FromRef, FromRequest, FromRequestParts, Request},
	http::{header, request, Response},
	response::IntoResponse,
};
use serde::de;

use crate::{
	error::Error, model, route::auth::AuthError, session::COOKIE_NAME, Database,
};

/// Extractor that deserializes a JSON body and validates it.
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Json::<T>::from_request(req, state).await?.0;

		result.validate().map_err(Error::Validation)?;
		Ok(Self(result))
	}
}

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::extract::Json(self.0).into_response()
	}
}

/// Extracts the session and related user from the request.
///
/// If it does not exist, an [`AuthError::NoSessionCookie`] is returned.
/// If the session is invalid, an [`AuthError::InvalidSessionCookie`] is returned.
#[derive(Debug)]
pub struct Session {
	pub id: String,
	pub user: model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let cookie = parts
			.headers
			.get(header::COOKIE)
			.and_then(|value| value.to_str().ok())
			.unwrap_or("");

		let session_id = cookie::Cookie::split_parse(cookie)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == COOKIE_NAME)
			.ok_or(AuthError::NoSessionCookie)?;

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, model::User>(
			r#"
			SELECT * FROM users WHERE id = (
				SELECT user_id FROM sessions WHERE id = ?
			)
			"#,
		)
		.bind(session_id.value())
		.fetch_optional(&database)
		.await?;

		let Some(user) = user else {
			return Err(AuthError::InvalidSessionCookie.into());
		};

		Ok(Self {
			user,
			id: session_id.value().to_string(),
		})
	}
}

/// A session whose user holds the admin role.
///
/// Admin-only handlers take this instead of [`Session`], so the role
/// check happens before the handler body runs and a non-admin caller
/// never reaches any privileged logic.
#[derive(Debug)]
pub struct Admin(pub Session);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Admin
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let session = Session::from_request_parts(parts, state).await?;

		if !session.user.role.is_admin() {
			return Err(Error::Forbidden);
		}

		Ok(Self(session))
	}
}
