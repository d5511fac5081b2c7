use argon2::Argon2;
use axum::{
	body::Body,
	extract::State,
	http::{header, Response, StatusCode},
	response::IntoResponse,
	routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
	extract::{Json, Session},
	model, session, AppState, Database,
};

pub use self::Error as AuthError;

pub const KEY_LENGTH: usize = 32;

pub fn routes() -> axum::Router<AppState> {
	axum::Router::new()
		.route("/login", post(login))
		.route("/logout", get(logout))
		.route("/register", post(register))
		.route("/me", get(me))
}

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidEmailOrPassword,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("email already taken")]
	EmailTaken,
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::InvalidEmailOrPassword
			| Self::NoSessionCookie
			| Self::InvalidSessionCookie => StatusCode::UNAUTHORIZED,
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::EmailTaken => StatusCode::CONFLICT,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		crate::Error::from(self).into_response()
	}
}

#[derive(Deserialize, Validate)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RegisterInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	#[validate(length(min = 1, max = 64))]
	pub name: String,
}

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and creating a new password,
/// the scope of this function can remain in here with no issues.
pub fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &str,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Returns the authenticated user.
async fn me(session: Session) -> impl IntoResponse {
	Json(session.user)
}

/// Returns the user and a session cookie, assuming the credentials are valid.
async fn login(
	State(state): State<AppState>,
	Json(auth): Json<LoginInput>,
) -> Result<impl IntoResponse, crate::Error> {
	let user = sqlx::query_as::<_, model::User>("SELECT * FROM users WHERE email = ?")
		.bind(&auth.email)
		.fetch_optional(&state.database)
		.await?;

	let Some(user) = user else {
		return Err(Error::InvalidEmailOrPassword.into());
	};

	let hashed = hash_password(&state.hasher, &auth.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		return Err(Error::InvalidEmailOrPassword.into());
	}

	let session_id = Uuid::new_v4().to_string();

	sqlx::query("INSERT INTO sessions (id, user_id) VALUES (?, ?)")
		.bind(&session_id)
		.bind(&user.id)
		.execute(&state.database)
		.await?;

	let cookie = session::create_cookie(&session_id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(user)))
}

/// Logs out of the authenticated account.
async fn logout(
	State(database): State<Database>,
	session: Session,
) -> Result<impl IntoResponse, crate::Error> {
	sqlx::query("DELETE FROM sessions WHERE id = ?")
		.bind(&session.id)
		.execute(&database)
		.await?;

	// Clear the session cookie
	Ok([(header::SET_COOKIE, session::clear_cookie().to_string())])
}

/// Registers a new account, returning the user and an associated
/// session cookie. New accounts always hold the regular user role.
async fn register(
	State(state): State<AppState>,
	Json(auth): Json<RegisterInput>,
) -> Result<impl IntoResponse, crate::Error> {
	let user_id = Uuid::new_v4().to_string();
	let hashed = hash_password(&state.hasher, &auth.password, &user_id).map_err(Error::Argon)?;

	let mut tx = state.database.begin().await?;

	let user = sqlx::query_as::<_, model::User>(
		r#"
		INSERT INTO users (id, email, name, password, role, created_at)
		VALUES (?, ?, ?, ?, ?, ?)
		RETURNING *
		"#,
	)
	.bind(&user_id)
	.bind(&auth.email)
	.bind(&auth.name)
	.bind(&hashed[..])
	.bind(model::Role::User)
	.bind(Utc::now())
	.fetch_one(&mut *tx)
	.await
	.map_err(|e| match &e {
		sqlx::Error::Database(d) if d.message().contains("users.email") => {
			Error::EmailTaken.into()
		}
		_ => crate::Error::Database(e),
	})?;

	let session_id = Uuid::new_v4().to_string();

	sqlx::query("INSERT INTO sessions (id, user_id) VALUES (?, ?)")
		.bind(&session_id)
		.bind(&user_id)
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	let cookie = session::create_cookie(&session_id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(user)))
}
