use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user account role, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
	Admin,
	User,
}

impl Role {
	pub fn is_admin(self) -> bool {
		matches!(self, Self::Admin)
	}
}

/// A model representing a single user.
///
/// Use this when fetching from the database and returning to the client.
/// The `password` field is not serialized to the client.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: String,
	pub email: String,
	pub name: String,
	/// argon2-derived, salted with `id`
	#[serde(skip_serializing)]
	pub password: Vec<u8>,
	pub role: Role,
	pub created_at: DateTime<Utc>,
}

/// A single blog post, as stored and as served to clients.
///
/// `views` and `created_at` are server-owned: the payload schemas in
/// [`crate::route::blogs`] never accept them from a client.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
	pub id: String,
	pub title: String,
	pub content: String,
	/// Relative path under the upload directory, e.g. `uploads/<name>`.
	pub image: Option<String>,
	pub is_published: bool,
	pub views: i64,
	pub created_at: DateTime<Utc>,
}

/// A course offered by the coaching service. Display-only: there is no
/// mutation surface for courses.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
	pub id: String,
	pub title: String,
	pub description: String,
	pub duration: String,
	pub created_at: DateTime<Utc>,
}
