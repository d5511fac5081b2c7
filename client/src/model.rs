use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	Admin,
	User,
}

/// The signed-in identity as the backend reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: String,
	pub name: String,
	pub email: String,
	pub role: Role,
	pub created_at: DateTime<Utc>,
}

/// A blog post as served by the backend. `views` and `created_at` are
/// server-owned; the client never writes them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
	pub id: String,
	pub title: String,
	pub content: String,
	/// Relative path, joined against the asset origin for display.
	pub image: Option<String>,
	pub is_published: bool,
	pub views: i64,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
	pub id: String,
	pub title: String,
	pub description: String,
	pub duration: String,
	pub created_at: DateTime<Utc>,
}

/// The normalized payload the editor produces for both create and
/// update. Validated before any request is issued.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogDraft {
	#[validate(length(min = 1, message = "title must not be empty"))]
	pub title: String,
	#[validate(length(min = 1, message = "content must not be empty"))]
	pub content: String,
	pub image: Option<String>,
	pub is_published: bool,
}

/// A newly picked image file that still needs uploading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
	pub file_name: String,
	pub bytes: Vec<u8>,
}
