use std::path::Path as FilePath;

use axum::{
	extract::{Multipart, Path, State},
	http::StatusCode,
	routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
	error::Error,
	extract::{Admin, Json},
	model, AppState, Database,
};

pub fn routes() -> axum::Router<AppState> {
	axum::Router::new()
		.route("/", get(public_list).post(create))
		.route("/admin", get(admin_list))
		.route("/image", post(upload_image))
		.route("/:id", get(detail).put(update).delete(delete))
}

/// Payload for creating or fully replacing a post.
///
/// `image` is a relative path previously returned by the upload
/// endpoint, never a full URL. The id, view counter and creation time
/// are server-owned and have no place here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogInput {
	#[validate(length(min = 1, max = 256))]
	pub title: String,
	#[validate(length(min = 1))]
	pub content: String,
	pub image: Option<String>,
	#[serde(default)]
	pub is_published: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
	pub path: String,
}

/// Returns every published post, newest first. Drafts never appear
/// here.
async fn public_list(
	State(database): State<Database>,
) -> Result<Json<Vec<model::BlogPost>>, Error> {
	let posts = sqlx::query_as::<_, model::BlogPost>(
		"SELECT * FROM blogs WHERE is_published = 1 ORDER BY created_at DESC",
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(posts))
}

/// Returns every post regardless of publish state, newest first.
async fn admin_list(
	State(database): State<Database>,
	_admin: Admin,
) -> Result<Json<Vec<model::BlogPost>>, Error> {
	let posts =
		sqlx::query_as::<_, model::BlogPost>("SELECT * FROM blogs ORDER BY created_at DESC")
			.fetch_all(&database)
			.await?;

	Ok(Json(posts))
}

/// Returns a single post by its unique id, counting the read.
async fn detail(
	State(database): State<Database>,
	Path(id): Path<String>,
) -> Result<Json<model::BlogPost>, Error> {
	sqlx::query("UPDATE blogs SET views = views + 1 WHERE id = ?")
		.bind(&id)
		.execute(&database)
		.await?;

	let post = sqlx::query_as::<_, model::BlogPost>("SELECT * FROM blogs WHERE id = ?")
		.bind(&id)
		.fetch_optional(&database)
		.await?;

	Ok(Json(post.ok_or(Error::NotFound("post", id))?))
}

/// Creates a post. The id, creation time and view counter are assigned
/// here, never taken from the payload.
async fn create(
	State(database): State<Database>,
	_admin: Admin,
	Json(input): Json<BlogInput>,
) -> Result<Json<model::BlogPost>, Error> {
	let post = sqlx::query_as::<_, model::BlogPost>(
		r#"
		INSERT INTO blogs (id, title, content, image, is_published, views, created_at)
		VALUES (?, ?, ?, ?, ?, 0, ?)
		RETURNING *
		"#,
	)
	.bind(Uuid::new_v4().to_string())
	.bind(&input.title)
	.bind(&input.content)
	.bind(&input.image)
	.bind(input.is_published)
	.bind(Utc::now())
	.fetch_one(&database)
	.await?;

	Ok(Json(post))
}

/// Fully replaces the mutable fields of an existing post; id, views
/// and creation time are untouched.
async fn update(
	State(database): State<Database>,
	_admin: Admin,
	Path(id): Path<String>,
	Json(input): Json<BlogInput>,
) -> Result<Json<model::BlogPost>, Error> {
	let post = sqlx::query_as::<_, model::BlogPost>(
		r#"
		UPDATE blogs
		SET title = ?, content = ?, image = ?, is_published = ?
		WHERE id = ?
		RETURNING *
		"#,
	)
	.bind(&input.title)
	.bind(&input.content)
	.bind(&input.image)
	.bind(input.is_published)
	.bind(&id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(post.ok_or(Error::NotFound("post", id))?))
}

/// Deletes an existing post by its unique id. Irreversible.
async fn delete(
	State(database): State<Database>,
	_admin: Admin,
	Path(id): Path<String>,
) -> Result<StatusCode, Error> {
	let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
		.bind(&id)
		.execute(&database)
		.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound("post", id));
	}

	Ok(StatusCode::NO_CONTENT)
}

/// Accepts a single multipart field named `image` and stores it under
/// the configured upload directory, returning the relative path that
/// clients join against the asset-serving origin.
async fn upload_image(
	State(state): State<AppState>,
	_admin: Admin,
	mut multipart: Multipart,
) -> Result<Json<UploadResponse>, Error> {
	while let Some(field) = multipart.next_field().await? {
		if field.name() != Some("image") {
			continue;
		}

		let extension = field
			.file_name()
			.and_then(|name| FilePath::new(name).extension())
			.and_then(|extension| extension.to_str())
			.unwrap_or("bin")
			.to_string();

		let data = field.bytes().await?;
		let name = format!("{}.{extension}", Uuid::new_v4());

		tokio::fs::create_dir_all(&state.config.upload_dir).await?;
		tokio::fs::write(state.config.upload_dir.join(&name), &data).await?;

		return Ok(Json(UploadResponse {
			path: format!("uploads/{name}"),
		}));
	}

	Err(Error::MissingImage)
}
