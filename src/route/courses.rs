use axum::{extract::State, routing::get};

use crate::{error::Error, extract::Json, model, AppState, Database};

pub fn routes() -> axum::Router<AppState> {
	axum::Router::new().route("/", get(list))
}

/// Returns every course, newest first.
///
/// Courses are display-only here; they are provisioned out of band and
/// there is no mutation surface.
async fn list(State(database): State<Database>) -> Result<Json<Vec<model::Course>>, Error> {
	let courses =
		sqlx::query_as::<_, model::Course>("SELECT * FROM courses ORDER BY created_at DESC")
			.fetch_all(&database)
			.await?;

	Ok(Json(courses))
}
