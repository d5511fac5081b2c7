use argon2::Argon2;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::{config::Config, model::Role, route::auth, Database};

/// Connects to the database named by the connection string, creating
/// the file and schema on first run.
pub async fn connect(url: &str) -> Result<Database, sqlx::Error> {
	let options = url
		.parse::<SqliteConnectOptions>()?
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(5)
		.connect_with(options)
		.await?;

	migrate(&pool).await?;

	Ok(pool)
}

pub async fn migrate(pool: &Database) -> Result<(), sqlx::Error> {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id TEXT PRIMARY KEY,
			email TEXT NOT NULL UNIQUE,
			name TEXT NOT NULL,
			password BLOB NOT NULL,
			role TEXT NOT NULL DEFAULT 'user',
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS sessions (
			id TEXT PRIMARY KEY,
			user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS blogs (
			id TEXT PRIMARY KEY,
			title TEXT NOT NULL,
			content TEXT NOT NULL,
			image TEXT,
			is_published INTEGER NOT NULL DEFAULT 0,
			views INTEGER NOT NULL DEFAULT 0,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS courses (
			id TEXT PRIMARY KEY,
			title TEXT NOT NULL,
			description TEXT NOT NULL,
			duration TEXT NOT NULL,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	Ok(())
}

/// Makes sure the configured admin account exists.
///
/// Registration only ever creates regular users, so this is the sole
/// path that grants the admin role.
pub async fn ensure_admin(
	pool: &Database,
	hasher: &Argon2<'static>,
	config: &Config,
) -> Result<(), crate::Error> {
	let existing: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
		.bind(&config.admin_email)
		.fetch_optional(pool)
		.await?;

	if existing.is_some() {
		return Ok(());
	}

	let id = Uuid::new_v4().to_string();
	let password = auth::hash_password(hasher, &config.admin_password, &id)
		.map_err(auth::AuthError::Argon)?;

	sqlx::query(
		"INSERT INTO users (id, email, name, password, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
	)
	.bind(&id)
	.bind(&config.admin_email)
	.bind("Administrator")
	.bind(&password[..])
	.bind(Role::Admin)
	.bind(Utc::now())
	.execute(pool)
	.await?;

	tracing::info!("provisioned admin account {}", config.admin_email);

	Ok(())
}
