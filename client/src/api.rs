use async_trait::async_trait;
use reqwest::{header, multipart, Method, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::{
	error::Error,
	model::{BlogDraft, BlogPost, Course, ImageFile, User},
};

/// The admin-facing API surface the dashboard depends on.
///
/// [`ApiClient`] is the production implementation; dashboard tests
/// drive the state machine through an in-memory fake instead.
#[async_trait]
pub trait AdminApi {
	async fn admin_blogs(&self) -> Result<Vec<BlogPost>, Error>;
	async fn courses(&self) -> Result<Vec<Course>, Error>;
	async fn create_blog(&self, draft: &BlogDraft) -> Result<BlogPost, Error>;
	async fn update_blog(&self, id: &str, draft: &BlogDraft) -> Result<BlogPost, Error>;
	async fn delete_blog(&self, id: &str) -> Result<(), Error>;
	/// Uploads a picked image, returning the stored relative path.
	async fn upload_image(&self, image: &ImageFile) -> Result<String, Error>;
}

/// Shape of the backend's error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
	#[allow(dead_code)]
	success: bool,
	errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
	path: String,
}

/// Thin HTTP wrapper around the backend REST API.
///
/// The base URL and asset origin are injected at construction, never
/// hardcoded. The session cookie captured at login is attached to
/// every later request, so callers never handle credentials. Errors
/// are returned to the caller untouched and nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
	http: reqwest::Client,
	base: Url,
	assets: Url,
	session_cookie: Option<String>,
}

impl ApiClient {
	pub fn new(base: Url, assets: Url) -> Self {
		Self {
			http: reqwest::Client::new(),
			base,
			assets,
			session_cookie: None,
		}
	}

	fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, Error> {
		let mut builder = self.http.request(method, self.base.join(path)?);

		if let Some(cookie) = &self.session_cookie {
			builder = builder.header(header::COOKIE, cookie.clone());
		}

		Ok(builder)
	}

	/// Maps non-success statuses onto the error taxonomy, pulling the
	/// message out of the backend's error body when there is one.
	async fn check(response: reqwest::Response) -> Result<reqwest::Response, Error> {
		let status = response.status();

		if status.is_success() {
			return Ok(response);
		}

		let message = response
			.json::<ErrorBody>()
			.await
			.map(|body| body.errors.join(", "))
			.unwrap_or_default();

		tracing::warn!(%status, %message, "request rejected by server");

		Err(match status {
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authorization,
			StatusCode::NOT_FOUND => Error::NotFound,
			_ => Error::Api {
				status: status.as_u16(),
				message,
			},
		})
	}

	/// Signs in and captures the session cookie for later requests,
	/// returning the authenticated user.
	pub async fn login(&mut self, email: &str, password: &str) -> Result<User, Error> {
		let response = self
			.http
			.post(self.base.join("/api/auth/login")?)
			.json(&serde_json::json!({ "email": email, "password": password }))
			.send()
			.await?;

		let response = Self::check(response).await?;

		self.session_cookie = response
			.headers()
			.get(header::SET_COOKIE)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.split(';').next())
			.map(str::to_string);

		Ok(response.json().await?)
	}

	/// Ends the backend session and drops the captured cookie.
	pub async fn logout(&mut self) -> Result<(), Error> {
		let response = self.request(Method::GET, "/api/auth/logout")?.send().await?;
		Self::check(response).await?;

		self.session_cookie = None;
		Ok(())
	}

	pub async fn me(&self) -> Result<User, Error> {
		let response = self.request(Method::GET, "/api/auth/me")?.send().await?;

		Ok(Self::check(response).await?.json().await?)
	}

	/// Published posts, as the public site sees them.
	pub async fn public_blogs(&self) -> Result<Vec<BlogPost>, Error> {
		let response = self.request(Method::GET, "/api/blogs")?.send().await?;

		Ok(Self::check(response).await?.json().await?)
	}

	pub async fn blog(&self, id: &str) -> Result<BlogPost, Error> {
		let response = self
			.request(Method::GET, &format!("/api/blogs/{id}"))?
			.send()
			.await?;

		Ok(Self::check(response).await?.json().await?)
	}

	/// Builds the displayable URL for a stored image path by joining
	/// it against the configured asset-serving origin.
	pub fn image_url(&self, path: &str) -> Result<Url, Error> {
		Ok(self.assets.join(path)?)
	}

	/// The public detail URL for a post. The dashboard's "view" action
	/// opens this as an independent navigation.
	pub fn post_url(&self, id: &str) -> Result<Url, Error> {
		Ok(self.base.join(&format!("/blog/{id}"))?)
	}
}

#[async_trait]
impl AdminApi for ApiClient {
	async fn admin_blogs(&self) -> Result<Vec<BlogPost>, Error> {
		let response = self.request(Method::GET, "/api/blogs/admin")?.send().await?;

		Ok(Self::check(response).await?.json().await?)
	}

	async fn courses(&self) -> Result<Vec<Course>, Error> {
		let response = self.request(Method::GET, "/api/courses")?.send().await?;

		Ok(Self::check(response).await?.json().await?)
	}

	async fn create_blog(&self, draft: &BlogDraft) -> Result<BlogPost, Error> {
		let response = self
			.request(Method::POST, "/api/blogs")?
			.json(draft)
			.send()
			.await?;

		Ok(Self::check(response).await?.json().await?)
	}

	async fn update_blog(&self, id: &str, draft: &BlogDraft) -> Result<BlogPost, Error> {
		let response = self
			.request(Method::PUT, &format!("/api/blogs/{id}"))?
			.json(draft)
			.send()
			.await?;

		Ok(Self::check(response).await?.json().await?)
	}

	async fn delete_blog(&self, id: &str) -> Result<(), Error> {
		let response = self
			.request(Method::DELETE, &format!("/api/blogs/{id}"))?
			.send()
			.await?;

		Self::check(response).await?;
		Ok(())
	}

	async fn upload_image(&self, image: &ImageFile) -> Result<String, Error> {
		let part = multipart::Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
		let form = multipart::Form::new().part("image", part);

		let response = self
			.request(Method::POST, "/api/blogs/image")?
			.multipart(form)
			.send()
			.await?;

		let body: UploadResponse = Self::check(response).await?.json().await?;
		Ok(body.path)
	}
}
