/// Error type for the client crate, mirroring how failures are
/// surfaced to the person behind the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Client-side validation failed; field-scoped, blocks submission.
	#[error("validation error")]
	Validation(#[from] validator::ValidationErrors),
	/// The session is missing, expired, or lacks the admin role.
	#[error("not authorized")]
	Authorization,
	/// The target no longer exists (stale id on update or delete).
	#[error("not found")]
	NotFound,
	/// The request never completed.
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),
	/// The server answered with an error payload.
	#[error("server error ({status}): {message}")]
	Api { status: u16, message: String },
	#[error("invalid url: {0}")]
	Url(#[from] url::ParseError),
}

impl Error {
	/// Whether a simple user retry can reasonably succeed. Validation
	/// and authorization failures need a different fix first.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			Self::NotFound | Self::Transport(..) | Self::Api { .. }
		)
	}
}
