use validator::{Validate, ValidationErrors};

use crate::model::{BlogDraft, BlogPost, ImageFile};

/// Form state for creating or editing a blog post.
///
/// The editor never talks to the network: `submit` hands a validated,
/// normalized draft to the caller, and validation failures stay on the
/// form as field-scoped messages without touching the input.
#[derive(Debug, Clone)]
pub struct BlogEditor {
	target: Option<BlogPost>,
	pub title: String,
	pub content: String,
	pub is_published: bool,
	/// Relative path of the already-stored image, if any.
	pub image: Option<String>,
	/// A newly picked file that still needs uploading.
	pub new_image: Option<ImageFile>,
	errors: ValidationErrors,
}

impl Default for BlogEditor {
	fn default() -> Self {
		Self {
			target: None,
			title: String::new(),
			content: String::new(),
			is_published: false,
			image: None,
			new_image: None,
			errors: ValidationErrors::new(),
		}
	}
}

impl BlogEditor {
	/// Create mode: an empty, unpublished draft.
	pub fn create() -> Self {
		Self::default()
	}

	/// Edit mode: prefilled from an existing post.
	pub fn edit(post: BlogPost) -> Self {
		Self {
			title: post.title.clone(),
			content: post.content.clone(),
			is_published: post.is_published,
			image: post.image.clone(),
			new_image: None,
			errors: ValidationErrors::new(),
			target: Some(post),
		}
	}

	/// The post being edited, or `None` in create mode.
	pub fn target(&self) -> Option<&BlogPost> {
		self.target.as_ref()
	}

	pub fn is_edit(&self) -> bool {
		self.target.is_some()
	}

	/// Field-scoped messages from the last failed [`Self::submit`].
	pub fn errors(&self) -> &ValidationErrors {
		&self.errors
	}

	pub fn field_error(&self, field: &str) -> Option<String> {
		self.errors
			.field_errors()
			.get(field)
			.and_then(|errors| errors.first())
			.map(ToString::to_string)
	}

	/// Validates the form and produces the normalized payload.
	///
	/// On failure the messages are retained for rendering, no payload
	/// is produced, and the form input is left untouched.
	pub fn submit(&mut self) -> Result<BlogDraft, ValidationErrors> {
		let draft = BlogDraft {
			title: self.title.trim().to_string(),
			content: self.content.clone(),
			image: self.image.clone(),
			is_published: self.is_published,
		};

		match draft.validate() {
			Ok(()) => {
				self.errors = ValidationErrors::new();
				Ok(draft)
			}
			Err(errors) => {
				self.errors = errors.clone();
				Err(errors)
			}
		}
	}
}
