use crate::model::{Role, User};

/// The authenticated identity for the lifetime of a browsing session.
///
/// Built once from the login response and passed explicitly to
/// whatever needs it; there is no ambient global. Cleared on logout
/// and gone when the process ends.
#[derive(Debug, Clone, Default)]
pub struct Session {
	user: Option<User>,
}

impl Session {
	pub fn new(user: User) -> Self {
		Self { user: Some(user) }
	}

	pub fn anonymous() -> Self {
		Self { user: None }
	}

	pub fn current_user(&self) -> Option<&User> {
		self.user.as_ref()
	}

	pub fn is_admin(&self) -> bool {
		self.user
			.as_ref()
			.is_some_and(|user| user.role == Role::Admin)
	}

	/// Drops the identity. There is no refresh flow; a cleared session
	/// stays cleared until a fresh login builds a new one.
	pub fn clear(&mut self) {
		self.user = None;
	}
}
