use crate::{
	api::AdminApi,
	editor::BlogEditor,
	error::Error,
	model::{BlogPost, Course},
	session::Session,
};

/// Which resource listing the dashboard is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
	Blogs,
	Courses,
}

/// What the dashboard is currently rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
	/// A fetch for the active tab is in flight.
	Loading,
	/// The active tab's list, possibly empty.
	List,
	/// The blog editor, creating or editing.
	Editing,
	/// The last fetch failed. A failed fetch is never rendered as an
	/// empty list.
	Failed(String),
	/// The session is missing or not an admin; nothing is fetched.
	Denied,
}

/// Handle for a fetch in flight. Only the most recently issued token
/// is still applicable; the finishers discard anything older.
#[derive(Debug, Clone, Copy)]
pub struct FetchToken {
	generation: u64,
	tab: Tab,
}

/// The admin dashboard state machine.
///
/// Owns the cached lists, the editor, and the staged delete. All
/// mutations follow mutate-then-refresh: the mutation must succeed
/// before the list is re-fetched, and a refresh failure cannot undo a
/// mutation that already went through. The "view" action on a list
/// item is an independent navigation (see `ApiClient::post_url`), not
/// a state transition here.
pub struct Dashboard<A> {
	api: A,
	session: Session,
	tab: Tab,
	view: View,
	blogs: Vec<BlogPost>,
	courses: Vec<Course>,
	editor: Option<BlogEditor>,
	pending_delete: Option<String>,
	notice: Option<String>,
	generation: u64,
}

impl<A: AdminApi> Dashboard<A> {
	/// A non-admin session lands in [`View::Denied`], and no request
	/// is ever issued on its behalf.
	pub fn new(api: A, session: Session) -> Self {
		let view = if session.is_admin() {
			View::Loading
		} else {
			View::Denied
		};

		Self {
			api,
			session,
			tab: Tab::Blogs,
			view,
			blogs: Vec::new(),
			courses: Vec::new(),
			editor: None,
			pending_delete: None,
			notice: None,
			generation: 0,
		}
	}

	pub fn view(&self) -> &View {
		&self.view
	}

	pub fn tab(&self) -> Tab {
		self.tab
	}

	/// The blog list exactly as the backend last returned it; the
	/// dashboard never re-sorts.
	pub fn blogs(&self) -> &[BlogPost] {
		&self.blogs
	}

	pub fn courses(&self) -> &[Course] {
		&self.courses
	}

	pub fn editor(&self) -> Option<&BlogEditor> {
		self.editor.as_ref()
	}

	pub fn editor_mut(&mut self) -> Option<&mut BlogEditor> {
		self.editor.as_mut()
	}

	/// The latest surfaced mutation error, cleared by the next action.
	pub fn notice(&self) -> Option<&str> {
		self.notice.as_deref()
	}

	pub fn pending_delete(&self) -> Option<&str> {
		self.pending_delete.as_deref()
	}

	/// True only for a successfully fetched, genuinely empty list —
	/// loading and failure render differently.
	pub fn is_empty(&self) -> bool {
		self.view == View::List
			&& match self.tab {
				Tab::Blogs => self.blogs.is_empty(),
				Tab::Courses => self.courses.is_empty(),
			}
	}

	/// Marks the start of a fetch for the active tab and supersedes
	/// every earlier token. Returns `None` for non-admin sessions.
	pub fn begin_fetch(&mut self) -> Option<FetchToken> {
		if !self.session.is_admin() {
			return None;
		}

		self.generation += 1;
		self.view = View::Loading;

		Some(FetchToken {
			generation: self.generation,
			tab: self.tab,
		})
	}

	/// Applies a blog fetch result, unless a newer fetch superseded
	/// the token while the response was in flight.
	pub fn finish_blogs(&mut self, token: FetchToken, result: Result<Vec<BlogPost>, Error>) {
		if token.generation != self.generation {
			tracing::debug!(token.generation, "discarding superseded blog fetch");
			return;
		}

		match result {
			Ok(blogs) => {
				self.blogs = blogs;
				self.view = View::List;
			}
			Err(error) => self.view = View::Failed(error.to_string()),
		}
	}

	pub fn finish_courses(&mut self, token: FetchToken, result: Result<Vec<Course>, Error>) {
		if token.generation != self.generation {
			tracing::debug!(token.generation, "discarding superseded course fetch");
			return;
		}

		match result {
			Ok(courses) => {
				self.courses = courses;
				self.view = View::List;
			}
			Err(error) => self.view = View::Failed(error.to_string()),
		}
	}

	/// Fetches the active tab's list.
	pub async fn refresh(&mut self) {
		let Some(token) = self.begin_fetch() else {
			return;
		};

		match token.tab {
			Tab::Blogs => {
				let result = self.api.admin_blogs().await;
				self.finish_blogs(token, result);
			}
			Tab::Courses => {
				let result = self.api.courses().await;
				self.finish_courses(token, result);
			}
		}
	}

	/// Switches tab and reloads it.
	pub async fn select_tab(&mut self, tab: Tab) {
		if self.view == View::Denied {
			return;
		}

		self.tab = tab;
		self.notice = None;
		self.refresh().await;
	}

	/// Opens the editor in create mode.
	pub fn start_create(&mut self) {
		if self.view == View::Denied {
			return;
		}

		self.editor = Some(BlogEditor::create());
		self.view = View::Editing;
		self.notice = None;
	}

	/// Opens the editor for a listed post.
	pub fn start_edit(&mut self, id: &str) {
		if self.view == View::Denied {
			return;
		}

		if let Some(post) = self.blogs.iter().find(|post| post.id == id) {
			self.editor = Some(BlogEditor::edit(post.clone()));
			self.view = View::Editing;
			self.notice = None;
		}
	}

	/// Leaves the editor and shows the cached list again, without
	/// re-fetching.
	pub fn cancel_edit(&mut self) {
		if self.editor.take().is_some() {
			self.view = View::List;
		}
	}

	/// Validates the editor, uploads a newly picked image if there is
	/// one, then creates or updates, then re-fetches the list.
	///
	/// A validation failure leaves field messages on the editor and
	/// issues no request. A failed upload or mutation keeps the editor
	/// and its input, with the error surfaced via [`Self::notice`].
	pub async fn save(&mut self) {
		let (mut draft, new_image, target) = {
			let Some(editor) = self.editor.as_mut() else {
				return;
			};

			let Ok(draft) = editor.submit() else {
				return;
			};

			(
				draft,
				editor.new_image.clone(),
				editor.target().map(|post| post.id.clone()),
			)
		};

		if let Some(image) = new_image {
			match self.api.upload_image(&image).await {
				Ok(path) => draft.image = Some(path),
				Err(error) => {
					self.notice = Some(error.to_string());
					return;
				}
			}
		}

		let result = match target {
			Some(id) => self.api.update_blog(&id, &draft).await,
			None => self.api.create_blog(&draft).await,
		};

		match result {
			Ok(_) => {
				self.editor = None;
				self.notice = None;
				self.refresh().await;
			}
			Err(error) => self.notice = Some(error.to_string()),
		}
	}

	/// Stages a delete for confirmation; nothing is sent yet.
	pub fn request_delete(&mut self, id: &str) {
		if self.blogs.iter().any(|post| post.id == id) {
			self.pending_delete = Some(id.to_string());
		}
	}

	/// Abandons the staged delete; no request is issued.
	pub fn decline_delete(&mut self) {
		self.pending_delete = None;
	}

	/// Issues the staged delete, then re-fetches on success. On
	/// failure the item stays listed and the error is surfaced.
	pub async fn confirm_delete(&mut self) {
		let Some(id) = self.pending_delete.take() else {
			return;
		};

		match self.api.delete_blog(&id).await {
			Ok(()) => {
				self.notice = None;
				self.refresh().await;
			}
			Err(error) => self.notice = Some(error.to_string()),
		}
	}
}

#[cfg(test)]
mod test {
	use std::sync::{Arc, Mutex};

	use async_trait::async_trait;
	use chrono::Utc;

	use super::*;
	use crate::model::{BlogDraft, ImageFile, Role, User};

	fn user(role: Role) -> User {
		User {
			id: "u1".into(),
			name: "Niti Admin".into(),
			email: "admin@example.com".into(),
			role,
			created_at: Utc::now(),
		}
	}

	fn post(id: &str, title: &str, is_published: bool) -> BlogPost {
		BlogPost {
			id: id.into(),
			title: title.into(),
			content: "content".into(),
			image: None,
			is_published,
			views: 0,
			created_at: Utc::now(),
		}
	}

	#[derive(Default)]
	struct Inner {
		blogs: Vec<BlogPost>,
		courses: Vec<Course>,
		calls: Vec<String>,
		fail_next: bool,
		next_id: u32,
	}

	/// In-memory stand-in for the backend, recording every call.
	/// Clones share state, so a test can keep a handle for inspection
	/// while the dashboard owns another.
	#[derive(Clone, Default)]
	struct FakeApi {
		inner: Arc<Mutex<Inner>>,
	}

	impl FakeApi {
		fn with_blogs(blogs: Vec<BlogPost>) -> Self {
			let fake = Self::default();
			fake.inner.lock().unwrap().blogs = blogs;
			fake
		}

		fn fail_next(&self) {
			self.inner.lock().unwrap().fail_next = true;
		}

		fn calls(&self) -> Vec<String> {
			self.inner.lock().unwrap().calls.clone()
		}

		fn check_fail(inner: &mut Inner, call: &str) -> Result<(), Error> {
			inner.calls.push(call.to_string());

			if std::mem::take(&mut inner.fail_next) {
				return Err(Error::Api {
					status: 500,
					message: "injected failure".into(),
				});
			}

			Ok(())
		}
	}

	#[async_trait]
	impl AdminApi for FakeApi {
		async fn admin_blogs(&self) -> Result<Vec<BlogPost>, Error> {
			let mut inner = self.inner.lock().unwrap();
			FakeApi::check_fail(&mut inner, "admin_blogs")?;

			Ok(inner.blogs.clone())
		}

		async fn courses(&self) -> Result<Vec<Course>, Error> {
			let mut inner = self.inner.lock().unwrap();
			FakeApi::check_fail(&mut inner, "courses")?;

			Ok(inner.courses.clone())
		}

		async fn create_blog(&self, draft: &BlogDraft) -> Result<BlogPost, Error> {
			let mut inner = self.inner.lock().unwrap();
			FakeApi::check_fail(&mut inner, "create_blog")?;

			inner.next_id += 1;
			let created = BlogPost {
				id: format!("p{}", inner.next_id),
				title: draft.title.clone(),
				content: draft.content.clone(),
				image: draft.image.clone(),
				is_published: draft.is_published,
				views: 0,
				created_at: Utc::now(),
			};

			inner.blogs.insert(0, created.clone());
			Ok(created)
		}

		async fn update_blog(&self, id: &str, draft: &BlogDraft) -> Result<BlogPost, Error> {
			let mut inner = self.inner.lock().unwrap();
			FakeApi::check_fail(&mut inner, "update_blog")?;

			let Some(existing) = inner.blogs.iter_mut().find(|post| post.id == id) else {
				return Err(Error::NotFound);
			};

			existing.title = draft.title.clone();
			existing.content = draft.content.clone();
			existing.image = draft.image.clone();
			existing.is_published = draft.is_published;

			Ok(existing.clone())
		}

		async fn delete_blog(&self, id: &str) -> Result<(), Error> {
			let mut inner = self.inner.lock().unwrap();
			FakeApi::check_fail(&mut inner, "delete_blog")?;

			let before = inner.blogs.len();
			inner.blogs.retain(|post| post.id != id);

			if inner.blogs.len() == before {
				return Err(Error::NotFound);
			}

			Ok(())
		}

		async fn upload_image(&self, _image: &ImageFile) -> Result<String, Error> {
			let mut inner = self.inner.lock().unwrap();
			FakeApi::check_fail(&mut inner, "upload_image")?;

			Ok("uploads/fake.png".to_string())
		}
	}

	fn admin_dashboard(api: &FakeApi) -> Dashboard<FakeApi> {
		Dashboard::new(api.clone(), Session::new(user(Role::Admin)))
	}

	#[tokio::test]
	async fn test_non_admin_is_denied_without_requests() {
		let api = FakeApi::default();
		let mut dashboard = Dashboard::new(api.clone(), Session::new(user(Role::User)));

		assert_eq!(*dashboard.view(), View::Denied);

		dashboard.refresh().await;
		dashboard.select_tab(Tab::Courses).await;
		dashboard.start_create();

		assert_eq!(*dashboard.view(), View::Denied);
		assert!(api.calls().is_empty());
	}

	#[tokio::test]
	async fn test_anonymous_is_denied_too() {
		let api = FakeApi::default();
		let mut dashboard = Dashboard::new(api.clone(), Session::anonymous());

		dashboard.refresh().await;

		assert_eq!(*dashboard.view(), View::Denied);
		assert!(api.calls().is_empty());
	}

	#[tokio::test]
	async fn test_fetch_populates_list_and_empty_state_is_distinct() {
		let api = FakeApi::default();
		let mut dashboard = admin_dashboard(&api);

		dashboard.refresh().await;

		assert_eq!(*dashboard.view(), View::List);
		assert!(dashboard.is_empty());

		api.inner.lock().unwrap().blogs = vec![post("p1", "Hello", true)];
		dashboard.refresh().await;

		assert_eq!(*dashboard.view(), View::List);
		assert!(!dashboard.is_empty());
		assert_eq!(dashboard.blogs().len(), 1);
	}

	#[tokio::test]
	async fn test_failed_fetch_is_visible_not_empty() {
		let api = FakeApi::with_blogs(vec![post("p1", "Hello", true)]);
		let mut dashboard = admin_dashboard(&api);

		api.fail_next();
		dashboard.refresh().await;

		assert!(matches!(dashboard.view(), View::Failed(_)));
		assert!(!dashboard.is_empty());
	}

	#[tokio::test]
	async fn test_stale_fetch_response_is_discarded() {
		let api = FakeApi::default();
		let mut dashboard = admin_dashboard(&api);

		let stale = dashboard.begin_fetch().unwrap();
		let current = dashboard.begin_fetch().unwrap();

		dashboard.finish_blogs(stale, Ok(vec![post("old", "Old", true)]));
		assert_eq!(*dashboard.view(), View::Loading);
		assert!(dashboard.blogs().is_empty());

		dashboard.finish_blogs(current, Ok(vec![post("new", "New", true)]));
		assert_eq!(*dashboard.view(), View::List);
		assert_eq!(dashboard.blogs()[0].id, "new");
	}

	#[tokio::test]
	async fn test_tab_switch_loads_courses() {
		let api = FakeApi::default();
		api.inner.lock().unwrap().courses = vec![Course {
			id: "c1".into(),
			title: "Foundation Batch".into(),
			description: "Groundwork".into(),
			duration: "12 weeks".into(),
			created_at: Utc::now(),
		}];

		let mut dashboard = admin_dashboard(&api);
		dashboard.select_tab(Tab::Courses).await;

		assert_eq!(dashboard.tab(), Tab::Courses);
		assert_eq!(*dashboard.view(), View::List);
		assert_eq!(dashboard.courses().len(), 1);
	}

	#[tokio::test]
	async fn test_create_flow_returns_to_refreshed_list() {
		let api = FakeApi::default();
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		dashboard.start_create();
		assert_eq!(*dashboard.view(), View::Editing);

		let editor = dashboard.editor_mut().unwrap();
		editor.title = "Exam Update".into();
		editor.content = "The schedule moved.".into();

		dashboard.save().await;

		assert_eq!(*dashboard.view(), View::List);
		assert!(dashboard.editor().is_none());
		assert_eq!(dashboard.blogs().len(), 1);
		assert_eq!(dashboard.blogs()[0].title, "Exam Update");
		assert_eq!(dashboard.blogs()[0].views, 0);
		assert!(!dashboard.blogs()[0].id.is_empty());
		assert_eq!(
			api.calls(),
			vec!["admin_blogs", "create_blog", "admin_blogs"]
		);
	}

	#[tokio::test]
	async fn test_edit_flow_updates_in_place() {
		let api = FakeApi::with_blogs(vec![post("p1", "Draft post", false)]);
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		dashboard.start_edit("p1");
		let editor = dashboard.editor_mut().unwrap();
		editor.title = "Renamed".into();
		editor.is_published = true;

		dashboard.save().await;

		assert_eq!(dashboard.blogs().len(), 1);
		assert_eq!(dashboard.blogs()[0].id, "p1");
		assert_eq!(dashboard.blogs()[0].title, "Renamed");
		assert!(dashboard.blogs()[0].is_published);
	}

	#[tokio::test]
	async fn test_publish_scenario_flips_draft_tag() {
		let api = FakeApi::default();
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		dashboard.start_create();
		let editor = dashboard.editor_mut().unwrap();
		editor.title = "Exam Update".into();
		editor.content = "...".into();
		dashboard.save().await;

		// shown as a draft
		assert!(!dashboard.blogs()[0].is_published);
		let id = dashboard.blogs()[0].id.clone();

		dashboard.start_edit(&id);
		dashboard.editor_mut().unwrap().is_published = true;
		dashboard.save().await;

		// now tagged published
		assert!(dashboard.blogs()[0].is_published);
	}

	#[tokio::test]
	async fn test_validation_failure_issues_no_request() {
		let api = FakeApi::default();
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;
		let fetches = api.calls().len();

		dashboard.start_create();
		dashboard.save().await;

		assert_eq!(*dashboard.view(), View::Editing);
		assert!(dashboard
			.editor()
			.unwrap()
			.field_error("title")
			.is_some());
		assert_eq!(api.calls().len(), fetches);
	}

	#[tokio::test]
	async fn test_save_failure_keeps_editor_input() {
		let api = FakeApi::default();
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		dashboard.start_create();
		let editor = dashboard.editor_mut().unwrap();
		editor.title = "Precious input".into();
		editor.content = "Do not lose this.".into();

		api.fail_next();
		dashboard.save().await;

		assert_eq!(*dashboard.view(), View::Editing);
		assert_eq!(dashboard.editor().unwrap().title, "Precious input");
		assert!(dashboard.notice().is_some());
	}

	#[tokio::test]
	async fn test_save_uploads_new_image_first() {
		let api = FakeApi::default();
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		dashboard.start_create();
		let editor = dashboard.editor_mut().unwrap();
		editor.title = "With cover".into();
		editor.content = "body".into();
		editor.new_image = Some(ImageFile {
			file_name: "cover.png".into(),
			bytes: vec![1, 2, 3],
		});

		dashboard.save().await;

		assert_eq!(
			dashboard.blogs()[0].image.as_deref(),
			Some("uploads/fake.png")
		);
		assert_eq!(
			api.calls(),
			vec!["admin_blogs", "upload_image", "create_blog", "admin_blogs"]
		);
	}

	#[tokio::test]
	async fn test_cancel_restores_cached_list_without_fetch() {
		let api = FakeApi::with_blogs(vec![post("p1", "Hello", true)]);
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		dashboard.start_create();
		dashboard.cancel_edit();

		assert_eq!(*dashboard.view(), View::List);
		assert_eq!(dashboard.blogs().len(), 1);
		assert_eq!(api.calls(), vec!["admin_blogs"]);
	}

	#[tokio::test]
	async fn test_decline_delete_issues_no_request() {
		let api = FakeApi::with_blogs(vec![post("p1", "Hello", true)]);
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		dashboard.request_delete("p1");
		assert_eq!(dashboard.pending_delete(), Some("p1"));

		dashboard.decline_delete();
		dashboard.confirm_delete().await;

		assert_eq!(dashboard.blogs().len(), 1);
		assert_eq!(api.calls(), vec!["admin_blogs"]);
	}

	#[tokio::test]
	async fn test_confirmed_delete_removes_exactly_one() {
		let api = FakeApi::with_blogs(vec![
			post("p1", "Keep", true),
			post("p2", "Gone", false),
		]);
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		dashboard.request_delete("p2");
		dashboard.confirm_delete().await;

		assert_eq!(dashboard.blogs().len(), 1);
		assert_eq!(dashboard.blogs()[0].id, "p1");
		assert_eq!(
			api.calls(),
			vec!["admin_blogs", "delete_blog", "admin_blogs"]
		);
	}

	#[tokio::test]
	async fn test_delete_failure_keeps_item_and_surfaces_error() {
		let api = FakeApi::with_blogs(vec![post("p1", "Sticky", true)]);
		let mut dashboard = admin_dashboard(&api);
		dashboard.refresh().await;

		api.fail_next();
		dashboard.request_delete("p1");
		dashboard.confirm_delete().await;

		assert_eq!(*dashboard.view(), View::List);
		assert_eq!(dashboard.blogs().len(), 1);
		assert!(dashboard.notice().is_some());
	}
}
