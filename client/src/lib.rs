#![warn(clippy::pedantic)]

//! Client-side admin workflow for the coaching-site CMS.
//!
//! The pieces mirror what a browser frontend would hold: a typed API
//! client ([`ApiClient`]), the signed-in identity ([`Session`]), the
//! blog editor form model ([`BlogEditor`]) and the dashboard state
//! machine ([`Dashboard`]) that drives the admin view.

pub mod api;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod model;
pub mod session;

pub use api::{AdminApi, ApiClient};
pub use dashboard::{Dashboard, Tab, View};
pub use editor::BlogEditor;
pub use error::Error;
pub use session::Session;
