//! HTTP surface: axum router, request guards, and server-rendered pages.

mod error;
mod form;
mod handlers;
mod notice;
mod render;
mod router;
mod session;
mod types;

pub use error::WebError;
pub use notice::Notice;
pub use router::create_app;
pub use session::{FLASH_COOKIE, SESSION_COOKIE};
pub use types::{AppState, SharedState};
