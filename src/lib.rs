//! School STEM program site: lesson planning, progress tracking, project
//! showcase, and anonymised student portfolios.

pub mod auth;
pub mod db;
pub mod models;
pub mod store;
pub mod web;

pub use web::{create_app, AppState, SharedState};
