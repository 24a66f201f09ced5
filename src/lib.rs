//! LocalLibrary server
//!
//! REST JSON API over a small library catalog: books, authors, genres and
//! physical copies, with due date renewal for librarians and a borrowed-books
//! listing for readers.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
