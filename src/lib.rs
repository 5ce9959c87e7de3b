//! Library API Server
//!
//! A REST JSON API for managing a small library catalog: books and the
//! loans that track which customer currently has which book.

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
    pub pool: sqlx::PgPool,
    pub services: Arc<services::Services>,
}
