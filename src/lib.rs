use axum::extract::FromRef;

pub mod auth;
pub mod cache;
pub mod commands;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod models;
pub mod token;
pub mod views;

pub use error::{ApiError, ApiResult};

use cache::PasteCache;
use config::Config;
use db::Database;

/// Shared application state, built once at startup and handed to every
/// request handler.
#[derive(Clone, FromRef)]
pub struct App {
    pub config: Config,
    pub database: Database,
    pub cache: PasteCache,
}
