//! GearGuard Maintenance Management System
//!
//! A Rust implementation of the GearGuard maintenance management server,
//! providing a REST JSON API for equipment inventory, maintenance teams and
//! the maintenance request workflow.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
