// Heritage Homes - builder marketing site backend

// Application state and configuration
pub mod app_state;
pub mod config;

// Persistence layer
pub mod database;

// Catalog domain model and query contracts
pub mod models;
pub mod slug;
pub mod store;

// Web layer - public site, staff portal, sitemap
pub mod web;

// Outbound mail seam and demo seeding
pub mod mail;
pub mod seed;

// Common utilities
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
