/// Post Service Library
///
/// Exposes create/list/like/delete operations over a single post collection
/// backed by MongoDB.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and request/response types
/// - `models`: Post document model and listing orderings
/// - `services`: Business logic layer
/// - `db`: Collection-level database operations
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
