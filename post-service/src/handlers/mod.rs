/// HTTP handlers for post endpoints
pub mod posts;

// Re-export handler functions at module level
pub use posts::{create_post, delete_post, like_post, list_posts};
