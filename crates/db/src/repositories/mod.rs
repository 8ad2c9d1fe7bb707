//! Repository layer for database operations.

mod content;
mod content_history;

pub use content::{ContentRepository, SortShift};
pub use content_history::ContentHistoryRepository;
