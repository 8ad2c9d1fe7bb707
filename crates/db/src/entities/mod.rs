//! Database entities.

pub mod content;
pub mod content_history;

pub use content::Entity as Content;
pub use content_history::Entity as ContentHistory;
