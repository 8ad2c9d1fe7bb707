//! Business logic services.

#![allow(missing_docs)]

pub mod collaborators;
pub mod content;
pub mod history;
pub mod ordering;
pub mod publish;

#[cfg(test)]
pub(crate) mod test_support;

pub use collaborators::{
    Actor, ImageCatalog, ImageCatalogService, InMemoryImageCatalog, InMemoryNodeDirectory,
    NodeDirectory, NodeDirectoryService, NodeRef,
};
pub use content::{ContentResponse, ContentService, CreateContentInput};
pub use history::{HistoryResponse, VersionHistory};
pub use ordering::{placement_after, OrderingEngine};
pub use publish::{EditContentInput, PublishWorkflow};
