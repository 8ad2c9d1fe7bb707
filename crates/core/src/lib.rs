//! Content lifecycle and ordering engine for folio.
//!
//! Services for draft/publish separation, version history capture and
//! transactional re-sequencing of sibling order.

pub mod services;

pub use services::*;
